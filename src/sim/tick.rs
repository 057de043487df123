//! Per-frame simulation tick
//!
//! Core run loop that advances the simulation deterministically.

use super::collision::{apply_magnet, resolve_collisions};
use super::kinematics::{fell_off_track, integrate};
use super::spawn::{despawn_passed, maybe_spawn};
use super::state::{EndReason, RunEvent, RunSnapshot, RunState};
use crate::sanitize_dt;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Steering in `[-1, 1]`: -1 left, 0 straight, +1 right
    pub lateral: f32,
    /// Jump (edge-triggered; the host sets it for one tick per key press)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by `dt` seconds and return the updated snapshot.
///
/// Idle, paused and ended runs are left untouched. `dt` is clamped to
/// `[0, tuning.max_tick_dt]`.
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) -> RunSnapshot {
    // Handle pause toggle
    if input.pause {
        state.toggle_pause();
    }

    // Don't tick unless a run is in progress
    if !state.is_running() {
        return state.snapshot();
    }

    let dt = sanitize_dt(dt, state.tuning.max_tick_dt);
    if dt == 0.0 {
        return state.snapshot();
    }

    state.time_ticks += 1;
    state.run_time += dt as f64;

    // Effect timers share the tick so a pause freezes them too
    for kind in state.effects.decay(dt) {
        log::debug!("Effect {} expired", kind.as_str());
        state.push_event(RunEvent::EffectExpired { kind });
    }

    let speed = state.effective_speed();
    if integrate(
        &mut state.player,
        input.lateral,
        input.jump,
        speed,
        &state.tuning,
        dt,
    ) {
        state.push_event(RunEvent::Jumped);
    }

    maybe_spawn(state, dt);
    apply_magnet(state, dt);

    resolve_collisions(state);
    if !state.is_running() {
        return state.snapshot();
    }

    if fell_off_track(&state.player, &state.tuning) {
        state.end_run(EndReason::FellOff);
        return state.snapshot();
    }

    despawn_passed(state);

    state.score += (speed * dt * state.tuning.score_rate) as f64;

    // Ensure deterministic ordering
    state.normalize_order();

    state.snapshot()
}
