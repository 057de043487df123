//! Procedural world generation
//!
//! Objects appear ahead of the player at random lane offsets and are dropped
//! again once they are far enough behind.

use glam::Vec3;

use super::state::{ObjectKind, RunState};

/// Roll for a spawn this tick; returns the new object's ID if one appeared.
///
/// Does nothing unless the run is active.
pub fn maybe_spawn(state: &mut RunState, dt: f32) -> Option<u32> {
    if !state.is_running() {
        return None;
    }

    let p = state.tuning.spawn_rate * dt;
    if !state.rng.chance(p) {
        return None;
    }

    if state.objects.len() >= state.tuning.max_objects {
        log::trace!("Spawn skipped: {} objects live", state.objects.len());
        return None;
    }

    Some(spawn_object(state))
}

/// Place one random object ahead of the player
pub fn spawn_object(state: &mut RunState) -> u32 {
    let kind = roll_kind(state);

    let tuning = &state.tuning;
    let (min_ahead, max_ahead) = (tuning.spawn_min_ahead, tuning.spawn_max_ahead);
    let half_width = tuning.lane_half_width;

    let ahead = state.rng.range(min_ahead, max_ahead);
    let x = state.rng.range(-half_width, half_width);
    let pos = Vec3::new(x, 0.0, state.player.pos.z - ahead);

    let id = state.place_object(kind, pos);
    log::debug!("Spawned {:?} #{} at ({:.2}, {:.1})", kind, id, pos.x, pos.z);
    id
}

fn roll_kind(state: &mut RunState) -> ObjectKind {
    let w = state.tuning.spawn_weights;
    // A power-up weight with nothing to hand out behaves like zero
    let power_up = if state.tuning.power_ups.is_empty() {
        0.0
    } else {
        w.power_up
    };

    match state.rng.weighted(&[w.coin, power_up, w.obstacle]) {
        0 => ObjectKind::Coin,
        1 => {
            let i = state.rng.index(state.tuning.power_ups.len());
            ObjectKind::PowerUp(state.tuning.power_ups[i])
        }
        _ => ObjectKind::Obstacle,
    }
}

/// Drop objects that have fallen behind the player
pub fn despawn_passed(state: &mut RunState) -> usize {
    let cutoff = state.player.pos.z + state.tuning.despawn_behind;
    let before = state.objects.len();
    state.objects.retain(|o| o.pos.z <= cutoff);
    before - state.objects.len()
}
