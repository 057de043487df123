//! Demo/attract-mode driver
//!
//! Produces `TickInput`s from the current state: hop over obstacles in the
//! player's path, drift toward the nearest coin, stay inside the lane.

use super::state::{ObjectKind, RunState};
use super::tick::TickInput;

/// How far ahead the autopilot looks for coins
const LOOK_AHEAD: f32 = 12.0;
/// Jump when an obstacle in our path is this close
const JUMP_DISTANCE: f32 = 1.6;
/// Lateral slack before we bother steering
const STEER_DEADZONE: f32 = 0.1;

pub fn autopilot_input(state: &RunState) -> TickInput {
    let player = &state.player;
    let lane_guard = state.tuning.lane_half_width * 0.8;
    let hit_width = state.tuning.pickup_radius * 2.0;

    let ahead = |z: f32| player.pos.z - z;

    let threat = state.objects.iter().any(|o| {
        o.kind == ObjectKind::Obstacle
            && (o.pos.x - player.pos.x).abs() < hit_width
            && (0.0..JUMP_DISTANCE).contains(&ahead(o.pos.z))
    });
    let jump = threat && !state.shield_active() && player.on_ground;

    // Nearest coin ahead (by forward distance)
    let target_x = state
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Coin || matches!(o.kind, ObjectKind::PowerUp(_)))
        .filter(|o| (0.0..LOOK_AHEAD).contains(&ahead(o.pos.z)))
        .min_by(|a, b| {
            ahead(a.pos.z)
                .partial_cmp(&ahead(b.pos.z))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|o| o.pos.x)
        .unwrap_or(0.0)
        .clamp(-lane_guard, lane_guard);

    let dx = target_x - player.pos.x;
    let lateral = if dx.abs() < STEER_DEADZONE { 0.0 } else { dx.signum() };

    TickInput {
        lateral,
        jump,
        pause: false,
    }
}
