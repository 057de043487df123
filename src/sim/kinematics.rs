//! Player kinematics
//!
//! Every displacement is scaled by `dt`, so the motion does not depend on the
//! host frame rate.

use super::state::Player;
use crate::tuning::Tuning;

/// Advance the player by `dt` seconds.
///
/// `lateral` is the steering input in `[-1, 1]`; `forward_speed` already
/// includes slow motion. A jump only fires while on the ground. Returns true
/// if a jump was applied.
pub fn integrate(
    player: &mut Player,
    lateral: f32,
    jump: bool,
    forward_speed: f32,
    tuning: &Tuning,
    dt: f32,
) -> bool {
    player.prev_pos = player.pos;
    player.pos.z -= forward_speed * dt;

    let lateral = if lateral.is_nan() { 0.0 } else { lateral.clamp(-1.0, 1.0) };
    player.vx = lateral * tuning.lateral_speed;
    player.pos.x += player.vx * dt;

    let jumped = jump && player.on_ground;
    if jumped {
        player.vy = tuning.jump_speed;
        player.on_ground = false;
    }

    player.vy -= tuning.gravity * dt;
    player.pos.y += player.vy * dt;
    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        player.vy = 0.0;
        player.on_ground = true;
    }

    jumped
}

/// True once the player has left the lane sideways or dropped below it
pub fn fell_off_track(player: &Player, tuning: &Tuning) -> bool {
    player.pos.x.abs() > tuning.lane_half_width + tuning.fall_margin
        || player.pos.y < tuning.min_height
}
