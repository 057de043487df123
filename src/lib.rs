//! Neon Runner - simulation core for a lane-based infinite runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use tuning::{ShieldPolicy, SpawnWeights, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the host may feed into the fixed-step clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Track geometry
    pub const LANE_HALF_WIDTH: f32 = 3.0;
    pub const FALL_MARGIN: f32 = 1.0;
    pub const MIN_HEIGHT: f32 = -1.0;

    /// Player motion (units per second)
    pub const FORWARD_SPEED: f32 = 9.0;
    pub const LATERAL_SPEED: f32 = 1.2;
    pub const GRAVITY: f32 = 72.0;
    pub const JUMP_SPEED: f32 = 21.0;

    /// Distance at which the player touches a world object
    pub const PICKUP_RADIUS: f32 = 0.35;
}

/// Clamp a host-supplied elapsed time into `[0, max_dt]`.
///
/// Negative and NaN values become zero.
#[inline]
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}
