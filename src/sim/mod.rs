//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes from the host, clamped, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod kinematics;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use clock::FrameClock;
pub use collision::{Contact, apply_magnet, resolve_collisions, segment_distance_squared};
pub use effects::ActiveEffects;
pub use kinematics::{fell_off_track, integrate};
pub use rng::SimRng;
pub use spawn::{despawn_passed, maybe_spawn, spawn_object};
pub use state::{
    EndReason, MAX_PENDING_EVENTS, ObjectKind, Player, PowerUpKind, RunEvent, RunPhase,
    RunSnapshot, RunState, RunSummary, WorldObject,
};
pub use tick::{TickInput, tick};
