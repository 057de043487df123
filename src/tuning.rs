//! Game balance tuning
//!
//! Every number the simulation reads lives here so balance can be tweaked
//! from a JSON file without recompiling. Missing fields fall back to the
//! defaults, so a tuning file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::PowerUpKind;

/// What happens to an obstacle the player touches while shielded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldPolicy {
    /// Obstacle is smashed and removed
    #[default]
    Destroy,
    /// Obstacle stays in the world; the player passes through it
    PassThrough,
}

/// Relative weights for the kind of a freshly spawned object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub coin: f32,
    pub power_up: f32,
    pub obstacle: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            coin: 0.5,
            power_up: 0.2,
            obstacle: 0.3,
        }
    }
}

impl SpawnWeights {
    pub fn total(&self) -> f32 {
        self.coin + self.power_up + self.obstacle
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player motion ===
    /// Base forward speed (units/s) before slow motion
    pub forward_speed: f32,
    /// Lateral slide speed at full input (units/s)
    pub lateral_speed: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity applied by a jump (units/s)
    pub jump_speed: f32,

    // === Track ===
    pub lane_half_width: f32,
    /// Extra lateral distance past the lane edge before the player falls off
    pub fall_margin: f32,
    /// Height below which the player counts as fallen
    pub min_height: f32,

    // === World generation ===
    /// Expected spawns per second
    pub spawn_rate: f32,
    /// Closest spawn distance ahead of the player
    pub spawn_min_ahead: f32,
    /// Farthest spawn distance ahead of the player
    pub spawn_max_ahead: f32,
    pub spawn_weights: SpawnWeights,
    /// Power-ups the generator may place (uniform choice)
    pub power_ups: Vec<PowerUpKind>,
    /// Live object cap; spawns are skipped while it is reached
    pub max_objects: usize,
    /// Objects this far behind the player are dropped
    pub despawn_behind: f32,

    // === Collisions ===
    pub pickup_radius: f32,
    pub shield_policy: ShieldPolicy,

    // === Effects (seconds) ===
    pub shield_duration: f32,
    pub double_tokens_duration: f32,
    pub magnet_duration: f32,
    pub slow_motion_duration: f32,
    /// Forward speed multiplier while slow motion is active
    pub slow_motion_factor: f32,
    /// Coins within this distance are pulled in while magnet is active
    pub magnet_radius: f32,
    pub magnet_pull_speed: f32,

    // === Scoring ===
    /// Score per unit of forward distance travelled
    pub score_rate: f32,
    /// Longest elapsed time a single tick will integrate
    pub max_tick_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            forward_speed: FORWARD_SPEED,
            lateral_speed: LATERAL_SPEED,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,

            lane_half_width: LANE_HALF_WIDTH,
            fall_margin: FALL_MARGIN,
            min_height: MIN_HEIGHT,

            spawn_rate: 1.2,
            spawn_min_ahead: 20.0,
            spawn_max_ahead: 40.0,
            spawn_weights: SpawnWeights::default(),
            power_ups: PowerUpKind::ALL.to_vec(),
            max_objects: 64,
            despawn_behind: 5.0,

            pickup_radius: PICKUP_RADIUS,
            shield_policy: ShieldPolicy::Destroy,

            shield_duration: 10.0,
            double_tokens_duration: 10.0,
            magnet_duration: 10.0,
            slow_motion_duration: 8.0,
            slow_motion_factor: 0.5,
            magnet_radius: 3.0,
            magnet_pull_speed: 12.0,

            score_rate: 1.0,
            max_tick_dt: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning JSON file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Full duration of a power-up effect
    pub fn effect_duration(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Shield => self.shield_duration,
            PowerUpKind::DoubleTokens => self.double_tokens_duration,
            PowerUpKind::Magnet => self.magnet_duration,
            PowerUpKind::SlowMotion => self.slow_motion_duration,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("forward_speed", self.forward_speed),
            ("lateral_speed", self.lateral_speed),
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("lane_half_width", self.lane_half_width),
            ("spawn_min_ahead", self.spawn_min_ahead),
            ("pickup_radius", self.pickup_radius),
            ("shield_duration", self.shield_duration),
            ("double_tokens_duration", self.double_tokens_duration),
            ("magnet_duration", self.magnet_duration),
            ("slow_motion_duration", self.slow_motion_duration),
            ("slow_motion_factor", self.slow_motion_factor),
            ("max_tick_dt", self.max_tick_dt),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("fall_margin", self.fall_margin),
            ("spawn_rate", self.spawn_rate),
            ("despawn_behind", self.despawn_behind),
            ("magnet_radius", self.magnet_radius),
            ("magnet_pull_speed", self.magnet_pull_speed),
            ("score_rate", self.score_rate),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.spawn_max_ahead <= self.spawn_min_ahead {
            return Err(TuningError::invalid(
                "spawn_max_ahead",
                format!(
                    "must exceed spawn_min_ahead ({} <= {})",
                    self.spawn_max_ahead, self.spawn_min_ahead
                ),
            ));
        }

        let w = &self.spawn_weights;
        if [w.coin, w.power_up, w.obstacle]
            .iter()
            .any(|v| !(v.is_finite() && *v >= 0.0))
        {
            return Err(TuningError::invalid("spawn_weights", "weights must be >= 0"));
        }
        if w.total() <= 0.0 {
            return Err(TuningError::invalid("spawn_weights", "at least one weight must be > 0"));
        }
        if w.power_up > 0.0 && self.power_ups.is_empty() {
            return Err(TuningError::invalid(
                "power_ups",
                "empty while spawn_weights.power_up > 0",
            ));
        }

        Ok(())
    }
}
