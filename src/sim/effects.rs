//! Timed power-up effects
//!
//! Each effect is a remaining duration in seconds, counted down by the tick.
//! Zero means inactive. Because decay happens inside `tick`, pausing the run
//! freezes every timer.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Remaining duration (seconds) of every power-up effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: f32,
    pub double_tokens: f32,
    pub magnet: f32,
    pub slow_motion: f32,
}

impl ActiveEffects {
    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Shield => self.shield,
            PowerUpKind::DoubleTokens => self.double_tokens,
            PowerUpKind::Magnet => self.magnet,
            PowerUpKind::SlowMotion => self.slow_motion,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut f32 {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::DoubleTokens => &mut self.double_tokens,
            PowerUpKind::Magnet => &mut self.magnet,
            PowerUpKind::SlowMotion => &mut self.slow_motion,
        }
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Start (or restart) an effect at its full duration. Never stacks.
    pub fn activate(&mut self, kind: PowerUpKind, duration: f32) {
        *self.slot_mut(kind) = duration.max(0.0);
    }

    /// Count every active timer down by `dt`; returns the effects that
    /// reached zero on this call.
    pub fn decay(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if *slot > 0.0 {
                *slot = (*slot - dt).max(0.0);
                if *slot == 0.0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Forward-speed multiplier from slow motion (1.0 when inactive)
    pub fn speed_multiplier(&self, slow_factor: f32) -> f32 {
        if self.is_active(PowerUpKind::SlowMotion) {
            slow_factor
        } else {
            1.0
        }
    }

    /// Tokens awarded for one coin
    pub fn coin_value(&self) -> u32 {
        if self.is_active(PowerUpKind::DoubleTokens) { 2 } else { 1 }
    }
}
