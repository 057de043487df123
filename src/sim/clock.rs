//! Fixed-step frame driver
//!
//! Hosts hand in whatever time passed since the last animation frame; the
//! clock turns it into whole `SIM_DT` ticks and carries the remainder.

use super::state::{RunSnapshot, RunState};
use super::tick::{TickInput, tick};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Jump pressed on a frame that ran no tick yet
    pending_jump: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time banked but not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Run as many fixed ticks as `frame_dt` covers (at most `MAX_SUBSTEPS`).
    ///
    /// One-shot inputs (`jump`, `pause`) only reach the first substep; the
    /// steering input holds for the whole frame. A jump on a frame too short
    /// for a tick is held until the next tick runs. Returns the number of
    /// ticks run and the final snapshot.
    pub fn advance(
        &mut self,
        state: &mut RunState,
        input: &TickInput,
        frame_dt: f32,
    ) -> (u32, RunSnapshot) {
        let frame_dt = crate::sanitize_dt(frame_dt, MAX_FRAME_DT);
        self.accumulator += frame_dt;

        let mut input = input.clone();
        input.jump |= self.pending_jump;
        let mut snapshot = state.snapshot();
        let mut substeps = 0;

        // One-shot toggles must land even on a frame too short for a tick
        if input.pause && self.accumulator < SIM_DT {
            snapshot = tick(state, &input, 0.0);
            input.pause = false;
        }

        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            snapshot = tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.jump = false;
            input.pause = false;
        }

        self.pending_jump = substeps == 0 && input.jump;

        // Drop what could not be caught up instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        (substeps, snapshot)
    }

    /// Forget banked time (after a pause or a tab switch)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.pending_jump = false;
    }
}
