//! Error types
//!
//! The simulation itself never fails: ending a run is a state transition.
//! Only loading a tuning file can go wrong.

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    /// Tuning file could not be parsed
    #[error("tuning JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Tuning file could not be read
    #[error("tuning IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A value parsed fine but makes no sense for the simulation
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
