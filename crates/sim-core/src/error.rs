//! Error taxonomy for configuration and the turn pipeline.

use crate::ids::{AiId, CountryId, IssueType};
use thiserror::Error;

/// Validation errors for starting configuration and world construction.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Country ids must be unique within a world.
    #[error("duplicate country: {0}")]
    DuplicateCountry(CountryId),
    /// Agent ids must be unique within a world.
    #[error("duplicate agent: {0}")]
    DuplicateAgent(AiId),
    /// Numeric field must be finite.
    #[error("non-finite numeric value in {0}")]
    NonFinite(String),
    /// Numeric field outside its declared range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f32,
        min: f32,
        max: f32,
    },
    /// An issue map entry is keyed by a different type than its record.
    #[error("{country} issue keyed as {key:?} holds a {found:?} record")]
    IssueKeyMismatch {
        country: CountryId,
        key: IssueType,
        found: IssueType,
    },
    /// Probabilities must lie in [0, 1].
    #[error("probability {0} must be within [0,1]")]
    InvalidChance(f64),
}

/// Conditions under which a pipeline operation does nothing.
///
/// Systems treat all of these as silent no-ops; they only surface in logs,
/// except [`SimError::GameOver`] which `end_turn` reports to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("country {0} not found")]
    MissingCountry(CountryId),
    #[error("agent {0} not found")]
    MissingAgent(AiId),
    #[error("game is already over")]
    GameOver,
    #[error("nothing to do: {0}")]
    NoOp(&'static str),
}

/// Records a skipped operation at debug level and swallows it.
pub fn log_skip(op: &'static str, result: Result<(), SimError>) {
    if let Err(err) = result {
        tracing::debug!(op, %err, "operation skipped");
    }
}
