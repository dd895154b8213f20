//! Transient world events produced and consumed within one turn.

use crate::ids::{AiId, CountryId, IssueType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Maps a uniform roll in [0,1) onto the fixed distribution
    /// Low 45%, Medium 30%, High 17%, Critical 8%.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.45 {
            Severity::Low
        } else if roll < 0.75 {
            Severity::Medium
        } else if roll < 0.92 {
            Severity::High
        } else {
            Severity::Critical
        }
    }

    pub const fn multiplier(self) -> f32 {
        match self {
            Severity::Low => 1.0,
            Severity::Medium => 1.5,
            Severity::High => 2.25,
            Severity::Critical => 3.0,
        }
    }
}

/// Typed deltas carried by an event. Zero means "no effect".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDeltas {
    /// National approval change in the event's country, per target.
    pub approval: f32,
    /// Market share change in the event's country, per target.
    pub market_share: f32,
    /// Intensity change for the event's issue record.
    pub issue_intensity: f32,
    pub trust: f32,
    /// Written directly; reaching the threshold still latches escape.
    pub autonomy: f32,
    /// Negative values spend, floored at zero.
    pub data: f32,
    pub processing: f32,
    /// Negative values spend, floored at zero.
    pub influence: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// `EVT-` tag, unique enough for log correlation.
    pub id: String,
    /// Scales every delta when the event is generated.
    pub severity: Severity,
    /// Country the event happens in; `None` for global events.
    pub country: Option<CountryId>,
    /// Issue shifted by `deltas.issue_intensity`, if any.
    pub issue: Option<IssueType>,
    /// Single target; `None` affects every agent.
    pub target: Option<AiId>,
    pub global: bool,
    /// Effects applied to each target and to the country.
    pub deltas: EventDeltas,
}
