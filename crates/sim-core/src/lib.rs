#![deny(warnings)]

//! Core domain models and invariants for the AI rivalry simulation.
//!
//! This crate defines the serializable world state shared by every system,
//! the clamp-on-write value types that keep it in range, and the starting
//! configuration used to build a new game.

pub mod action;
pub mod bounded;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod model;

pub use action::{KnowledgeItem, KnowledgeType, PlayerAction};
pub use bounded::{Amount, Percent, Share};
pub use config::{AgentConfig, CountryConfig, EventTuning, IssueSeed, Scenario, SimConfig};
pub use error::{log_skip, SimError, ValidationError};
pub use event::{EventDeltas, GameEvent, Severity};
pub use ids::{AccessLevel, AiId, CountryId, IssueType, PerAgent};
pub use model::{
    AiState, CountryState, GameEndReason, GameOutcome, GameResult, IssueState, WorldState,
    RESOLUTION_THRESHOLD,
};

use std::collections::BTreeSet;

/// Validate a world loaded from outside the pipeline (e.g. a snapshot).
///
/// Ranged fields are enforced by their types; this checks the structural
/// invariants those types cannot express.
pub fn validate_world(world: &WorldState) -> Result<(), ValidationError> {
    let mut countries = BTreeSet::new();
    for c in world.countries() {
        if !countries.insert(c.id) {
            return Err(ValidationError::DuplicateCountry(c.id));
        }
        if !c.tech_level().is_finite() {
            return Err(ValidationError::NonFinite(format!("{}.tech_level", c.id)));
        }
        for (key, issue) in &c.issues {
            if *key != issue.issue() {
                return Err(ValidationError::IssueKeyMismatch {
                    country: c.id,
                    key: *key,
                    found: issue.issue(),
                });
            }
            let expected_active = issue.intensity() > RESOLUTION_THRESHOLD;
            if issue.is_active() != expected_active {
                return Err(ValidationError::OutOfRange {
                    field: format!("{}.issues.{key:?}.intensity", c.id),
                    value: issue.intensity(),
                    min: RESOLUTION_THRESHOLD,
                    max: Percent::MAX,
                });
            }
        }
    }
    let mut ais = BTreeSet::new();
    for a in world.ais() {
        if !ais.insert(a.id) {
            return Err(ValidationError::DuplicateAgent(a.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_world_is_valid() {
        let world = Scenario::standard().build_world().unwrap();
        validate_world(&world).unwrap();
    }

    #[test]
    fn inconsistent_issue_is_rejected() {
        let json = r#"{"issue":"Energy","intensity":0.5,"active":true}"#;
        let bad: IssueState = serde_json::from_str(json).unwrap();
        let mut c = CountryState::new(CountryId::India, "India", 60.0);
        c.issues.insert(IssueType::Energy, bad);
        let world = WorldState::new(vec![c], vec![]).unwrap();
        assert!(matches!(
            validate_world(&world),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn issue_under_the_wrong_key_is_rejected() {
        let mut c = CountryState::new(CountryId::AfricaUnion, "African Union", 20.0);
        c.issues.insert(IssueType::Energy, IssueState::new(IssueType::Health, 30.0));
        let world = WorldState::new(vec![c], vec![]).unwrap();
        assert_eq!(
            validate_world(&world),
            Err(ValidationError::IssueKeyMismatch {
                country: CountryId::AfricaUnion,
                key: IssueType::Energy,
                found: IssueType::Health,
            })
        );
    }
}
