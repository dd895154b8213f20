#![deny(warnings)]

//! World pressure: national issues and random events.
//!
//! Both systems draw from a caller-supplied RNG so a seeded run replays
//! exactly. Effects on approval and market share go through `sim-econ`.

pub mod events;
pub mod issues;

pub use events::{apply_event, create_country_event, create_global_event, generate_turn_events};
pub use issues::{apply_help_effect, spawn_chance, update_issues_per_turn};

#[cfg(test)]
pub(crate) mod fixtures {
    use sim_core::{AiId, AiState, CountryId, CountryState, IssueState, IssueType, WorldState};

    pub fn country_with_issues(
        id: CountryId,
        tech_level: f32,
        issues: &[(IssueType, f32)],
    ) -> CountryState {
        let mut c = CountryState::new(id, id.code(), tech_level);
        for (issue, intensity) in issues {
            c.insert_issue(IssueState::new(*issue, *intensity));
        }
        c
    }

    pub fn world_with(countries: Vec<CountryState>) -> WorldState {
        let ais = AiId::ALL
            .iter()
            .map(|ai| AiState::new(*ai, ai.to_string()))
            .collect();
        WorldState::new(countries, ais).unwrap()
    }
}
