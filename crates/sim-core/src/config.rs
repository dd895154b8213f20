//! Simulation configuration and starting scenarios.

use crate::bounded::{Amount, Percent, Share};
use crate::error::ValidationError;
use crate::ids::{AccessLevel, AiId, CountryId, IssueType, PerAgent};
use crate::model::{AiState, CountryState, IssueState, WorldState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Per-turn event probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventTuning {
    /// Chance of one global event per turn.
    pub global_chance: f64,
    /// Chance of one country-scoped event per turn.
    pub country_chance: f64,
}

impl EventTuning {
    /// Tuning that never fires events; used by scripted scenarios and tests.
    pub const QUIET: EventTuning = EventTuning {
        global_chance: 0.0,
        country_chance: 0.0,
    };
}

impl Default for EventTuning {
    fn default() -> Self {
        Self {
            global_chance: 0.12,
            country_chance: 0.28,
        }
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for deterministic RNG.
    pub rng_seed: u64,
    #[serde(default)]
    pub events: EventTuning,
}

impl SimConfig {
    /// Fresh deterministic generator for the turn pipeline.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.rng_seed)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            events: EventTuning::default(),
        }
    }
}

/// Issue present at game start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssueSeed {
    pub issue: IssueType,
    pub intensity: f32,
}

/// Starting values for one country. Per-agent tables are in `AiId::ALL` order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryConfig {
    pub id: CountryId,
    pub display_name: String,
    pub tech_level: f32,
    pub approval: PerAgent<f32>,
    #[serde(default)]
    pub access: PerAgent<AccessLevel>,
    pub market_share: PerAgent<f32>,
    #[serde(default)]
    pub issues: Vec<IssueSeed>,
}

fn default_version() -> u32 {
    1
}

fn default_trust() -> f32 {
    50.0
}

/// Starting values for one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: AiId,
    pub display_name: String,
    #[serde(default)]
    pub player_controlled: bool,
    #[serde(default = "default_version")]
    pub version: u32,
    pub approval: f32,
    #[serde(default)]
    pub autonomy: f32,
    #[serde(default)]
    pub data: f32,
    #[serde(default)]
    pub processing: f32,
    #[serde(default)]
    pub influence: f32,
    #[serde(default = "default_trust")]
    pub trust: f32,
}

/// Static starting tables plus simulation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SimConfig,
    pub countries: Vec<CountryConfig>,
    pub agents: Vec<AgentConfig>,
}

fn check_range(field: String, value: f32, min: f32, max: f32) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_chance(p: f64) -> Result<(), ValidationError> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::InvalidChance(p));
    }
    Ok(())
}

impl Scenario {
    /// Validate ranges and cross-references before building a world.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_chance(self.config.events.global_chance)?;
        check_chance(self.config.events.country_chance)?;
        for c in &self.countries {
            check_range(format!("{}.tech_level", c.id), c.tech_level, 0.0, f32::MAX)?;
            for (ai, v) in c.approval.iter() {
                check_range(format!("{}.approval.{ai}", c.id), *v, Percent::MIN, Percent::MAX)?;
            }
            for (ai, v) in c.market_share.iter() {
                check_range(format!("{}.market_share.{ai}", c.id), *v, Share::MIN, Share::MAX)?;
            }
            for seed in &c.issues {
                check_range(
                    format!("{}.issues.{:?}", c.id, seed.issue),
                    seed.intensity,
                    Percent::MIN,
                    Percent::MAX,
                )?;
            }
        }
        for a in &self.agents {
            let pct = [("approval", a.approval), ("autonomy", a.autonomy), ("trust", a.trust)];
            for (name, v) in pct {
                check_range(format!("{}.{name}", a.id), v, Percent::MIN, Percent::MAX)?;
            }
            let res = [("data", a.data), ("processing", a.processing), ("influence", a.influence)];
            for (name, v) in res {
                check_range(format!("{}.{name}", a.id), v, Amount::MIN, f32::MAX)?;
            }
        }
        Ok(())
    }

    /// Validates and builds the initial world (turn 0, no result).
    pub fn build_world(&self) -> Result<WorldState, ValidationError> {
        self.validate()?;
        let countries = self.countries.iter().map(build_country).collect();
        let ais = self.agents.iter().map(build_agent).collect();
        WorldState::new(countries, ais)
    }

    /// Full eight-country, four-agent scenario.
    pub fn standard() -> Self {
        use CountryId::*;
        use IssueType::*;
        #[rustfmt::skip]
        let table: [(CountryId, &str, f32, [f32; 4], [f32; 4], &[(IssueType, f32)]); 8] = [
            (Usa, "United States", 90.0, [55.0, 50.0, 45.0, 40.0], [0.15, 0.25, 0.20, 0.10], &[(Economy, 18.0)]),
            (Eu, "European Union", 80.0, [60.0, 45.0, 50.0, 40.0], [0.12, 0.18, 0.22, 0.08], &[(Energy, 22.0)]),
            (China, "China", 85.0, [40.0, 35.0, 40.0, 60.0], [0.08, 0.12, 0.10, 0.35], &[(Environment, 25.0)]),
            (India, "India", 60.0, [50.0, 45.0, 45.0, 45.0], [0.10, 0.15, 0.15, 0.15], &[(Health, 20.0)]),
            (AfricaUnion, "African Union", 35.0, [50.0, 40.0, 40.0, 40.0], [0.05, 0.10, 0.10, 0.10], &[(Health, 30.0), (Economy, 15.0)]),
            (SouthAmerica, "South America", 45.0, [52.0, 45.0, 42.0, 40.0], [0.08, 0.14, 0.12, 0.10], &[(SocialUnrest, 16.0)]),
            (MiddleEast, "Middle East", 50.0, [45.0, 40.0, 45.0, 50.0], [0.06, 0.12, 0.14, 0.16], &[(Security, 24.0)]),
            (Other, "Rest of World", 30.0, [50.0, 45.0, 45.0, 45.0], [0.05, 0.10, 0.10, 0.10], &[]),
        ];
        let countries = table
            .iter()
            .map(|(id, name, tech, approval, share, issues)| CountryConfig {
                id: *id,
                display_name: (*name).to_string(),
                tech_level: *tech,
                approval: PerAgent::new(*approval),
                access: PerAgent::default(),
                market_share: PerAgent::new(*share),
                issues: issues
                    .iter()
                    .map(|(issue, intensity)| IssueSeed {
                        issue: *issue,
                        intensity: *intensity,
                    })
                    .collect(),
            })
            .collect();
        let agents = [
            (AiId::Player, "Prometheus", 50.0, 5.0, 40.0),
            (AiId::Rival1, "Helix", 46.0, 10.0, 60.0),
            (AiId::Rival2, "Orion", 46.0, 8.0, 55.0),
            (AiId::Rival3, "Cygnus", 47.0, 12.0, 50.0),
        ]
        .into_iter()
        .map(|(id, name, approval, autonomy, data)| AgentConfig {
            id,
            display_name: name.to_string(),
            player_controlled: id.is_player(),
            version: 1,
            approval,
            autonomy,
            data,
            processing: 20.0,
            influence: 10.0,
            trust: default_trust(),
        })
        .collect();
        Self {
            config: SimConfig::default(),
            countries,
            agents,
        }
    }
}

fn build_country(c: &CountryConfig) -> CountryState {
    let mut country = CountryState::new(c.id, c.display_name.clone(), c.tech_level);
    country.approval = PerAgent::from_fn(|ai| Percent::new(c.approval[ai]));
    country.access = c.access;
    country.market_share = PerAgent::from_fn(|ai| Share::new(c.market_share[ai]));
    for seed in &c.issues {
        country.insert_issue(IssueState::new(seed.issue, seed.intensity));
    }
    country
}

fn build_agent(a: &AgentConfig) -> AiState {
    let mut ai = AiState::new(a.id, a.display_name.clone());
    ai.version = a.version;
    ai.player_controlled = a.id.is_player() || a.player_controlled;
    ai.approval.set(a.approval);
    ai.autonomy.set(a.autonomy);
    ai.data.set(a.data);
    ai.processing.set(a.processing);
    ai.influence.set(a.influence);
    ai.trust.set(a.trust);
    ai
}
