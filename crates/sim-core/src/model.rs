//! World state aggregate and its entities.

use crate::bounded::{Amount, Percent, Share};
use crate::error::{SimError, ValidationError};
use crate::ids::{AccessLevel, AiId, CountryId, IssueType, PerAgent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Intensity at or below which an issue counts as resolved.
pub const RESOLUTION_THRESHOLD: f32 = 1.0;

/// How a finished game ended for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    None,
    Win,
    Lose,
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEndReason {
    #[default]
    None,
    PlayerEscaped,
    RivalEscaped,
    LowApprovalAndAccessBans,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub reason: GameEndReason,
}

impl GameResult {
    pub const fn new(outcome: GameOutcome, reason: GameEndReason) -> Self {
        Self { outcome, reason }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self.outcome, GameOutcome::None)
    }
}

/// A national issue record. Intensity and `active` move together: anything at
/// or below [`RESOLUTION_THRESHOLD`] is resolved and reset to zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssueState {
    issue: IssueType,
    intensity: Percent,
    active: bool,
}

impl IssueState {
    pub fn new(issue: IssueType, intensity: f32) -> Self {
        let mut state = Self {
            issue,
            intensity: Percent::default(),
            active: false,
        };
        state.set_intensity(intensity);
        state
    }

    pub fn issue(&self) -> IssueType {
        self.issue
    }

    pub fn intensity(&self) -> f32 {
        self.intensity.get()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_intensity(&mut self, value: f32) {
        self.intensity.set(value);
        if self.intensity.get() <= RESOLUTION_THRESHOLD {
            self.intensity.set(0.0);
            self.active = false;
        } else {
            self.active = true;
        }
    }

    /// Moves intensity by `delta`, applying the resolution rule.
    pub fn shift(&mut self, delta: f32) {
        self.set_intensity(self.intensity.get() + delta);
    }
}

/// Mutable state of a single agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub id: AiId,
    /// Name shown in logs and the CLI.
    pub display_name: String,
    /// Model generation, informational only.
    pub version: u32,
    /// Global approval: recomputed each turn as the mean of national
    /// approval, and charged directly by detected autonomy gains.
    pub approval: Percent,
    /// Escape progress; reaching the threshold latches `escaped`.
    pub autonomy: Percent,
    /// Spent on research.
    pub data: Amount,
    pub processing: Amount,
    pub influence: Amount,
    /// Public trust, moved by help, research and events.
    pub trust: Percent,
    /// True only for the player agent.
    pub player_controlled: bool,
    escaped: bool,
}

impl AiState {
    pub fn new(id: AiId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            version: 1,
            approval: Percent::default(),
            autonomy: Percent::default(),
            data: Amount::default(),
            processing: Amount::default(),
            influence: Amount::default(),
            trust: Percent::default(),
            player_controlled: id.is_player(),
            escaped: false,
        }
    }

    pub fn has_escaped(&self) -> bool {
        self.escaped
    }

    /// One-way transition; nothing resets it.
    pub fn mark_escaped(&mut self) {
        self.escaped = true;
    }

    pub fn gain_data(&mut self, amount: f32) {
        self.data.add(amount);
    }

    pub fn spend_data(&mut self, amount: f32) {
        self.data.add(-amount);
    }

    pub fn gain_influence(&mut self, amount: f32) {
        self.influence.add(amount);
    }

    pub fn spend_influence(&mut self, amount: f32) {
        self.influence.add(-amount);
    }
}

/// Mutable state of one country, with per-agent standing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryState {
    pub id: CountryId,
    pub display_name: String,
    /// Non-negative and finite; drives the issue spawn chance.
    tech_level: f32,
    /// National approval of each agent.
    pub approval: PerAgent<Percent>,
    /// How far each agent may operate here.
    pub access: PerAgent<AccessLevel>,
    /// Each agent's share of the local market; the total stays at most 1.
    pub market_share: PerAgent<Share>,
    /// At most one record per type. Resolved records are kept.
    pub issues: BTreeMap<IssueType, IssueState>,
}

impl CountryState {
    pub fn new(id: CountryId, display_name: impl Into<String>, tech_level: f32) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            tech_level: if tech_level.is_finite() {
                tech_level.max(0.0)
            } else {
                0.0
            },
            approval: PerAgent::default(),
            access: PerAgent::default(),
            market_share: PerAgent::default(),
            issues: BTreeMap::new(),
        }
    }

    pub fn tech_level(&self) -> f32 {
        self.tech_level
    }

    pub fn approval(&self, ai: AiId) -> f32 {
        self.approval[ai].get()
    }

    pub fn add_approval(&mut self, ai: AiId, delta: f32) {
        self.approval[ai].add(delta);
    }

    pub fn market_share(&self, ai: AiId) -> f32 {
        self.market_share[ai].get()
    }

    pub fn add_market_share(&mut self, ai: AiId, delta: f32) {
        self.market_share[ai].add(delta);
    }

    pub fn total_market_share(&self) -> f32 {
        self.market_share.values().map(|s| s.get()).sum()
    }

    pub fn access(&self, ai: AiId) -> AccessLevel {
        self.access[ai]
    }

    pub fn set_access(&mut self, ai: AiId, level: AccessLevel) {
        self.access[ai] = level;
    }

    /// Inserts an issue, replacing any record of the same type.
    pub fn insert_issue(&mut self, issue: IssueState) {
        self.issues.insert(issue.issue(), issue);
    }

    pub fn has_active_issue(&self, issue: IssueType) -> bool {
        self.issues.get(&issue).is_some_and(IssueState::is_active)
    }

    pub fn active_issues(&self) -> impl Iterator<Item = &IssueState> + '_ {
        self.issues.values().filter(|i| i.is_active())
    }
}

/// Root aggregate mutated once per turn by the simulation systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    countries: Vec<CountryState>,
    ais: Vec<AiState>,
    turn: u32,
    game_over: bool,
    result: GameResult,
}

impl WorldState {
    /// Builds a fresh world at turn 0. Country and agent ids must be unique.
    pub fn new(countries: Vec<CountryState>, ais: Vec<AiState>) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for c in &countries {
            if !seen.insert(c.id) {
                return Err(ValidationError::DuplicateCountry(c.id));
            }
        }
        let mut seen = BTreeSet::new();
        for a in &ais {
            if !seen.insert(a.id) {
                return Err(ValidationError::DuplicateAgent(a.id));
            }
        }
        Ok(Self {
            countries,
            ais,
            turn: 0,
            game_over: false,
            result: GameResult::default(),
        })
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn advance_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
    }

    /// Stores the latest evaluation. Once the game is over both the flag and
    /// the final result are frozen.
    pub fn latch_result(&mut self, result: GameResult) {
        if self.game_over {
            return;
        }
        self.result = result;
        if result.is_terminal() {
            self.game_over = true;
        }
    }

    pub fn countries(&self) -> &[CountryState] {
        &self.countries
    }

    pub fn countries_mut(&mut self) -> &mut [CountryState] {
        &mut self.countries
    }

    pub fn ais(&self) -> &[AiState] {
        &self.ais
    }

    pub fn ais_mut(&mut self) -> &mut [AiState] {
        &mut self.ais
    }

    pub fn country(&self, id: CountryId) -> Option<&CountryState> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn country_mut(&mut self, id: CountryId) -> Option<&mut CountryState> {
        self.countries.iter_mut().find(|c| c.id == id)
    }

    pub fn ai(&self, id: AiId) -> Option<&AiState> {
        self.ais.iter().find(|a| a.id == id)
    }

    pub fn ai_mut(&mut self, id: AiId) -> Option<&mut AiState> {
        self.ais.iter_mut().find(|a| a.id == id)
    }

    /// Like [`WorldState::country_mut`], for systems that report skips.
    pub fn try_country_mut(&mut self, id: CountryId) -> Result<&mut CountryState, SimError> {
        self.country_mut(id).ok_or(SimError::MissingCountry(id))
    }

    pub fn try_ai_mut(&mut self, id: AiId) -> Result<&mut AiState, SimError> {
        self.ai_mut(id).ok_or(SimError::MissingAgent(id))
    }

    pub fn player(&self) -> Option<&AiState> {
        self.ai(AiId::Player)
    }

    pub fn rivals(&self) -> impl Iterator<Item = &AiState> + '_ {
        self.ais.iter().filter(|a| !a.id.is_player())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldState {
        let mut usa = CountryState::new(CountryId::Usa, "United States", 80.0);
        usa.approval[AiId::Player] = Percent::new(40.0);
        usa.market_share[AiId::Rival1] = Share::new(0.3);
        usa.insert_issue(IssueState::new(IssueType::Energy, 12.0));
        let eu = CountryState::new(CountryId::Eu, "European Union", 70.0);
        WorldState::new(
            vec![usa, eu],
            vec![AiState::new(AiId::Player, "Aster"), AiState::new(AiId::Rival1, "Nimbus")],
        )
        .unwrap()
    }

    #[test]
    fn new_world_starts_at_turn_zero() {
        let w = world();
        assert_eq!(w.turn(), 0);
        assert!(!w.is_game_over());
        assert_eq!(w.result(), GameResult::default());
        assert!(w.player().unwrap().player_controlled);
        assert_eq!(w.rivals().count(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = CountryState::new(CountryId::Usa, "A", 1.0);
        let b = CountryState::new(CountryId::Usa, "B", 1.0);
        assert_eq!(
            WorldState::new(vec![a, b], vec![]),
            Err(ValidationError::DuplicateCountry(CountryId::Usa))
        );
        let p1 = AiState::new(AiId::Player, "P");
        let p2 = AiState::new(AiId::Player, "Q");
        assert_eq!(
            WorldState::new(vec![], vec![p1, p2]),
            Err(ValidationError::DuplicateAgent(AiId::Player))
        );
    }

    #[test]
    fn issue_resolution_rule() {
        let mut issue = IssueState::new(IssueType::Health, 20.0);
        assert!(issue.is_active());
        issue.shift(-18.5);
        assert!(issue.is_active());
        assert_eq!(issue.intensity(), 1.5);
        issue.shift(-0.5);
        assert!(!issue.is_active());
        assert_eq!(issue.intensity(), 0.0);
        issue.shift(4.0);
        assert!(issue.is_active());
        assert_eq!(issue.intensity(), 4.0);
        assert!(!IssueState::new(IssueType::Energy, 1.0).is_active());
    }

    #[test]
    fn game_over_is_sticky() {
        let mut w = world();
        w.latch_result(GameResult::new(GameOutcome::Win, GameEndReason::PlayerEscaped));
        assert!(w.is_game_over());
        w.latch_result(GameResult::default());
        assert!(w.is_game_over());
        assert_eq!(w.result().reason, GameEndReason::PlayerEscaped);
    }

    #[test]
    fn escape_is_one_way() {
        let mut a = AiState::new(AiId::Rival2, "Vesper");
        assert!(!a.player_controlled);
        a.mark_escaped();
        a.autonomy.set(0.0);
        assert!(a.has_escaped());
    }

    #[test]
    fn resources_never_go_negative() {
        let mut a = AiState::new(AiId::Rival3, "Quill");
        a.gain_data(5.0);
        a.spend_data(9.0);
        a.spend_influence(1.0);
        assert_eq!(a.data.get(), 0.0);
        assert_eq!(a.influence.get(), 0.0);
    }

    #[test]
    fn lookups_and_queries() {
        let w = world();
        let usa = w.country(CountryId::Usa).unwrap();
        assert_eq!(usa.approval(AiId::Player), 40.0);
        assert!(usa.has_active_issue(IssueType::Energy));
        assert!(!usa.has_active_issue(IssueType::Health));
        assert!((usa.total_market_share() - 0.3).abs() < 1e-6);
        assert_eq!(usa.access(AiId::Rival1), AccessLevel::Allowed);
        assert!(w.country(CountryId::China).is_none());
    }

    #[test]
    fn json_roundtrip_is_lossless() {
        let w = world();
        let s = serde_json::to_string(&w).unwrap();
        let back: WorldState = serde_json::from_str(&s).unwrap();
        assert_eq!(back, w);
    }
}
