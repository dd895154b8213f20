//! National issue lifecycle: drift, spawn and effort-based resolution.

use rand::Rng;
use sim_core::{
    log_skip, AiId, CountryId, CountryState, IssueState, IssueType, SimError, WorldState,
};
use sim_econ::change_national_approval;
use tracing::debug;

/// Maximum absolute intensity drift per turn.
pub const INTENSITY_DRIFT: f32 = 1.5;
pub const NEW_ISSUE_BASE_CHANCE: f32 = 0.05;
/// Extra spawn chance per tech level point.
pub const TECH_ISSUE_CHANCE: f32 = 0.0025;
pub const NEW_ISSUE_MIN_INTENSITY: f32 = 5.0;
pub const NEW_ISSUE_MAX_INTENSITY: f32 = 20.0;
pub const HELP_APPROVAL_RATE: f32 = 0.6;
pub const HELP_TRUST_RATE: f32 = 0.4;

/// Drifts every active issue and possibly spawns one new issue per country.
pub fn update_issues_per_turn<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    for country in world.countries_mut() {
        drift_issues(country, rng);
        if let Some(issue) = try_spawn_issue(country, rng) {
            debug!(country = %country.id, ?issue, "new national issue");
        }
    }
}

fn drift_issues<R: Rng + ?Sized>(country: &mut CountryState, rng: &mut R) {
    for issue in country.issues.values_mut().filter(|i| i.is_active()) {
        let drift = rng.gen_range(-INTENSITY_DRIFT..=INTENSITY_DRIFT);
        issue.shift(drift);
    }
}

/// `clamp(0.05 + tech * 0.0025, 0, 1)`.
pub fn spawn_chance(tech_level: f32) -> f64 {
    f64::from((NEW_ISSUE_BASE_CHANCE + tech_level * TECH_ISSUE_CHANCE).clamp(0.0, 1.0))
}

/// Spawns at most one issue of a type the country has no record of.
/// Resolved records still count, so a type never spawns twice.
fn try_spawn_issue<R: Rng + ?Sized>(
    country: &mut CountryState,
    rng: &mut R,
) -> Option<IssueType> {
    let available: Vec<IssueType> = IssueType::ALL
        .into_iter()
        .filter(|t| !country.issues.contains_key(t))
        .collect();
    if available.is_empty() {
        return None;
    }
    if rng.gen::<f64>() >= spawn_chance(country.tech_level()) {
        return None;
    }
    let issue = available[rng.gen_range(0..available.len())];
    let intensity = rng.gen_range(NEW_ISSUE_MIN_INTENSITY..=NEW_ISSUE_MAX_INTENSITY);
    country.insert_issue(IssueState::new(issue, intensity));
    Some(issue)
}

/// Reduces an active issue by `effort`, then credits the helping agent with
/// approval (`effort * 0.6`) in that country and trust (`effort * 0.4`).
/// No-op when the issue is missing or already resolved.
pub fn apply_help_effect(
    world: &mut WorldState,
    country: CountryId,
    ai: AiId,
    issue: IssueType,
    effort: f32,
) {
    log_skip(
        "apply_help_effect",
        try_apply_help_effect(world, country, ai, issue, effort),
    );
}

fn try_apply_help_effect(
    world: &mut WorldState,
    country: CountryId,
    ai: AiId,
    issue: IssueType,
    effort: f32,
) -> Result<(), SimError> {
    let record = world
        .try_country_mut(country)?
        .issues
        .get_mut(&issue)
        .filter(|i| i.is_active())
        .ok_or(SimError::NoOp("issue missing or inactive"))?;
    record.shift(-effort);

    let approval_gain = effort * HELP_APPROVAL_RATE;
    if approval_gain.abs() > f32::EPSILON {
        change_national_approval(world, country, ai, approval_gain);
    }
    if let Some(agent) = world.ai_mut(ai) {
        agent.trust.add(effort * HELP_TRUST_RATE);
    }
    Ok(())
}
