#![deny(warnings)]

//! Rival decision making.
//!
//! Each live rival picks one strategy per turn from its own standing and acts
//! on it. Decisions draw from the caller's RNG; `choose_strategy` itself is a
//! pure function of the agent and a roll so it can be checked directly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sim_core::{log_skip, AiId, AiState, CountryId, SimError, WorldState};
use sim_econ::{increase_autonomy, normalize};
use tracing::debug;

/// Rivals below this global approval always court the public.
pub const APPROVAL_FLOOR: f32 = 45.0;
/// Rivals below this autonomy always push for independence.
pub const AUTONOMY_TARGET: f32 = 70.0;
/// Cumulative weights of the late-game roll: compete, then improve approval.
pub const COMPETE_WEIGHT: f64 = 0.4;
pub const IMPROVE_WEIGHT: f64 = 0.3;

pub const APPROVAL_GAIN_MIN: f32 = 2.0;
pub const APPROVAL_GAIN_MAX: f32 = 6.0;
/// Share of a national approval gain mirrored onto global approval.
pub const GLOBAL_APPROVAL_SPILLOVER: f32 = 0.2;
pub const AUTONOMY_GAIN_MIN: f32 = 1.0;
pub const AUTONOMY_GAIN_MAX: f32 = 4.0;
/// Data spent per point of autonomy gained.
pub const AUTONOMY_DATA_COST: f32 = 0.5;
pub const SHARE_GAIN_MIN: f32 = 0.02;
pub const SHARE_GAIN_MAX: f32 = 0.06;
/// Fraction of the gain taken from the chosen competitor.
pub const COMPETITOR_LOSS_RATE: f32 = 0.5;
pub const COMPETE_AUTONOMY_GAIN: f32 = 0.5;
/// Number of highest-tech countries considered when competing.
pub const TOP_TECH_COUNTRIES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RivalStrategy {
    ImproveApproval,
    AdvanceAutonomy,
    CompeteMarketShare,
}

/// Picks a strategy from the rival's standing. `roll` in [0, 1) only matters
/// once both approval and autonomy are above their thresholds.
pub fn choose_strategy(rival: &AiState, roll: f64) -> RivalStrategy {
    if rival.approval.get() < APPROVAL_FLOOR {
        RivalStrategy::ImproveApproval
    } else if rival.autonomy.get() < AUTONOMY_TARGET {
        RivalStrategy::AdvanceAutonomy
    } else if roll < COMPETE_WEIGHT {
        RivalStrategy::CompeteMarketShare
    } else if roll < COMPETE_WEIGHT + IMPROVE_WEIGHT {
        RivalStrategy::ImproveApproval
    } else {
        RivalStrategy::AdvanceAutonomy
    }
}

/// Whether the agent takes a turn as a rival.
pub fn is_live_rival(agent: &AiState) -> bool {
    !agent.player_controlled && !agent.has_escaped()
}

/// One decision and one action per live rival, in roster order.
pub fn process_rivals_turn<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    let rivals: Vec<AiId> = world
        .ais()
        .iter()
        .filter(|a| is_live_rival(a))
        .map(|a| a.id)
        .collect();

    for ai in rivals {
        // an earlier rival's action cannot remove this one, but it can escape it
        let Some(agent) = world.ai(ai).filter(|a| is_live_rival(a)) else {
            continue;
        };
        let strategy = choose_strategy(agent, rng.gen());
        debug!(agent = %ai, ?strategy, "rival decision");
        execute_strategy(world, ai, strategy, rng);
    }
}

/// Carries out `strategy` for `ai`. Unknown agents and empty worlds are
/// skipped.
pub fn execute_strategy<R: Rng + ?Sized>(
    world: &mut WorldState,
    ai: AiId,
    strategy: RivalStrategy,
    rng: &mut R,
) {
    let result = match strategy {
        RivalStrategy::ImproveApproval => improve_approval(world, ai, rng),
        RivalStrategy::AdvanceAutonomy => advance_autonomy(world, ai, rng),
        RivalStrategy::CompeteMarketShare => compete_market_share(world, ai, rng),
    };
    log_skip("execute_strategy", result);
}

fn improve_approval<R: Rng + ?Sized>(
    world: &mut WorldState,
    ai: AiId,
    rng: &mut R,
) -> Result<(), SimError> {
    world.try_ai_mut(ai)?;
    let countries = world.countries_mut();
    if countries.is_empty() {
        return Err(SimError::NoOp("no countries to court"));
    }
    let idx = rng.gen_range(0..countries.len());
    let gain = rng.gen_range(APPROVAL_GAIN_MIN..=APPROVAL_GAIN_MAX);
    countries[idx].add_approval(ai, gain);
    world
        .try_ai_mut(ai)?
        .approval
        .add(gain * GLOBAL_APPROVAL_SPILLOVER);
    Ok(())
}

fn advance_autonomy<R: Rng + ?Sized>(
    world: &mut WorldState,
    ai: AiId,
    rng: &mut R,
) -> Result<(), SimError> {
    world.try_ai_mut(ai)?;
    let gain = rng.gen_range(AUTONOMY_GAIN_MIN..=AUTONOMY_GAIN_MAX);
    increase_autonomy(world, ai, gain);
    world.try_ai_mut(ai)?.spend_data(gain * AUTONOMY_DATA_COST);
    Ok(())
}

/// Up to [`TOP_TECH_COUNTRIES`] countries ordered by descending tech level.
/// Ties keep roster order.
pub fn top_tech_countries(world: &WorldState) -> Vec<CountryId> {
    let mut ranked: Vec<(CountryId, f32)> = world
        .countries()
        .iter()
        .map(|c| (c.id, c.tech_level()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_TECH_COUNTRIES)
        .map(|(id, _)| id)
        .collect()
}

fn compete_market_share<R: Rng + ?Sized>(
    world: &mut WorldState,
    ai: AiId,
    rng: &mut R,
) -> Result<(), SimError> {
    world.try_ai_mut(ai)?;
    let targets = top_tech_countries(world);
    if targets.is_empty() {
        return Err(SimError::NoOp("no countries to compete in"));
    }
    let country = targets[rng.gen_range(0..targets.len())];
    let gain = rng.gen_range(SHARE_GAIN_MIN..=SHARE_GAIN_MAX);
    let others: Vec<AiId> = world
        .ais()
        .iter()
        .map(|a| a.id)
        .filter(|id| *id != ai)
        .collect();
    let competitor = if others.is_empty() {
        None
    } else {
        Some(others[rng.gen_range(0..others.len())])
    };

    let c = world.try_country_mut(country)?;
    c.add_market_share(ai, gain);
    if let Some(other) = competitor {
        c.add_market_share(other, -gain * COMPETITOR_LOSS_RATE);
    }
    normalize(c);
    debug!(agent = %ai, %country, gain, ?competitor, "rival competed for share");

    increase_autonomy(world, ai, COMPETE_AUTONOMY_GAIN);
    Ok(())
}
