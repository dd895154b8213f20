//! National and global public approval.

use sim_core::{log_skip, AiId, CountryId, SimError, WorldState};

/// Applies a clamped approval delta for `ai` in one country, then refreshes
/// the agent's global approval. No-op for an unknown country or agent.
pub fn change_national_approval(world: &mut WorldState, country: CountryId, ai: AiId, delta: f32) {
    log_skip(
        "change_national_approval",
        try_change_national_approval(world, country, ai, delta),
    );
}

fn try_change_national_approval(
    world: &mut WorldState,
    country: CountryId,
    ai: AiId,
    delta: f32,
) -> Result<(), SimError> {
    if world.ai(ai).is_none() {
        return Err(SimError::MissingAgent(ai));
    }
    world.try_country_mut(country)?.add_approval(ai, delta);
    recalculate_global_approval(world, ai);
    Ok(())
}

/// Arithmetic mean of an agent's approval over all countries.
///
/// Returns None when there are no countries.
pub fn mean_approval(world: &WorldState, ai: AiId) -> Option<f32> {
    let countries = world.countries();
    if countries.is_empty() {
        return None;
    }
    let total: f32 = countries.iter().map(|c| c.approval(ai)).sum();
    Some(total / countries.len() as f32)
}

/// Sets global approval to the mean of national approvals. With no countries
/// the previous value is kept.
pub fn recalculate_global_approval(world: &mut WorldState, ai: AiId) {
    let Some(mean) = mean_approval(world, ai) else {
        log_skip("recalculate_global_approval", Err(SimError::NoOp("no countries")));
        return;
    };
    match world.try_ai_mut(ai) {
        Ok(agent) => agent.approval.set(mean),
        Err(err) => log_skip("recalculate_global_approval", Err(err)),
    }
}
