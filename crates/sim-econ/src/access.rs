//! Per-country access levels and their market side effects.

use sim_core::{log_skip, AccessLevel, AiId, CountryId, SimError, WorldState};
use tracing::info;

/// Flat share granted when a country prefers an agent.
pub const PREFERRED_SHARE_BONUS: f32 = 0.10;

/// Sets an agent's access level. Banned and Preferred carry market effects.
pub fn set_access_level(world: &mut WorldState, country: CountryId, ai: AiId, level: AccessLevel) {
    match level {
        AccessLevel::Banned => apply_ban(world, country, ai),
        AccessLevel::Preferred => apply_preference(world, country, ai),
        AccessLevel::Restricted | AccessLevel::Allowed => match world.try_country_mut(country) {
            Ok(c) => c.set_access(ai, level),
            Err(err) => log_skip("set_access_level", Err(err)),
        },
    }
}

/// Bans the agent and zeroes its share. The removed share is absorbed, not
/// handed to the remaining agents.
pub fn apply_ban(world: &mut WorldState, country: CountryId, ai: AiId) {
    log_skip("apply_ban", try_apply_ban(world, country, ai));
}

fn try_apply_ban(world: &mut WorldState, country: CountryId, ai: AiId) -> Result<(), SimError> {
    let c = world.try_country_mut(country)?;
    c.set_access(ai, AccessLevel::Banned);
    let share = c.market_share(ai);
    if share > 0.0 {
        c.add_market_share(ai, -share);
    }
    info!(country = %country, agent = %ai, lost_share = share, "agent banned");
    Ok(())
}

/// Marks the agent preferred and grants [`PREFERRED_SHARE_BONUS`] without
/// renormalizing the country.
pub fn apply_preference(world: &mut WorldState, country: CountryId, ai: AiId) {
    log_skip("apply_preference", try_apply_preference(world, country, ai));
}

fn try_apply_preference(
    world: &mut WorldState,
    country: CountryId,
    ai: AiId,
) -> Result<(), SimError> {
    let c = world.try_country_mut(country)?;
    c.set_access(ai, AccessLevel::Preferred);
    c.add_market_share(ai, PREFERRED_SHARE_BONUS);
    Ok(())
}

/// False for an unknown country.
pub fn is_banned(world: &WorldState, country: CountryId, ai: AiId) -> bool {
    world
        .country(country)
        .is_some_and(|c| c.access(ai) == AccessLevel::Banned)
}
