//! Competitive market share redistribution within a country.

use sim_core::{log_skip, AiId, CountryId, CountryState, SimError, WorldState};
use tracing::debug;

/// Fraction of a gain taken from competitors before the gain is applied.
pub const COMPETITOR_REDUCTION_FACTOR: f32 = 0.25;

/// Changes `ai`'s share in a country.
///
/// A positive delta first removes `delta * 0.25` from the other agents,
/// proportionally to their current shares, then the delta is applied and the
/// country renormalized.
pub fn change_market_share(world: &mut WorldState, country: CountryId, ai: AiId, delta: f32) {
    log_skip(
        "change_market_share",
        try_change_market_share(world, country, ai, delta),
    );
}

fn try_change_market_share(
    world: &mut WorldState,
    country: CountryId,
    ai: AiId,
    delta: f32,
) -> Result<(), SimError> {
    let country = world.try_country_mut(country)?;
    if delta > 0.0 {
        reduce_competitors(country, ai, delta);
    }
    country.add_market_share(ai, delta);
    normalize(country);
    Ok(())
}

/// Scales all shares down uniformly when their sum exceeds 1.
/// Sums at or below 1 are left untouched. Each share is already clamped to
/// [0,1] by its type.
pub fn normalize(country: &mut CountryState) {
    let total = country.total_market_share();
    if total <= 1.0 {
        return;
    }
    let scale = 1.0 / total;
    for (_, share) in country.market_share.iter_mut() {
        share.set(share.get() * scale);
    }
}

fn reduce_competitors(country: &mut CountryState, gaining: AiId, delta: f32) {
    let others = country.market_share;
    let total_other: f32 = others
        .iter()
        .filter(|(ai, _)| *ai != gaining)
        .map(|(_, s)| s.get())
        .sum();
    if total_other <= 0.0 {
        debug!(country = %country.id, "no competitor share to reduce");
        return;
    }
    let pool = delta * COMPETITOR_REDUCTION_FACTOR;
    for (ai, share) in others.iter() {
        if ai == gaining {
            continue;
        }
        country.add_market_share(ai, -pool * share.get() / total_other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{country_with_shares, world_with};
    use proptest::prelude::*;

    fn shares(w: &WorldState, id: CountryId) -> [f32; 4] {
        let c = w.country(id).unwrap();
        AiId::ALL.map(|ai| c.market_share(ai))
    }

    #[test]
    fn gain_takes_proportionally_from_competitors() {
        let mut w = world_with(vec![country_with_shares(CountryId::Usa, [0.1, 0.4, 0.2, 0.2])]);
        change_market_share(&mut w, CountryId::Usa, AiId::Player, 0.08);
        let s = shares(&w, CountryId::Usa);
        // pool 0.02 split 0.4/0.8, 0.2/0.8, 0.2/0.8
        assert!((s[0] - 0.18).abs() < 1e-6);
        assert!((s[1] - 0.39).abs() < 1e-6);
        assert!((s[2] - 0.195).abs() < 1e-6);
        assert!((s[3] - 0.195).abs() < 1e-6);
    }

    #[test]
    fn empty_competitors_skip_reduction() {
        let mut w = world_with(vec![country_with_shares(CountryId::Eu, [0.0, 0.0, 0.0, 0.0])]);
        change_market_share(&mut w, CountryId::Eu, AiId::Rival2, 0.3);
        assert_eq!(shares(&w, CountryId::Eu), [0.0, 0.0, 0.3, 0.0]);
    }

    #[test]
    fn loss_does_not_touch_competitors() {
        let mut w = world_with(vec![country_with_shares(CountryId::Eu, [0.3, 0.3, 0.2, 0.1])]);
        change_market_share(&mut w, CountryId::Eu, AiId::Player, -0.5);
        assert_eq!(shares(&w, CountryId::Eu), [0.0, 0.3, 0.2, 0.1]);
    }

    #[test]
    fn normalize_scales_to_exactly_one() {
        let mut c = country_with_shares(CountryId::China, [0.5, 0.5, 0.5, 0.5]);
        normalize(&mut c);
        assert!((c.total_market_share() - 1.0).abs() < 1e-6);
        assert!((c.market_share(AiId::Rival3) - 0.25).abs() < 1e-6);

        let mut under = country_with_shares(CountryId::India, [0.1, 0.2, 0.1, 0.1]);
        normalize(&mut under);
        assert_eq!(under.market_share(AiId::Rival1), 0.2);
    }

    proptest! {
        #[test]
        fn shares_stay_bounded(
            start in proptest::array::uniform4(0.0f32..1.0),
            changes in proptest::collection::vec((0usize..4, -1.5f32..1.5), 1..30),
        ) {
            let mut c = country_with_shares(CountryId::Usa, start);
            normalize(&mut c);
            let mut w = world_with(vec![c]);
            for (slot, delta) in changes {
                change_market_share(&mut w, CountryId::Usa, AiId::ALL[slot], delta);
                let c = w.country(CountryId::Usa).unwrap();
                for ai in AiId::ALL {
                    prop_assert!((0.0..=1.0).contains(&c.market_share(ai)));
                }
                prop_assert!(c.total_market_share() <= 1.0 + 1e-5);
            }
        }
    }
}
