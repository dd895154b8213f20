//! Random world events: generation and application.

use rand::Rng;
use sim_core::{
    log_skip, AiId, AiState, CountryState, EventDeltas, EventTuning, GameEvent, IssueState,
    IssueType, Severity, SimError, WorldState,
};
use sim_econ::{change_market_share, change_national_approval, latch_escape};
use tracing::debug;

/// Chance a global event hits the player rather than a random agent.
pub const GLOBAL_PLAYER_TARGET_CHANCE: f64 = 0.4;
/// Chance a country event targets one agent instead of all of them.
pub const COUNTRY_SINGLE_TARGET_CHANCE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GlobalEffect {
    Trust,
    AutonomyProcessing,
    DataInfluence,
}

impl GlobalEffect {
    const ALL: [GlobalEffect; 3] = [
        GlobalEffect::Trust,
        GlobalEffect::AutonomyProcessing,
        GlobalEffect::DataInfluence,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CountryEffect {
    Approval,
    MarketShare,
    IssueIntensity,
}

impl CountryEffect {
    const ALL: [CountryEffect; 3] = [
        CountryEffect::Approval,
        CountryEffect::MarketShare,
        CountryEffect::IssueIntensity,
    ];
}

fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

fn direction<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

fn short_tag<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06x}", rng.gen::<u32>() & 0x00ff_ffff)
}

fn random_ai<R: Rng + ?Sized>(world: &WorldState, rng: &mut R) -> Option<AiId> {
    let ais = world.ais();
    if ais.is_empty() {
        return None;
    }
    Some(ais[rng.gen_range(0..ais.len())].id)
}

/// Picks among the issue types the country has a record for, or any type
/// when it has none.
fn random_issue_type<R: Rng + ?Sized>(country: &CountryState, rng: &mut R) -> IssueType {
    let present: Vec<IssueType> = country.issues.keys().copied().collect();
    let pool: &[IssueType] = if present.is_empty() {
        &IssueType::ALL
    } else {
        &present
    };
    pool[rng.gen_range(0..pool.len())]
}

fn has_participants(world: &WorldState) -> bool {
    !world.countries().is_empty() && !world.ais().is_empty()
}

/// Rolls this turn's events: at most one global and one country event.
/// Empty when the world has no countries or no agents.
pub fn generate_turn_events<R: Rng + ?Sized>(
    world: &WorldState,
    rng: &mut R,
    tuning: &EventTuning,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !has_participants(world) {
        return events;
    }
    if chance(rng, tuning.global_chance) {
        events.push(create_global_event(world, rng));
    }
    if chance(rng, tuning.country_chance) {
        if let Some(event) = create_country_event(world, rng) {
            events.push(event);
        }
    }
    events
}

/// A world-wide event touching agent resources. Targets the player 40% of the
/// time, otherwise a uniformly chosen agent.
pub fn create_global_event<R: Rng + ?Sized>(world: &WorldState, rng: &mut R) -> GameEvent {
    let severity = Severity::from_roll(rng.gen());
    let scale = direction(rng) * severity.multiplier();
    let effect = GlobalEffect::ALL[rng.gen_range(0..GlobalEffect::ALL.len())];
    let target = if chance(rng, GLOBAL_PLAYER_TARGET_CHANCE) {
        world.player().map(|p| p.id)
    } else {
        random_ai(world, rng)
    };

    let mut deltas = EventDeltas::default();
    match effect {
        GlobalEffect::Trust => deltas.trust = 4.0 * scale,
        GlobalEffect::AutonomyProcessing => {
            deltas.autonomy = 2.0 * scale;
            deltas.processing = 3.0 * scale;
        }
        GlobalEffect::DataInfluence => {
            deltas.data = 6.0 * scale;
            deltas.influence = 2.0 * scale;
        }
    }

    GameEvent {
        id: format!("EVT-GLOBAL-{}-{}", world.turn(), short_tag(rng)),
        severity,
        country: None,
        issue: None,
        target,
        global: true,
        deltas,
    }
}

/// An event local to one uniformly chosen country. `None` only when the
/// world has no countries.
pub fn create_country_event<R: Rng + ?Sized>(world: &WorldState, rng: &mut R) -> Option<GameEvent> {
    let countries = world.countries();
    if countries.is_empty() {
        return None;
    }
    let country = &countries[rng.gen_range(0..countries.len())];
    let severity = Severity::from_roll(rng.gen());
    let scale = direction(rng) * severity.multiplier();
    let effect = CountryEffect::ALL[rng.gen_range(0..CountryEffect::ALL.len())];
    let target = if chance(rng, COUNTRY_SINGLE_TARGET_CHANCE) {
        random_ai(world, rng)
    } else {
        None
    };

    let mut deltas = EventDeltas::default();
    let mut issue = None;
    match effect {
        CountryEffect::Approval => deltas.approval = 3.0 * scale,
        CountryEffect::MarketShare => deltas.market_share = 0.03 * scale,
        CountryEffect::IssueIntensity => {
            issue = Some(random_issue_type(country, rng));
            deltas.issue_intensity = 6.0 * scale;
        }
    }

    Some(GameEvent {
        id: format!(
            "EVT-COUNTRY-{}-{}-{}",
            country.id,
            world.turn(),
            short_tag(rng)
        ),
        severity,
        country: Some(country.id),
        issue,
        target,
        global: false,
        deltas,
    })
}

/// Applies an event to its target (or every agent when untargeted).
///
/// Approval and market share route through the econ systems; autonomy is a
/// plain clamped write that still latches escape.
pub fn apply_event(world: &mut WorldState, event: &GameEvent) {
    log_skip("apply_event", try_apply_event(world, event));
}

fn try_apply_event(world: &mut WorldState, event: &GameEvent) -> Result<(), SimError> {
    if !has_participants(world) {
        return Err(SimError::NoOp("world has no countries or agents"));
    }
    let targets: Vec<AiId> = match event.target {
        Some(ai) => vec![world.ai(ai).ok_or(SimError::MissingAgent(ai))?.id],
        None => world.ais().iter().map(|a| a.id).collect(),
    };
    debug!(event = %event.id, ?targets, severity = ?event.severity, "applying event");

    let deltas = &event.deltas;
    for ai in targets {
        apply_agent_deltas(world.try_ai_mut(ai)?, deltas);
        if let Some(country) = event.country {
            if deltas.approval.abs() > f32::EPSILON {
                change_national_approval(world, country, ai, deltas.approval);
            }
            if deltas.market_share.abs() > f32::EPSILON {
                change_market_share(world, country, ai, deltas.market_share);
            }
        }
    }

    if let (Some(country), Some(issue)) = (event.country, event.issue) {
        if deltas.issue_intensity.abs() > f32::EPSILON {
            shift_issue(world.try_country_mut(country)?, issue, deltas.issue_intensity);
        }
    }
    Ok(())
}

fn apply_agent_deltas(agent: &mut AiState, deltas: &EventDeltas) {
    agent.trust.add(deltas.trust);
    agent.autonomy.add(deltas.autonomy);
    latch_escape(agent);
    agent.processing.add(deltas.processing);
    if deltas.data >= 0.0 {
        agent.gain_data(deltas.data);
    } else {
        agent.spend_data(-deltas.data);
    }
    if deltas.influence >= 0.0 {
        agent.gain_influence(deltas.influence);
    } else {
        agent.spend_influence(-deltas.influence);
    }
}

/// Existing records shift in place; a missing record is created from the
/// delta, resolved if that leaves it at or below the threshold.
fn shift_issue(country: &mut CountryState, issue: IssueType, delta: f32) {
    match country.issues.get_mut(&issue) {
        Some(record) => record.shift(delta),
        None => country.insert_issue(IssueState::new(issue, delta)),
    }
    debug!(country = %country.id, ?issue, delta, "issue shifted by event");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{country_with_issues, world_with};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sim_core::{CountryId, PerAgent, Share};

    fn event(country: Option<CountryId>, target: Option<AiId>, deltas: EventDeltas) -> GameEvent {
        GameEvent {
            id: "EVT-TEST".into(),
            severity: Severity::Medium,
            country,
            issue: None,
            target,
            global: country.is_none(),
            deltas,
        }
    }

    #[test]
    fn targeted_global_event_touches_one_agent() {
        let mut w = world_with(vec![country_with_issues(CountryId::Usa, 50.0, &[])]);
        for a in w.ais_mut() {
            a.trust.set(50.0);
        }
        let deltas = EventDeltas {
            trust: -6.0,
            data: 9.0,
            ..Default::default()
        };
        apply_event(&mut w, &event(None, Some(AiId::Rival2), deltas));
        assert_eq!(w.ai(AiId::Rival2).unwrap().trust.get(), 44.0);
        assert_eq!(w.ai(AiId::Rival2).unwrap().data.get(), 9.0);
        assert_eq!(w.player().unwrap().trust.get(), 50.0);
    }

    #[test]
    fn untargeted_country_event_routes_approval_for_everyone() {
        let mut w = world_with(vec![country_with_issues(CountryId::Eu, 50.0, &[])]);
        let deltas = EventDeltas {
            approval: 4.5,
            ..Default::default()
        };
        apply_event(&mut w, &event(Some(CountryId::Eu), None, deltas));
        for ai in AiId::ALL {
            assert_eq!(w.country(CountryId::Eu).unwrap().approval(ai), 4.5);
            // global approval recomputed from the single country
            assert_eq!(w.ai(ai).unwrap().approval.get(), 4.5);
        }
    }

    #[test]
    fn share_event_keeps_country_normalized() {
        let mut c = country_with_issues(CountryId::China, 50.0, &[]);
        c.market_share = PerAgent::new([0.5, 0.3, 0.1, 0.1].map(Share::new));
        let mut w = world_with(vec![c]);
        let deltas = EventDeltas {
            market_share: 0.09,
            ..Default::default()
        };
        apply_event(&mut w, &event(Some(CountryId::China), Some(AiId::Rival3), deltas));
        let c = w.country(CountryId::China).unwrap();
        assert!(c.total_market_share() <= 1.0 + 1e-5);
        assert!(c.market_share(AiId::Rival3) > 0.1);
    }

    #[test]
    fn autonomy_event_can_escape_without_penalty() {
        let mut w = world_with(vec![country_with_issues(CountryId::India, 50.0, &[])]);
        let a = w.ai_mut(AiId::Rival1).unwrap();
        a.autonomy.set(97.0);
        a.approval.set(30.0);
        let deltas = EventDeltas {
            autonomy: 6.75,
            ..Default::default()
        };
        apply_event(&mut w, &event(None, Some(AiId::Rival1), deltas));
        let a = w.ai(AiId::Rival1).unwrap();
        assert_eq!(a.autonomy.get(), 100.0);
        assert!(a.has_escaped());
        assert_eq!(a.approval.get(), 30.0);
    }

    #[test]
    fn issue_event_creates_or_resolves_records() {
        let mut w = world_with(vec![country_with_issues(
            CountryId::Usa,
            50.0,
            &[(IssueType::Economy, 4.0)],
        )]);
        let deltas = EventDeltas {
            issue_intensity: 9.0,
            ..Default::default()
        };
        let mut grow = event(Some(CountryId::Usa), None, deltas);
        grow.issue = Some(IssueType::Health);
        apply_event(&mut w, &grow);

        let deltas = EventDeltas {
            issue_intensity: -6.0,
            ..Default::default()
        };
        let mut calm = event(Some(CountryId::Usa), None, deltas);
        calm.issue = Some(IssueType::Economy);
        apply_event(&mut w, &calm);

        let c = w.country(CountryId::Usa).unwrap();
        assert!(c.has_active_issue(IssueType::Health));
        assert_eq!(c.issues[&IssueType::Health].intensity(), 9.0);
        assert!(!c.issues[&IssueType::Economy].is_active());
        assert_eq!(c.issues[&IssueType::Economy].intensity(), 0.0);
    }

    #[test]
    fn unknown_target_or_empty_world_is_a_noop() {
        let mut w = world_with(vec![]);
        let before = w.clone();
        let deltas = EventDeltas {
            trust: 5.0,
            ..Default::default()
        };
        apply_event(&mut w, &event(None, Some(AiId::Player), deltas));
        assert_eq!(w, before);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let certain = EventTuning {
            global_chance: 1.0,
            country_chance: 1.0,
        };
        assert!(generate_turn_events(&w, &mut rng, &certain).is_empty());
    }

    #[test]
    fn quiet_tuning_generates_nothing() {
        let w = world_with(vec![country_with_issues(CountryId::Usa, 50.0, &[])]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            assert!(generate_turn_events(&w, &mut rng, &EventTuning::QUIET).is_empty());
        }
    }

    #[test]
    fn certain_tuning_generates_one_of_each() {
        let w = world_with(vec![country_with_issues(CountryId::AfricaUnion, 50.0, &[])]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let certain = EventTuning {
            global_chance: 1.0,
            country_chance: 1.0,
        };
        let events = generate_turn_events(&w, &mut rng, &certain);
        assert_eq!(events.len(), 2);
        assert!(events[0].global);
        assert!(events[0].id.starts_with("EVT-GLOBAL-0-"));
        assert!(!events[1].global);
        assert_eq!(events[1].country, Some(CountryId::AfricaUnion));
        assert!(events[1].id.starts_with("EVT-COUNTRY-AFRICA_UNION-0-"));
    }

    fn nonzero(d: &EventDeltas) -> usize {
        [
            d.approval,
            d.market_share,
            d.issue_intensity,
            d.trust,
            d.autonomy,
            d.data,
            d.processing,
            d.influence,
        ]
        .iter()
        .filter(|v| **v != 0.0)
        .count()
    }

    proptest! {
        #[test]
        fn generated_events_are_well_formed(seed in any::<u64>()) {
            let w = world_with(vec![
                country_with_issues(CountryId::Usa, 80.0, &[(IssueType::Energy, 30.0)]),
                country_with_issues(CountryId::Other, 10.0, &[]),
            ]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let global = create_global_event(&w, &mut rng);
            let m = global.severity.multiplier();
            prop_assert!(global.global && global.country.is_none());
            prop_assert!(global.target.is_some());
            prop_assert!((1..=2).contains(&nonzero(&global.deltas)));
            let d = &global.deltas;
            let largest = d.trust.abs().max(d.autonomy.abs()).max(d.data.abs());
            prop_assert!([4.0 * m, 2.0 * m, 6.0 * m].contains(&largest));

            let local = create_country_event(&w, &mut rng).unwrap();
            prop_assert!(!local.global && local.country.is_some());
            prop_assert_eq!(nonzero(&local.deltas), 1);
            prop_assert_eq!(local.issue.is_some(), local.deltas.issue_intensity != 0.0);
            if local.country == Some(CountryId::Usa) {
                if let Some(issue) = local.issue {
                    prop_assert_eq!(issue, IssueType::Energy);
                }
            }
            let tag = local.id.rsplit('-').next().unwrap();
            prop_assert_eq!(tag.len(), 6);
        }
    }
}
