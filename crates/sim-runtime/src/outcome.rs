//! Win and lose conditions.

use sim_core::{AccessLevel, AiId, GameEndReason, GameOutcome, GameResult, WorldState};
use tracing::info;

/// Player global approval below which bans can end the game.
pub const LOSE_APPROVAL_THRESHOLD: f32 = 5.0;

/// Evaluates the end conditions in priority order without mutating state.
pub fn check_game_over(world: &WorldState) -> GameResult {
    if world.player().is_some_and(|p| p.has_escaped()) {
        return GameResult::new(GameOutcome::Win, GameEndReason::PlayerEscaped);
    }
    if world.rivals().any(|r| r.has_escaped()) {
        return GameResult::new(GameOutcome::Lose, GameEndReason::RivalEscaped);
    }
    if lost_public_support(world) {
        return GameResult::new(GameOutcome::Lose, GameEndReason::LowApprovalAndAccessBans);
    }
    GameResult::default()
}

/// Low global approval and a strict majority of the key countries present
/// banning the player.
fn lost_public_support(world: &WorldState) -> bool {
    let Some(player) = world.player() else {
        return false;
    };
    if player.approval.get() >= LOSE_APPROVAL_THRESHOLD {
        return false;
    }
    let key: Vec<_> = world.countries().iter().filter(|c| c.id.is_key()).collect();
    if key.is_empty() {
        return false;
    }
    let banned = key
        .iter()
        .filter(|c| c.access(AiId::Player) == AccessLevel::Banned)
        .count();
    banned > key.len() / 2
}

/// Stores the current evaluation. Game over, once set, stays set.
pub fn evaluate_and_latch(world: &mut WorldState) -> GameResult {
    let result = check_game_over(world);
    let was_over = world.is_game_over();
    world.latch_result(result);
    if result.is_terminal() && !was_over {
        info!(
            outcome = ?result.outcome,
            reason = ?result.reason,
            turn = world.turn(),
            "game over"
        );
    }
    world.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{AiState, CountryId, CountryState};

    fn world(countries: Vec<CountryState>, player_approval: f32) -> WorldState {
        let mut player = AiState::new(AiId::Player, "Prometheus");
        player.approval.set(player_approval);
        let ais = vec![player, AiState::new(AiId::Rival1, "Helix")];
        WorldState::new(countries, ais).unwrap()
    }

    fn banned(id: CountryId) -> CountryState {
        let mut c = CountryState::new(id, id.code(), 50.0);
        c.set_access(AiId::Player, AccessLevel::Banned);
        c
    }

    fn open(id: CountryId) -> CountryState {
        CountryState::new(id, id.code(), 50.0)
    }

    #[test]
    fn nothing_happening_is_no_result() {
        let w = world(vec![open(CountryId::Usa)], 50.0);
        assert_eq!(check_game_over(&w), GameResult::default());
    }

    #[test]
    fn player_escape_beats_rival_escape() {
        let mut w = world(vec![], 50.0);
        for ai in [AiId::Player, AiId::Rival1] {
            w.ai_mut(ai).unwrap().mark_escaped();
        }
        let r = check_game_over(&w);
        assert_eq!(r.outcome, GameOutcome::Win);
        assert_eq!(r.reason, GameEndReason::PlayerEscaped);
    }

    #[test]
    fn rival_escape_loses() {
        let mut w = world(vec![], 50.0);
        w.ai_mut(AiId::Rival1).unwrap().mark_escaped();
        assert_eq!(
            check_game_over(&w),
            GameResult::new(GameOutcome::Lose, GameEndReason::RivalEscaped)
        );
    }

    #[test]
    fn bans_need_a_strict_majority_of_key_countries() {
        // Other is not a key country and does not count either way
        let half = world(
            vec![banned(CountryId::Usa), open(CountryId::Eu), banned(CountryId::Other)],
            2.0,
        );
        assert_eq!(check_game_over(&half).outcome, GameOutcome::None);

        let majority = world(
            vec![banned(CountryId::Usa), banned(CountryId::Eu), open(CountryId::China)],
            2.0,
        );
        assert_eq!(
            check_game_over(&majority).reason,
            GameEndReason::LowApprovalAndAccessBans
        );

        let popular = world(vec![banned(CountryId::Usa), banned(CountryId::Eu)], 5.0);
        assert_eq!(check_game_over(&popular).outcome, GameOutcome::None);

        let no_key = world(vec![banned(CountryId::Other)], 0.0);
        assert_eq!(check_game_over(&no_key).outcome, GameOutcome::None);
    }

    #[test]
    fn latch_is_sticky() {
        let mut w = world(vec![], 50.0);
        w.ai_mut(AiId::Rival1).unwrap().mark_escaped();
        evaluate_and_latch(&mut w);
        assert!(w.is_game_over());
        let result = w.result();
        // re-evaluating a world that no longer meets the condition keeps game over
        let player = AiState::new(AiId::Player, "Prometheus");
        let mut healed = WorldState::new(vec![], vec![player]).unwrap();
        healed.latch_result(result);
        assert_eq!(evaluate_and_latch(&mut healed), result);
        assert!(healed.is_game_over());
    }
}
