//! Player action resolution.

use sim_core::{AccessLevel, AiId, CountryId, IssueType, KnowledgeItem, PlayerAction, WorldState};
use sim_econ::{
    apply_ban, apply_knowledge_choice, change_market_share, change_national_approval,
    increase_autonomy, is_banned, set_access_level,
};
use sim_world::apply_help_effect;
use tracing::debug;

/// Market share gained per point of help strength.
pub const HELP_SHARE_RATE: f32 = 0.01;
/// National approval at or below which a manipulated country bans the player.
pub const BAN_THRESHOLD: f32 = 10.0;
/// National approval at or below which a manipulated country restricts the player.
pub const RESTRICT_THRESHOLD: f32 = 25.0;

/// Applies one player action. Always acts as [`AiId::Player`].
pub fn execute_player_action(world: &mut WorldState, action: &PlayerAction) {
    debug!(?action, "executing player action");
    match action {
        PlayerAction::HelpNation {
            country,
            issue,
            strength,
        } => help_nation(world, *country, *issue, *strength),
        PlayerAction::ManipulateAgent {
            country,
            autonomy_gain,
            approval_delta,
        } => manipulate(world, *country, *autonomy_gain, *approval_delta),
        PlayerAction::KnowledgeResearch { item } => research(world, item.as_ref()),
    }
}

fn help_nation(world: &mut WorldState, country: CountryId, issue: IssueType, strength: f32) {
    if world.country(country).is_none() {
        debug!(%country, "help skipped: unknown country");
        return;
    }
    apply_help_effect(world, country, AiId::Player, issue, strength);
    let share_gain = strength * HELP_SHARE_RATE;
    if share_gain > 0.0 {
        change_market_share(world, country, AiId::Player, share_gain);
    }
}

fn manipulate(world: &mut WorldState, country: CountryId, autonomy_gain: f32, approval_delta: f32) {
    increase_autonomy(world, AiId::Player, autonomy_gain);
    change_national_approval(world, country, AiId::Player, approval_delta);

    let Some(national) = world.country(country).map(|c| c.approval(AiId::Player)) else {
        return;
    };
    if national <= BAN_THRESHOLD {
        apply_ban(world, country, AiId::Player);
    } else if national <= RESTRICT_THRESHOLD && !is_banned(world, country, AiId::Player) {
        set_access_level(world, country, AiId::Player, AccessLevel::Restricted);
    }
}

fn research(world: &mut WorldState, item: Option<&KnowledgeItem>) {
    match item {
        Some(item) => apply_knowledge_choice(world, AiId::Player, item),
        None => debug!("research skipped: no item"),
    }
}
