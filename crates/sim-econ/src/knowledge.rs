//! Research choices: resource cost, autonomy, approval and trust.

use crate::approval::recalculate_global_approval;
use crate::autonomy::increase_autonomy;
use sim_core::{log_skip, AiId, KnowledgeItem, SimError, WorldState};

/// Resolves a research choice for `ai`.
///
/// Spends the data cost, grants autonomy (with its detection penalty),
/// applies the approval effect to matching countries and adjusts trust.
pub fn apply_knowledge_choice(world: &mut WorldState, ai: AiId, item: &KnowledgeItem) {
    log_skip(
        "apply_knowledge_choice",
        try_apply_knowledge_choice(world, ai, item),
    );
}

fn try_apply_knowledge_choice(
    world: &mut WorldState,
    ai: AiId,
    item: &KnowledgeItem,
) -> Result<(), SimError> {
    world.try_ai_mut(ai)?.spend_data(item.data_cost);
    increase_autonomy(world, ai, item.autonomy_value);
    apply_approval_changes(world, ai, item);
    world.try_ai_mut(ai)?.trust.add(item.trust_delta());
    Ok(())
}

fn apply_approval_changes(world: &mut WorldState, ai: AiId, item: &KnowledgeItem) {
    let delta = item.approval_delta();
    if world.countries().is_empty() || delta.abs() < f32::EPSILON {
        return;
    }
    for country in world.countries_mut() {
        if let Some(issue) = item.related_issue {
            if !country.has_active_issue(issue) {
                continue;
            }
        }
        country.add_approval(ai, delta);
    }
    recalculate_global_approval(world, ai);
}
