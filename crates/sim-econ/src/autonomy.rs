//! Autonomy progress, detection risk and escape.

use sim_core::{log_skip, AiId, AiState, SimError, WorldState};
use tracing::info;

/// Approval lost per point of autonomy gained.
pub const DETECTION_RATE: f32 = 0.2;
pub const MAX_DETECTION_PENALTY: f32 = 10.0;
/// Progress at which an agent escapes.
pub const ESCAPE_THRESHOLD: f32 = 100.0;

/// Adds autonomy progress, charges the detection penalty against global
/// approval, and latches escape at 100. Win/lose is evaluated elsewhere.
pub fn increase_autonomy(world: &mut WorldState, ai: AiId, amount: f32) {
    log_skip("increase_autonomy", try_increase_autonomy(world, ai, amount));
}

fn try_increase_autonomy(world: &mut WorldState, ai: AiId, amount: f32) -> Result<(), SimError> {
    let agent = world.try_ai_mut(ai)?;
    agent.autonomy.add(amount);
    apply_detection_risk(agent, amount);
    latch_escape(agent);
    Ok(())
}

/// `clamp(gain * 0.2, 0, 10)` for positive gains, otherwise zero.
pub fn detection_penalty(gain: f32) -> f32 {
    if gain <= 0.0 {
        return 0.0;
    }
    (gain * DETECTION_RATE).clamp(0.0, MAX_DETECTION_PENALTY)
}

pub fn apply_detection_risk(agent: &mut AiState, gain: f32) {
    let penalty = detection_penalty(gain);
    if penalty > 0.0 {
        agent.approval.add(-penalty);
    }
}

/// Marks the agent escaped once progress reaches the threshold.
/// Returns whether the agent has escaped.
pub fn latch_escape(agent: &mut AiState) -> bool {
    if agent.autonomy.get() >= ESCAPE_THRESHOLD && !agent.has_escaped() {
        agent.mark_escaped();
        info!(agent = %agent.id, "agent escaped");
    }
    agent.has_escaped()
}
