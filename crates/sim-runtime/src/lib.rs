#![deny(warnings)]

//! Turn runtime: owns the world, the seeded RNG and the player action queue,
//! and runs the per-turn system pipeline.

pub mod actions;
pub mod outcome;

pub use actions::execute_player_action;
pub use outcome::{check_game_over, evaluate_and_latch};

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sim_core::{
    AiId, AiState, CountryState, EventTuning, GameEvent, GameResult, PlayerAction, Scenario,
    SimConfig, SimError, ValidationError, WorldState,
};
use tracing::{debug, info, warn};

/// What happened during one completed turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Turn number that was just played (before the counter advanced).
    pub turn: u32,
    pub events: Vec<GameEvent>,
    pub result: GameResult,
}

#[derive(Clone, Debug)]
struct QueuedAction {
    action: PlayerAction,
    executed: bool,
}

/// Drives the simulation one turn at a time.
pub struct TurnEngine {
    world: WorldState,
    rng: ChaCha8Rng,
    tuning: EventTuning,
    queue: Vec<QueuedAction>,
}

impl TurnEngine {
    /// Wraps an existing world, e.g. one loaded from a snapshot.
    pub fn new(world: WorldState, config: SimConfig) -> Self {
        Self {
            world,
            rng: config.rng(),
            tuning: config.events,
            queue: Vec::new(),
        }
    }

    /// Fresh game at turn 0 with no result.
    pub fn new_game(
        countries: Vec<CountryState>,
        agents: Vec<AiState>,
        config: SimConfig,
    ) -> Result<Self, ValidationError> {
        let world = WorldState::new(countries, agents)?;
        Ok(Self::new(world, config))
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ValidationError> {
        let world = scenario.build_world()?;
        Ok(Self::new(world, scenario.config))
    }

    /// Records an action for this turn, optionally resolving it right away.
    /// Actions executed immediately are not replayed at end of turn.
    pub fn queue_player_action(&mut self, action: PlayerAction, execute_immediately: bool) {
        if self.world.is_game_over() {
            warn!(?action, "action ignored: game is over");
            return;
        }
        if execute_immediately {
            execute_player_action(&mut self.world, &action);
        }
        self.queue.push(QueuedAction {
            action,
            executed: execute_immediately,
        });
    }

    /// Actions queued this turn that have not run yet.
    pub fn pending_actions(&self) -> usize {
        self.queue.iter().filter(|q| !q.executed).count()
    }

    /// Runs the full pipeline once. Fails without touching state when the
    /// game is already over.
    pub fn end_turn(&mut self) -> Result<TurnSummary, SimError> {
        if self.world.is_game_over() {
            warn!(turn = self.world.turn(), "end_turn rejected: game is over");
            return Err(SimError::GameOver);
        }
        let turn = self.world.turn();

        self.process_player_actions();
        sim_ai::process_rivals_turn(&mut self.world, &mut self.rng);
        sim_world::update_issues_per_turn(&mut self.world, &mut self.rng);
        let events = sim_world::generate_turn_events(&self.world, &mut self.rng, &self.tuning);
        for event in &events {
            sim_world::apply_event(&mut self.world, event);
        }
        self.recalculate_global_approval();
        let result = evaluate_and_latch(&mut self.world);
        self.world.advance_turn();

        info!(turn, events = events.len(), outcome = ?result.outcome, "turn complete");
        Ok(TurnSummary {
            turn,
            events,
            result,
        })
    }

    /// Plays up to `turns` turns, stopping early at game over.
    pub fn run_turns(&mut self, turns: u32) -> Vec<TurnSummary> {
        let mut summaries = Vec::new();
        for _ in 0..turns {
            match self.end_turn() {
                Ok(summary) => summaries.push(summary),
                Err(_) => break,
            }
            if self.world.is_game_over() {
                break;
            }
        }
        summaries
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn into_world(self) -> WorldState {
        self.world
    }

    fn process_player_actions(&mut self) {
        for queued in std::mem::take(&mut self.queue) {
            if queued.executed {
                continue;
            }
            execute_player_action(&mut self.world, &queued.action);
        }
    }

    fn recalculate_global_approval(&mut self) {
        let ids: Vec<AiId> = self.world.ais().iter().map(|a| a.id).collect();
        for ai in ids {
            sim_econ::recalculate_global_approval(&mut self.world, ai);
        }
        debug!("global approval recalculated");
    }
}
