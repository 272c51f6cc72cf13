//! Uniform random agent.

use crate::core::{GameAction, GameRng, GameState, InstanceId};
use crate::effects::{ChoiceDescriptor, TargetingDescriptor};

use super::Agent;

/// Picks uniformly among the legal actions and `Pass`, among choice
/// options, and among target candidates. Seeded, so replays match.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context("agent"),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, _state: &GameState, legal: &[GameAction]) -> GameAction {
        let index = self.rng.gen_range_usize(0..legal.len() + 1);
        legal.get(index).copied().unwrap_or(GameAction::Pass)
    }

    fn make_choice(&mut self, _state: &GameState, choice: &ChoiceDescriptor) -> usize {
        if choice.options.is_empty() {
            return 0;
        }
        self.rng.gen_range_usize(0..choice.options.len())
    }

    fn choose_targets(&mut self, _state: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId> {
        self.rng.sample(&request.candidates, request.count)
    }
}
