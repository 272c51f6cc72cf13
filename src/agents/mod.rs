//! Decision agents.
//!
//! An agent answers the three questions the engine asks during a game:
//! which action to take in MAIN, which option of a player choice to pick,
//! and which cards to select for a targeting request. Agents only read the
//! game state; everything they return is validated by the engine.
//!
//! - `RandomAgent`: uniform over legal options
//! - `GreedyAgent`: always pushes one fixed win dimension (playing Toys)
//! - `ScoringAgent`: weighted heuristic against unmet win requirements

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{GameAction, GameState, InstanceId};
use crate::effects::{ChoiceDescriptor, TargetingDescriptor};
use crate::tables::DefinitionTables;

mod random;
mod greedy;
mod scoring;

pub use random::RandomAgent;
pub use greedy::GreedyAgent;
pub use scoring::{ScoringAgent, ScoringWeights};

/// A decision-making policy for the solo player.
///
/// Every method must return something even when there is nothing sensible
/// to do: `Pass` for an empty action list, index 0 for a choice, and an
/// empty selection for targets. Invalid answers are re-queried.
pub trait Agent {
    /// Short name for logs and reports.
    fn name(&self) -> &str;

    /// Pick one of `legal` or `GameAction::Pass`.
    fn choose_action(&mut self, state: &GameState, legal: &[GameAction]) -> GameAction;

    /// Index into `choice.options`.
    fn make_choice(&mut self, state: &GameState, choice: &ChoiceDescriptor) -> usize;

    /// Exactly `request.count` distinct cards out of `request.candidates`.
    fn choose_targets(&mut self, state: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId>;
}

/// Which agent plays a batch. Each game gets a fresh agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "agent", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentProfile {
    #[default]
    Random,
    Greedy,
    Scoring(ScoringWeights),
}

impl AgentProfile {
    /// Scoring agent with default weights.
    #[must_use]
    pub fn scoring() -> Self {
        Self::Scoring(ScoringWeights::default())
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Greedy => "greedy",
            Self::Scoring(_) => "scoring",
        }
    }

    /// Build the agent for one game.
    #[must_use]
    pub fn build(&self, tables: Arc<DefinitionTables>, seed: u64) -> Box<dyn Agent> {
        match self {
            Self::Random => Box::new(RandomAgent::new(seed)),
            Self::Greedy => Box::new(GreedyAgent::new(tables)),
            Self::Scoring(weights) => Box::new(ScoringAgent::new(tables, weights.clone())),
        }
    }
}
