//! Rules configuration.
//!
//! Global limits that are not part of any objective definition: starting
//! hand size, default hand-size limit, per-turn draw, and the safety
//! ceilings that guarantee every game terminates. Objective-specific setup
//! (first-turn mana, mana increment, hand-size overrides) lives in the
//! objective's `SetupInstructions` and `SpecialRule`s instead.

use serde::{Deserialize, Serialize};

/// Configuration for the rules engine.
///
/// ## Example
///
/// ```
/// use tuckd_sim::core::RulesConfig;
///
/// let config = RulesConfig::default()
///     .with_max_turns(30)
///     .with_max_actions_per_turn(10);
///
/// assert_eq!(config.max_turns, 30);
/// assert_eq!(config.initial_hand_size, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cards in the opening hand, including cards the objective places there.
    pub initial_hand_size: usize,

    /// Hand-size limit enforced at END_TURN unless the objective overrides it.
    pub max_hand_size: usize,

    /// Cards drawn at BEGIN_TURN.
    pub draw_per_turn: u32,

    /// Turn-count safety ceiling. Exceeding it ends the game with
    /// `LOSS_MAX_TURNS`.
    pub max_turns: u32,

    /// Agent requests allowed in one MAIN phase, including rejected ones.
    pub max_actions_per_turn: u32,

    /// Re-queries allowed when an agent answers a pending choice invalidly.
    pub max_choice_retries: u32,

    /// Actions the effect engine may execute while resolving one pending
    /// chain before giving up with a termination safety trip.
    pub max_effect_steps: u32,

    /// Fail with an unimplemented-effect error instead of skipping action
    /// kinds that have no handler.
    pub strict_effects: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial_hand_size: 5,
            max_hand_size: 7,
            draw_per_turn: 1,
            max_turns: 100,
            max_actions_per_turn: 20,
            max_choice_retries: 3,
            max_effect_steps: 10_000,
            strict_effects: false,
        }
    }
}

impl RulesConfig {
    /// Set the opening hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the default hand-size limit.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the turn-count safety ceiling.
    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Set the per-turn action ceiling.
    #[must_use]
    pub fn with_max_actions_per_turn(mut self, actions: u32) -> Self {
        self.max_actions_per_turn = actions;
        self
    }

    /// Set the number of re-queries for invalid choice answers.
    #[must_use]
    pub fn with_max_choice_retries(mut self, retries: u32) -> Self {
        self.max_choice_retries = retries;
        self
    }

    /// Set the effect-step ceiling.
    #[must_use]
    pub fn with_max_effect_steps(mut self, steps: u32) -> Self {
        self.max_effect_steps = steps;
        self
    }

    /// Treat action kinds without a handler as errors.
    #[must_use]
    pub fn with_strict_effects(mut self, strict: bool) -> Self {
        self.strict_effects = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.initial_hand_size, 5);
        assert_eq!(config.max_hand_size, 7);
        assert_eq!(config.draw_per_turn, 1);
        assert_eq!(config.max_actions_per_turn, 20);
        assert!(!config.strict_effects);
    }

    #[test]
    fn test_builders() {
        let config = RulesConfig::default()
            .with_initial_hand_size(3)
            .with_max_hand_size(4)
            .with_max_choice_retries(0)
            .with_max_effect_steps(50);

        assert_eq!(config.initial_hand_size, 3);
        assert_eq!(config.max_hand_size, 4);
        assert_eq!(config.max_choice_retries, 0);
        assert_eq!(config.max_effect_steps, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RulesConfig = serde_json::from_str(r#"{"max_turns": 12}"#).unwrap();
        assert_eq!(config.max_turns, 12);
        assert_eq!(config.max_hand_size, 7);
    }
}
