//! Greedy agent: plays Toys, nothing else.

use std::sync::Arc;

use crate::cards::{CardCategory, CardId};
use crate::core::{GameAction, GameState, InstanceId};
use crate::effects::{ChoiceDescriptor, OptionTag, TargetingDescriptor};
use crate::tables::DefinitionTables;

use super::Agent;

/// Always advances the "play Toys" dimension: a Toy it has not played yet
/// before a repeat, the free play before a paid one. Passes otherwise. No
/// lookahead.
pub struct GreedyAgent {
    tables: Arc<DefinitionTables>,
}

impl GreedyAgent {
    #[must_use]
    pub fn new(tables: Arc<DefinitionTables>) -> Self {
        Self { tables }
    }

    fn card_id(&self, state: &GameState, card: InstanceId) -> Option<CardId> {
        state.instance(card).map(|c| c.card_id)
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose_action(&mut self, state: &GameState, legal: &[GameAction]) -> GameAction {
        let rank = |action: &GameAction| -> Option<u8> {
            let GameAction::PlayCard { card, free_toy } = *action else {
                return None;
            };
            let card_id = self.card_id(state, card)?;
            if self.tables.cards.category(card_id) != Some(CardCategory::Toy) {
                return None;
            }
            let new = !state.progress.distinct_toys_played.contains(&card_id);
            Some(u8::from(new) * 2 + u8::from(free_toy))
        };

        let mut best: Option<(u8, GameAction)> = None;
        for action in legal {
            if let Some(score) = rank(action) {
                if best.map_or(true, |(top, _)| score > top) {
                    best = Some((score, *action));
                }
            }
        }
        best.map_or(GameAction::Pass, |(_, action)| action)
    }

    fn make_choice(&mut self, _state: &GameState, choice: &ChoiceDescriptor) -> usize {
        choice
            .find(|tag| matches!(tag, OptionTag::Yes))
            .or_else(|| {
                choice
                    .options
                    .iter()
                    .enumerate()
                    .filter_map(|(i, o)| match o.tag {
                        OptionTag::Number(n) => Some((n, i)),
                        _ => None,
                    })
                    .max()
                    .map(|(_, i)| i)
            })
            .unwrap_or(0)
    }

    fn choose_targets(&mut self, _state: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId> {
        request.candidates.iter().take(request.count).copied().collect()
    }
}
