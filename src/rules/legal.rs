//! Legal-action enumeration.

use crate::cards::{CardCategory, CardRegistry};
use crate::core::{GameAction, GameState, PlayerId};
use crate::zones::Zone;

use super::resolver::ActionResolver;

pub struct LegalActions;

impl LegalActions {
    /// Every action `player` may take now, excluding `Pass`.
    ///
    /// Hand cards come first in hand order (the free Toy play of a card
    /// before its paid play), then activated abilities of cards in play.
    #[must_use]
    pub fn enumerate(state: &GameState, cards: &CardRegistry, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if state.game_over {
            return actions;
        }

        for &card in state.cards_in(player, Zone::Hand) {
            let is_toy = state
                .instance(card)
                .and_then(|c| cards.category(c.card_id))
                .is_some_and(|category| category == CardCategory::Toy);
            if is_toy && ActionResolver::can_play(state, cards, player, card, true).is_ok() {
                actions.push(GameAction::play_free(card));
            }
            if ActionResolver::can_play(state, cards, player, card, false).is_ok() {
                actions.push(GameAction::play(card));
            }
        }

        for &card in state.cards_in(player, Zone::InPlay) {
            let Some(definition) = state.instance(card).and_then(|c| cards.get(c.card_id)) else {
                continue;
            };
            for (index, effect) in definition.effects.iter().enumerate() {
                if effect.trigger.is_activated()
                    && ActionResolver::can_activate(state, cards, player, card, index).is_ok()
                {
                    actions.push(GameAction::activate(card, index));
                }
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_state, sample_tables, toy_card, ABILITY_TOY, SPELL};

    #[test]
    fn test_enumeration_order() {
        let tables = sample_tables();
        let mut state = sample_state();
        let toy = state.create_instance(toy_card(1), PlayerId::SOLO, Zone::Hand).unwrap();
        let spell = state.create_instance(SPELL, PlayerId::SOLO, Zone::Hand).unwrap();
        let tapper = state.create_instance(ABILITY_TOY, PlayerId::SOLO, Zone::InPlay).unwrap();
        state.player_mut(PlayerId::SOLO).mana = 1;
        state.player_mut(PlayerId::SOLO).spirits = 1;

        let actions = LegalActions::enumerate(&state, &tables.cards, PlayerId::SOLO);
        assert_eq!(
            actions,
            vec![
                GameAction::play_free(toy),
                GameAction::play(toy),
                GameAction::play(spell),
                GameAction::activate(tapper, 0),
            ]
        );
    }

    #[test]
    fn test_nothing_affordable() {
        let tables = sample_tables();
        let mut state = sample_state();
        state.create_instance(SPELL, PlayerId::SOLO, Zone::Hand).unwrap();
        state.create_instance(ABILITY_TOY, PlayerId::SOLO, Zone::InPlay).unwrap();

        assert!(LegalActions::enumerate(&state, &tables.cards, PlayerId::SOLO).is_empty());
    }

    #[test]
    fn test_every_listed_action_is_accepted() {
        let tables = sample_tables();
        let mut state = sample_state();
        for n in 1..=3 {
            state.create_instance(toy_card(n), PlayerId::SOLO, Zone::Hand).unwrap();
        }
        state.player_mut(PlayerId::SOLO).mana = 2;

        for action in LegalActions::enumerate(&state, &tables.cards, PlayerId::SOLO) {
            let GameAction::PlayCard { card, free_toy } = action else {
                panic!("unexpected {action}");
            };
            assert!(ActionResolver::can_play(&state, &tables.cards, PlayerId::SOLO, card, free_toy).is_ok());
        }
    }
}
