//! Trigger index over card definitions.
//!
//! The registry is built once per batch from the card registry. It maps
//! (card, trigger kind) to the indices of the card's effects that listen
//! for that kind, so matching an event costs one lookup per candidate card
//! instead of a scan over every effect.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::cards::{CardId, CardRegistry};
use crate::core::{GameState, InstanceId, PlayerId};
use crate::zones::Zone;

use super::event::{GameEvent, TriggerKind};

/// An effect matched to an event, ready to become an engine frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggeredEffect {
    /// The card instance whose effect fired.
    pub source: InstanceId,
    pub card: CardId,
    /// Index of the effect within the card definition.
    pub effect_index: usize,
    /// The player who resolves the effect.
    pub player: PlayerId,
}

/// Index of event-driven effects by card and trigger kind.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    by_card: FxHashMap<(CardId, TriggerKind), SmallVec<[usize; 2]>>,
    kinds: FxHashSet<TriggerKind>,
}

impl TriggerRegistry {
    /// Index every effect of every card.
    ///
    /// Echo `ON_PLAY` effects are additionally indexed under
    /// `ON_ENTER_PLAY_FROM_DISCARD`, so they fire again when their card
    /// returns to play from the discard pile.
    #[must_use]
    pub fn from_cards(cards: &CardRegistry) -> Self {
        let mut registry = Self::default();
        for card in cards.iter() {
            for (index, effect) in card.effects.iter().enumerate() {
                registry.insert(card.id, effect.trigger, index);
                if effect.echo && effect.trigger == TriggerKind::OnPlay {
                    registry.insert(card.id, TriggerKind::OnEnterPlayFromDiscard, index);
                }
            }
        }
        registry
    }

    fn insert(&mut self, card: CardId, kind: TriggerKind, index: usize) {
        self.by_card.entry((card, kind)).or_default().push(index);
        self.kinds.insert(kind);
    }

    /// Effect indices of `card` that fire on `kind`.
    #[must_use]
    pub fn effects_for(&self, card: CardId, kind: TriggerKind) -> &[usize] {
        self.by_card.get(&(card, kind)).map_or(&[], |v| v.as_slice())
    }

    /// Does any card listen for `kind`?
    #[must_use]
    pub fn has_listeners(&self, kind: TriggerKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Find every effect that fires for `event`, in resolution order.
    ///
    /// Self triggers match only the event's subject, wherever it now is.
    /// Listener triggers match the event player's permanents in play,
    /// oldest first (turn entered play, then instance id).
    #[must_use]
    pub fn collect(&self, state: &GameState, event: &GameEvent) -> Vec<TriggeredEffect> {
        let kind = event.kind;
        if kind.is_activated() || !self.has_listeners(kind) {
            return Vec::new();
        }

        if kind.is_self_trigger() {
            let Some(card) = event.subject.and_then(|id| state.instance(id)) else {
                return Vec::new();
            };
            return self
                .effects_for(card.card_id, kind)
                .iter()
                .map(|&effect_index| TriggeredEffect {
                    source: card.id,
                    card: card.card_id,
                    effect_index,
                    player: card.owner,
                })
                .collect();
        }

        let mut listeners: Vec<_> = state
            .cards_in(event.player, Zone::InPlay)
            .iter()
            .filter_map(|id| state.instance(*id))
            .filter(|card| !(kind.excludes_subject() && event.subject == Some(card.id)))
            .collect();
        listeners.sort_by_key(|card| (card.turn_entered_play.unwrap_or(0), card.id));

        listeners
            .into_iter()
            .flat_map(|card| {
                self.effects_for(card.card_id, kind)
                    .iter()
                    .map(move |&effect_index| TriggeredEffect {
                        source: card.id,
                        card: card.card_id,
                        effect_index,
                        player: card.owner,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardDefinition};
    use crate::effects::{Effect, EffectAction};
    use crate::testing::sample_state;

    fn registry() -> CardRegistry {
        CardRegistry::from_cards(vec![
            CardDefinition::new(CardId(1), "Night Watch", CardCategory::Toy, 1).with_effect(
                Effect::new(TriggerKind::BeginPlayerTurn).with_action(EffectAction::add_mana(1)),
            ),
            CardDefinition::new(CardId(2), "Echo Chamber", CardCategory::Toy, 1)
                .with_effect(
                    Effect::new(TriggerKind::OnPlay)
                        .with_action(EffectAction::create_spirits(1))
                        .with_echo(),
                )
                .with_effect(
                    Effect::new(TriggerKind::WhenOtherCardEntersPlay)
                        .with_action(EffectAction::draw(1)),
                ),
        ])
        .unwrap()
    }

    #[test]
    fn test_index_and_echo() {
        let triggers = TriggerRegistry::from_cards(&registry());

        assert_eq!(triggers.effects_for(CardId(2), TriggerKind::OnPlay), &[0]);
        assert_eq!(triggers.effects_for(CardId(2), TriggerKind::OnEnterPlayFromDiscard), &[0]);
        assert!(triggers.has_listeners(TriggerKind::BeginPlayerTurn));
        assert!(!triggers.has_listeners(TriggerKind::WhenCardDrawn));
    }

    #[test]
    fn test_listener_order_oldest_first() {
        let triggers = TriggerRegistry::from_cards(&registry());
        let mut state = sample_state();

        state.turn = 3;
        let newer = state.create_instance(CardId(1), PlayerId::SOLO, Zone::InPlay).unwrap();
        state.turn = 1;
        let older = state.create_instance(CardId(1), PlayerId::SOLO, Zone::InPlay).unwrap();
        let same_turn = state.create_instance(CardId(1), PlayerId::SOLO, Zone::InPlay).unwrap();

        let event = GameEvent::new(TriggerKind::BeginPlayerTurn, PlayerId::SOLO);
        let order: Vec<_> = triggers.collect(&state, &event).iter().map(|t| t.source).collect();

        assert_eq!(order, vec![older, same_turn, newer]);
    }

    #[test]
    fn test_when_other_excludes_subject() {
        let triggers = TriggerRegistry::from_cards(&registry());
        let mut state = sample_state();
        let watcher = state.create_instance(CardId(2), PlayerId::SOLO, Zone::InPlay).unwrap();
        let entering = state.create_instance(CardId(2), PlayerId::SOLO, Zone::InPlay).unwrap();

        let event = GameEvent::new(TriggerKind::WhenOtherCardEntersPlay, PlayerId::SOLO)
            .with_subject(entering);
        let fired: Vec<_> = triggers.collect(&state, &event).iter().map(|t| t.source).collect();

        assert_eq!(fired, vec![watcher]);
    }

    #[test]
    fn test_self_trigger_follows_subject() {
        let triggers = TriggerRegistry::from_cards(&registry());
        let mut state = sample_state();
        let card = state.create_instance(CardId(2), PlayerId::SOLO, Zone::Discard).unwrap();

        let event = GameEvent::new(TriggerKind::OnEnterPlayFromDiscard, PlayerId::SOLO)
            .with_subject(card);
        let fired = triggers.collect(&state, &event);

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].effect_index, 0);
    }
}
