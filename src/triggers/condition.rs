//! Effect conditions.
//!
//! Conditions are pure predicates over the game state, the acting player,
//! the effect's source card and the triggering event. An effect's
//! conditions are combined with AND semantics; `ANY_OF` and `NOT` build the
//! rest.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{Comparison, GameState, InstanceId, PlayerId, Resource};
use crate::zones::Zone;

use super::event::GameEvent;

/// A condition an effect requires before its actions run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    // === Identity ===

    /// The effect's source card is the First Memory.
    IsFirstMemory,

    /// The First Memory is currently in `zone`.
    FirstMemoryInZone { zone: Zone },

    /// The triggering event is about the First Memory.
    EventSubjectIsFirstMemory,

    // === Thresholds ===

    /// Compare one of the player's resource counts.
    ResourceCompare {
        resource: Resource,
        comparison: Comparison,
        amount: u32,
    },

    /// The source card carries at least `amount` counters of a kind.
    CounterAtLeast { counter: String, amount: u32 },

    /// The player's deck holds at most `count` cards.
    DeckSizeAtMost { count: usize },

    /// A copy of `card` is in the player's `zone`.
    CardInZone { card: CardId, zone: Zone },

    /// Compare the current turn number.
    CurrentTurn { comparison: Comparison, turn: u32 },

    // === Zone transitions ===

    /// The triggering event moved its subject out of `zone`.
    MovingFromZone { zone: Zone },

    /// The triggering event moved its subject into `zone`.
    MovingToZone { zone: Zone },

    // === Combinators ===

    /// Condition must be false.
    Not { condition: Box<Condition> },

    /// At least one condition must be true.
    AnyOf { conditions: Vec<Condition> },

    /// Any kind this build does not know. Logged and treated as satisfied.
    #[serde(other)]
    Unrecognized,
}

impl Condition {
    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::AnyOf {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Resource threshold shorthand.
    #[must_use]
    pub fn resource_at_least(resource: Resource, amount: u32) -> Self {
        Self::ResourceCompare {
            resource,
            comparison: Comparison::AtLeast,
            amount,
        }
    }
}

/// Context for evaluating conditions.
pub struct ConditionContext<'a> {
    /// Current game state.
    pub state: &'a GameState,
    /// The player the effect acts for.
    pub player: PlayerId,
    /// The card whose effect is being evaluated.
    pub source: Option<InstanceId>,
    /// The triggering event, if any.
    pub event: Option<&'a GameEvent>,
}

impl<'a> ConditionContext<'a> {
    /// Create a context with no source and no event.
    pub fn new(state: &'a GameState, player: PlayerId) -> Self {
        Self {
            state,
            player,
            source: None,
            event: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<InstanceId>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: Option<&'a GameEvent>) -> Self {
        self.event = event;
        self
    }
}

/// Evaluator for conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if every condition holds.
    pub fn evaluate_all(conditions: &[Condition], ctx: &ConditionContext) -> bool {
        conditions.iter().all(|c| Self::evaluate(c, ctx))
    }

    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &Condition, ctx: &ConditionContext) -> bool {
        let state = ctx.state;
        match condition {
            Condition::IsFirstMemory => {
                ctx.source.is_some() && ctx.source == state.first_memory
            }

            Condition::FirstMemoryInZone { zone } => state
                .first_memory
                .and_then(|id| state.instance(id))
                .is_some_and(|card| card.zone == *zone),

            Condition::EventSubjectIsFirstMemory => ctx
                .event
                .and_then(|e| e.subject)
                .is_some_and(|subject| Some(subject) == state.first_memory),

            Condition::ResourceCompare {
                resource,
                comparison,
                amount,
            } => comparison.holds(
                u64::from(state.player(ctx.player).resource(*resource)),
                u64::from(*amount),
            ),

            Condition::CounterAtLeast { counter, amount } => ctx
                .source
                .and_then(|id| state.instance(id))
                .is_some_and(|card| card.counter(counter) >= *amount),

            Condition::DeckSizeAtMost { count } => {
                state.zone_size(ctx.player, Zone::Deck) <= *count
            }

            Condition::CardInZone { card, zone } => state
                .cards_in(ctx.player, *zone)
                .iter()
                .filter_map(|id| state.instance(*id))
                .any(|instance| instance.card_id == *card),

            Condition::CurrentTurn { comparison, turn } => {
                comparison.holds(u64::from(state.turn), u64::from(*turn))
            }

            Condition::MovingFromZone { zone } => {
                ctx.event.is_some_and(|e| e.from == Some(*zone))
            }

            Condition::MovingToZone { zone } => ctx.event.is_some_and(|e| e.to == Some(*zone)),

            Condition::Not { condition } => !Self::evaluate(condition, ctx),

            Condition::AnyOf { conditions } => conditions.iter().any(|c| Self::evaluate(c, ctx)),

            Condition::Unrecognized => {
                warn!("unrecognized condition kind treated as satisfied");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_state, toy_card};
    use crate::triggers::TriggerKind;

    #[test]
    fn test_first_memory_identity() {
        let mut state = sample_state();
        let toy = state.create_instance(toy_card(1), PlayerId::SOLO, Zone::Hand).unwrap();
        let other = state.create_instance(toy_card(2), PlayerId::SOLO, Zone::Hand).unwrap();
        state.first_memory = Some(toy);

        let ctx = ConditionContext::new(&state, PlayerId::SOLO).with_source(Some(toy));
        assert!(ConditionEvaluator::evaluate(&Condition::IsFirstMemory, &ctx));
        assert!(ConditionEvaluator::evaluate(
            &Condition::FirstMemoryInZone { zone: Zone::Hand },
            &ctx
        ));

        let ctx = ConditionContext::new(&state, PlayerId::SOLO).with_source(Some(other));
        assert!(!ConditionEvaluator::evaluate(&Condition::IsFirstMemory, &ctx));
    }

    #[test]
    fn test_zone_transition_conditions() {
        let state = sample_state();
        let event = GameEvent::new(TriggerKind::OnLeavePlay, PlayerId::SOLO)
            .with_subject(InstanceId(0))
            .with_move(Zone::InPlay, Zone::Discard);
        let ctx = ConditionContext::new(&state, PlayerId::SOLO).with_event(Some(&event));

        assert!(ConditionEvaluator::evaluate(&Condition::MovingFromZone { zone: Zone::InPlay }, &ctx));
        assert!(ConditionEvaluator::evaluate(&Condition::MovingToZone { zone: Zone::Discard }, &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::MovingToZone { zone: Zone::Exile }, &ctx));

        let no_event = ConditionContext::new(&state, PlayerId::SOLO);
        assert!(!ConditionEvaluator::evaluate(&Condition::MovingFromZone { zone: Zone::InPlay }, &no_event));
    }

    #[test]
    fn test_thresholds() {
        let mut state = sample_state();
        state.player_mut(PlayerId::SOLO).spirits = 3;
        let ctx = ConditionContext::new(&state, PlayerId::SOLO);

        assert!(ConditionEvaluator::evaluate(&Condition::resource_at_least(Resource::Spirits, 3), &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::resource_at_least(Resource::Memory, 1), &ctx));
        assert!(ConditionEvaluator::evaluate(&Condition::DeckSizeAtMost { count: 0 }, &ctx));
        assert!(ConditionEvaluator::evaluate(
            &Condition::CurrentTurn { comparison: Comparison::Exactly, turn: 1 },
            &ctx
        ));
    }

    #[test]
    fn test_counter_and_card_in_zone() {
        let mut state = sample_state();
        let toy = state.create_instance(toy_card(4), PlayerId::SOLO, Zone::InPlay).unwrap();
        state.instance_mut(toy).unwrap().add_counters("wind", 2);

        let ctx = ConditionContext::new(&state, PlayerId::SOLO).with_source(Some(toy));
        assert!(ConditionEvaluator::evaluate(
            &Condition::CounterAtLeast { counter: "wind".into(), amount: 2 },
            &ctx
        ));
        assert!(ConditionEvaluator::evaluate(
            &Condition::CardInZone { card: toy_card(4), zone: Zone::InPlay },
            &ctx
        ));
        assert!(!ConditionEvaluator::evaluate(
            &Condition::CardInZone { card: toy_card(4), zone: Zone::Hand },
            &ctx
        ));
    }

    #[test]
    fn test_combinators_and_unknown() {
        let state = sample_state();
        let ctx = ConditionContext::new(&state, PlayerId::SOLO);

        let never = Condition::resource_at_least(Resource::Mana, 99);
        assert!(ConditionEvaluator::evaluate(&never.clone().negate(), &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::any(vec![never.clone()]), &ctx));
        assert!(ConditionEvaluator::evaluate(
            &Condition::any(vec![never, Condition::Unrecognized]),
            &ctx
        ));

        let parsed: Condition = serde_json::from_str(r#"{"kind": "MOON_IS_FULL"}"#).unwrap();
        assert_eq!(parsed, Condition::Unrecognized);
        assert!(ConditionEvaluator::evaluate_all(&[parsed], &ctx));
    }
}
