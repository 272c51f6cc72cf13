//! Action Resolver: validates and executes player actions.
//!
//! Validation is shared with the legal-action enumerator, so anything the
//! enumerator lists the resolver accepts. An illegal action is rejected
//! with `SimError::RuleViolation` before any state changes.

use log::debug;

use crate::cards::{CardCategory, CardRegistry};
use crate::core::{GameAction, GameState, InstanceId, LogEvent, PlayerId, Resource};
use crate::effects::{
    ActivationCost, Effect, EffectContext, EffectEngine, Frame, Resolution, Usage,
};
use crate::error::{Result, SimError};
use crate::triggers::ConditionEvaluator;
use crate::zones::Zone;

fn violation(reason: impl Into<String>) -> SimError {
    SimError::RuleViolation(reason.into())
}

pub struct ActionResolver;

impl ActionResolver {
    /// Mana needed to play `card` now.
    #[must_use]
    pub fn cost_of(state: &GameState, cards: &CardRegistry, player: PlayerId, card: InstanceId) -> Option<u32> {
        let definition = cards.get(state.instance(card)?.card_id)?;
        Some(definition.cost.saturating_add(state.player(player).cost_tax))
    }

    /// Can `player` play `card` from hand, paying or using the free Toy
    /// play?
    pub fn can_play(
        state: &GameState,
        cards: &CardRegistry,
        player: PlayerId,
        card: InstanceId,
        free_toy: bool,
    ) -> Result<()> {
        let instance = state
            .instance(card)
            .ok_or_else(|| violation(format!("{card} does not exist")))?;
        if instance.owner != player || instance.zone != Zone::Hand {
            return Err(violation(format!("{card} is not in {player}'s hand")));
        }
        let definition = cards.require(instance.card_id)?;
        let resources = state.player(player);

        if free_toy {
            if definition.category != CardCategory::Toy {
                return Err(violation(format!("{} is not a Toy", definition.name)));
            }
            if resources.free_toy_played {
                return Err(violation("free Toy play already used this turn"));
            }
            return Ok(());
        }

        let cost = definition.cost.saturating_add(resources.cost_tax);
        if resources.mana < cost {
            return Err(violation(format!(
                "{} costs {cost}, {} mana available",
                definition.name, resources.mana
            )));
        }
        Ok(())
    }

    /// Can `player` activate the effect at `effect_index` of `card`?
    pub fn can_activate(
        state: &GameState,
        cards: &CardRegistry,
        player: PlayerId,
        card: InstanceId,
        effect_index: usize,
    ) -> Result<()> {
        let instance = state
            .instance(card)
            .ok_or_else(|| violation(format!("{card} does not exist")))?;
        if instance.owner != player || instance.zone != Zone::InPlay {
            return Err(violation(format!("{card} is not in play for {player}")));
        }
        let effect = cards
            .require(instance.card_id)?
            .effect(effect_index)
            .filter(|effect| effect.trigger.is_activated())
            .ok_or_else(|| violation(format!("{card} has no ability #{effect_index}")))?;

        if let Some(usage) = Usage::of(effect, card, instance.card_id, effect_index) {
            if !usage.available(state) {
                return Err(violation(format!("{card} ability #{effect_index} already used")));
            }
        }
        if effect.taps() && instance.tapped {
            return Err(violation(format!("{card} is tapped")));
        }

        let resources = state.player(player);
        for cost in &effect.costs {
            let payable = match cost {
                ActivationCost::PayMana { amount } => resources.mana >= *amount,
                ActivationCost::PaySpirits { count } => resources.spirits >= *count,
                ActivationCost::PayMemory { count } => resources.memory >= *count,
                ActivationCost::ExileFromDiscard { count } => {
                    resources.zones.zone_size(Zone::Discard) >= *count as usize
                }
                ActivationCost::TapThis | ActivationCost::SacrificeThis => true,
            };
            if !payable {
                return Err(violation(format!("cannot pay {cost:?} for {card}")));
            }
        }

        let ctx = EffectContext::new(player, Some(card), None);
        if !ConditionEvaluator::evaluate_all(&effect.conditions, &ctx.conditions(state)) {
            return Err(violation(format!("conditions of {card} ability #{effect_index} not met")));
        }
        Ok(())
    }

    /// Validate and execute `action` for `player`.
    pub fn execute(
        engine: &EffectEngine<'_>,
        state: &mut GameState,
        player: PlayerId,
        action: &GameAction,
    ) -> Result<Resolution> {
        let cards = &engine.tables.cards;
        match *action {
            GameAction::PlayCard { card, free_toy } => {
                Self::can_play(state, cards, player, card, free_toy)?;
                if free_toy {
                    state.player_mut(player).free_toy_played = true;
                } else {
                    let cost = Self::cost_of(state, cards, player, card).unwrap_or(0);
                    state.player_mut(player).spend(Resource::Mana, cost);
                }
                debug!("{player}: {action}");
                let frames = engine.play_card(state, player, card, free_toy)?;
                engine.run(state, frames)
            }

            GameAction::ActivateAbility { card, effect_index } => {
                Self::can_activate(state, cards, player, card, effect_index)?;
                let card_id = state.require_instance(card)?.card_id;
                let effect = cards
                    .require(card_id)?
                    .effect(effect_index)
                    .ok_or_else(|| violation(format!("{card} has no ability #{effect_index}")))?;

                debug!("{player}: {action}");
                state.record(LogEvent::AbilityActivated { card, effect_index });
                if let Some(usage) = Usage::of(effect, card, card_id, effect_index) {
                    usage.mark(state);
                }
                let cost_frames = Self::pay_costs(engine, state, player, card, effect)?;

                let ctx = EffectContext::new(player, Some(card), None);
                let mut frames = vec![Frame::new(effect.actions.clone(), ctx)];
                frames.extend(cost_frames);
                engine.run(state, frames)
            }

            GameAction::Pass => {
                state.record(LogEvent::Passed);
                Ok(Resolution::Complete)
            }
        }
    }

    fn pay_costs(
        engine: &EffectEngine<'_>,
        state: &mut GameState,
        player: PlayerId,
        card: InstanceId,
        effect: &Effect,
    ) -> Result<Vec<Frame>> {
        if effect.taps() {
            if let Some(instance) = state.instance_mut(card) {
                instance.tapped = true;
            }
        }

        let mut frames = Vec::new();
        let mut sacrifice = false;
        for cost in &effect.costs {
            match cost {
                ActivationCost::PayMana { amount } => {
                    state.player_mut(player).spend(Resource::Mana, *amount);
                }
                ActivationCost::PaySpirits { count } => {
                    state.player_mut(player).spend(Resource::Spirits, *count);
                }
                ActivationCost::PayMemory { count } => {
                    state.player_mut(player).spend(Resource::Memory, *count);
                }
                ActivationCost::ExileFromDiscard { count } => {
                    let bottom: Vec<_> = state
                        .cards_in(player, Zone::Discard)
                        .iter()
                        .take(*count as usize)
                        .copied()
                        .collect();
                    for id in bottom {
                        frames.extend(engine.move_and_raise(state, id, Zone::Exile, false)?);
                    }
                }
                ActivationCost::SacrificeThis => sacrifice = true,
                ActivationCost::TapThis => {}
            }
        }
        if sacrifice {
            frames.extend(engine.move_and_raise(state, card, Zone::Discard, true)?);
        }
        Ok(frames)
    }
}
