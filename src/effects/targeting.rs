//! Card target resolution.
//!
//! Fixed targets (`THIS`, `FIRST_MEMORY`, `EVENT_SUBJECT`) resolve straight
//! from the effect context. Chosen targets list candidates from a zone and,
//! when there is a real choice to make, turn into a `TargetingDescriptor`
//! that suspends the engine until an agent answers.

use smallvec::SmallVec;

use crate::cards::{CardCategory, CardRegistry};
use crate::core::{GameState, InstanceId, PlayerId};
use crate::zones::Zone;

use super::choice::{TargetPurpose, TargetingDescriptor};
use super::effect::CardTarget;
use super::engine::EffectContext;

/// Outcome of resolving a target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSelection {
    /// The cards to act on.
    Cards(SmallVec<[InstanceId; 4]>),
    /// The agent has to pick.
    Ask(TargetingDescriptor),
    /// No legal target; the action does nothing.
    Nothing,
}

/// Cards in one of `player`'s zones, optionally filtered by category, in
/// zone order (bottom first).
#[must_use]
pub fn candidates(
    state: &GameState,
    cards: &CardRegistry,
    player: PlayerId,
    zone: Zone,
    category: Option<CardCategory>,
) -> Vec<InstanceId> {
    state
        .cards_in(player, zone)
        .iter()
        .copied()
        .filter(|id| match category {
            None => true,
            Some(wanted) => state
                .instance(*id)
                .and_then(|card| cards.category(card.card_id))
                .is_some_and(|c| c == wanted),
        })
        .collect()
}

/// Pick `count` cards out of `candidates`.
///
/// Cards already bound in the context (the agent's answer to an earlier
/// suspension of the same action) are used when they are still valid.
/// When every candidate has to be taken anyway the agent is not asked.
#[must_use]
pub fn select(
    candidates: Vec<InstanceId>,
    count: usize,
    ctx: &EffectContext,
    purpose: TargetPurpose,
    zone: Zone,
    prompt: impl Into<String>,
) -> TargetSelection {
    if count == 0 || candidates.is_empty() {
        return TargetSelection::Nothing;
    }

    if !ctx.chosen.is_empty() {
        let bound: SmallVec<[InstanceId; 4]> = ctx
            .chosen
            .iter()
            .copied()
            .filter(|id| candidates.contains(id))
            .collect();
        return if bound.is_empty() {
            TargetSelection::Nothing
        } else {
            TargetSelection::Cards(bound)
        };
    }

    if candidates.len() <= count {
        return TargetSelection::Cards(candidates.into_iter().collect());
    }

    TargetSelection::Ask(TargetingDescriptor {
        purpose,
        prompt: prompt.into(),
        zone,
        candidates,
        count,
    })
}

/// Resolve a single-card target.
#[must_use]
pub fn resolve_target(
    state: &GameState,
    cards: &CardRegistry,
    target: &CardTarget,
    ctx: &EffectContext,
    purpose: TargetPurpose,
) -> TargetSelection {
    let fixed = match target {
        CardTarget::This => ctx.source,
        CardTarget::FirstMemory => state.first_memory,
        CardTarget::EventSubject => ctx.event.as_ref().and_then(|e| e.subject),
        CardTarget::Chosen { zone, category } => {
            let pool = candidates(state, cards, ctx.player, *zone, *category);
            return select(pool, 1, ctx, purpose, *zone, format!("choose a card in {zone}"));
        }
    };

    match fixed.filter(|id| state.instance(*id).is_some()) {
        Some(id) => TargetSelection::Cards(SmallVec::from_elem(id, 1)),
        None => TargetSelection::Nothing,
    }
}
