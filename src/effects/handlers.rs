//! Built-in action handlers.
//!
//! One function per action kind, registered into the engine's dispatch
//! table by [`register_defaults`]. Handlers never fail on missing targets
//! or empty zones; those make the action do less or nothing. Errors are
//! reserved for broken invariants.

use log::debug;

use crate::cards::CardCategory;
use crate::core::{GameState, InstanceId, LogEvent, PlayerId, Resource, WinStatus};
use crate::error::{Result, SimError};
use crate::triggers::{GameEvent, TriggerKind};
use crate::zones::{Zone, ZonePosition};

use super::choice::{Decision, TargetPurpose};
use super::effect::{ActionKind, EffectAction};
use super::engine::{EffectContext, EffectEngine, Frame, Resume, Step};
use super::targeting::{candidates, resolve_target, select, TargetSelection};

/// Register every built-in handler.
pub fn register_defaults(engine: &mut EffectEngine<'_>) {
    use ActionKind as K;

    engine.register(K::DrawCards, draw_cards);
    engine.register(K::AddMana, add_mana);
    engine.register(K::CreateSpiritTokens, create_spirit_tokens);
    engine.register(K::CreateMemoryTokens, create_memory_tokens);
    engine.register(K::ModifyResource, modify_resource);
    engine.register(K::SacrificeResource, sacrifice_resource);
    engine.register(K::ConvertTokens, convert_tokens);
    engine.register(K::SacrificeCard, sacrifice_card);
    engine.register(K::DiscardRandom, discard_random);
    engine.register(K::DiscardChosen, discard_chosen);
    engine.register(K::ReturnThisCardToHand, return_this_card_to_hand);
    engine.register(K::MoveCard, move_card);
    engine.register(K::ExileFromZone, exile_from_zone);
    engine.register(K::MillDeck, mill_deck);
    engine.register(K::SearchDeck, search_deck);
    engine.register(K::BrowseDeck, browse_deck);
    engine.register(K::TransformToyToSpirits, transform_toy_to_spirits);
    engine.register(K::ReanimateToy, reanimate_toy);
    engine.register(K::PlayCardNoCost, play_card_no_cost);
    engine.register(K::PlaceCounter, place_counter);
    engine.register(K::RemoveCounter, remove_counter);
    engine.register(K::TapCard, tap_card);
    engine.register(K::UntapCard, untap_card);
    engine.register(K::TakeExtraTurn, take_extra_turn);
    engine.register(K::SkipNightmareCreep, skip_nightmare_creep);
    engine.register(K::DelayNightmareCreep, delay_nightmare_creep);
    engine.register(K::ApplyCostTax, apply_cost_tax);
}

fn mismatch(action: &EffectAction) -> SimError {
    SimError::Invariant(format!("handler dispatched for wrong action {:?}", action.kind()))
}

/// Apply `apply` to each selected card, or suspend / skip.
fn on_targets(
    selection: TargetSelection,
    action: &EffectAction,
    mut apply: impl FnMut(InstanceId) -> Result<Vec<Frame>>,
) -> Result<Step> {
    match selection {
        TargetSelection::Cards(ids) => {
            let mut frames = Vec::new();
            for id in ids {
                frames.extend(apply(id)?);
            }
            Ok(Step::frames(frames))
        }
        TargetSelection::Ask(descriptor) => Ok(Step::Suspend(
            Decision::Targets(descriptor),
            Resume::Bind(action.clone()),
        )),
        TargetSelection::Nothing => Ok(Step::Continue),
    }
}

fn zone_of(state: &GameState, id: InstanceId) -> Option<Zone> {
    state.instance(id).map(|card| card.zone)
}

// === Shared building blocks ===

/// Draw `count` cards from the top of the deck, raising `WHEN_CARD_DRAWN`
/// for each. Drawing from an empty deck stops the draw; it loses the game
/// only for objectives with the deck-out rule.
pub fn draw(engine: &EffectEngine<'_>, state: &mut GameState, player: PlayerId, count: u32) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for _ in 0..count {
        let Some(top) = state.player(player).zones.top_card(Zone::Deck) else {
            debug!("{player} draws from an empty deck");
            state.record(LogEvent::DeckOut);
            if state.objective.deck_out_is_loss() {
                state.end_game(WinStatus::LossObjectiveSpecific, Some("DECK_OUT"));
            }
            break;
        };
        let moved = state.move_card(top, Zone::Hand)?;
        let event = GameEvent::new(TriggerKind::WhenCardDrawn, player)
            .with_subject(top)
            .with_move(moved.from, moved.to)
            .with_amount(1);
        frames.extend(engine.raise(state, &event));
    }
    Ok(frames)
}

/// Create tokens, count them toward objective progress and raise the
/// matching creation event.
pub fn create_tokens(
    engine: &EffectEngine<'_>,
    state: &mut GameState,
    player: PlayerId,
    resource: Resource,
    count: u32,
) -> Vec<Frame> {
    if count == 0 {
        return Vec::new();
    }
    state.player_mut(player).gain(resource, count);
    let kind = match resource {
        Resource::Spirits => {
            state.progress.spirits_created = state.progress.spirits_created.saturating_add(count);
            TriggerKind::WhenSpiritCreated
        }
        Resource::Memory => {
            state.progress.memory_created = state.progress.memory_created.saturating_add(count);
            TriggerKind::WhenMemoryTokenCreated
        }
        Resource::Mana => return Vec::new(),
    };
    state.record(LogEvent::TokensCreated { resource, count });
    engine.raise(state, &GameEvent::new(kind, player).with_amount(count))
}

fn gain_mana(state: &mut GameState, ctx: &EffectContext, amount: u32) {
    state.player_mut(ctx.player).gain(Resource::Mana, amount);
    if ctx.source.is_some() {
        state.progress.mana_from_effects = state.progress.mana_from_effects.saturating_add(amount);
    }
}

// === Resources ===

fn draw_cards(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::DrawCards { count } = action else {
        return Err(mismatch(action));
    };
    Ok(Step::frames(draw(engine, state, ctx.player, *count)?))
}

fn add_mana(_: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::AddMana { amount } = action else {
        return Err(mismatch(action));
    };
    gain_mana(state, ctx, *amount);
    Ok(Step::Continue)
}

fn create_spirit_tokens(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::CreateSpiritTokens { count } = action else {
        return Err(mismatch(action));
    };
    Ok(Step::frames(create_tokens(engine, state, ctx.player, Resource::Spirits, *count)))
}

fn create_memory_tokens(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::CreateMemoryTokens { count } = action else {
        return Err(mismatch(action));
    };
    Ok(Step::frames(create_tokens(engine, state, ctx.player, Resource::Memory, *count)))
}

fn modify_resource(_: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::ModifyResource { resource, delta } = action else {
        return Err(mismatch(action));
    };
    state.player_mut(ctx.player).adjust(*resource, *delta);
    Ok(Step::Continue)
}

fn sacrifice_resource(_: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::SacrificeResource { resource, count } = action else {
        return Err(mismatch(action));
    };
    state.player_mut(ctx.player).spend(*resource, *count);
    Ok(Step::Continue)
}

fn convert_tokens(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::ConvertTokens { from, to, count } = action else {
        return Err(mismatch(action));
    };
    let converted = state.player_mut(ctx.player).spend(*from, *count);
    if *to == Resource::Mana {
        gain_mana(state, ctx, converted);
        return Ok(Step::Continue);
    }
    Ok(Step::frames(create_tokens(engine, state, ctx.player, *to, converted)))
}

// === Card movement ===

fn sacrifice_card(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::SacrificeCard { target } = action else {
        return Err(mismatch(action));
    };
    let selection = resolve_target(state, &engine.tables.cards, target, ctx, TargetPurpose::Sacrifice);
    on_targets(selection, action, |id| {
        if zone_of(state, id) != Some(Zone::InPlay) {
            return Ok(Vec::new());
        }
        engine.move_and_raise(state, id, Zone::Discard, true)
    })
}

fn discard_random(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::DiscardRandom { count } = action else {
        return Err(mismatch(action));
    };
    let mut frames = Vec::new();
    for _ in 0..*count {
        let held = state.zone_size(ctx.player, Zone::Hand);
        if held == 0 {
            break;
        }
        let pick = state.rng.gen_range_usize(0..held);
        let id = state.cards_in(ctx.player, Zone::Hand)[pick];
        frames.extend(engine.move_and_raise(state, id, Zone::Discard, false)?);
    }
    Ok(Step::frames(frames))
}

fn discard_chosen(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::DiscardChosen { count } = action else {
        return Err(mismatch(action));
    };
    let hand = state.cards_in(ctx.player, Zone::Hand).to_vec();
    let selection = select(
        hand,
        *count as usize,
        ctx,
        TargetPurpose::Discard,
        Zone::Hand,
        format!("discard {count}"),
    );
    on_targets(selection, action, |id| engine.move_and_raise(state, id, Zone::Discard, false))
}

fn return_this_card_to_hand(engine: &EffectEngine<'_>, state: &mut GameState, _: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let Some(source) = ctx.source.filter(|id| zone_of(state, *id) == Some(Zone::InPlay)) else {
        return Ok(Step::Continue);
    };
    let frames = engine.move_and_raise(state, source, Zone::Hand, false)?;
    state.progress.loop_count_this_turn += 1;
    Ok(Step::frames(frames))
}

fn move_card(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::MoveCard { target, to } = action else {
        return Err(mismatch(action));
    };
    let selection = resolve_target(state, &engine.tables.cards, target, ctx, TargetPurpose::Move);
    on_targets(selection, action, |id| {
        if zone_of(state, id) == Some(*to) {
            return Ok(Vec::new());
        }
        engine.move_and_raise(state, id, *to, false)
    })
}

fn exile_from_zone(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::ExileFromZone { zone, count } = action else {
        return Err(mismatch(action));
    };
    let count = *count as usize;
    let selection = match zone {
        Zone::Deck => TargetSelection::Cards(
            state.player(ctx.player).zones.top_cards(Zone::Deck, count).into_iter().collect(),
        ),
        other => {
            let pool = state.cards_in(ctx.player, *other).to_vec();
            select(pool, count, ctx, TargetPurpose::Exile, *other, format!("exile {count} from {other}"))
        }
    };
    on_targets(selection, action, |id| engine.move_and_raise(state, id, Zone::Exile, false))
}

fn mill_deck(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::MillDeck { count } = action else {
        return Err(mismatch(action));
    };
    let milled = state.player(ctx.player).zones.top_cards(Zone::Deck, *count as usize);
    let mut frames = Vec::new();
    for id in milled {
        frames.extend(engine.move_and_raise(state, id, Zone::Discard, false)?);
    }
    Ok(Step::frames(frames))
}

fn search_deck(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::SearchDeck { category, to } = action else {
        return Err(mismatch(action));
    };
    let pool = candidates(state, &engine.tables.cards, ctx.player, Zone::Deck, *category);
    let selection = select(pool, 1, ctx, TargetPurpose::Fetch, Zone::Deck, "search the deck");
    let found = matches!(selection, TargetSelection::Cards(_));

    let step = on_targets(selection, action, |id| engine.move_and_raise(state, id, *to, false))?;
    if found {
        let player = &mut state.players[ctx.player];
        player.zones.shuffle_zone(Zone::Deck, &mut state.rng);
    }
    Ok(step)
}

fn browse_deck(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::BrowseDeck { look_at, to } = action else {
        return Err(mismatch(action));
    };
    let top = state.player(ctx.player).zones.top_cards(Zone::Deck, *look_at as usize);
    let selection = select(top.clone(), 1, ctx, TargetPurpose::Fetch, Zone::Deck, format!("keep one of the top {look_at}"));
    let TargetSelection::Cards(kept) = &selection else {
        return on_targets(selection, action, |_| Ok(Vec::new()));
    };
    let kept = kept.clone();

    let mut frames = Vec::new();
    for id in &kept {
        frames.extend(engine.move_and_raise(state, *id, *to, false)?);
    }
    for id in top.into_iter().filter(|id| !kept.contains(id)) {
        state.move_card_to(id, Zone::Deck, ZonePosition::Bottom)?;
    }
    Ok(Step::frames(frames))
}

fn transform_toy_to_spirits(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::TransformToyToSpirits { target, spirits } = action else {
        return Err(mismatch(action));
    };
    let cards = &engine.tables.cards;
    let selection = resolve_target(state, cards, target, ctx, TargetPurpose::Sacrifice);
    on_targets(selection, action, |id| {
        let is_toy_in_play = state.instance(id).is_some_and(|card| {
            card.zone == Zone::InPlay && cards.category(card.card_id) == Some(CardCategory::Toy)
        });
        if !is_toy_in_play {
            return Ok(Vec::new());
        }
        let mut frames = engine.move_and_raise(state, id, Zone::Discard, true)?;
        frames.extend(create_tokens(engine, state, ctx.player, Resource::Spirits, *spirits));
        Ok(frames)
    })
}

fn reanimate_toy(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::ReanimateToy { first_memory_spirits } = action else {
        return Err(mismatch(action));
    };
    let pool = candidates(state, &engine.tables.cards, ctx.player, Zone::Discard, Some(CardCategory::Toy));
    let selection = select(pool, 1, ctx, TargetPurpose::Fetch, Zone::Discard, "return a Toy to play");
    on_targets(selection, action, |id| {
        let mut frames = engine.move_and_raise(state, id, Zone::InPlay, false)?;
        if state.first_memory == Some(id) {
            frames.extend(create_tokens(engine, state, ctx.player, Resource::Spirits, *first_memory_spirits));
        }
        Ok(frames)
    })
}

fn play_card_no_cost(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::PlayCardNoCost { category, from } = action else {
        return Err(mismatch(action));
    };
    let pool = candidates(state, &engine.tables.cards, ctx.player, *from, *category);
    let selection = select(pool, 1, ctx, TargetPurpose::PlayFree, *from, "play a card for free");
    on_targets(selection, action, |id| engine.play_card(state, ctx.player, id, true))
}

// === Card state ===

fn place_counter(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::PlaceCounter { target, counter, count } = action else {
        return Err(mismatch(action));
    };
    let selection = resolve_target(state, &engine.tables.cards, target, ctx, TargetPurpose::Mark);
    on_targets(selection, action, |id| {
        if let Some(card) = state.instance_mut(id) {
            card.add_counters(counter, *count);
        }
        Ok(Vec::new())
    })
}

fn remove_counter(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::RemoveCounter { target, counter, count } = action else {
        return Err(mismatch(action));
    };
    let selection = resolve_target(state, &engine.tables.cards, target, ctx, TargetPurpose::Mark);
    on_targets(selection, action, |id| {
        if let Some(card) = state.instance_mut(id) {
            card.remove_counters(counter, *count);
        }
        Ok(Vec::new())
    })
}

fn set_tapped(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext, target: &super::effect::CardTarget, tapped: bool) -> Result<Step> {
    let selection = resolve_target(state, &engine.tables.cards, target, ctx, TargetPurpose::Mark);
    on_targets(selection, action, |id| {
        if let Some(card) = state.instance_mut(id).filter(|c| c.zone == Zone::InPlay) {
            card.tapped = tapped;
        }
        Ok(Vec::new())
    })
}

fn tap_card(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::TapCard { target } = action else {
        return Err(mismatch(action));
    };
    set_tapped(engine, state, action, ctx, target, true)
}

fn untap_card(engine: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::UntapCard { target } = action else {
        return Err(mismatch(action));
    };
    set_tapped(engine, state, action, ctx, target, false)
}

// === Turn structure ===

fn take_extra_turn(_: &EffectEngine<'_>, state: &mut GameState, _: &EffectAction, _: &EffectContext) -> Result<Step> {
    state.nightfall_extension += 1;
    Ok(Step::Continue)
}

fn skip_nightmare_creep(_: &EffectEngine<'_>, state: &mut GameState, _: &EffectAction, _: &EffectContext) -> Result<Step> {
    state.nightmare.skips_pending += 1;
    Ok(Step::Continue)
}

fn delay_nightmare_creep(_: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, _: &EffectContext) -> Result<Step> {
    let EffectAction::DelayNightmareCreep { turns } = action else {
        return Err(mismatch(action));
    };
    state.nightmare.delay = state.nightmare.delay.saturating_add(*turns);
    Ok(Step::Continue)
}

fn apply_cost_tax(_: &EffectEngine<'_>, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
    let EffectAction::ApplyCostTax { amount } = action else {
        return Err(mismatch(action));
    };
    let player = state.player_mut(ctx.player);
    player.cost_tax = player.cost_tax.saturating_add(*amount);
    Ok(Step::Continue)
}
