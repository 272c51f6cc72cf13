//! Effect engine behavior observed through full resolutions.

mod common;

use std::collections::BTreeMap;

use common::*;
use tuckd_sim::core::{LogEvent, PlayerId, Resource, RulesConfig};
use tuckd_sim::effects::{
    ActionKind, CardTarget, ChoiceResponse, Decision, Effect, EffectAction, EffectEngine, Resolution,
};
use tuckd_sim::rules::{GameSetup, NightmareCreep, TurnManager};
use tuckd_sim::triggers::TriggerKind;
use tuckd_sim::zones::Zone;

#[test]
fn test_unknown_action_kind_is_a_logged_noop() {
    let json = r#"{
        "trigger": "ON_PLAY",
        "actions": [
            { "kind": "CREATE_SPIRIT_TOKENS", "count": 1 },
            { "kind": "SUMMON_THE_BOOGEYMAN", "count": 3 },
            { "kind": "CREATE_MEMORY_TOKENS", "count": 1 }
        ]
    }"#;
    let effect: Effect = serde_json::from_str(json).unwrap();
    assert_eq!(effect.actions[1], EffectAction::Unrecognized);

    let tables = tables();
    let rules = RulesConfig::default();
    let engine = EffectEngine::new(&tables, &rules);
    let mut state = empty_state(sleepover());

    let done = engine.resolve(&mut state, &effect, PlayerId::SOLO, None, None).unwrap();
    assert!(done.is_complete());
    assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
    assert_eq!(state.player(PlayerId::SOLO).memory, 1);
    assert!(state.log.iter().any(|e| matches!(
        e.event,
        LogEvent::UnimplementedAction {
            kind: ActionKind::Unrecognized
        }
    )));
}

#[test]
fn test_choice_is_offered_even_when_its_branch_is_unimplemented() {
    let tables = tables();
    let rules = RulesConfig::default();
    let mut engine = EffectEngine::new(&tables, &rules);
    engine.unregister(ActionKind::CreateSpiritTokens);
    let mut state = empty_state(sleepover());

    let effect = Effect::new(TriggerKind::OnPlay)
        .with_action(EffectAction::yes_no("Wake the toys?", vec![EffectAction::create_spirits(2)], vec![]))
        .with_action(EffectAction::create_memory(1));

    let resolution = engine.resolve(&mut state, &effect, PlayerId::SOLO, None, None).unwrap();
    let Resolution::Pending(pending) = resolution else {
        panic!("the choice must be offered");
    };
    assert!(matches!(pending.decision, Decision::Choice(_)));

    let done = engine.resume(&mut state, *pending, &ChoiceResponse::Option(0)).unwrap();
    assert!(done.is_complete());
    assert_eq!(state.player(PlayerId::SOLO).spirits, 0);
    assert_eq!(state.player(PlayerId::SOLO).memory, 1);
}

#[test]
fn test_first_memory_survives_zone_moves() {
    let tables = tables();
    let rules = RulesConfig::default();
    let engine = EffectEngine::new(&tables, &rules);
    let mut state = empty_state(sleepover());
    let card = state.create_instance(TEDDY, PlayerId::SOLO, Zone::Hand).unwrap();
    state.first_memory = Some(card);

    for to in [Zone::InPlay, Zone::Discard, Zone::Hand, Zone::Exile] {
        engine
            .perform(
                &mut state,
                PlayerId::SOLO,
                vec![EffectAction::MoveCard {
                    target: CardTarget::FirstMemory,
                    to,
                }],
            )
            .unwrap();
        assert_eq!(state.first_memory, Some(card));
        let located: Vec<_> = [Zone::Deck, Zone::Hand, Zone::InPlay, Zone::Discard, Zone::Exile, Zone::SetAside]
            .into_iter()
            .filter(|zone| state.cards_in(PlayerId::SOLO, *zone).contains(&card))
            .collect();
        assert_eq!(located, vec![to]);
        assert_eq!(state.instance(card).unwrap().zone, to);
    }
}

#[test]
fn test_first_memory_stays_live_through_a_game() {
    let tables = tables();
    let rules = RulesConfig::default();
    let manager = TurnManager::new(&tables, &rules);

    for seed in 0..10 {
        let mut agent = tuckd_sim::agents::AgentProfile::Random.build(shared_tables(), seed);
        let mut state = GameSetup::prepare(&tables, CREEPING_DARK, seed, &rules, agent.as_mut()).unwrap();
        let first_memory = state.first_memory.expect("setup picks a First Memory");

        while !state.game_over {
            manager.run_turn(&mut state, agent.as_mut()).unwrap();
            let card = state.instance(first_memory).expect("First Memory is live");
            assert!(state.cards_in(PlayerId::SOLO, card.zone).contains(&first_memory));
        }
    }
}

#[test]
fn test_nightmare_creep_applies_at_most_once_per_turn() {
    let tables = tables();
    let rules = RulesConfig::default();
    let engine = EffectEngine::new(&tables, &rules);
    let mut state = empty_state(creeping_dark());
    state.turn = 4;
    for _ in 0..6 {
        state.create_instance(MUSIC_BOX, PlayerId::SOLO, Zone::Deck).unwrap();
    }

    NightmareCreep::apply(&engine, &mut state, PlayerId::SOLO).unwrap();
    NightmareCreep::apply(&engine, &mut state, PlayerId::SOLO).unwrap();

    // only the turn 4 tier: mill two, no discard-or-sacrifice choice
    assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Deck), 4);
    assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Discard), 2);
    let applied: Vec<_> = state
        .log
        .iter()
        .filter_map(|e| match e.event {
            LogEvent::NightmareApplied { tier_turn } => Some(tier_turn),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![4]);
}

#[test]
fn test_nightmare_creep_once_per_turn_over_games() {
    let tables = tables();
    let rules = RulesConfig::default();
    let manager = TurnManager::new(&tables, &rules);

    for seed in 0..10 {
        let mut agent = tuckd_sim::agents::AgentProfile::scoring().build(shared_tables(), seed);
        let mut state = GameSetup::prepare(&tables, CREEPING_DARK, seed, &rules, agent.as_mut()).unwrap();
        manager.play_game(&mut state, agent.as_mut()).unwrap();

        let mut per_turn: BTreeMap<u32, usize> = BTreeMap::new();
        for entry in state.log.iter() {
            if matches!(
                entry.event,
                LogEvent::NightmareApplied { .. } | LogEvent::NightmareSkipped { .. }
            ) {
                *per_turn.entry(entry.turn).or_default() += 1;
            }
        }
        assert!(per_turn.values().all(|n| *n == 1), "seed {seed}: {per_turn:?}");
        assert!(per_turn.keys().all(|turn| *turn >= 2));
    }
}

#[test]
fn test_begin_turn_triggers_resolve_oldest_first() {
    let tables = tables();
    let rules = RulesConfig::default();
    let engine = EffectEngine::new(&tables, &rules);
    let mut state = empty_state(sleepover());
    let older = state.create_instance(NIGHT_LIGHT, PlayerId::SOLO, Zone::InPlay).unwrap();
    state.turn = 2;
    let newer = state.create_instance(NIGHT_LIGHT, PlayerId::SOLO, Zone::InPlay).unwrap();

    let frames = engine.raise(
        &state,
        &tuckd_sim::triggers::GameEvent::new(TriggerKind::BeginPlayerTurn, PlayerId::SOLO),
    );
    let sources: Vec<_> = frames.iter().filter_map(|f| f.context().source).collect();
    assert_eq!(sources, vec![older, newer]);

    engine.run(&mut state, frames).unwrap();
    assert_eq!(state.player(PlayerId::SOLO).resource(Resource::Mana), 2);
    assert_eq!(state.progress.mana_from_effects, 2);
}
