//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tuckd_sim::agents::Agent;
use tuckd_sim::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
use tuckd_sim::core::{GameAction, GameState, InstanceId, RulesConfig};
use tuckd_sim::effects::{ChoiceDescriptor, Effect, EffectAction, OptionTag, TargetingDescriptor};
use tuckd_sim::objectives::{
    ObjectiveDefinition, ObjectiveId, ObjectiveRegistry, SetupInstructions, WinCondition,
};
use tuckd_sim::tables::DefinitionTables;
use tuckd_sim::triggers::TriggerKind;

pub const TEDDY: CardId = CardId(1);
pub const ROCKING_HORSE: CardId = CardId(2);
pub const JACK_IN_THE_BOX: CardId = CardId(3);
pub const MUSIC_BOX: CardId = CardId(4);
pub const PAPER_CRANE: CardId = CardId(5);
pub const KALEIDOSCOPE: CardId = CardId(6);
pub const NIGHT_LIGHT: CardId = CardId(10);
pub const DREAM_JAR: CardId = CardId(20);

/// "Play 3 distinct Toys and create 3 Spirits", nightfall on turn 4.
pub const SLEEPOVER: ObjectiveId = ObjectiveId(1);
/// Loaded from `fixtures/creeping_dark.json`.
pub const CREEPING_DARK: ObjectiveId = ObjectiveId(2);
/// The Sleepover with the three Spirit Toys in the opening hand.
pub const SCRIPTED_SLEEPOVER: ObjectiveId = ObjectiveId(3);

fn on_play(actions: Vec<EffectAction>) -> Effect {
    actions
        .into_iter()
        .fold(Effect::new(TriggerKind::OnPlay), Effect::with_action)
}

fn toy(id: CardId, name: &str, cost: u32) -> CardDefinition {
    CardDefinition::new(id, name, CardCategory::Toy, cost).with_quantity(2)
}

pub fn cards() -> Vec<CardDefinition> {
    vec![
        toy(TEDDY, "Teddy", 1).with_effect(on_play(vec![EffectAction::create_spirits(1)])),
        toy(ROCKING_HORSE, "Rocking Horse", 1).with_effect(on_play(vec![EffectAction::create_spirits(1)])),
        toy(JACK_IN_THE_BOX, "Jack-in-the-Box", 2).with_effect(on_play(vec![EffectAction::create_spirits(1)])),
        toy(MUSIC_BOX, "Music Box", 1),
        toy(PAPER_CRANE, "Paper Crane", 1),
        toy(KALEIDOSCOPE, "Kaleidoscope", 2).with_effect(on_play(vec![
            EffectAction::draw(1),
            EffectAction::create_memory(1),
            EffectAction::add_mana(1),
        ])),
        CardDefinition::new(NIGHT_LIGHT, "Night Light", CardCategory::Ritual, 2)
            .with_effect(Effect::new(TriggerKind::BeginPlayerTurn).with_action(EffectAction::add_mana(1))),
        CardDefinition::new(DREAM_JAR, "Dream Jar", CardCategory::Spell, 1)
            .with_effect(on_play(vec![EffectAction::draw(1)])),
    ]
}

pub fn sleepover() -> ObjectiveDefinition {
    ObjectiveDefinition::new(
        SLEEPOVER,
        "The Sleepover",
        WinCondition::PlayDistinctToysAndCreateSpirits { toys: 3, spirits: 3 },
    )
    .with_nightfall(Some(4))
}

pub fn creeping_dark() -> ObjectiveDefinition {
    serde_json::from_str(include_str!("../fixtures/creeping_dark.json")).expect("fixture parses")
}

pub fn scripted_sleepover() -> ObjectiveDefinition {
    let mut objective = sleepover();
    objective.id = SCRIPTED_SLEEPOVER;
    objective.setup = SetupInstructions {
        start_in_hand: vec![TEDDY, ROCKING_HORSE, JACK_IN_THE_BOX],
        ..SetupInstructions::default()
    };
    objective
}

pub fn tables() -> DefinitionTables {
    let cards = CardRegistry::from_cards(cards()).expect("unique cards");
    let objectives =
        ObjectiveRegistry::from_objectives([sleepover(), creeping_dark(), scripted_sleepover()])
            .expect("unique objectives");
    DefinitionTables::new(cards, objectives).expect("valid tables")
}

pub fn shared_tables() -> Arc<DefinitionTables> {
    Arc::new(tables())
}

/// A state with empty zones for `objective`.
pub fn empty_state(objective: ObjectiveDefinition) -> GameState {
    GameState::new(Arc::new(objective), 1, &RulesConfig::default())
}

/// Passes every turn. Choices: the first offered option, or a
/// sacrifice when offered and `prefer_sacrifice` is set.
pub struct PassingAgent {
    pub prefer_sacrifice: bool,
}

impl Agent for PassingAgent {
    fn name(&self) -> &str {
        "passing"
    }

    fn choose_action(&mut self, _: &GameState, _: &[GameAction]) -> GameAction {
        GameAction::Pass
    }

    fn make_choice(&mut self, _: &GameState, choice: &ChoiceDescriptor) -> usize {
        if self.prefer_sacrifice {
            if let Some(index) = choice.find(|tag| matches!(tag, OptionTag::SacrificeSpirit { .. })) {
                return index;
            }
        }
        0
    }

    fn choose_targets(&mut self, _: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId> {
        request.candidates.iter().take(request.count).copied().collect()
    }
}

/// Plays the cards of `script` one per turn, each as the free Toy play,
/// and passes otherwise.
pub struct ScriptedAgent {
    pub script: Vec<CardId>,
    pub next: usize,
}

impl ScriptedAgent {
    pub fn new(script: Vec<CardId>) -> Self {
        Self { script, next: 0 }
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    fn choose_action(&mut self, state: &GameState, legal: &[GameAction]) -> GameAction {
        let Some(&wanted) = self.script.get(self.next) else {
            return GameAction::Pass;
        };
        let played_this_turn = state.player(state.active_player).free_toy_played;
        let found = legal.iter().find(|action| match action {
            GameAction::PlayCard { card, free_toy: true } => {
                state.instance(*card).is_some_and(|c| c.card_id == wanted)
            }
            _ => false,
        });
        match found {
            Some(action) if !played_this_turn => {
                self.next += 1;
                *action
            }
            _ => GameAction::Pass,
        }
    }

    fn make_choice(&mut self, _: &GameState, _: &ChoiceDescriptor) -> usize {
        0
    }

    fn choose_targets(&mut self, _: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId> {
        request.candidates.iter().take(request.count).copied().collect()
    }
}
