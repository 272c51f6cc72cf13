//! Fixtures shared by the unit tests.

use std::sync::Arc;

use crate::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
use crate::core::{GameState, RulesConfig};
use crate::effects::{ActivationCost, Effect, EffectAction};
use crate::objectives::{ObjectiveDefinition, ObjectiveId, ObjectiveRegistry, WinCondition};
use crate::tables::DefinitionTables;
use crate::triggers::TriggerKind;

/// Ritual that adds one mana at the start of each turn.
pub const RITUAL: CardId = CardId(10);
/// Spell, cost 1: create one Memory token.
pub const SPELL: CardId = CardId(20);
/// Toy, cost 2, tap and pay a Spirit: add two mana.
pub const ABILITY_TOY: CardId = CardId(30);

/// Plain Toys 1..=5, cost 1, no effects.
pub fn toy_card(n: u32) -> CardId {
    CardId(n)
}

/// Three distinct Toys and three Spirits; nightfall on turn 4.
pub fn sample_objective() -> ObjectiveDefinition {
    ObjectiveDefinition::new(
        ObjectiveId(1),
        "The Sleepover",
        WinCondition::PlayDistinctToysAndCreateSpirits { toys: 3, spirits: 3 },
    )
    .with_nightfall(Some(4))
}

pub fn sample_tables() -> DefinitionTables {
    let mut cards: Vec<_> = (1..=5)
        .map(|n| CardDefinition::new(toy_card(n), format!("Toy {n}"), CardCategory::Toy, 1).with_quantity(2))
        .collect();
    cards.push(
        CardDefinition::new(RITUAL, "Night Light", CardCategory::Ritual, 2)
            .with_effect(Effect::new(TriggerKind::BeginPlayerTurn).with_action(EffectAction::add_mana(1))),
    );
    cards.push(
        CardDefinition::new(SPELL, "Whispered Wish", CardCategory::Spell, 1)
            .with_effect(Effect::new(TriggerKind::OnPlay).with_action(EffectAction::create_memory(1))),
    );
    cards.push(
        CardDefinition::new(ABILITY_TOY, "Wind-Up Owl", CardCategory::Toy, 2).with_effect(
            Effect::new(TriggerKind::TapAbility)
                .with_cost(ActivationCost::PaySpirits { count: 1 })
                .with_action(EffectAction::add_mana(2)),
        ),
    );

    let cards = CardRegistry::from_cards(cards).expect("sample cards are unique");
    let objectives = ObjectiveRegistry::from_objectives([sample_objective()]).expect("one objective");
    DefinitionTables::new(cards, objectives).expect("sample tables are valid")
}

/// Turn 1 of the sample objective with empty zones.
pub fn sample_state() -> GameState {
    GameState::new(Arc::new(sample_objective()), 1, &RulesConfig::default())
}
