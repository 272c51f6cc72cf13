//! Definition tables shared by every game of a batch.
//!
//! `DefinitionTables` owns the card and objective registries plus the
//! trigger index derived from the cards. It is built once, validated, and
//! then shared read-only (behind an `Arc`) by all games and worker threads.

use log::debug;

use crate::cards::CardRegistry;
use crate::error::{Result, SimError};
use crate::objectives::ObjectiveRegistry;
use crate::triggers::TriggerRegistry;

/// Immutable card and objective definitions.
///
/// ```
/// use tuckd_sim::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
/// use tuckd_sim::objectives::{ObjectiveDefinition, ObjectiveId, ObjectiveRegistry, WinCondition};
/// use tuckd_sim::DefinitionTables;
///
/// let cards = CardRegistry::from_cards(vec![
///     CardDefinition::new(CardId::new(1), "Music Box", CardCategory::Toy, 1),
/// ]).unwrap();
/// let objectives = ObjectiveRegistry::from_objectives(vec![
///     ObjectiveDefinition::new(ObjectiveId::new(1), "Lullaby", WinCondition::CreateSpiritsTotal { spirits: 3 }),
/// ]).unwrap();
///
/// let tables = DefinitionTables::new(cards, objectives).unwrap();
/// assert_eq!(tables.cards.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DefinitionTables {
    pub cards: CardRegistry,
    pub objectives: ObjectiveRegistry,
    /// Trigger index built from `cards`.
    pub triggers: TriggerRegistry,
}

impl DefinitionTables {
    /// Build the tables and validate cross references.
    pub fn new(cards: CardRegistry, objectives: ObjectiveRegistry) -> Result<Self> {
        let triggers = TriggerRegistry::from_cards(&cards);
        let tables = Self {
            cards,
            objectives,
            triggers,
        };
        tables.validate()?;
        debug!(
            "definition tables: {} cards, {} objectives",
            tables.cards.len(),
            tables.objectives.len()
        );
        Ok(tables)
    }

    /// Every card an objective names must exist.
    pub fn validate(&self) -> Result<()> {
        for objective in self.objectives.iter() {
            if let Some(missing) = objective
                .referenced_cards()
                .find(|card| !self.cards.contains(*card))
            {
                return Err(SimError::Definition(format!(
                    "{} ({}) references unknown {missing}",
                    objective.id, objective.title
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardDefinition, CardId};
    use crate::objectives::{ObjectiveDefinition, ObjectiveId, SetupInstructions, WinCondition};

    fn cards() -> CardRegistry {
        CardRegistry::from_cards(vec![CardDefinition::new(
            CardId(1),
            "Music Box",
            CardCategory::Toy,
            1,
        )])
        .unwrap()
    }

    #[test]
    fn test_unknown_start_card_rejected() {
        let objective = ObjectiveDefinition::new(
            ObjectiveId(1),
            "Broken",
            WinCondition::CreateSpiritsTotal { spirits: 1 },
        )
        .with_setup(SetupInstructions {
            start_in_play: vec![CardId(42)],
            ..SetupInstructions::default()
        });
        let objectives = ObjectiveRegistry::from_objectives(vec![objective]).unwrap();

        let err = DefinitionTables::new(cards(), objectives).unwrap_err();
        assert!(matches!(err, SimError::Definition(ref msg) if msg.contains("Card(42)")));
    }

    #[test]
    fn test_unknown_storm_spell_rejected() {
        let objective = ObjectiveDefinition::new(
            ObjectiveId(2),
            "Storm",
            WinCondition::CastSpellWithStorm {
                spell: CardId(9),
                min_storm: 2,
            },
        );
        let objectives = ObjectiveRegistry::from_objectives(vec![objective]).unwrap();
        assert!(DefinitionTables::new(cards(), objectives).is_err());
    }

    #[test]
    fn test_sample_tables_are_valid() {
        let tables = crate::testing::sample_tables();
        assert!(tables.validate().is_ok());
        assert!(!tables.cards.is_empty());
    }
}
