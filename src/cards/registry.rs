//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores all card definitions for a simulation batch.
//! It is built once, wrapped in `DefinitionTables`, and shared read-only by
//! every game.

use rustc_hash::FxHashMap;

use super::definition::{CardCategory, CardDefinition, CardId};
use crate::error::{Result, SimError};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use tuckd_sim::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::new(CardId::new(1), "Toy Soldier", CardCategory::Toy, 1))
///     .unwrap();
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Toy Soldier");
/// assert!(registry
///     .register(CardDefinition::new(CardId::new(1), "Duplicate", CardCategory::Spell, 0))
///     .is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of definitions.
    pub fn from_cards(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a card definition. Duplicate ids are a definition error.
    pub fn register(&mut self, card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(SimError::Definition(format!(
                "card {} registered twice",
                card.id
            )));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, or a definition error.
    pub fn require(&self, id: CardId) -> Result<&CardDefinition> {
        self.cards
            .get(&id)
            .ok_or_else(|| SimError::Definition(format!("unknown card {id}")))
    }

    /// Category of a card, if registered.
    #[must_use]
    pub fn category(&self, id: CardId) -> Option<CardCategory> {
        self.cards.get(&id).map(|c| c.category)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards.into_iter()
    }
}
