//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its category,
//! mana cost, free-form subtypes and the ordered list of effects. Instance
//! data (zone, counters, tapped state) lives in `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;
use crate::triggers::TriggerKind;

/// Unique identifier for a card definition.
///
/// This identifies the kind of card, not a specific copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three card categories.
///
/// Toys and Rituals are permanents and stay in play; Spells resolve and go
/// to the discard pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardCategory {
    Toy,
    Ritual,
    Spell,
}

impl CardCategory {
    /// Does a card of this category stay in play after it is played?
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, Self::Toy | Self::Ritual)
    }
}

fn one() -> u32 {
    1
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use tuckd_sim::cards::{CardCategory, CardDefinition, CardId};
/// use tuckd_sim::effects::{Effect, EffectAction};
/// use tuckd_sim::triggers::TriggerKind;
///
/// let lantern = CardDefinition::new(CardId::new(1), "Nightlight", CardCategory::Toy, 1)
///     .with_subtype("LIGHT")
///     .with_effect(Effect::new(TriggerKind::OnPlay).with_action(EffectAction::create_spirits(1)));
///
/// assert!(lantern.category.is_permanent());
/// assert!(lantern.has_subtype("LIGHT"));
/// assert_eq!(lantern.effects_for(TriggerKind::OnPlay).count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    pub category: CardCategory,

    /// Mana cost before any cost tax.
    pub cost: u32,

    /// Free-form type line tags (e.g. LOOP, HAUNT, REANIMATE).
    #[serde(default)]
    pub subtypes: Vec<String>,

    /// Effects in declared order. An effect's index is its identity for
    /// activation and once-per-turn/once-per-game bookkeeping.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// Copies of this card in the deck.
    #[serde(default = "one")]
    pub quantity: u32,

    /// Rules text, carried for reporting only.
    #[serde(default)]
    pub text: Option<String>,
}

impl CardDefinition {
    /// Create a new card definition with one copy and no effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, category: CardCategory, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            cost,
            subtypes: Vec::new(),
            effects: Vec::new(),
            quantity: 1,
            text: None,
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a subtype tag.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    /// Set the number of copies in the deck.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Check for a subtype tag (case-insensitive).
    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s.eq_ignore_ascii_case(subtype))
    }

    /// Effects with the given trigger, with their indices.
    pub fn effects_for(&self, trigger: TriggerKind) -> impl Iterator<Item = (usize, &Effect)> {
        self.effects
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.trigger == trigger)
    }

    /// Effect at `index`, if any.
    #[must_use]
    pub fn effect(&self, index: usize) -> Option<&Effect> {
        self.effects.get(index)
    }
}
