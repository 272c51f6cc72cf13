//! Effect definitions.
//!
//! An `Effect` is data: a trigger kind, conditions, an ordered list of
//! `EffectAction`s, activation costs and usage flags. Effects are owned by
//! card and objective definitions and never mutated during a game.
//!
//! Action records are tagged by kind (`{"kind": "DRAW_CARDS", "count": 1}`).
//! A tag this build does not know deserializes to `Unrecognized`, which the
//! engine logs and skips.

use serde::{Deserialize, Serialize};

use crate::cards::CardCategory;
use crate::core::Resource;
use crate::triggers::{Condition, TriggerKind};
use crate::zones::Zone;

/// A data-described card or objective effect.
///
/// ```
/// use tuckd_sim::effects::{ActivationCost, Effect, EffectAction};
/// use tuckd_sim::triggers::TriggerKind;
///
/// let ability = Effect::new(TriggerKind::TapAbility)
///     .with_cost(ActivationCost::PaySpirits { count: 1 })
///     .with_action(EffectAction::add_mana(2))
///     .once_per_turn();
///
/// assert!(ability.once_per_turn);
/// assert_eq!(ability.actions.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub trigger: TriggerKind,

    /// All must hold for the actions to run.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Executed strictly in order.
    #[serde(default)]
    pub actions: Vec<EffectAction>,

    /// Paid before an activated ability resolves.
    #[serde(default)]
    pub costs: Vec<ActivationCost>,

    #[serde(default)]
    pub description: String,

    /// An echo `ON_PLAY` effect fires again when its card re-enters play
    /// from the discard pile.
    #[serde(default)]
    pub echo: bool,

    #[serde(default)]
    pub once_per_turn: bool,

    #[serde(default)]
    pub once_per_game: bool,
}

impl Effect {
    /// Create an effect with no conditions, actions or costs.
    #[must_use]
    pub fn new(trigger: TriggerKind) -> Self {
        Self {
            trigger,
            conditions: Vec::new(),
            actions: Vec::new(),
            costs: Vec::new(),
            description: String::new(),
            echo: false,
            once_per_turn: false,
            once_per_game: false,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: EffectAction) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: ActivationCost) -> Self {
        self.costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    #[must_use]
    pub fn once_per_turn(mut self) -> Self {
        self.once_per_turn = true;
        self
    }

    #[must_use]
    pub fn once_per_game(mut self) -> Self {
        self.once_per_game = true;
        self
    }

    /// Does activating this effect tap its card?
    #[must_use]
    pub fn taps(&self) -> bool {
        self.trigger == TriggerKind::TapAbility || self.costs.contains(&ActivationCost::TapThis)
    }
}

/// A cost paid to activate an ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationCost {
    PayMana { amount: u32 },
    PaySpirits { count: u32 },
    PayMemory { count: u32 },
    TapThis,
    SacrificeThis,
    /// Exile cards from the bottom of the discard pile.
    ExileFromDiscard { count: u32 },
}

/// Which card an action affects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardTarget {
    /// The effect's source card.
    This,
    FirstMemory,
    /// The card the triggering event is about.
    EventSubject,
    /// A card the player picks from one of their zones.
    Chosen {
        zone: Zone,
        #[serde(default)]
        category: Option<CardCategory>,
    },
}

/// One face range of a dice roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    pub min: u32,
    pub max: u32,
    pub actions: Vec<EffectAction>,
}

/// A labelled branch of an `OPTIONS` player choice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceBranch {
    pub label: String,
    #[serde(default)]
    pub actions: Vec<EffectAction>,
}

/// The decision a `PLAYER_CHOICE` action puts to the agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerChoiceSpec {
    YesNo {
        prompt: String,
        #[serde(default)]
        on_yes: Vec<EffectAction>,
        #[serde(default)]
        on_no: Vec<EffectAction>,
    },
    /// Discard `discard` chosen cards or sacrifice `sacrifice` Spirits.
    /// Only options the player can pay are offered.
    DiscardOrSacrificeSpirit { discard: u32, sacrifice: u32 },
    Options {
        prompt: String,
        options: Vec<ChoiceBranch>,
    },
    /// Pick N in `min..=max`; `actions` run N times.
    Number {
        prompt: String,
        min: u32,
        max: u32,
        actions: Vec<EffectAction>,
    },
}

/// An atomic step of an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectAction {
    // === Resources ===
    DrawCards { count: u32 },
    AddMana { amount: u32 },
    CreateSpiritTokens { count: u32 },
    CreateMemoryTokens { count: u32 },
    /// Raw adjustment, clamped at zero. Not counted as token creation.
    ModifyResource { resource: Resource, delta: i32 },
    SacrificeResource { resource: Resource, count: u32 },
    /// Move up to `count` of one resource into another.
    ConvertTokens { from: Resource, to: Resource, count: u32 },

    // === Card movement ===
    SacrificeCard { target: CardTarget },
    DiscardRandom { count: u32 },
    DiscardChosen { count: u32 },
    ReturnThisCardToHand,
    MoveCard { target: CardTarget, to: Zone },
    /// Deck: from the top. Hand: at random. Other zones: chosen.
    ExileFromZone { zone: Zone, count: u32 },
    MillDeck { count: u32 },
    /// Pick a card from the deck into `to`, then shuffle the deck.
    SearchDeck {
        #[serde(default)]
        category: Option<CardCategory>,
        to: Zone,
    },
    /// Look at the top `look_at` cards, put one into `to` and the rest on
    /// the bottom.
    BrowseDeck { look_at: u32, to: Zone },
    /// Sacrifice a Toy and create Spirits in its place.
    TransformToyToSpirits { target: CardTarget, spirits: u32 },
    /// Return a Toy from the discard pile to play; Spirits are created when
    /// it is the First Memory.
    ReanimateToy {
        #[serde(default)]
        first_memory_spirits: u32,
    },
    /// Play a card from `from` without paying its cost.
    PlayCardNoCost {
        #[serde(default)]
        category: Option<CardCategory>,
        from: Zone,
    },

    // === Card state ===
    PlaceCounter { target: CardTarget, counter: String, count: u32 },
    RemoveCounter { target: CardTarget, counter: String, count: u32 },
    TapCard { target: CardTarget },
    UntapCard { target: CardTarget },

    // === Turn structure ===
    /// Push the nightfall turn back by one.
    TakeExtraTurn,
    SkipNightmareCreep,
    DelayNightmareCreep { turns: u32 },
    /// Raise card costs for the rest of the turn.
    ApplyCostTax { amount: u32 },

    // === Control flow ===
    RollDice { sides: u32, outcomes: Vec<DiceOutcome> },
    ConditionalEffect {
        condition: Condition,
        #[serde(default)]
        then: Vec<EffectAction>,
        #[serde(default)]
        otherwise: Vec<EffectAction>,
    },
    PlayerChoice { choice: PlayerChoiceSpec },

    /// Any kind this build does not know.
    #[serde(other)]
    Unrecognized,
}

/// Kind tag of an `EffectAction`, the key of the engine's dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    DrawCards,
    AddMana,
    CreateSpiritTokens,
    CreateMemoryTokens,
    ModifyResource,
    SacrificeResource,
    ConvertTokens,
    SacrificeCard,
    DiscardRandom,
    DiscardChosen,
    ReturnThisCardToHand,
    MoveCard,
    ExileFromZone,
    MillDeck,
    SearchDeck,
    BrowseDeck,
    TransformToyToSpirits,
    ReanimateToy,
    PlayCardNoCost,
    PlaceCounter,
    RemoveCounter,
    TapCard,
    UntapCard,
    TakeExtraTurn,
    SkipNightmareCreep,
    DelayNightmareCreep,
    ApplyCostTax,
    RollDice,
    ConditionalEffect,
    PlayerChoice,
    Unrecognized,
}

impl EffectAction {
    /// The kind tag of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::DrawCards { .. } => ActionKind::DrawCards,
            Self::AddMana { .. } => ActionKind::AddMana,
            Self::CreateSpiritTokens { .. } => ActionKind::CreateSpiritTokens,
            Self::CreateMemoryTokens { .. } => ActionKind::CreateMemoryTokens,
            Self::ModifyResource { .. } => ActionKind::ModifyResource,
            Self::SacrificeResource { .. } => ActionKind::SacrificeResource,
            Self::ConvertTokens { .. } => ActionKind::ConvertTokens,
            Self::SacrificeCard { .. } => ActionKind::SacrificeCard,
            Self::DiscardRandom { .. } => ActionKind::DiscardRandom,
            Self::DiscardChosen { .. } => ActionKind::DiscardChosen,
            Self::ReturnThisCardToHand => ActionKind::ReturnThisCardToHand,
            Self::MoveCard { .. } => ActionKind::MoveCard,
            Self::ExileFromZone { .. } => ActionKind::ExileFromZone,
            Self::MillDeck { .. } => ActionKind::MillDeck,
            Self::SearchDeck { .. } => ActionKind::SearchDeck,
            Self::BrowseDeck { .. } => ActionKind::BrowseDeck,
            Self::TransformToyToSpirits { .. } => ActionKind::TransformToyToSpirits,
            Self::ReanimateToy { .. } => ActionKind::ReanimateToy,
            Self::PlayCardNoCost { .. } => ActionKind::PlayCardNoCost,
            Self::PlaceCounter { .. } => ActionKind::PlaceCounter,
            Self::RemoveCounter { .. } => ActionKind::RemoveCounter,
            Self::TapCard { .. } => ActionKind::TapCard,
            Self::UntapCard { .. } => ActionKind::UntapCard,
            Self::TakeExtraTurn => ActionKind::TakeExtraTurn,
            Self::SkipNightmareCreep => ActionKind::SkipNightmareCreep,
            Self::DelayNightmareCreep { .. } => ActionKind::DelayNightmareCreep,
            Self::ApplyCostTax { .. } => ActionKind::ApplyCostTax,
            Self::RollDice { .. } => ActionKind::RollDice,
            Self::ConditionalEffect { .. } => ActionKind::ConditionalEffect,
            Self::PlayerChoice { .. } => ActionKind::PlayerChoice,
            Self::Unrecognized => ActionKind::Unrecognized,
        }
    }
}

// Convenience constructors
impl EffectAction {
    #[must_use]
    pub const fn draw(count: u32) -> Self {
        Self::DrawCards { count }
    }

    #[must_use]
    pub const fn add_mana(amount: u32) -> Self {
        Self::AddMana { amount }
    }

    #[must_use]
    pub const fn create_spirits(count: u32) -> Self {
        Self::CreateSpiritTokens { count }
    }

    #[must_use]
    pub const fn create_memory(count: u32) -> Self {
        Self::CreateMemoryTokens { count }
    }

    #[must_use]
    pub const fn mill(count: u32) -> Self {
        Self::MillDeck { count }
    }

    #[must_use]
    pub const fn discard_chosen(count: u32) -> Self {
        Self::DiscardChosen { count }
    }

    /// Force a choice between discarding cards and sacrificing Spirits.
    #[must_use]
    pub const fn discard_or_sacrifice(discard: u32, sacrifice: u32) -> Self {
        Self::PlayerChoice {
            choice: PlayerChoiceSpec::DiscardOrSacrificeSpirit { discard, sacrifice },
        }
    }

    /// Ask a yes/no question.
    pub fn yes_no(prompt: impl Into<String>, on_yes: Vec<EffectAction>, on_no: Vec<EffectAction>) -> Self {
        Self::PlayerChoice {
            choice: PlayerChoiceSpec::YesNo {
                prompt: prompt.into(),
                on_yes,
                on_no,
            },
        }
    }

    /// Branch on a condition.
    #[must_use]
    pub fn conditional(condition: Condition, then: Vec<EffectAction>, otherwise: Vec<EffectAction>) -> Self {
        Self::ConditionalEffect {
            condition,
            then,
            otherwise,
        }
    }
}
