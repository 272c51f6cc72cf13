//! Objective definitions.
//!
//! An objective bundles win conditions, a Nightmare Creep schedule, setup
//! instructions, an optional nightfall turn and special rules. Win
//! conditions are data records tagged by kind so several objectives can
//! reuse one kind with different parameters.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::Resource;
use crate::effects::Effect;
use crate::zones::Zone;

/// Unique identifier for an objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectiveId(pub u32);

impl ObjectiveId {
    /// Create a new objective ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Objective({})", self.0)
    }
}

/// A win-condition record. Evaluation is dispatched on the kind tag by the
/// Win/Loss Checker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinCondition {
    /// Play `toys` distinct Toys and create `spirits` Spirit tokens over the
    /// course of the game.
    PlayDistinctToysAndCreateSpirits { toys: u32, spirits: u32 },

    /// Hold `count` tokens of a resource at the same time.
    ControlTokens { resource: Resource, count: u32 },

    /// Empty the deck while permanents in play cover at least `required` of
    /// the listed subtypes.
    EmptyDeckWithPermanentTypes { subtypes: Vec<String>, required: u32 },

    /// Generate `mana` total mana from card effects.
    GenerateManaFromEffects { mana: u32 },

    /// Cast `spell` while at least `min_storm` other spells were already
    /// cast that turn.
    CastSpellWithStorm { spell: CardId, min_storm: u32 },

    /// Create `spirits` Spirit tokens over the course of the game.
    CreateSpiritsTotal { spirits: u32 },

    /// Any kind this build does not know. Never satisfied.
    #[serde(other)]
    Unrecognized,
}

impl WinCondition {
    /// The kind tag, as written in definition files.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::PlayDistinctToysAndCreateSpirits { .. } => "PLAY_DISTINCT_TOYS_AND_CREATE_SPIRITS",
            Self::ControlTokens { .. } => "CONTROL_TOKENS",
            Self::EmptyDeckWithPermanentTypes { .. } => "EMPTY_DECK_WITH_PERMANENT_TYPES",
            Self::GenerateManaFromEffects { .. } => "GENERATE_MANA_FROM_EFFECTS",
            Self::CastSpellWithStorm { .. } => "CAST_SPELL_WITH_STORM",
            Self::CreateSpiritsTotal { .. } => "CREATE_SPIRITS_TOTAL",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// One Nightmare Creep tier: from `turn` onwards `effect` applies each turn
/// until a later tier replaces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NightmareTier {
    pub turn: u32,
    pub effect: Effect,
}

/// How the First Memory is chosen at setup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirstMemorySetup {
    /// The objective has no First Memory.
    #[default]
    None,
    /// A specific card is the First Memory and starts in `zone`.
    Designated { card: CardId, zone: Zone },
    /// The agent picks a Toy among the top `look_at` cards of the shuffled
    /// deck; it goes to hand.
    FromTopOfDeck { look_at: usize },
}

/// Setup instructions of an objective.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupInstructions {
    /// Cards placed in hand before the opening draw.
    pub start_in_hand: Vec<CardId>,
    /// Cards placed in play before the first turn.
    pub start_in_play: Vec<CardId>,
    /// Mana on turn 1 instead of the base formula.
    pub first_turn_mana: Option<u32>,
    /// Added to the turn number to compute each turn's mana.
    pub mana_increment: u32,
    pub first_memory: FirstMemorySetup,
    /// Opening hand size, overriding the rules default.
    pub initial_hand_size: Option<usize>,
}

/// Objective-specific rule switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialRule {
    /// Drawing from an empty deck loses the game.
    DeckOutIsLoss,
    /// Hand-size limit enforced at END_TURN.
    HandSizeLimit { limit: usize },
}

/// Static objective definition.
///
/// ```
/// use tuckd_sim::objectives::{ObjectiveDefinition, ObjectiveId, WinCondition};
///
/// let objective = ObjectiveDefinition::new(
///     ObjectiveId::new(1),
///     "First Night",
///     WinCondition::PlayDistinctToysAndCreateSpirits { toys: 3, spirits: 3 },
/// )
/// .with_nightfall(Some(4));
///
/// assert_eq!(objective.nightfall_turn, Some(4));
/// assert!(!objective.deck_out_is_loss());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveDefinition {
    pub id: ObjectiveId,
    pub title: String,
    pub primary_win: WinCondition,
    #[serde(default)]
    pub alternative_win: Option<WinCondition>,
    #[serde(default)]
    pub nightmare_creep: Vec<NightmareTier>,
    #[serde(default)]
    pub setup: SetupInstructions,
    /// Last turn of the game; `None` means no limit.
    #[serde(default)]
    pub nightfall_turn: Option<u32>,
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,
    /// Cards left out of the deck for this objective.
    #[serde(default)]
    pub banned_cards: Vec<CardId>,
}

impl ObjectiveDefinition {
    /// Create an objective with no limit, no creep and default setup.
    #[must_use]
    pub fn new(id: ObjectiveId, title: impl Into<String>, primary_win: WinCondition) -> Self {
        Self {
            id,
            title: title.into(),
            primary_win,
            alternative_win: None,
            nightmare_creep: Vec::new(),
            setup: SetupInstructions::default(),
            nightfall_turn: None,
            special_rules: Vec::new(),
            banned_cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alternative(mut self, win: WinCondition) -> Self {
        self.alternative_win = Some(win);
        self
    }

    /// Set the nightfall turn (`None` for no limit).
    #[must_use]
    pub fn with_nightfall(mut self, turn: Option<u32>) -> Self {
        self.nightfall_turn = turn;
        self
    }

    /// Add a Nightmare Creep tier.
    #[must_use]
    pub fn with_tier(mut self, turn: u32, effect: Effect) -> Self {
        self.nightmare_creep.push(NightmareTier { turn, effect });
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: SetupInstructions) -> Self {
        self.setup = setup;
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: SpecialRule) -> Self {
        self.special_rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_banned(mut self, card: CardId) -> Self {
        self.banned_cards.push(card);
        self
    }

    /// Does drawing from an empty deck lose this objective?
    #[must_use]
    pub fn deck_out_is_loss(&self) -> bool {
        self.special_rules.contains(&SpecialRule::DeckOutIsLoss)
    }

    /// Hand-size limit override, if any.
    #[must_use]
    pub fn hand_size_limit(&self) -> Option<usize> {
        self.special_rules.iter().find_map(|rule| match rule {
            SpecialRule::HandSizeLimit { limit } => Some(*limit),
            SpecialRule::DeckOutIsLoss => None,
        })
    }

    /// Card ids this objective refers to directly.
    pub fn referenced_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        let designated = match &self.setup.first_memory {
            FirstMemorySetup::Designated { card, .. } => Some(*card),
            _ => None,
        };
        let storm_spell = std::iter::once(&self.primary_win)
            .chain(self.alternative_win.as_ref())
            .filter_map(|w| match w {
                WinCondition::CastSpellWithStorm { spell, .. } => Some(*spell),
                _ => None,
            });

        self.setup
            .start_in_hand
            .iter()
            .chain(self.setup.start_in_play.iter())
            .chain(self.banned_cards.iter())
            .copied()
            .chain(designated)
            .chain(storm_spell)
    }
}
