//! Player actions.
//!
//! A `GameAction` is the command value a decision agent hands to the
//! Action Resolver. The legal-action enumerator never lists `Pass`; an
//! agent returns it to end its MAIN phase, and every agent falls back to it
//! when nothing is legal.

use serde::{Deserialize, Serialize};

use super::entity::InstanceId;

/// An atomic player action.
///
/// ```
/// use tuckd_sim::core::{GameAction, InstanceId};
///
/// let play = GameAction::play(InstanceId::new(4));
/// assert!(!play.is_pass());
/// assert_eq!(play.card(), Some(InstanceId::new(4)));
/// assert!(GameAction::Pass.is_pass());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameAction {
    /// Play a card from hand. `free_toy` uses the once-per-turn free Toy
    /// play instead of paying mana.
    PlayCard { card: InstanceId, free_toy: bool },

    /// Activate the effect at `effect_index` on a card in play.
    ActivateAbility { card: InstanceId, effect_index: usize },

    /// End the MAIN phase.
    Pass,
}

impl GameAction {
    /// Play a card by paying its cost.
    #[must_use]
    pub const fn play(card: InstanceId) -> Self {
        Self::PlayCard { card, free_toy: false }
    }

    /// Play a Toy using the free play of the turn.
    #[must_use]
    pub const fn play_free(card: InstanceId) -> Self {
        Self::PlayCard { card, free_toy: true }
    }

    /// Activate an ability on a card in play.
    #[must_use]
    pub const fn activate(card: InstanceId, effect_index: usize) -> Self {
        Self::ActivateAbility { card, effect_index }
    }

    /// Is this the pass action?
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The card this action refers to, if any.
    #[must_use]
    pub const fn card(&self) -> Option<InstanceId> {
        match self {
            Self::PlayCard { card, .. } | Self::ActivateAbility { card, .. } => Some(*card),
            Self::Pass => None,
        }
    }
}

impl std::fmt::Display for GameAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayCard { card, free_toy: true } => write!(f, "play {card} (free)"),
            Self::PlayCard { card, .. } => write!(f, "play {card}"),
            Self::ActivateAbility { card, effect_index } => {
                write!(f, "activate {card}#{effect_index}")
            }
            Self::Pass => write!(f, "pass"),
        }
    }
}
