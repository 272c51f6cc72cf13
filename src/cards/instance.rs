//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical copy of a card during a game. Its zone is
//! kept in sync with the owner's `ZoneManager` by `GameState::move_card`,
//! which is the only place cards change zones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::CardId;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::zones::Zone;

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id for this instance; never reused within a game.
    pub id: InstanceId,

    /// Reference to the card definition.
    pub card_id: CardId,

    pub owner: PlayerId,

    /// Current zone.
    pub zone: Zone,

    /// Counters by kind. Entries at zero are removed.
    #[serde(default)]
    pub counters: BTreeMap<String, u32>,

    pub tapped: bool,

    /// Turn this card last entered play, `None` while not in play.
    pub turn_entered_play: Option<u32>,

    /// Indices of once-per-turn effects already used this turn.
    #[serde(default)]
    pub used_this_turn: SmallVec<[usize; 2]>,
}

impl CardInstance {
    /// Create an instance in the given zone.
    #[must_use]
    pub fn new(id: InstanceId, card_id: CardId, owner: PlayerId, zone: Zone) -> Self {
        Self {
            id,
            card_id,
            owner,
            zone,
            counters: BTreeMap::new(),
            tapped: false,
            turn_entered_play: None,
            used_this_turn: SmallVec::new(),
        }
    }

    /// Current count of a counter kind.
    #[must_use]
    pub fn counter(&self, kind: &str) -> u32 {
        self.counters.get(kind).copied().unwrap_or(0)
    }

    /// Add counters.
    pub fn add_counters(&mut self, kind: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self.counters.entry(kind.to_string()).or_insert(0) += count;
    }

    /// Remove up to `count` counters, returning how many were removed.
    pub fn remove_counters(&mut self, kind: &str, count: u32) -> u32 {
        let Some(current) = self.counters.get_mut(kind) else {
            return 0;
        };
        let removed = count.min(*current);
        *current -= removed;
        if *current == 0 {
            self.counters.remove(kind);
        }
        removed
    }

    /// Has the once-per-turn effect at `index` been used this turn?
    #[must_use]
    pub fn used(&self, index: usize) -> bool {
        self.used_this_turn.contains(&index)
    }

    /// Clear state that does not survive leaving play.
    pub fn reset_play_state(&mut self) {
        self.tapped = false;
        self.counters.clear();
        self.turn_entered_play = None;
        self.used_this_turn.clear();
    }
}
