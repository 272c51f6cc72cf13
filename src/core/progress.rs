//! Objective-progress counters.
//!
//! Typed per-game metrics that win conditions are evaluated against. Every
//! counter only grows during a game; the `*_this_turn` fields are the
//! exception and are cleared by [`ObjectiveProgress::reset_turn`] at
//! BEGIN_TURN.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Progress toward the active objective.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    /// Distinct Toy definitions played this game.
    pub distinct_toys_played: BTreeSet<CardId>,
    pub toys_played: u32,
    pub spells_cast: u32,
    pub spirits_created: u32,
    pub memory_created: u32,
    /// Mana added by card effects (not the per-turn mana gain).
    pub mana_from_effects: u32,
    /// Highest storm count each spell was cast with.
    pub best_storm_by_spell: BTreeMap<CardId, u32>,
    /// Spells cast this turn.
    pub storm_count_this_turn: u32,
    /// Cards returned from play to hand this turn.
    pub loop_count_this_turn: u32,
}

impl ObjectiveProgress {
    /// Record a Toy being played.
    pub fn record_toy(&mut self, card: CardId) {
        self.toys_played += 1;
        self.distinct_toys_played.insert(card);
    }

    /// Record a spell being cast. Returns its storm count: the number of
    /// spells already cast this turn.
    pub fn record_spell(&mut self, card: CardId) -> u32 {
        let storm = self.storm_count_this_turn;
        self.storm_count_this_turn += 1;
        self.spells_cast += 1;
        let best = self.best_storm_by_spell.entry(card).or_insert(storm);
        *best = (*best).max(storm);
        storm
    }

    /// Number of distinct Toys played.
    #[must_use]
    pub fn distinct_toys(&self) -> u32 {
        self.distinct_toys_played.len() as u32
    }

    /// Clear the per-turn counters.
    pub fn reset_turn(&mut self) {
        self.storm_count_this_turn = 0;
        self.loop_count_this_turn = 0;
    }

    /// Is every game-long counter of `self` at least its value in
    /// `earlier`?
    #[must_use]
    pub fn dominates(&self, earlier: &ObjectiveProgress) -> bool {
        self.distinct_toys_played.is_superset(&earlier.distinct_toys_played)
            && self.toys_played >= earlier.toys_played
            && self.spells_cast >= earlier.spells_cast
            && self.spirits_created >= earlier.spirits_created
            && self.memory_created >= earlier.memory_created
            && self.mana_from_effects >= earlier.mana_from_effects
            && earlier
                .best_storm_by_spell
                .iter()
                .all(|(card, storm)| self.best_storm_by_spell.get(card).is_some_and(|s| s >= storm))
    }
}
