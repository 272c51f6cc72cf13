//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` tracks where one player's cards are located and keeps
//! every zone as an ordered sequence:
//! - Deck order is the draw order (top = last element)
//! - Hand, in-play and discard order is arrival order
//! - Card lookup by instance id is O(1)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::entity::InstanceId;
use crate::core::rng::GameRng;
use crate::error::{Result, SimError};

use super::zone::Zone;

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of zone (end of the sequence).
    Top,
    /// Add to bottom of zone (start of the sequence).
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// Manages one player's card locations across zones.
///
/// ## Usage
///
/// ```
/// use tuckd_sim::zones::{Zone, ZoneManager, ZonePosition};
/// use tuckd_sim::core::InstanceId;
///
/// let mut zones = ZoneManager::new();
/// zones.add_to_zone(InstanceId(10), Zone::Deck, ZonePosition::Top).unwrap();
/// zones.add_to_zone(InstanceId(11), Zone::Deck, ZonePosition::Bottom).unwrap();
///
/// assert_eq!(zones.top_card(Zone::Deck), Some(InstanceId(10)));
/// assert_eq!(zones.move_to_zone(InstanceId(10), Zone::Hand, ZonePosition::Top), Some(Zone::Deck));
/// assert_eq!(zones.cards(Zone::Hand), &[InstanceId(10)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Card locations: instance_id -> zone
    locations: FxHashMap<InstanceId, Zone>,

    /// Ordered card lists, one per zone.
    zone_order: FxHashMap<Zone, Vec<InstanceId>>,
}

impl ZoneManager {
    /// Create a zone manager with every zone initialized and empty.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self::default();
        for zone in Zone::ALL {
            manager.zone_order.insert(zone, Vec::new());
        }
        manager
    }

    fn insert_ordered(order: &mut Vec<InstanceId>, card: InstanceId, position: ZonePosition) {
        match position {
            ZonePosition::Top => order.push(card),
            ZonePosition::Bottom => order.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, card);
            }
        }
    }

    /// Add a card that is not yet tracked.
    pub fn add_to_zone(&mut self, card: InstanceId, zone: Zone, position: ZonePosition) -> Result<()> {
        if let Some(existing) = self.locations.get(&card) {
            return Err(SimError::Invariant(format!(
                "{card} is already tracked in {existing}"
            )));
        }

        self.locations.insert(card, zone);
        Self::insert_ordered(self.zone_order.entry(zone).or_default(), card, position);
        Ok(())
    }

    /// Move a card from its current zone to another.
    ///
    /// Returns the old zone, or `None` if the card wasn't found. Moving a
    /// card to the zone it is already in repositions it.
    pub fn move_to_zone(&mut self, card: InstanceId, new_zone: Zone, position: ZonePosition) -> Option<Zone> {
        let old_zone = self.locations.get(&card).copied()?;

        if let Some(order) = self.zone_order.get_mut(&old_zone) {
            order.retain(|&c| c != card);
        }

        self.locations.insert(card, new_zone);
        Self::insert_ordered(self.zone_order.entry(new_zone).or_default(), card, position);

        Some(old_zone)
    }

    /// Get the zone a card is in.
    #[must_use]
    pub fn get_zone(&self, card: InstanceId) -> Option<Zone> {
        self.locations.get(&card).copied()
    }

    /// Check if a card is in a specific zone.
    #[must_use]
    pub fn is_in_zone(&self, card: InstanceId, zone: Zone) -> bool {
        self.locations.get(&card) == Some(&zone)
    }

    /// Cards in a zone, bottom first.
    #[must_use]
    pub fn cards(&self, zone: Zone) -> &[InstanceId] {
        self.zone_order.get(&zone).map_or(&[], |v| v.as_slice())
    }

    /// The top `count` cards of a zone, topmost first.
    #[must_use]
    pub fn top_cards(&self, zone: Zone, count: usize) -> Vec<InstanceId> {
        self.cards(zone).iter().rev().take(count).copied().collect()
    }

    /// Get the number of cards in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        self.cards(zone).len()
    }

    /// Get the top card of a zone (last in the vec).
    #[must_use]
    pub fn top_card(&self, zone: Zone) -> Option<InstanceId> {
        self.cards(zone).last().copied()
    }

    /// Shuffle a zone.
    pub fn shuffle_zone(&mut self, zone: Zone, rng: &mut GameRng) {
        if let Some(order) = self.zone_order.get_mut(&zone) {
            rng.shuffle(order);
        }
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Check if the manager tracks a card.
    #[must_use]
    pub fn contains(&self, card: InstanceId) -> bool {
        self.locations.contains_key(&card)
    }
}
