//! Zone system for card locations.
//!
//! ## Key Types
//!
//! - `Zone`: the six zones of a player (deck, hand, in play, discard, exile,
//!   set aside)
//! - `ZoneManager`: Card location tracking and movement
//! - `ZonePosition`: Position specifier for ordered insertion

pub mod manager;
pub mod zone;

pub use manager::{ZoneManager, ZonePosition};
pub use zone::Zone;
