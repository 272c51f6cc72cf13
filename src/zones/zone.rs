//! The fixed set of zones a card can occupy.

use serde::{Deserialize, Serialize};

/// A player zone. Every card instance is in exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    /// Draw pile. The top card is the last element of the zone order.
    Deck,
    Hand,
    InPlay,
    Discard,
    Exile,
    /// Holding area for a spell while its effects resolve.
    SetAside,
}

impl Zone {
    /// All zones in a stable order.
    pub const ALL: [Zone; 6] = [
        Zone::Deck,
        Zone::Hand,
        Zone::InPlay,
        Zone::Discard,
        Zone::Exile,
        Zone::SetAside,
    ];

    /// Upper-case name used in logs and definition files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Zone::Deck => "DECK",
            Zone::Hand => "HAND",
            Zone::InPlay => "IN_PLAY",
            Zone::Discard => "DISCARD",
            Zone::Exile => "EXILE",
            Zone::SetAside => "SET_ASIDE",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
