//! Card instance identification.
//!
//! Every physical card in a game gets an `InstanceId` when the game is set
//! up or when an effect creates it. Ids are never reused or renumbered, so a
//! stored id (for example the First Memory reference) stays valid while the
//! card moves between zones.
//!
//! ```
//! use tuckd_sim::core::InstanceId;
//!
//! let first = InstanceId::new(0);
//! assert_eq!(first.next(), InstanceId::new(1));
//! assert_eq!(first.to_string(), "Instance(0)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one game.
///
/// Ordering follows allocation order, which the trigger system uses as the
/// deterministic tie-break between cards that entered play on the same turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
