//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardCategory`: Toy, Ritual or Spell
//! - `CardDefinition`: Static card data with ordered effects
//! - `CardInstance`: Runtime card state (zone, counters, tapped)
//! - `CardRegistry`: Card definition lookup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardCategory, CardDefinition, CardId};
pub use instance::CardInstance;
pub use registry::CardRegistry;
