//! Objectives: win conditions, Nightmare Creep schedules, setup and
//! special rules.

pub mod definition;
pub mod registry;

pub use definition::{
    FirstMemorySetup, NightmareTier, ObjectiveDefinition, ObjectiveId, SetupInstructions,
    SpecialRule, WinCondition,
};
pub use registry::ObjectiveRegistry;
