//! # tuckd-sim
//!
//! Rules interpreter and Monte Carlo simulator for the solo card game
//! Tuck'd-In Terrors.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Effects**: Cards and objectives describe their effects
//!    as data (trigger, conditions, actions). The effect engine interprets
//!    them through a dispatch table keyed by action kind.
//!
//! 2. **Explicit Choice Handshake**: An effect that needs a decision
//!    suspends and returns a pending choice; the caller asks an agent and
//!    resumes the engine. There are no callbacks into agents from inside
//!    effect resolution.
//!
//! 3. **Deterministic Replay**: Every game is seeded from its batch seed
//!    and index. The same seed and agent reproduce the same outcome.
//!
//! ## Architecture
//!
//! - **Shared Definitions**: `DefinitionTables` are immutable and shared
//!   across games behind an `Arc`.
//!
//! - **Isolated Games**: Each game owns its `GameState`, so a batch runs
//!   one game per rayon task with no locking beyond the result collector.
//!
//! - **Typed Progress**: Objective progress is a struct of named counters
//!   with an explicit per-turn reset.
//!
//! ## Modules
//!
//! - `core`: Instance ids, players, game state, actions, RNG, configuration
//! - `zones`: Per-player ordered zones
//! - `cards`: Card definitions, instances and the card registry
//! - `objectives`: Objective definitions and win-condition kinds
//! - `triggers`: Trigger kinds, events and conditions
//! - `effects`: The effect engine, action handlers and the choice handshake
//! - `rules`: Action resolution, Nightmare Creep, win/loss, turns, setup
//! - `agents`: Random, greedy and scoring decision agents
//! - `simulation`: Batch runner, outcome records and statistics

pub mod core;
pub mod zones;
pub mod cards;
pub mod objectives;
pub mod triggers;
pub mod effects;
pub mod rules;
pub mod agents;
pub mod simulation;
pub mod tables;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use crate::core::{
    GameAction, GameRng, GameState, InstanceId, PlayerId, Resource, RulesConfig, TurnPhase, WinStatus,
};

pub use crate::cards::{CardCategory, CardDefinition, CardId, CardInstance, CardRegistry};

pub use crate::objectives::{ObjectiveDefinition, ObjectiveId, ObjectiveRegistry, WinCondition};

pub use crate::effects::{ChoiceResponse, Decision, Effect, EffectAction, EffectEngine, Resolution};

pub use crate::triggers::{Condition, GameEvent, TriggerKind};

pub use crate::rules::{GameSetup, TurnManager};

pub use crate::agents::{Agent, AgentProfile};

pub use crate::simulation::{AggregateStats, BatchReport, OutcomeRecord, SimConfig, SimulationRunner};

pub use crate::tables::DefinitionTables;

pub use crate::error::{Result, SimError};
