//! Core engine types: entities, players, state, actions, RNG, configuration.
//!
//! These are the per-game building blocks every other module mutates or
//! reads. Definition data (cards, objectives) lives in `cards` and
//! `objectives` and is shared read-only across games.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod resource;
pub mod progress;
pub mod state;

pub use entity::InstanceId;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::RulesConfig;
pub use action::GameAction;
pub use resource::{Comparison, Resource};
pub use progress::ObjectiveProgress;
pub use state::{GameState, LogEntry, LogEvent, NightmareState, PlayerState, TurnPhase, WinStatus};
