//! Trigger system for event-driven effects.
//!
//! ## Key Components
//!
//! - [`TriggerKind`]: When an effect fires
//! - [`GameEvent`]: Something that happened, with its subject card and zones
//! - [`ZoneMove`]: A completed zone change and the events it raises
//! - [`Condition`]: Pure predicates gating an effect's actions
//! - [`TriggerRegistry`]: Index of which card effects listen for which kind
//!
//! Zone-change triggers are raised as discrete events when the move
//! happens (see [`ZoneMove::events`]), never polled afterwards.

pub mod condition;
pub mod event;
pub mod registry;

pub use condition::{Condition, ConditionContext, ConditionEvaluator};
pub use event::{GameEvent, TriggerKind, ZoneMove};
pub use registry::{TriggerRegistry, TriggeredEffect};
