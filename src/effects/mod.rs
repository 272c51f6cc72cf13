//! Effect system: data-described card abilities and their interpreter.
//!
//! - `Effect` / `EffectAction`: the definition-side data
//! - `EffectEngine`: executes effects against a `GameState`, suspending on
//!   player decisions
//! - `choice`: decision descriptors exchanged with agents
//! - `targeting`: how card targets resolve to instances
//!
//! Action kinds are dispatched through a table of handlers keyed by
//! `ActionKind`, so new kinds are added by registering a function rather
//! than growing a central match.

mod effect;
mod choice;
mod engine;
pub mod handlers;
pub mod targeting;

pub use effect::{
    ActionKind, ActivationCost, CardTarget, ChoiceBranch, DiceOutcome, Effect, EffectAction,
    PlayerChoiceSpec,
};
pub use choice::{
    ChoiceDescriptor, ChoiceKind, ChoiceOption, ChoiceResponse, Decision, OptionTag,
    TargetPurpose, TargetingDescriptor,
};
pub use engine::{
    ActionHandler, EffectContext, EffectEngine, Frame, FrameExit, PendingChoice, Resolution,
    Resume, Step, Usage,
};
pub use targeting::TargetSelection;
