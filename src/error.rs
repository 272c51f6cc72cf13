//! Error taxonomy for the simulator.
//!
//! Every fallible operation returns [`Result`]. Data-driven failures never
//! panic; they surface as one of the variants below and are either handled
//! locally (rule violations) or caught at the game boundary by the
//! simulation runner and recorded as a faulted outcome.

use thiserror::Error;

/// Errors raised while loading definitions or playing a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Unknown or malformed card/objective reference.
    #[error("definition error: {0}")]
    Definition(String),

    /// An agent proposed an action or answer that the rules do not allow.
    #[error("rule violation: {0}")]
    RuleViolation(String),

    /// An effect kind the engine has no handler for.
    #[error("unimplemented effect: {0}")]
    UnimplementedEffect(String),

    /// A turn, action or effect-step ceiling was reached.
    #[error("termination safety trip: {0}")]
    TerminationSafetyTrip(String),

    /// Internal bookkeeping became inconsistent (a rules bug).
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl SimError {
    /// Whether the Turn Manager may recover by re-querying the agent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RuleViolation(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
