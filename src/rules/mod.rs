//! Rules of play.
//!
//! - `ActionResolver`: validates and executes agent actions
//! - `LegalActions`: enumerates what the agent may do in MAIN
//! - `NightmareCreep`: the per-turn escalating penalty
//! - `WinLossChecker`: win conditions and loss checks
//! - `TurnManager`: the turn state machine
//! - `GameSetup`: the starting state of a game

mod legal;
mod nightmare;
mod resolver;
mod setup;
mod turn;
mod win_loss;

pub use legal::LegalActions;
pub use nightmare::NightmareCreep;
pub use resolver::ActionResolver;
pub use setup::GameSetup;
pub use turn::TurnManager;
pub use win_loss::WinLossChecker;
