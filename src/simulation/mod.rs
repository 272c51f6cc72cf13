//! Monte Carlo batch simulation.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tuckd_sim::agents::AgentProfile;
//! use tuckd_sim::objectives::ObjectiveId;
//! use tuckd_sim::simulation::{SimConfig, SimulationRunner};
//! # fn tables() -> tuckd_sim::DefinitionTables { unimplemented!() }
//!
//! let runner = SimulationRunner::new(Arc::new(tables()), SimConfig::default().with_seed(1));
//! let report = runner.run_batch(ObjectiveId::new(1), &AgentProfile::scoring(), 1000)?;
//! println!("win rate {:.2}", report.stats.win_rate);
//! # Ok::<(), tuckd_sim::SimError>(())
//! ```

mod config;
mod outcome;
mod runner;
mod stats;

pub use config::SimConfig;
pub use outcome::{GameResult, OutcomeRecord, ResourceSnapshot, TurnSnapshot};
pub use runner::{BatchReport, CancelToken, SimulationRunner};
pub use stats::AggregateStats;
