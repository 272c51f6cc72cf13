//! Simulation Runner: plays batches of independent games.
//!
//! Definition tables are shared read-only through an `Arc`; every game owns
//! its state and agent. Finished records are collected behind a mutex and
//! sorted by game index, so a batch is reproducible whether it ran on the
//! rayon pool or sequentially.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::agents::AgentProfile;
use crate::core::{GameRng, GameState};
use crate::error::{Result, SimError};
use crate::objectives::ObjectiveId;
use crate::rules::{GameSetup, TurnManager};
use crate::tables::DefinitionTables;

use super::config::SimConfig;
use super::outcome::{OutcomeRecord, TurnSnapshot};
use super::stats::AggregateStats;

/// Shared flag that stops a running batch. Games not yet finished are
/// dropped; finished records are kept.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Records and statistics of one batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Finished games by index.
    pub records: Vec<OutcomeRecord>,
    pub stats: AggregateStats,
}

/// Runs batches of games of one definition set.
pub struct SimulationRunner {
    defs: Arc<DefinitionTables>,
    config: SimConfig,
    cancel: CancelToken,
}

impl SimulationRunner {
    #[must_use]
    pub fn new(defs: Arc<DefinitionTables>, config: SimConfig) -> Self {
        Self {
            defs,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` instead of the runner's own token.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that cancels this runner's batches.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Play `games` games of `objective` with a fresh `agent` each.
    ///
    /// An unknown objective is an error. Faults inside a game never are:
    /// they become `GameResult::Faulted` records.
    pub fn run_batch(&self, objective: ObjectiveId, agent: &AgentProfile, games: usize) -> Result<BatchReport> {
        let title = self.defs.objectives.require(objective)?.title.clone();
        info!(
            "batch: {games} games of '{title}' with the {} agent (seed {})",
            agent.name(),
            self.config.base_seed
        );

        let finished = Mutex::new(Vec::with_capacity(games));
        let play = |index: usize| {
            if self.cancel.is_cancelled() {
                return;
            }
            if let Some(record) = self.run_game(objective, agent, index) {
                if let Ok(mut records) = finished.lock() {
                    records.push(record);
                }
            }
        };
        if self.config.parallel {
            (0..games).into_par_iter().for_each(play);
        } else {
            (0..games).for_each(play);
        }

        let mut records = finished
            .into_inner()
            .map_err(|_| SimError::Invariant("outcome accumulator poisoned".into()))?;
        records.sort_by_key(|record| record.index);

        let cancelled = self.cancel.is_cancelled();
        let stats = AggregateStats::from_records(&records, self.config.outlier_sigma, cancelled);
        info!(
            "batch done: {}/{} games, win rate {:.3}, {} faulted{}",
            stats.games,
            games,
            stats.win_rate,
            stats.faulted,
            if cancelled { " (cancelled)" } else { "" }
        );
        Ok(BatchReport { records, stats })
    }

    /// Play game `index` of a batch. `None` when the batch was cancelled
    /// before the game finished.
    #[must_use]
    pub fn run_game(&self, objective: ObjectiveId, agent: &AgentProfile, index: usize) -> Option<OutcomeRecord> {
        let seed = GameRng::game_seed(self.config.base_seed, index as u64);
        let mut state = None;
        let mut trail = self.config.verbose_games.contains(&index).then(Vec::new);

        let played = panic::catch_unwind(AssertUnwindSafe(|| {
            self.play(objective, agent, seed, &mut state, trail.as_mut())
        }));
        let fault = match played {
            Ok(Ok(true)) => {
                let state = state?;
                return Some(OutcomeRecord::completed(index, seed, &state, trail));
            }
            Ok(Ok(false)) => return None,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                format!("panic: {message}")
            }
        };
        warn!("game {index} (seed {seed}) faulted: {fault}");
        Some(OutcomeRecord::faulted(index, seed, fault, state.as_ref(), trail))
    }

    /// Set up and play one game into `slot`, turn by turn so cancellation
    /// is noticed between turns. `Ok(false)` means cancelled.
    fn play(
        &self,
        objective: ObjectiveId,
        agent: &AgentProfile,
        seed: u64,
        slot: &mut Option<GameState>,
        mut trail: Option<&mut Vec<TurnSnapshot>>,
    ) -> Result<bool> {
        let rules = &self.config.rules;
        let mut agent = agent.build(Arc::clone(&self.defs), seed);
        let state = slot.insert(GameSetup::prepare(&self.defs, objective, seed, rules, agent.as_mut())?);
        let manager = TurnManager::new(&self.defs, rules);

        while !state.game_over {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            manager.run_turn(state, agent.as_mut())?;
            if let Some(trail) = trail.as_deref_mut() {
                trail.push(TurnSnapshot::capture(state));
            }
        }
        Ok(true)
    }
}
