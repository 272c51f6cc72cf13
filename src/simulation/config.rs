//! Batch configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::RulesConfig;

/// Configuration for a simulation batch.
///
/// ```
/// use tuckd_sim::simulation::SimConfig;
///
/// let config = SimConfig::default().with_seed(7).sequential().with_verbose_games([0, 3]);
/// assert_eq!(config.base_seed, 7);
/// assert!(!config.parallel);
/// assert!(config.verbose_games.contains(&3));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub rules: RulesConfig,

    /// Seed every per-game seed is derived from.
    pub base_seed: u64,

    /// Run games on the rayon pool.
    pub parallel: bool,

    /// Game indices that record a snapshot after every turn.
    pub verbose_games: BTreeSet<usize>,

    /// Final-turn deviations (in standard deviations) beyond which a game
    /// is flagged as an outlier.
    pub outlier_sigma: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            base_seed: 42,
            parallel: true,
            verbose_games: BTreeSet::new(),
            outlier_sigma: 2.0,
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Run games one after another on the calling thread.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    #[must_use]
    pub fn with_verbose_games(mut self, games: impl IntoIterator<Item = usize>) -> Self {
        self.verbose_games.extend(games);
        self
    }

    #[must_use]
    pub fn with_outlier_sigma(mut self, sigma: f64) -> Self {
        self.outlier_sigma = sigma;
        self
    }
}
