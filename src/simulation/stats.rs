//! Aggregate statistics over a batch of outcome records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::WinStatus;

use super::outcome::OutcomeRecord;

/// Summary of a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Records in the batch, faulted ones included.
    pub games: usize,
    pub completed: usize,
    pub faulted: usize,
    /// The batch was cancelled before every game ran.
    pub cancelled: bool,
    pub wins: usize,
    /// Wins over all recorded games.
    pub win_rate: f64,
    pub by_status: BTreeMap<WinStatus, usize>,
    /// Wins by the kind tag of the condition that was met.
    pub by_win_kind: BTreeMap<String, usize>,
    /// Final turn -> completed games ending on it.
    pub turn_histogram: BTreeMap<u32, usize>,
    pub mean_turns: f64,
    pub std_dev_turns: f64,
    pub avg_win_turn: Option<f64>,
    pub avg_loss_turn: Option<f64>,
    pub median_win_turn: Option<f64>,
    pub median_loss_turn: Option<f64>,
    pub fastest_win: Option<u32>,
    pub slowest_win: Option<u32>,
    /// Entry `t - 1` is the share of all recorded games won by turn `t`,
    /// up to the latest final turn of a completed game.
    pub win_rate_by_turn: Vec<f64>,
    /// Outliers measured against the turn spread of their own outcome
    /// group. A group needs at least three games to have outliers.
    pub fast_wins: Vec<usize>,
    pub slow_wins: Vec<usize>,
    pub fast_losses: Vec<usize>,
    pub slow_losses: Vec<usize>,
    /// Faulted games plus every fast or slow win or loss, by index.
    pub outliers: Vec<usize>,
}

impl AggregateStats {
    /// Aggregate `records`. Turn statistics cover completed games only.
    #[must_use]
    pub fn from_records(records: &[OutcomeRecord], outlier_sigma: f64, cancelled: bool) -> Self {
        let mut stats = Self {
            games: records.len(),
            cancelled,
            ..Self::default()
        };
        let mut turns = RunningStats::default();
        let mut wins = TurnGroup::default();
        let mut losses = TurnGroup::default();

        for record in records {
            let Some(status) = record.result.status() else {
                stats.faulted += 1;
                stats.outliers.push(record.index);
                continue;
            };
            stats.completed += 1;
            *stats.by_status.entry(status).or_default() += 1;
            *stats.turn_histogram.entry(record.turns).or_default() += 1;
            turns.add(f64::from(record.turns));

            if status.is_win() {
                stats.wins += 1;
                wins.add(record.index, record.turns);
                if let Some(kind) = &record.win_kind {
                    *stats.by_win_kind.entry(kind.clone()).or_default() += 1;
                }
            } else {
                losses.add(record.index, record.turns);
            }
        }

        if stats.games > 0 {
            stats.win_rate = stats.wins as f64 / stats.games as f64;
        }
        stats.mean_turns = turns.mean();
        stats.std_dev_turns = turns.std_dev();
        stats.avg_win_turn = wins.stats.mean_if_any();
        stats.avg_loss_turn = losses.stats.mean_if_any();
        stats.median_win_turn = wins.median();
        stats.median_loss_turn = losses.median();
        stats.fastest_win = wins.games.iter().map(|&(_, turn)| turn).min();
        stats.slowest_win = wins.games.iter().map(|&(_, turn)| turn).max();
        stats.win_rate_by_turn = wins.cumulative_rate(stats.turn_histogram.keys().next_back().copied(), stats.games);

        (stats.fast_wins, stats.slow_wins) = wins.outliers(outlier_sigma);
        (stats.fast_losses, stats.slow_losses) = losses.outliers(outlier_sigma);
        for group in [&stats.fast_wins, &stats.slow_wins, &stats.fast_losses, &stats.slow_losses] {
            stats.outliers.extend(group.iter().copied());
        }
        stats.outliers.sort_unstable();
        stats
    }

    /// Completed games ending with `status`.
    #[must_use]
    pub fn count(&self, status: WinStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Welford running mean and variance.
#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / f64::from(self.count);
        self.m2 += delta * (value - self.mean);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    fn mean_if_any(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}

/// Final turns of one outcome group.
#[derive(Debug, Default)]
struct TurnGroup {
    stats: RunningStats,
    games: Vec<(usize, u32)>,
}

impl TurnGroup {
    fn add(&mut self, index: usize, turn: u32) {
        self.stats.add(f64::from(turn));
        self.games.push((index, turn));
    }

    fn median(&self) -> Option<f64> {
        let mut turns: Vec<u32> = self.games.iter().map(|&(_, turn)| turn).collect();
        turns.sort_unstable();
        let mid = turns.len() / 2;
        match turns.len() {
            0 => None,
            n if n % 2 == 1 => Some(f64::from(turns[mid])),
            _ => Some((f64::from(turns[mid - 1]) + f64::from(turns[mid])) / 2.0),
        }
    }

    fn cumulative_rate(&self, last_turn: Option<u32>, games: usize) -> Vec<f64> {
        let (Some(last_turn), true) = (last_turn, games > 0) else {
            return Vec::new();
        };
        let mut by_turn = vec![0usize; last_turn as usize + 1];
        for &(_, turn) in &self.games {
            by_turn[turn as usize] += 1;
        }
        by_turn[1..]
            .iter()
            .scan(0usize, |won, &count| {
                *won += count;
                Some(*won as f64 / games as f64)
            })
            .collect()
    }

    /// Games strictly below or above `mean -/+ sigma * std_dev`.
    fn outliers(&self, sigma: f64) -> (Vec<usize>, Vec<usize>) {
        if self.games.len() < 3 {
            return (Vec::new(), Vec::new());
        }
        let band = sigma * self.stats.std_dev();
        let (low, high) = (self.stats.mean() - band, self.stats.mean() + band);
        let pick = |keep: &dyn Fn(f64) -> bool| {
            self.games
                .iter()
                .filter(|&&(_, turn)| keep(f64::from(turn)))
                .map(|&(index, _)| index)
                .collect::<Vec<_>>()
        };
        (pick(&|turn| turn < low), pick(&|turn| turn > high))
    }
}
