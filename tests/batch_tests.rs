//! Simulation Runner: determinism, fault isolation, cancellation and
//! verbose trails.

mod common;

use std::thread;
use std::time::Duration;

use common::*;
use tuckd_sim::agents::AgentProfile;
use tuckd_sim::core::{RulesConfig, WinStatus};
use tuckd_sim::simulation::{CancelToken, GameResult, SimConfig, SimulationRunner};

#[test]
fn test_replaying_a_game_reproduces_its_record() {
    let runner = SimulationRunner::new(shared_tables(), SimConfig::default().with_seed(77));
    for profile in [AgentProfile::Random, AgentProfile::Greedy, AgentProfile::scoring()] {
        let report = runner.run_batch(CREEPING_DARK, &profile, 25).unwrap();
        for record in &report.records {
            let replay = runner.run_game(CREEPING_DARK, &profile, record.index).unwrap();
            assert_eq!(&replay, record, "{} game {}", profile.name(), record.index);
        }
    }
}

#[test]
fn test_batches_are_reproducible() {
    let config = SimConfig::default().with_seed(5);
    let a = SimulationRunner::new(shared_tables(), config.clone())
        .run_batch(SLEEPOVER, &AgentProfile::Random, 50)
        .unwrap();
    let b = SimulationRunner::new(shared_tables(), config.sequential())
        .run_batch(SLEEPOVER, &AgentProfile::Random, 50)
        .unwrap();
    assert_eq!(a, b);

    let other = SimulationRunner::new(shared_tables(), SimConfig::default().with_seed(6))
        .run_batch(SLEEPOVER, &AgentProfile::Random, 50)
        .unwrap();
    assert_ne!(
        a.records.iter().map(|r| r.seed).collect::<Vec<_>>(),
        other.records.iter().map(|r| r.seed).collect::<Vec<_>>()
    );
}

#[test]
fn test_every_completed_game_has_one_terminal_status() {
    let runner = SimulationRunner::new(shared_tables(), SimConfig::default());
    let report = runner.run_batch(CREEPING_DARK, &AgentProfile::Random, 200).unwrap();

    assert_eq!(report.stats.games, 200);
    assert_eq!(report.stats.completed + report.stats.faulted, 200);
    let counted: usize = report.stats.by_status.values().sum();
    assert_eq!(counted, report.stats.completed);
    for record in &report.records {
        let GameResult::Completed { status } = record.result else {
            panic!("game {} faulted: {:?}", record.index, record.result);
        };
        assert!(record.turns <= RulesConfig::default().max_turns + 1);
        assert_eq!(status.is_win(), record.win_kind.is_some());
        if status == WinStatus::LossNightfall {
            assert_eq!(record.turns, 6);
        }
    }
}

#[test]
fn test_faulted_games_do_not_disturb_siblings() {
    let baseline = SimulationRunner::new(shared_tables(), SimConfig::default().with_seed(3))
        .run_batch(SLEEPOVER, &AgentProfile::Random, 200)
        .unwrap();

    // Kaleidoscope resolves three actions on play; two is the ceiling here.
    let strict = RulesConfig::default().with_max_effect_steps(2);
    let config = SimConfig::default().with_seed(3).with_rules(strict);
    let faulty = SimulationRunner::new(shared_tables(), config)
        .run_batch(SLEEPOVER, &AgentProfile::Random, 200)
        .unwrap();

    assert_eq!(faulty.records.len(), 200);
    assert!(faulty.stats.faulted > 0);
    assert!(faulty.stats.completed > 0);
    assert_eq!(faulty.stats.completed + faulty.stats.faulted, 200);

    for record in &faulty.records {
        match &record.result {
            GameResult::Faulted { reason } => {
                assert!(reason.contains("termination safety trip"), "{reason}");
                assert!(faulty.stats.outliers.contains(&record.index));
            }
            GameResult::Completed { .. } => {
                assert_eq!(record, &baseline.records[record.index]);
            }
        }
    }
}

#[test]
fn test_cancel_keeps_finished_records() {
    let cancel = CancelToken::new();
    let runner = SimulationRunner::new(shared_tables(), SimConfig::default().sequential())
        .with_cancel_token(cancel.clone());

    let trigger = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
    });
    let report = runner.run_batch(SLEEPOVER, &AgentProfile::Random, 1_000_000).unwrap();
    trigger.join().unwrap();

    assert!(report.stats.cancelled);
    assert!(report.records.len() < 1_000_000);
    assert_eq!(report.stats.games, report.records.len());
    for (position, record) in report.records.iter().enumerate() {
        assert_eq!(record.index, position);
        let fresh = SimulationRunner::new(shared_tables(), SimConfig::default());
        assert_eq!(fresh.run_game(SLEEPOVER, &AgentProfile::Random, record.index).as_ref(), Some(record));
    }
}

#[test]
fn test_verbose_trail_is_opt_in() {
    let runner = SimulationRunner::new(shared_tables(), SimConfig::default().with_verbose_games([2, 4]));
    let report = runner.run_batch(CREEPING_DARK, &AgentProfile::Greedy, 6).unwrap();

    for record in &report.records {
        let verbose = record.index == 2 || record.index == 4;
        assert_eq!(record.trail.is_some(), verbose, "game {}", record.index);
    }

    let trail = report.records[2].trail.as_ref().unwrap();
    assert!(!trail.is_empty());
    assert_eq!(trail.last().map(|s| s.turn), Some(report.records[2].turns));
    for pair in trail.windows(2) {
        assert!(pair[0].turn <= pair[1].turn);
        assert!(pair[1].progress.spirits_created >= pair[0].progress.spirits_created);
    }
    assert!(trail.iter().all(|s| s.first_memory_zone.is_some()));
    assert!(trail.iter().all(|s| s.rng.seed == report.records[2].seed));
}
