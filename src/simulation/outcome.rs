//! Per-game outcome records.

use serde::{Deserialize, Serialize};

use crate::core::{GameRngState, GameState, ObjectiveProgress, TurnPhase, WinStatus};
use crate::zones::Zone;

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    Completed { status: WinStatus },
    /// The game hit an error and was abandoned. Counted apart from
    /// completed games.
    Faulted { reason: String },
}

impl GameResult {
    #[must_use]
    pub fn status(&self) -> Option<WinStatus> {
        match self {
            Self::Completed { status } => Some(*status),
            Self::Faulted { .. } => None,
        }
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.status().is_some_and(WinStatus::is_win)
    }

    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted { .. })
    }
}

/// Resources and zone sizes of the active player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub mana: u32,
    pub spirits: u32,
    pub memory: u32,
    pub deck: usize,
    pub hand: usize,
    pub in_play: usize,
    pub discard: usize,
    pub exile: usize,
}

impl ResourceSnapshot {
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        let player = state.player(state.active_player);
        let size = |zone| player.zones.zone_size(zone);
        Self {
            mana: player.mana,
            spirits: player.spirits,
            memory: player.memory,
            deck: size(Zone::Deck),
            hand: size(Zone::Hand),
            in_play: size(Zone::InPlay),
            discard: size(Zone::Discard),
            exile: size(Zone::Exile),
        }
    }
}

/// State at the end of one turn of a verbose game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn: u32,
    pub phase: TurnPhase,
    pub resources: ResourceSnapshot,
    pub progress: ObjectiveProgress,
    /// Zone of the First Memory, if the objective has one.
    pub first_memory_zone: Option<Zone>,
    /// Length of the event log so far.
    pub log_len: usize,
    /// Game RNG position at the end of the turn.
    pub rng: GameRngState,
}

impl TurnSnapshot {
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            turn: state.turn,
            phase: state.phase,
            resources: ResourceSnapshot::capture(state),
            progress: state.progress.clone(),
            first_memory_zone: state
                .first_memory
                .and_then(|id| state.instance(id))
                .map(|card| card.zone),
            log_len: state.log.len(),
            rng: state.rng.state(),
        }
    }
}

/// Result of one game of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Position of the game within its batch.
    pub index: usize,
    /// Seed the game was played with; replaying it reproduces the record.
    pub seed: u64,
    pub result: GameResult,
    /// Kind tag of the win condition that was met.
    pub win_kind: Option<String>,
    /// Turn counter when the game ended.
    pub turns: u32,
    pub resources: ResourceSnapshot,
    pub progress: ObjectiveProgress,
    /// Per-turn snapshots, for verbose games only.
    pub trail: Option<Vec<TurnSnapshot>>,
}

impl OutcomeRecord {
    /// Record a finished game.
    #[must_use]
    pub fn completed(index: usize, seed: u64, state: &GameState, trail: Option<Vec<TurnSnapshot>>) -> Self {
        let result = match state.win_status {
            Some(status) => GameResult::Completed { status },
            None => GameResult::Faulted {
                reason: "game ended without a win status".into(),
            },
        };
        Self {
            index,
            seed,
            result,
            win_kind: state.win_kind.clone(),
            turns: state.turn,
            resources: ResourceSnapshot::capture(state),
            progress: state.progress.clone(),
            trail,
        }
    }

    /// Record a game abandoned with an error. `state` is whatever was built
    /// before the fault, if anything.
    #[must_use]
    pub fn faulted(
        index: usize,
        seed: u64,
        reason: String,
        state: Option<&GameState>,
        trail: Option<Vec<TurnSnapshot>>,
    ) -> Self {
        Self {
            index,
            seed,
            result: GameResult::Faulted { reason },
            win_kind: None,
            turns: state.map_or(0, |s| s.turn),
            resources: state.map(ResourceSnapshot::capture).unwrap_or_default(),
            progress: state.map(|s| s.progress.clone()).unwrap_or_default(),
            trail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::testing::{sample_state, toy_card};

    #[test]
    fn test_completed_record() {
        let mut state = sample_state();
        state.create_instance(toy_card(1), PlayerId::SOLO, Zone::Hand).unwrap();
        state.player_mut(PlayerId::SOLO).spirits = 2;
        state.turn = 3;
        state.end_game(WinStatus::PrimaryWin, Some("CREATE_SPIRITS_TOTAL"));

        let record = OutcomeRecord::completed(4, 99, &state, None);
        assert!(record.result.is_win());
        assert_eq!(record.turns, 3);
        assert_eq!(record.resources.hand, 1);
        assert_eq!(record.resources.spirits, 2);
        assert_eq!(record.win_kind.as_deref(), Some("CREATE_SPIRITS_TOTAL"));
    }

    #[test]
    fn test_faulted_record_without_state() {
        let record = OutcomeRecord::faulted(1, 5, "boom".into(), None, None);
        assert!(record.result.is_faulted());
        assert_eq!(record.result.status(), None);
        assert_eq!(record.turns, 0);
        assert_eq!(record.resources, ResourceSnapshot::default());
    }

    #[test]
    fn test_result_serde_tag() {
        let json = serde_json::to_string(&GameResult::Completed {
            status: WinStatus::LossNightfall,
        })
        .unwrap();
        assert_eq!(json, r#"{"result":"COMPLETED","status":"LOSS_NIGHTFALL"}"#);
    }
}
