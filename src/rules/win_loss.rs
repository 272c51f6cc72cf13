//! Win/Loss Checker.
//!
//! Win conditions are evaluated as pure functions of the objective's
//! parameters, the active player's state and the progress counters,
//! dispatched on the condition's kind tag. The loss checks (nightfall, turn
//! ceiling) run after the turn counter advances.

use log::warn;

use crate::cards::CardRegistry;
use crate::core::{GameState, LogEvent, RulesConfig, WinStatus};
use crate::objectives::WinCondition;
use crate::zones::Zone;

/// Evaluates win and loss conditions.
pub struct WinLossChecker;

impl WinLossChecker {
    /// Is `condition` satisfied in `state`?
    #[must_use]
    pub fn condition_met(condition: &WinCondition, state: &GameState, cards: &CardRegistry) -> bool {
        let player = state.player(state.active_player);
        let progress = &state.progress;

        match condition {
            WinCondition::PlayDistinctToysAndCreateSpirits { toys, spirits } => {
                progress.distinct_toys() >= *toys && progress.spirits_created >= *spirits
            }

            WinCondition::ControlTokens { resource, count } => player.resource(*resource) >= *count,

            WinCondition::EmptyDeckWithPermanentTypes { subtypes, required } => {
                if player.zones.zone_size(Zone::Deck) > 0 {
                    return false;
                }
                let in_play: Vec<_> = player
                    .zones
                    .cards(Zone::InPlay)
                    .iter()
                    .filter_map(|id| state.instance(*id))
                    .filter_map(|card| cards.get(card.card_id))
                    .collect();
                let covered = subtypes
                    .iter()
                    .filter(|subtype| in_play.iter().any(|def| def.has_subtype(subtype)))
                    .count();
                covered >= *required as usize
            }

            WinCondition::GenerateManaFromEffects { mana } => progress.mana_from_effects >= *mana,

            WinCondition::CastSpellWithStorm { spell, min_storm } => progress
                .best_storm_by_spell
                .get(spell)
                .is_some_and(|storm| storm >= min_storm),

            WinCondition::CreateSpiritsTotal { spirits } => progress.spirits_created >= *spirits,

            WinCondition::Unrecognized => false,
        }
    }

    /// Check the primary, then the alternative win condition, ending the
    /// game on success. Returns the terminal status, if any.
    pub fn check_wins(state: &mut GameState, cards: &CardRegistry) -> Option<WinStatus> {
        if state.game_over {
            return state.win_status;
        }

        let objective = std::sync::Arc::clone(&state.objective);
        let won = if Self::condition_met(&objective.primary_win, state, cards) {
            Some((WinStatus::PrimaryWin, &objective.primary_win))
        } else {
            objective
                .alternative_win
                .as_ref()
                .filter(|alt| Self::condition_met(alt, state, cards))
                .map(|alt| (WinStatus::AlternativeWin, alt))
        };

        if let Some((status, condition)) = won {
            state.end_game(status, Some(condition.kind_name()));
        }
        state.win_status
    }

    /// Loss once the turn counter passes the (extended) nightfall turn.
    pub fn check_nightfall(state: &mut GameState) -> bool {
        match state.nightfall_turn() {
            Some(nightfall) if !state.game_over && state.turn > nightfall => {
                state.end_game(WinStatus::LossNightfall, None)
            }
            _ => false,
        }
    }

    /// Safety abort once the turn counter passes the configured ceiling.
    pub fn check_turn_ceiling(state: &mut GameState, rules: &RulesConfig) -> bool {
        if state.game_over || state.turn <= rules.max_turns {
            return false;
        }
        let reason = format!("turn ceiling {} reached", rules.max_turns);
        warn!("{reason}");
        state.record(LogEvent::SafetyTrip { reason });
        state.end_game(WinStatus::LossMaxTurns, None)
    }
}
