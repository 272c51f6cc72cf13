//! Turn Manager: the BEGIN_TURN → MAIN → END_TURN state machine.
//!
//! Every pending player choice raised along the way is answered
//! synchronously by the agent before the turn moves on. Games end when a
//! component sets `game_over`; the turn ceiling guarantees that happens.

use log::{debug, warn};

use crate::agents::Agent;
use crate::core::{GameState, LogEvent, RulesConfig, TurnPhase, WinStatus};
use crate::effects::{ChoiceResponse, Decision, EffectAction, EffectEngine, PendingChoice, Resolution};
use crate::error::{Result, SimError};
use crate::objectives::ObjectiveDefinition;
use crate::tables::DefinitionTables;
use crate::triggers::{GameEvent, TriggerKind};
use crate::zones::Zone;

use super::{ActionResolver, LegalActions, NightmareCreep, WinLossChecker};

/// Runs the turns of a game against one agent.
pub struct TurnManager<'a> {
    engine: EffectEngine<'a>,
}

impl<'a> TurnManager<'a> {
    #[must_use]
    pub fn new(tables: &'a DefinitionTables, rules: &'a RulesConfig) -> Self {
        Self {
            engine: EffectEngine::new(tables, rules),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &EffectEngine<'a> {
        &self.engine
    }

    /// Mutable access to the engine, for swapping action handlers.
    pub fn engine_mut(&mut self) -> &mut EffectEngine<'a> {
        &mut self.engine
    }

    fn rules(&self) -> &RulesConfig {
        self.engine.rules
    }

    /// Mana available at the start of `turn`.
    #[must_use]
    pub fn mana_for_turn(objective: &ObjectiveDefinition, turn: u32) -> u32 {
        let setup = &objective.setup;
        match setup.first_turn_mana {
            Some(mana) if turn == 1 => mana,
            _ => turn.saturating_add(setup.mana_increment),
        }
    }

    /// Play turns until the game ends.
    pub fn play_game(&self, state: &mut GameState, agent: &mut dyn Agent) -> Result<WinStatus> {
        while !state.game_over {
            self.run_turn(state, agent)?;
        }
        state
            .win_status
            .ok_or_else(|| SimError::Invariant("game over without a win status".into()))
    }

    /// Play one full turn, stopping early if the game ends.
    pub fn run_turn(&self, state: &mut GameState, agent: &mut dyn Agent) -> Result<()> {
        self.begin_turn(state, agent)?;
        if state.game_over {
            return Ok(());
        }
        self.main_phase(state, agent)?;
        if state.game_over {
            return Ok(());
        }
        self.end_turn(state, agent)
    }

    // === Phases ===

    /// Untap and reset, draw, set mana, resolve begin-of-turn triggers,
    /// then Nightmare Creep.
    pub fn begin_turn(&self, state: &mut GameState, agent: &mut dyn Agent) -> Result<()> {
        let player = state.active_player;
        state.phase = TurnPhase::BeginTurn;
        state.begin_turn_reset(player);
        state.record(LogEvent::TurnStarted);
        debug!("turn {} begins", state.turn);

        let draw = self
            .engine
            .perform(state, player, vec![EffectAction::draw(self.rules().draw_per_turn)])?;
        self.settle(state, draw, agent)?;
        if state.game_over {
            return Ok(());
        }

        let mana = Self::mana_for_turn(&state.objective, state.turn);
        state.player_mut(player).mana = mana;
        state.record(LogEvent::ManaSet { amount: mana });

        let triggered = self
            .engine
            .fire(state, GameEvent::new(TriggerKind::BeginPlayerTurn, player))?;
        self.settle(state, triggered, agent)?;
        if state.game_over {
            return Ok(());
        }

        let creep = NightmareCreep::apply(&self.engine, state, player)?;
        self.settle(state, creep, agent)
    }

    /// Ask the agent for actions until it passes or the per-turn ceiling is
    /// reached. Illegal proposals are rejected and count toward the ceiling.
    pub fn main_phase(&self, state: &mut GameState, agent: &mut dyn Agent) -> Result<()> {
        let player = state.active_player;
        state.phase = TurnPhase::Main;

        for _ in 0..self.rules().max_actions_per_turn {
            if state.game_over {
                return Ok(());
            }
            let legal = LegalActions::enumerate(state, &self.engine.tables.cards, player);
            let action = agent.choose_action(state, &legal);
            let pass = action.is_pass();

            match ActionResolver::execute(&self.engine, state, player, &action) {
                Ok(resolution) => self.settle(state, resolution, agent)?,
                Err(e) if e.is_recoverable() => {
                    warn!("turn {}: {} proposed {action}: {e}", state.turn, agent.name());
                    state.record(LogEvent::ActionRejected { reason: e.to_string() });
                }
                Err(e) => return Err(e),
            }
            if pass {
                return Ok(());
            }
        }

        if !state.game_over {
            let reason = format!(
                "action ceiling {} reached on turn {}",
                self.rules().max_actions_per_turn,
                state.turn
            );
            warn!("{reason}");
            state.record(LogEvent::SafetyTrip { reason });
        }
        Ok(())
    }

    /// End-of-turn triggers, mana loss, hand-size discard, the win check and
    /// the turn advance with its loss checks.
    pub fn end_turn(&self, state: &mut GameState, agent: &mut dyn Agent) -> Result<()> {
        let player = state.active_player;
        state.phase = TurnPhase::EndTurn;

        let triggered = self
            .engine
            .fire(state, GameEvent::new(TriggerKind::EndPlayerTurn, player))?;
        self.settle(state, triggered, agent)?;
        if state.game_over {
            return Ok(());
        }

        state.player_mut(player).mana = 0;

        let limit = state.player(player).hand_limit;
        let excess = state.zone_size(player, Zone::Hand).saturating_sub(limit);
        if excess > 0 {
            debug!("{player} discards {excess} down to {limit}");
            let discard = self
                .engine
                .perform(state, player, vec![EffectAction::discard_chosen(excess as u32)])?;
            self.settle(state, discard, agent)?;
        }

        if WinLossChecker::check_wins(state, &self.engine.tables.cards).is_some() {
            return Ok(());
        }

        state.turn += 1;
        WinLossChecker::check_nightfall(state);
        WinLossChecker::check_turn_ceiling(state, self.rules());
        Ok(())
    }

    // === Choices ===

    /// Answer pending choices until the resolution completes.
    pub fn settle(&self, state: &mut GameState, mut resolution: Resolution, agent: &mut dyn Agent) -> Result<()> {
        while let Resolution::Pending(pending) = resolution {
            resolution = self.answer(state, *pending, agent)?;
        }
        Ok(())
    }

    fn answer(&self, state: &mut GameState, pending: PendingChoice, agent: &mut dyn Agent) -> Result<Resolution> {
        let mut rejected = 0;
        loop {
            let response = match &pending.decision {
                Decision::Choice(choice) => ChoiceResponse::Option(agent.make_choice(state, choice)),
                Decision::Targets(request) => ChoiceResponse::Targets(agent.choose_targets(state, request)),
            };
            if pending.decision.accepts(&response) {
                return self.engine.resume(state, pending, &response);
            }

            rejected += 1;
            let reason = format!("{} answered {response:?} to {:?}", agent.name(), pending.decision);
            warn!("{reason}");
            state.record(LogEvent::ActionRejected { reason: reason.clone() });
            if rejected > self.rules().max_choice_retries {
                return Err(SimError::RuleViolation(reason));
            }
        }
    }
}
