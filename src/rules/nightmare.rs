//! Nightmare Creep: the per-objective escalating penalty.
//!
//! Each turn the single highest tier whose threshold has been reached
//! applies; tiers replace each other rather than stack. At most one
//! application happens per turn no matter how often this is invoked.

use std::sync::Arc;

use log::info;

use crate::core::{GameState, LogEvent, PlayerId};
use crate::effects::{EffectEngine, Resolution};
use crate::error::Result;
use crate::objectives::{NightmareTier, ObjectiveDefinition};
use crate::triggers::{GameEvent, TriggerKind};

pub struct NightmareCreep;

impl NightmareCreep {
    /// The tier in force on `turn`, with every threshold pushed back by
    /// `delay` turns.
    #[must_use]
    pub fn select_tier(objective: &ObjectiveDefinition, turn: u32, delay: u32) -> Option<&NightmareTier> {
        let effective = turn.checked_sub(delay)?;
        objective
            .nightmare_creep
            .iter()
            .filter(|tier| tier.turn <= effective)
            .max_by_key(|tier| tier.turn)
    }

    /// Apply this turn's tier, unless one was already applied (or skipped)
    /// this turn.
    pub fn apply(engine: &EffectEngine<'_>, state: &mut GameState, player: PlayerId) -> Result<Resolution> {
        if state.nightmare.applied_turn == Some(state.turn) {
            return Ok(Resolution::Complete);
        }

        let objective = Arc::clone(&state.objective);
        let Some(tier) = Self::select_tier(&objective, state.turn, state.nightmare.delay) else {
            return Ok(Resolution::Complete);
        };
        state.nightmare.applied_turn = Some(state.turn);

        if state.nightmare.skips_pending > 0 {
            state.nightmare.skips_pending -= 1;
            state.record(LogEvent::NightmareSkipped { tier_turn: tier.turn });
            info!("turn {}: Nightmare Creep tier {} skipped", state.turn, tier.turn);
            return Ok(Resolution::Complete);
        }

        state.record(LogEvent::NightmareApplied { tier_turn: tier.turn });
        info!("turn {}: Nightmare Creep tier {} applies", state.turn, tier.turn);
        let event = GameEvent::new(TriggerKind::NightmareCreep, player);
        engine.resolve(state, &tier.effect, player, None, Some(event))
    }
}
