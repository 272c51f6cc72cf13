//! Game setup: deck construction, starting cards, the First Memory and the
//! opening hand.

use std::sync::Arc;

use log::{info, warn};

use crate::agents::Agent;
use crate::cards::{CardCategory, CardId};
use crate::core::{GameState, InstanceId, LogEvent, PlayerId, RulesConfig};
use crate::effects::{ChoiceResponse, Decision, TargetPurpose, TargetingDescriptor};
use crate::error::Result;
use crate::objectives::{FirstMemorySetup, ObjectiveId};
use crate::tables::DefinitionTables;
use crate::zones::Zone;

use super::WinLossChecker;

/// Builds the starting state of a game.
pub struct GameSetup;

impl GameSetup {
    /// Set up a game of `objective` seeded with `seed`. The agent only picks
    /// the First Memory when the objective lets the player choose it.
    pub fn prepare(
        tables: &DefinitionTables,
        objective: ObjectiveId,
        seed: u64,
        rules: &RulesConfig,
        agent: &mut dyn Agent,
    ) -> Result<GameState> {
        let objective = Arc::clone(tables.objectives.require(objective)?);
        let mut state = GameState::new(Arc::clone(&objective), seed, rules);
        let player = state.active_player;

        let mut deck = Self::deck_list(tables, &objective.banned_cards);
        state.rng.for_context("shuffle").shuffle(&mut deck);
        for card in deck {
            state.create_instance(card, player, Zone::Deck)?;
        }

        for card in &objective.setup.start_in_hand {
            Self::place(&mut state, player, *card, Zone::Hand)?;
        }
        for card in &objective.setup.start_in_play {
            Self::place(&mut state, player, *card, Zone::InPlay)?;
        }

        let first_memory = match &objective.setup.first_memory {
            FirstMemorySetup::None => None,
            FirstMemorySetup::Designated { card, zone } => {
                let existing = [Zone::Hand, Zone::InPlay]
                    .into_iter()
                    .flat_map(|z| state.cards_in(player, z).iter().copied())
                    .find(|id| state.instance(*id).is_some_and(|c| c.card_id == *card));
                match existing {
                    Some(id) => Some(id),
                    None => Some(Self::place(&mut state, player, *card, *zone)?),
                }
            }
            FirstMemorySetup::FromTopOfDeck { look_at } => {
                Self::pick_first_memory(tables, &mut state, player, *look_at, agent)?
            }
        };
        if let Some(card) = first_memory {
            state.first_memory = Some(card);
            state.record(LogEvent::FirstMemorySet { card });
        }

        let hand_size = objective.setup.initial_hand_size.unwrap_or(rules.initial_hand_size);
        while state.zone_size(player, Zone::Hand) < hand_size {
            let Some(top) = state.player(player).zones.top_card(Zone::Deck) else {
                break;
            };
            state.move_card(top, Zone::Hand)?;
        }

        WinLossChecker::check_wins(&mut state, &tables.cards);
        info!(
            "game {seed} set up for '{}': {} cards in deck, {} in hand",
            objective.title,
            state.zone_size(player, Zone::Deck),
            state.zone_size(player, Zone::Hand)
        );
        Ok(state)
    }

    /// Every card times its quantity, by card id, minus banned cards.
    #[must_use]
    pub fn deck_list(tables: &DefinitionTables, banned: &[CardId]) -> Vec<CardId> {
        tables
            .cards
            .iter()
            .filter(|card| !banned.contains(&card.id))
            .flat_map(|card| std::iter::repeat(card.id).take(card.quantity as usize))
            .collect()
    }

    /// Move a copy of `card` from the deck to `zone`, or create one when the
    /// deck holds none.
    fn place(state: &mut GameState, player: PlayerId, card: CardId, zone: Zone) -> Result<InstanceId> {
        let from_deck = state
            .cards_in(player, Zone::Deck)
            .iter()
            .rev()
            .copied()
            .find(|id| state.instance(*id).is_some_and(|c| c.card_id == card));
        match from_deck {
            Some(id) => {
                state.move_card(id, zone)?;
                Ok(id)
            }
            None => state.create_instance(card, player, zone),
        }
    }

    fn pick_first_memory(
        tables: &DefinitionTables,
        state: &mut GameState,
        player: PlayerId,
        look_at: usize,
        agent: &mut dyn Agent,
    ) -> Result<Option<InstanceId>> {
        let is_toy = |state: &GameState, id: InstanceId| {
            state
                .instance(id)
                .and_then(|c| tables.cards.category(c.card_id))
                == Some(CardCategory::Toy)
        };

        let toys: Vec<_> = state
            .player(player)
            .zones
            .top_cards(Zone::Deck, look_at)
            .into_iter()
            .filter(|id| is_toy(state, *id))
            .collect();

        let chosen = match toys.as_slice() {
            [] => state
                .cards_in(player, Zone::Deck)
                .iter()
                .rev()
                .copied()
                .find(|id| is_toy(state, *id)),
            [only] => Some(*only),
            _ => {
                let request = TargetingDescriptor {
                    purpose: TargetPurpose::FirstMemory,
                    prompt: "Choose your First Memory".into(),
                    zone: Zone::Deck,
                    candidates: toys.clone(),
                    count: 1,
                };
                let picked = agent.choose_targets(state, &request);
                let response = ChoiceResponse::Targets(picked.clone());
                if Decision::Targets(request).accepts(&response) {
                    picked.first().copied()
                } else {
                    warn!("{} picked {picked:?} as First Memory; using the top Toy", agent.name());
                    toys.first().copied()
                }
            }
        };

        if let Some(card) = chosen {
            state.move_card(card, Zone::Hand)?;
        }
        Ok(chosen)
    }
}
