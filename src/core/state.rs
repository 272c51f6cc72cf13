//! Per-game mutable state.
//!
//! ## GameState
//!
//! Everything one game mutates: turn and phase, player resources and
//! zones, card instances, objective progress, the First Memory reference,
//! the terminal status and an append-only event log.
//!
//! Cards only change zones through [`GameState::move_card_to`], which keeps
//! each `CardInstance::zone` in sync with its owner's `ZoneManager`, resets
//! in-play state when a card leaves play and records the move in the log.
//!
//! The event log is an `im::Vector` of typed entries, so snapshot trails can
//! share it and nothing is formatted during bulk simulation.

use std::sync::Arc;

use im::Vector;
use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::config::RulesConfig;
use super::entity::InstanceId;
use super::player::{PlayerId, PlayerMap};
use super::progress::ObjectiveProgress;
use super::resource::Resource;
use super::rng::GameRng;
use crate::cards::{CardId, CardInstance};
use crate::effects::ActionKind;
use crate::error::{Result, SimError};
use crate::objectives::{ObjectiveDefinition, ObjectiveId};
use crate::triggers::ZoneMove;
use crate::zones::{Zone, ZoneManager, ZonePosition};

/// Phase of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    Setup,
    BeginTurn,
    Main,
    EndTurn,
}

/// Terminal outcome of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinStatus {
    PrimaryWin,
    AlternativeWin,
    LossNightfall,
    LossMaxTurns,
    LossObjectiveSpecific,
}

impl WinStatus {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::PrimaryWin | Self::AlternativeWin)
    }
}

/// One player's resources and zones.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub mana: u32,
    pub spirits: u32,
    pub memory: u32,
    /// Hand-size limit enforced at END_TURN.
    pub hand_limit: usize,
    pub zones: ZoneManager,
    /// The once-per-turn free Toy play has been used.
    pub free_toy_played: bool,
    /// Added to every card cost until END_TURN.
    pub cost_tax: u32,
}

impl PlayerState {
    #[must_use]
    pub fn new(hand_limit: usize) -> Self {
        Self {
            mana: 0,
            spirits: 0,
            memory: 0,
            hand_limit,
            zones: ZoneManager::new(),
            free_toy_played: false,
            cost_tax: 0,
        }
    }

    /// Current count of a resource.
    #[must_use]
    pub fn resource(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Mana => self.mana,
            Resource::Spirits => self.spirits,
            Resource::Memory => self.memory,
        }
    }

    fn resource_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Mana => &mut self.mana,
            Resource::Spirits => &mut self.spirits,
            Resource::Memory => &mut self.memory,
        }
    }

    /// Add to a resource.
    pub fn gain(&mut self, resource: Resource, amount: u32) {
        let value = self.resource_mut(resource);
        *value = value.saturating_add(amount);
    }

    /// Remove up to `amount`, never going below zero. Returns the amount
    /// actually removed.
    pub fn spend(&mut self, resource: Resource, amount: u32) -> u32 {
        let value = self.resource_mut(resource);
        let spent = amount.min(*value);
        *value -= spent;
        spent
    }

    /// Apply a signed delta, clamped at zero.
    pub fn adjust(&mut self, resource: Resource, delta: i32) {
        if delta >= 0 {
            self.gain(resource, delta.unsigned_abs());
        } else {
            self.spend(resource, delta.unsigned_abs());
        }
    }
}

/// Nightmare Creep bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightmareState {
    /// Upcoming applications to cancel.
    pub skips_pending: u32,
    /// Turns every tier threshold is pushed back by.
    pub delay: u32,
    /// Last turn a tier was applied or skipped.
    pub applied_turn: Option<u32>,
}

/// A structured log event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    GameStarted { objective: ObjectiveId, seed: u64 },
    FirstMemorySet { card: InstanceId },
    TurnStarted,
    ManaSet { amount: u32 },
    CardMoved { card: InstanceId, from: Zone, to: Zone },
    CardPlayed { card: InstanceId, card_id: CardId, free: bool },
    AbilityActivated { card: InstanceId, effect_index: usize },
    TokensCreated { resource: Resource, count: u32 },
    DiceRolled { sides: u32, roll: u32 },
    ChoiceOffered { options: usize },
    ChoiceSkipped { reason: String },
    ActionRejected { reason: String },
    UnimplementedAction { kind: ActionKind },
    NightmareApplied { tier_turn: u32 },
    NightmareSkipped { tier_turn: u32 },
    DeckOut,
    Passed,
    SafetyTrip { reason: String },
    GameEnded { status: WinStatus },
}

/// A log event stamped with when it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub phase: TurnPhase,
    pub event: LogEvent,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Turn number (starts at 1, strictly increasing).
    pub turn: u32,
    pub phase: TurnPhase,
    pub active_player: PlayerId,
    pub players: PlayerMap<PlayerState>,
    pub objective: Arc<ObjectiveDefinition>,
    pub progress: ObjectiveProgress,
    /// The First Memory, by instance id.
    pub first_memory: Option<InstanceId>,
    pub win_status: Option<WinStatus>,
    /// Kind tag of the win condition that ended the game.
    pub win_kind: Option<String>,
    pub game_over: bool,
    pub log: Vector<LogEntry>,
    pub rng: GameRng,
    pub nightmare: NightmareState,
    /// Turns added to the nightfall turn by extra-turn effects.
    pub nightfall_extension: u32,
    once_per_game: FxHashSet<(CardId, usize)>,
    instances: FxHashMap<InstanceId, CardInstance>,
    next_instance: InstanceId,
}

impl GameState {
    /// Create an empty game for `objective`. Setup fills the zones.
    #[must_use]
    pub fn new(objective: Arc<ObjectiveDefinition>, seed: u64, rules: &RulesConfig) -> Self {
        let hand_limit = objective.hand_size_limit().unwrap_or(rules.max_hand_size);
        let mut state = Self {
            turn: 1,
            phase: TurnPhase::Setup,
            active_player: PlayerId::SOLO,
            players: PlayerMap::new(1, |_| PlayerState::new(hand_limit)),
            objective,
            progress: ObjectiveProgress::default(),
            first_memory: None,
            win_status: None,
            win_kind: None,
            game_over: false,
            log: Vector::new(),
            rng: GameRng::new(seed),
            nightmare: NightmareState::default(),
            nightfall_extension: 0,
            once_per_game: FxHashSet::default(),
            instances: FxHashMap::default(),
            next_instance: InstanceId::new(0),
        };
        let objective_id = state.objective.id;
        state.record(LogEvent::GameStarted {
            objective: objective_id,
            seed,
        });
        state
    }

    /// Seed this game was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Append an event to the log.
    pub fn record(&mut self, event: LogEvent) {
        self.log.push_back(LogEntry {
            turn: self.turn,
            phase: self.phase,
            event,
        });
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    // === Card instances ===

    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&CardInstance> {
        self.instances.get(&id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.instances.get_mut(&id)
    }

    /// Instance lookup that treats a missing id as a rules bug.
    pub fn require_instance(&self, id: InstanceId) -> Result<&CardInstance> {
        self.instances
            .get(&id)
            .ok_or_else(|| SimError::Invariant(format!("{id} does not exist")))
    }

    /// Number of card instances in the game.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Create a new card instance on top of `zone`.
    pub fn create_instance(&mut self, card_id: CardId, owner: PlayerId, zone: Zone) -> Result<InstanceId> {
        let id = self.next_instance;
        self.players[owner].zones.add_to_zone(id, zone, ZonePosition::Top)?;

        let mut instance = CardInstance::new(id, card_id, owner, zone);
        if zone == Zone::InPlay {
            instance.turn_entered_play = Some(self.turn);
        }
        self.instances.insert(id, instance);
        self.next_instance = id.next();
        Ok(id)
    }

    /// Cards in one of a player's zones, bottom first.
    #[must_use]
    pub fn cards_in(&self, player: PlayerId, zone: Zone) -> &[InstanceId] {
        self.players[player].zones.cards(zone)
    }

    #[must_use]
    pub fn zone_size(&self, player: PlayerId, zone: Zone) -> usize {
        self.players[player].zones.zone_size(zone)
    }

    /// Move a card to the top of `to`.
    pub fn move_card(&mut self, id: InstanceId, to: Zone) -> Result<ZoneMove> {
        self.move_card_to(id, to, ZonePosition::Top)
    }

    /// Move a card, keeping the instance and the owner's zones in sync.
    pub fn move_card_to(&mut self, id: InstanceId, to: Zone, position: ZonePosition) -> Result<ZoneMove> {
        let turn = self.turn;
        let instance = self
            .instances
            .get_mut(&id)
            .ok_or_else(|| SimError::Invariant(format!("cannot move missing {id}")))?;
        let owner = instance.owner;
        let zones = &mut self.players[owner].zones;

        let from = zones
            .get_zone(id)
            .ok_or_else(|| SimError::Invariant(format!("{id} is not in any zone")))?;
        if from != instance.zone {
            return Err(SimError::Invariant(format!(
                "{id} recorded in {} but tracked in {from}",
                instance.zone
            )));
        }
        zones.move_to_zone(id, to, position);

        instance.zone = to;
        if from != to {
            if from == Zone::InPlay {
                instance.reset_play_state();
            }
            if to == Zone::InPlay {
                instance.turn_entered_play = Some(turn);
            }
            self.record(LogEvent::CardMoved { card: id, from, to });
        }

        Ok(ZoneMove {
            card: id,
            owner,
            from,
            to,
        })
    }

    // === Usage tracking ===

    #[must_use]
    pub fn used_once_per_game(&self, card: CardId, effect_index: usize) -> bool {
        self.once_per_game.contains(&(card, effect_index))
    }

    pub fn mark_once_per_game(&mut self, card: CardId, effect_index: usize) {
        self.once_per_game.insert((card, effect_index));
    }

    /// Clear per-turn state at BEGIN_TURN: progress counters, free play,
    /// cost tax, tapped permanents and once-per-turn marks.
    pub fn begin_turn_reset(&mut self, player: PlayerId) {
        self.progress.reset_turn();
        let state = &mut self.players[player];
        state.free_toy_played = false;
        state.cost_tax = 0;

        for id in self.players[player].zones.cards(Zone::InPlay) {
            if let Some(card) = self.instances.get_mut(id) {
                card.tapped = false;
                card.used_this_turn.clear();
            }
        }
    }

    // === Terminal status ===

    /// Effective nightfall turn, including extra-turn extensions.
    #[must_use]
    pub fn nightfall_turn(&self) -> Option<u32> {
        self.objective
            .nightfall_turn
            .map(|turn| turn.saturating_add(self.nightfall_extension))
    }

    /// End the game. The first terminal status wins; later calls return
    /// `false` and change nothing.
    pub fn end_game(&mut self, status: WinStatus, kind: Option<&str>) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.win_status = Some(status);
        self.win_kind = kind.map(str::to_string);
        self.record(LogEvent::GameEnded { status });
        info!(
            "game over on turn {}: {:?} ({})",
            self.turn,
            status,
            kind.unwrap_or("-")
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_state;

    #[test]
    fn test_new_state() {
        let state = sample_state();
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, TurnPhase::Setup);
        assert!(!state.game_over);
        assert_eq!(state.player(PlayerId::SOLO).hand_limit, 7);
        assert!(matches!(
            state.log.front().map(|e| &e.event),
            Some(LogEvent::GameStarted { .. })
        ));
    }

    #[test]
    fn test_move_card_keeps_zones_in_sync() {
        let mut state = sample_state();
        let id = state.create_instance(CardId(1), PlayerId::SOLO, Zone::Hand).unwrap();

        let moved = state.move_card(id, Zone::Discard).unwrap();
        assert_eq!((moved.from, moved.to), (Zone::Hand, Zone::Discard));
        assert_eq!(state.instance(id).unwrap().zone, Zone::Discard);
        assert_eq!(state.cards_in(PlayerId::SOLO, Zone::Discard), &[id]);
        assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Hand), 0);
    }

    #[test]
    fn test_leaving_play_resets_instance() {
        let mut state = sample_state();
        state.turn = 2;
        let id = state.create_instance(CardId(1), PlayerId::SOLO, Zone::InPlay).unwrap();
        {
            let card = state.instance_mut(id).unwrap();
            assert_eq!(card.turn_entered_play, Some(2));
            card.tapped = true;
            card.add_counters("wind", 2);
        }

        state.move_card(id, Zone::Hand).unwrap();
        let card = state.instance(id).unwrap();
        assert!(!card.tapped);
        assert!(card.counters.is_empty());
        assert_eq!(card.turn_entered_play, None);
    }

    #[test]
    fn test_move_missing_card_is_invariant_error() {
        let mut state = sample_state();
        assert!(matches!(
            state.move_card(InstanceId(999), Zone::Hand),
            Err(SimError::Invariant(_))
        ));
    }

    #[test]
    fn test_mismatched_move_leaves_zones_untouched() {
        let mut state = sample_state();
        let id = state.create_instance(CardId(1), PlayerId::SOLO, Zone::Deck).unwrap();
        state.instance_mut(id).unwrap().zone = Zone::Hand;

        assert!(matches!(state.move_card(id, Zone::Discard), Err(SimError::Invariant(_))));
        assert_eq!(state.cards_in(PlayerId::SOLO, Zone::Deck), &[id]);
        assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Discard), 0);
    }

    #[test]
    fn test_resources_never_negative() {
        let mut player = PlayerState::new(7);
        player.gain(Resource::Spirits, 2);
        assert_eq!(player.spend(Resource::Spirits, 5), 2);
        assert_eq!(player.spirits, 0);

        player.adjust(Resource::Memory, -3);
        assert_eq!(player.memory, 0);
        player.adjust(Resource::Memory, 4);
        assert_eq!(player.resource(Resource::Memory), 4);
    }

    #[test]
    fn test_end_game_only_once() {
        let mut state = sample_state();
        assert!(state.end_game(WinStatus::PrimaryWin, Some("CREATE_SPIRITS_TOTAL")));
        assert!(!state.end_game(WinStatus::LossNightfall, None));

        assert_eq!(state.win_status, Some(WinStatus::PrimaryWin));
        assert_eq!(state.win_kind.as_deref(), Some("CREATE_SPIRITS_TOTAL"));
    }

    #[test]
    fn test_begin_turn_reset() {
        let mut state = sample_state();
        let id = state.create_instance(CardId(1), PlayerId::SOLO, Zone::InPlay).unwrap();
        state.instance_mut(id).unwrap().tapped = true;
        state.instance_mut(id).unwrap().used_this_turn.push(0);
        state.player_mut(PlayerId::SOLO).free_toy_played = true;
        state.player_mut(PlayerId::SOLO).cost_tax = 2;
        state.progress.loop_count_this_turn = 3;

        state.begin_turn_reset(PlayerId::SOLO);

        let card = state.instance(id).unwrap();
        assert!(!card.tapped);
        assert!(!card.used(0));
        assert!(!state.player(PlayerId::SOLO).free_toy_played);
        assert_eq!(state.player(PlayerId::SOLO).cost_tax, 0);
        assert_eq!(state.progress.loop_count_this_turn, 0);
    }

    #[test]
    fn test_nightfall_extension() {
        let mut state = sample_state();
        assert_eq!(state.nightfall_turn(), Some(4));
        state.nightfall_extension = 2;
        assert_eq!(state.nightfall_turn(), Some(6));
    }
}
