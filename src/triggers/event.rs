//! Game events and trigger kinds.
//!
//! Everything that can cause an effect to fire is a `GameEvent` tagged with
//! a `TriggerKind`. Zone changes are raised as discrete events at the moment
//! a card moves: `ZoneMove::events` lists every event a single move raises,
//! so zone-change effects never depend on polling.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{InstanceId, PlayerId};
use crate::zones::Zone;

/// When an effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    // === Self triggers: fire only for the card the event is about ===
    OnPlay,
    OnLeavePlay,
    OnDiscardThisCard,
    OnExileThisCard,
    OnSacrificeThisCard,
    OnEnterPlayFromDiscard,

    // === Activation: never raised as events ===
    ActivatedAbility,
    TapAbility,

    // === Listener triggers: fire for permanents in play ===
    BeginPlayerTurn,
    EndPlayerTurn,
    WhenOtherCardEntersPlay,
    WhenOtherCardLeavesPlay,
    WhenSpiritCreated,
    WhenMemoryTokenCreated,
    WhenCardDrawn,

    /// Objective-level penalty effects.
    NightmareCreep,
}

impl TriggerKind {
    /// Does this trigger fire only on the event's subject card?
    #[must_use]
    pub const fn is_self_trigger(self) -> bool {
        matches!(
            self,
            Self::OnPlay
                | Self::OnLeavePlay
                | Self::OnDiscardThisCard
                | Self::OnExileThisCard
                | Self::OnSacrificeThisCard
                | Self::OnEnterPlayFromDiscard
        )
    }

    /// Is this an ability the player activates?
    #[must_use]
    pub const fn is_activated(self) -> bool {
        matches!(self, Self::ActivatedAbility | Self::TapAbility)
    }

    /// Does this listener ignore the card the event is about?
    #[must_use]
    pub const fn excludes_subject(self) -> bool {
        matches!(self, Self::WhenOtherCardEntersPlay | Self::WhenOtherCardLeavesPlay)
    }
}

/// Something that happened in the game.
///
/// ```
/// use tuckd_sim::core::{InstanceId, PlayerId};
/// use tuckd_sim::triggers::{GameEvent, TriggerKind};
/// use tuckd_sim::zones::Zone;
///
/// let event = GameEvent::new(TriggerKind::OnDiscardThisCard, PlayerId::SOLO)
///     .with_subject(InstanceId(4))
///     .with_move(Zone::Hand, Zone::Discard);
///
/// assert_eq!(event.subject, Some(InstanceId(4)));
/// assert_eq!(event.to, Some(Zone::Discard));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: TriggerKind,

    /// The player the event belongs to.
    pub player: PlayerId,

    /// The card the event is about, if any.
    pub subject: Option<InstanceId>,

    /// Zone the subject left, for zone changes.
    pub from: Option<Zone>,

    /// Zone the subject entered, for zone changes.
    pub to: Option<Zone>,

    /// Quantity involved (tokens created, cards drawn).
    pub amount: u32,
}

impl GameEvent {
    /// Create an event with no subject.
    #[must_use]
    pub fn new(kind: TriggerKind, player: PlayerId) -> Self {
        Self {
            kind,
            player,
            subject: None,
            from: None,
            to: None,
            amount: 0,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: InstanceId) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_move(mut self, from: Zone, to: Zone) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }
}

/// A completed zone change, returned by `GameState::move_card`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneMove {
    pub card: InstanceId,
    pub owner: PlayerId,
    pub from: Zone,
    pub to: Zone,
}

impl ZoneMove {
    /// The events this move raises, in resolution order.
    ///
    /// - leaving play: `ON_LEAVE_PLAY`, then `ON_SACRIFICE_THIS_CARD` when
    ///   `sacrificed`, then `WHEN_OTHER_CARD_LEAVES_PLAY`
    /// - entering play: `ON_ENTER_PLAY_FROM_DISCARD` when coming from the
    ///   discard pile, then `WHEN_OTHER_CARD_ENTERS_PLAY`
    /// - hand to discard: `ON_DISCARD_THIS_CARD`
    /// - entering exile: `ON_EXILE_THIS_CARD`
    #[must_use]
    pub fn events(&self, sacrificed: bool) -> SmallVec<[GameEvent; 4]> {
        let mut events = SmallVec::new();
        if self.from == self.to {
            return events;
        }

        let event = |kind| {
            GameEvent::new(kind, self.owner)
                .with_subject(self.card)
                .with_move(self.from, self.to)
        };

        if self.from == Zone::InPlay {
            events.push(event(TriggerKind::OnLeavePlay));
            if sacrificed {
                events.push(event(TriggerKind::OnSacrificeThisCard));
            }
            events.push(event(TriggerKind::WhenOtherCardLeavesPlay));
        }
        if self.to == Zone::InPlay {
            if self.from == Zone::Discard {
                events.push(event(TriggerKind::OnEnterPlayFromDiscard));
            }
            events.push(event(TriggerKind::WhenOtherCardEntersPlay));
        }
        if self.from == Zone::Hand && self.to == Zone::Discard {
            events.push(event(TriggerKind::OnDiscardThisCard));
        }
        if self.to == Zone::Exile {
            events.push(event(TriggerKind::OnExileThisCard));
        }
        events
    }
}
