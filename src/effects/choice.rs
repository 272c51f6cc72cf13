//! Decision descriptors for the player-choice handshake.
//!
//! When an effect needs a decision it suspends and hands the caller a
//! [`Decision`]: either a choice among labelled options or a selection of
//! card targets. The caller obtains a [`ChoiceResponse`] from the active
//! agent and passes it back to the engine, which resumes the same action
//! list where it stopped.

use serde::{Deserialize, Serialize};

use crate::core::InstanceId;
use crate::zones::Zone;

/// What kind of option choice is being asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceKind {
    YesNo,
    DiscardOrSacrifice,
    Options,
    Number,
}

/// Machine-readable meaning of an option, so agents need not parse labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionTag {
    Yes,
    No,
    Discard { count: u32 },
    SacrificeSpirit { count: u32 },
    Branch(usize),
    Number(u32),
}

/// One selectable option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub tag: OptionTag,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, tag: OptionTag) -> Self {
        Self {
            label: label.into(),
            tag,
        }
    }
}

/// A choice among options. Only legal options are listed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescriptor {
    pub kind: ChoiceKind,
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceDescriptor {
    /// Index of the first option with `tag`, if offered.
    #[must_use]
    pub fn find(&self, tag: impl Fn(&OptionTag) -> bool) -> Option<usize> {
        self.options.iter().position(|o| tag(&o.tag))
    }
}

/// Why cards are being selected; agents rank candidates differently for
/// losing a card than for fetching one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetPurpose {
    Discard,
    Exile,
    Sacrifice,
    Move,
    Fetch,
    PlayFree,
    Mark,
    FirstMemory,
}

impl TargetPurpose {
    /// Does the selected card leave the player's useful resources?
    #[must_use]
    pub const fn is_loss(self) -> bool {
        matches!(self, Self::Discard | Self::Exile | Self::Sacrifice)
    }
}

/// A request to pick exactly `count` distinct cards from `candidates`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingDescriptor {
    pub purpose: TargetPurpose,
    pub prompt: String,
    pub zone: Zone,
    pub candidates: Vec<InstanceId>,
    pub count: usize,
}

/// A suspended decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Choice(ChoiceDescriptor),
    Targets(TargetingDescriptor),
}

impl Decision {
    /// Is `response` a well-formed answer to this decision?
    #[must_use]
    pub fn accepts(&self, response: &ChoiceResponse) -> bool {
        match (self, response) {
            (Decision::Choice(choice), ChoiceResponse::Option(index)) => {
                *index < choice.options.len()
            }
            (Decision::Targets(targets), ChoiceResponse::Targets(ids)) => {
                ids.len() == targets.count
                    && ids.iter().all(|id| targets.candidates.contains(id))
                    && ids.iter().enumerate().all(|(i, id)| !ids[..i].contains(id))
            }
            _ => false,
        }
    }
}

/// An agent's answer to a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceResponse {
    /// Index into `ChoiceDescriptor::options`.
    Option(usize),
    /// Selected cards.
    Targets(Vec<InstanceId>),
}
