//! Round events and the append-only event log

use serde::{Deserialize, Serialize};

use crate::core::types::{ClassTier, MemberId, Round};
use crate::society::policy::PolicyLever;

/// A logged event, stamped with the round it occurred
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub round: Round,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// The elite circle moved a policy lever
    PolicyChange {
        lever: PolicyLever,
        old_value: f64,
        new_value: f64,
    },

    /// Cooperative event: succeeds when collective care skill clears the
    /// equality-scaled threshold
    SocialEvent {
        success: bool,
        total_care_skill: f64,
        threshold: f64,
    },

    /// Competitive event: members succeed independently
    EconomicEvent {
        winner_count: usize,
        participant_count: usize,
    },

    /// Aggregate record of all tier transitions in one mobility pass
    ClassMobility { transitions: Vec<ClassTransition> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTransition {
    pub member: MemberId,
    pub from: ClassTier,
    pub to: ClassTier,
    pub wealth: f64,
}

/// The complete event log for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round: Round, kind: EventKind) {
        self.events.push(SimEvent { round, kind });
    }

    pub fn events_for_round(&self, round: Round) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
