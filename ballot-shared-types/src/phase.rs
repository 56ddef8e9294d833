//! The six-stage ballot workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Current stage of the ballot. Stages only ever advance one step at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Voters are being registered.
    #[default]
    NotStarted,
    ProposalsOpen,
    ProposalsClosed,
    VotingOpen,
    VotingClosed,
    /// Terminal: the winner has been computed and frozen.
    TallyDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown phase code {0}")]
pub struct UnknownPhase(pub u8);

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::NotStarted,
        Phase::ProposalsOpen,
        Phase::ProposalsClosed,
        Phase::VotingOpen,
        Phase::VotingClosed,
        Phase::TallyDone,
    ];

    /// Stable numeric status code (0 for `NotStarted` through 5 for `TallyDone`).
    pub fn code(self) -> u8 {
        match self {
            Phase::NotStarted => 0,
            Phase::ProposalsOpen => 1,
            Phase::ProposalsClosed => 2,
            Phase::VotingOpen => 3,
            Phase::VotingClosed => 4,
            Phase::TallyDone => 5,
        }
    }

    /// The only phase reachable from `self`, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::NotStarted => Some(Phase::ProposalsOpen),
            Phase::ProposalsOpen => Some(Phase::ProposalsClosed),
            Phase::ProposalsClosed => Some(Phase::VotingOpen),
            Phase::VotingOpen => Some(Phase::VotingClosed),
            Phase::VotingClosed => Some(Phase::TallyDone),
            Phase::TallyDone => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl TryFrom<u8> for Phase {
    type Error = UnknownPhase;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.code() == code)
            .ok_or(UnknownPhase(code))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "registering voters",
            Phase::ProposalsOpen => "proposals registration started",
            Phase::ProposalsClosed => "proposals registration ended",
            Phase::VotingOpen => "voting session started",
            Phase::VotingClosed => "voting session ended",
            Phase::TallyDone => "votes tallied",
        };
        f.write_str(name)
    }
}
