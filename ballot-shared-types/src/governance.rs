//! Voter, proposal and event records of a single ballot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Phase, Principal};

/// Permanent identifier of a proposal: its 0-based submission index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub u64);

impl ProposalId {
    /// Position in the proposal list; `None` when the id cannot address
    /// memory on this target.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<usize> for ProposalId {
    fn from(index: usize) -> Self {
        ProposalId(index as u64)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registration and vote record of a principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub is_registered: bool,
    pub has_voted: bool,
    /// Only meaningful once `has_voted` is set; zero before that.
    pub voted_proposal_id: ProposalId,
}

impl Voter {
    /// A freshly registered voter who has not voted yet.
    pub fn registered() -> Self {
        Voter {
            is_registered: true,
            has_voted: false,
            voted_proposal_id: ProposalId::default(),
        }
    }
}

/// A submitted proposal and its running vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(description: impl Into<String>) -> Self {
        Proposal {
            description: description.into(),
            vote_count: 0,
        }
    }
}

/// Notifications emitted after a state change has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotEvent {
    WorkflowStatusChanged { previous: Phase, new: Phase },
    VoterRegistered { voter: Principal },
    ProposalRegistered { proposal_id: ProposalId },
    Voted { voter: Principal, proposal_id: ProposalId },
}

impl BallotEvent {
    /// Short event name, as observers see it.
    pub fn name(&self) -> &'static str {
        match self {
            BallotEvent::WorkflowStatusChanged { .. } => "WorkflowStatusChange",
            BallotEvent::VoterRegistered { .. } => "VoterRegistered",
            BallotEvent::ProposalRegistered { .. } => "ProposalRegistered",
            BallotEvent::Voted { .. } => "Voted",
        }
    }
}

impl fmt::Display for BallotEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallotEvent::WorkflowStatusChanged { previous, new } => {
                write!(f, "{}({} -> {})", self.name(), previous.code(), new.code())
            }
            BallotEvent::VoterRegistered { voter } => write!(f, "{}({})", self.name(), voter),
            BallotEvent::ProposalRegistered { proposal_id } => {
                write!(f, "{}({})", self.name(), proposal_id.0)
            }
            BallotEvent::Voted { voter, proposal_id } => {
                write!(f, "{}({}, {})", self.name(), voter, proposal_id.0)
            }
        }
    }
}
