//! Error taxonomy of the ballot registry.

use std::fmt;
use thiserror::Error;

use ballot_shared_types::{Phase, Principal, ProposalId};

use crate::workflow::Transition;

/// Role a caller must hold for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Voter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => f.write_str("caller is not the owner"),
            Role::Voter => f.write_str("You're not a voter"),
        }
    }
}

/// Participant-facing operations that are gated on the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterVoter,
    SubmitProposal,
    CastVote,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::RegisterVoter => f.write_str("voter registration"),
            Operation::SubmitProposal => f.write_str("proposal submission"),
            Operation::CastVote => f.write_str("voting"),
        }
    }
}

/// Every way a ballot operation can be rejected. A rejected operation
/// commits nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("Unauthorized: {0}")]
    Unauthorized(Role),
    #[error("Illegal transition: cannot {requested} while {current}")]
    IllegalTransition { current: Phase, requested: Transition },
    #[error("{operation} is not allowed while {current} (requires: {required})")]
    PhaseMismatch {
        operation: Operation,
        current: Phase,
        required: Phase,
    },
    #[error("Voter {0} is already registered")]
    AlreadyRegistered(Principal),
    #[error("Voter {0} has already voted")]
    AlreadyVoted(Principal),
    #[error("Proposal description must not be empty")]
    EmptyProposal,
    #[error("Proposal description is {len} characters, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },
    #[error("Proposal {0} not found")]
    ProposalNotFound(ProposalId),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BallotError {
    /// True for errors caused by the current phase rather than the caller
    /// or the arguments.
    pub fn is_phase_error(&self) -> bool {
        matches!(
            self,
            BallotError::IllegalTransition { .. } | BallotError::PhaseMismatch { .. }
        )
    }

    /// True for the `NotFound` family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BallotError::ProposalNotFound(_))
    }
}

impl From<Box<bincode::ErrorKind>> for BallotError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        BallotError::Serialization(err.to_string())
    }
}

pub type BallotResult<T> = Result<T, BallotError>;
