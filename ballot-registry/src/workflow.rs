//! Workflow controller: owns the current phase and validates transitions.
//!
//! The phase is a single linear enumeration, so every transition is a
//! precondition check on the current value followed by a one-step advance.
//! Authorization is checked by the caller before a transition is applied.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use ballot_shared_types::{BallotEvent, Phase};

use crate::error::{BallotError, BallotResult};

/// The five administrator-issued phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    StartProposalsRegistration,
    EndProposalsRegistration,
    StartVotingSession,
    EndVotingSession,
    Tally,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::StartProposalsRegistration,
        Transition::EndProposalsRegistration,
        Transition::StartVotingSession,
        Transition::EndVotingSession,
        Transition::Tally,
    ];

    /// Phase the ballot must be in for this transition.
    pub fn from(self) -> Phase {
        match self {
            Transition::StartProposalsRegistration => Phase::NotStarted,
            Transition::EndProposalsRegistration => Phase::ProposalsOpen,
            Transition::StartVotingSession => Phase::ProposalsClosed,
            Transition::EndVotingSession => Phase::VotingOpen,
            Transition::Tally => Phase::VotingClosed,
        }
    }

    /// Phase the ballot is in after this transition.
    pub fn to(self) -> Phase {
        match self {
            Transition::StartProposalsRegistration => Phase::ProposalsOpen,
            Transition::EndProposalsRegistration => Phase::ProposalsClosed,
            Transition::StartVotingSession => Phase::VotingOpen,
            Transition::EndVotingSession => Phase::VotingClosed,
            Transition::Tally => Phase::TallyDone,
        }
    }

    /// The transition leaving `phase`, if there is one.
    pub fn leaving(phase: Phase) -> Option<Transition> {
        Transition::ALL.into_iter().find(|t| t.from() == phase)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Transition::StartProposalsRegistration => "start proposals registration",
            Transition::EndProposalsRegistration => "end proposals registration",
            Transition::StartVotingSession => "start voting session",
            Transition::EndVotingSession => "end voting session",
            Transition::Tally => "tally votes",
        };
        f.write_str(label)
    }
}

/// A committed phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub previous: Phase,
    pub new: Phase,
}

impl From<PhaseChange> for BallotEvent {
    fn from(change: PhaseChange) -> Self {
        BallotEvent::WorkflowStatusChanged {
            previous: change.previous,
            new: change.new,
        }
    }
}

/// Holds the ballot's phase. There is no state beyond the phase value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowController {
    phase: Phase,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a controller at a previously persisted phase.
    pub fn at(phase: Phase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fails with `IllegalTransition` unless `transition` leaves the current phase.
    pub fn check(&self, transition: Transition) -> BallotResult<()> {
        if self.phase != transition.from() {
            return Err(BallotError::IllegalTransition {
                current: self.phase,
                requested: transition,
            });
        }
        Ok(())
    }

    /// Validates and applies `transition`.
    pub fn apply(&mut self, transition: Transition) -> BallotResult<PhaseChange> {
        self.check(transition)?;
        let change = PhaseChange {
            previous: self.phase,
            new: transition.to(),
        };
        self.phase = change.new;
        info!("Workflow status changed: {} -> {}", change.previous, change.new);
        Ok(change)
    }
}
