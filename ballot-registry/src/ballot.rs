//! Serialized-access facade over one ballot.
//!
//! A `Ballot` owns its state behind a single mutex. Every operation takes
//! the lock once, runs its guards and mutation under it, and hands the
//! resulting event to the sink before releasing it, so observers see events
//! in commit order and no operation can act on a stale phase.

use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ballot_shared_types::{BallotEvent, BallotSnapshot, Phase, Principal, Proposal, ProposalId, Voter};

use crate::audit_log;
use crate::config::BallotConfig;
use crate::error::{BallotError, BallotResult};
use crate::events::EventSink;
use crate::guards::AdministratorCheck;
use crate::state::BallotState;
use crate::workflow::Transition;

fn rejected(operation: &str, caller: &Principal, error: BallotError) -> BallotError {
    audit_log::log_operation_rejected(operation, caller, &error.to_string());
    error
}

/// Point-in-time overview of a ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotSummary {
    pub phase: Phase,
    pub voter_count: usize,
    pub proposal_count: usize,
    pub total_votes: u64,
    pub winning_proposal_id: Option<ProposalId>,
}

pub struct Ballot<A, S> {
    state: Mutex<BallotState>,
    administrator: A,
    sink: S,
}

impl<A: AdministratorCheck, S: EventSink> Ballot<A, S> {
    /// A fresh ballot in `NotStarted` with the default configuration.
    pub fn new(administrator: A, sink: S) -> Self {
        Self::with_config(BallotConfig::default(), administrator, sink)
    }

    pub fn with_config(config: BallotConfig, administrator: A, sink: S) -> Self {
        Self {
            state: Mutex::new(BallotState::new(config)),
            administrator,
            sink,
        }
    }

    /// Resumes a ballot from a validated snapshot.
    pub fn restore(
        snapshot: BallotSnapshot,
        config: BallotConfig,
        administrator: A,
        sink: S,
    ) -> BallotResult<Self> {
        let state = BallotState::from_snapshot(snapshot, config)?;
        Ok(Self {
            state: Mutex::new(state),
            administrator,
            sink,
        })
    }

    /// Resumes a ballot from the bincode encoding produced by
    /// [`Ballot::snapshot_bytes`].
    pub fn restore_bytes(
        bytes: &[u8],
        config: BallotConfig,
        administrator: A,
        sink: S,
    ) -> BallotResult<Self> {
        let snapshot = BallotSnapshot::from_bytes(bytes)?;
        Self::restore(snapshot, config, administrator, sink)
    }

    // Mutations commit only after every check has passed, so a poisoned
    // lock still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, BallotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: &BallotEvent) {
        if let Err(e) = self.sink.emit(event) {
            warn!("Failed to deliver {} event: {}", event.name(), e);
        }
    }

    fn transition(&self, caller: &Principal, transition: Transition) -> BallotResult<()> {
        let mut state = self.lock();
        let event = state
            .transition(&self.administrator, caller, transition)
            .map_err(|e| rejected(&transition.to_string(), caller, e))?;
        self.dispatch(&event);
        Ok(())
    }

    pub fn start_proposals_registration(&self, caller: &Principal) -> BallotResult<()> {
        self.transition(caller, Transition::StartProposalsRegistration)
    }

    pub fn end_proposals_registration(&self, caller: &Principal) -> BallotResult<()> {
        self.transition(caller, Transition::EndProposalsRegistration)
    }

    pub fn start_voting_session(&self, caller: &Principal) -> BallotResult<()> {
        self.transition(caller, Transition::StartVotingSession)
    }

    pub fn end_voting_session(&self, caller: &Principal) -> BallotResult<()> {
        self.transition(caller, Transition::EndVotingSession)
    }

    /// Computes the winner and moves the ballot to `TallyDone`.
    pub fn tally(&self, caller: &Principal) -> BallotResult<ProposalId> {
        let mut state = self.lock();
        let event = state
            .transition(&self.administrator, caller, Transition::Tally)
            .map_err(|e| rejected("tally votes", caller, e))?;
        self.dispatch(&event);
        Ok(state.winning_proposal_id().unwrap_or_default())
    }

    pub fn register_voter(&self, caller: &Principal, principal: Principal) -> BallotResult<()> {
        let mut state = self.lock();
        let event = state
            .register_voter(&self.administrator, caller, principal)
            .map_err(|e| rejected("register voter", caller, e))?;
        self.dispatch(&event);
        Ok(())
    }

    pub fn get_voter(&self, caller: &Principal, principal: &Principal) -> BallotResult<Voter> {
        self.lock().get_voter(caller, principal)
    }

    pub fn submit_proposal(&self, caller: &Principal, description: &str) -> BallotResult<ProposalId> {
        let mut state = self.lock();
        let (proposal_id, event) = state
            .submit_proposal(caller, description)
            .map_err(|e| rejected("submit proposal", caller, e))?;
        self.dispatch(&event);
        Ok(proposal_id)
    }

    pub fn get_proposal(&self, caller: &Principal, id: ProposalId) -> BallotResult<Proposal> {
        self.lock().get_proposal(caller, id)
    }

    pub fn cast_vote(&self, caller: &Principal, id: ProposalId) -> BallotResult<()> {
        let mut state = self.lock();
        let event = state
            .cast_vote(caller, id)
            .map_err(|e| rejected("cast vote", caller, e))?;
        self.dispatch(&event);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    /// `None` until the tally transition has run.
    pub fn winning_proposal_id(&self) -> Option<ProposalId> {
        self.lock().winning_proposal_id()
    }

    pub fn snapshot(&self) -> BallotSnapshot {
        self.lock().snapshot()
    }

    pub fn snapshot_bytes(&self) -> BallotResult<Vec<u8>> {
        Ok(self.snapshot().to_bytes()?)
    }

    pub fn summary(&self) -> BallotSummary {
        let state = self.lock();
        let registry = state.registry();
        BallotSummary {
            phase: state.phase(),
            voter_count: registry.voter_count(),
            proposal_count: registry.proposal_count(),
            total_votes: registry.proposals().iter().map(|p| p.vote_count).sum(),
            winning_proposal_id: state.winning_proposal_id(),
        }
    }

    pub fn config(&self) -> BallotConfig {
        self.lock().config().clone()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
