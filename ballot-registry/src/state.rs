//! The single owned state of a ballot and its guarded operations.
//!
//! `BallotState` combines the workflow controller with the registry. Each
//! operation runs its guards in a fixed order (role, then phase, then
//! arguments) and returns the event describing what it committed.

use log::debug;

use ballot_shared_types::{BallotEvent, BallotSnapshot, Phase, Principal, Proposal, ProposalId, Voter};

use crate::config::BallotConfig;
use crate::error::{BallotError, BallotResult, Operation};
use crate::guards::{require_administrator, require_phase, require_registered_voter, AdministratorCheck};
use crate::registry::{tally_votes, BallotRegistry};
use crate::workflow::{Transition, WorkflowController};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BallotState {
    workflow: WorkflowController,
    registry: BallotRegistry,
    config: BallotConfig,
}

impl BallotState {
    pub fn new(config: BallotConfig) -> Self {
        Self {
            workflow: WorkflowController::new(),
            registry: BallotRegistry::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    pub fn registry(&self) -> &BallotRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BallotConfig {
        &self.config
    }

    /// Administrator-only phase change. The tally transition computes the
    /// winner before the phase moves to `TallyDone`.
    pub fn transition<A: AdministratorCheck + ?Sized>(
        &mut self,
        check: &A,
        caller: &Principal,
        transition: Transition,
    ) -> BallotResult<BallotEvent> {
        require_administrator(check, caller)?;
        self.workflow.check(transition)?;
        if transition == Transition::Tally {
            self.registry.tally();
        }
        let change = self.workflow.apply(transition)?;
        Ok(change.into())
    }

    pub fn register_voter<A: AdministratorCheck + ?Sized>(
        &mut self,
        check: &A,
        caller: &Principal,
        principal: Principal,
    ) -> BallotResult<BallotEvent> {
        require_administrator(check, caller)?;
        if self.config.restrict_registration_to_setup {
            require_phase(Operation::RegisterVoter, self.phase(), Phase::NotStarted)?;
        }
        self.registry.register_voter(principal)?;
        Ok(BallotEvent::VoterRegistered { voter: principal })
    }

    /// Any registered voter may read any principal's record.
    pub fn get_voter(&self, caller: &Principal, principal: &Principal) -> BallotResult<Voter> {
        require_registered_voter(&self.registry.voters, caller)?;
        Ok(self.registry.voter(principal))
    }

    pub fn submit_proposal(
        &mut self,
        caller: &Principal,
        description: &str,
    ) -> BallotResult<(ProposalId, BallotEvent)> {
        require_registered_voter(&self.registry.voters, caller)?;
        require_phase(Operation::SubmitProposal, self.phase(), Phase::ProposalsOpen)?;
        let proposal_id = self
            .registry
            .submit_proposal(description, self.config.max_description_len)?;
        Ok((proposal_id, BallotEvent::ProposalRegistered { proposal_id }))
    }

    pub fn get_proposal(&self, caller: &Principal, id: ProposalId) -> BallotResult<Proposal> {
        require_registered_voter(&self.registry.voters, caller)?;
        self.registry.proposal(id).cloned()
    }

    pub fn cast_vote(&mut self, caller: &Principal, id: ProposalId) -> BallotResult<BallotEvent> {
        require_registered_voter(&self.registry.voters, caller)?;
        require_phase(Operation::CastVote, self.phase(), Phase::VotingOpen)?;
        self.registry.cast_vote(*caller, id)?;
        Ok(BallotEvent::Voted {
            voter: *caller,
            proposal_id: id,
        })
    }

    /// Winner, once the tally has run.
    pub fn winning_proposal_id(&self) -> Option<ProposalId> {
        self.registry.winning_proposal_id()
    }

    pub fn snapshot(&self) -> BallotSnapshot {
        BallotSnapshot {
            phase: self.phase(),
            voters: self
                .registry
                .voters
                .iter()
                .map(|(principal, voter)| (*principal, *voter))
                .collect(),
            proposals: self.registry.proposals.clone(),
            winning_proposal_id: self.registry.winning_proposal_id,
        }
    }

    /// Rebuilds a state from a snapshot, rejecting any snapshot that could
    /// not have been produced by a legal sequence of operations.
    pub fn from_snapshot(snapshot: BallotSnapshot, config: BallotConfig) -> BallotResult<Self> {
        validate_snapshot(&snapshot)?;
        debug!(
            "Restored ballot at phase {} with {} voters and {} proposals",
            snapshot.phase,
            snapshot.voters.len(),
            snapshot.proposals.len()
        );
        Ok(Self {
            workflow: WorkflowController::at(snapshot.phase),
            registry: BallotRegistry {
                voters: snapshot.voters.into_iter().collect(),
                proposals: snapshot.proposals,
                winning_proposal_id: snapshot.winning_proposal_id,
            },
            config,
        })
    }
}

fn invalid(reason: impl Into<String>) -> BallotError {
    BallotError::InvalidSnapshot(reason.into())
}

fn validate_snapshot(snapshot: &BallotSnapshot) -> BallotResult<()> {
    let phase = snapshot.phase;
    let proposal_count = snapshot.proposals.len();

    if phase < Phase::ProposalsOpen && proposal_count > 0 {
        return Err(invalid(format!("{} proposals present while {}", proposal_count, phase)));
    }
    if let Some(index) = snapshot
        .proposals
        .iter()
        .position(|p| p.description.trim().is_empty())
    {
        return Err(invalid(format!("proposal {} has an empty description", index)));
    }

    let mut tallied = vec![0u64; proposal_count];
    for (principal, voter) in &snapshot.voters {
        if !voter.is_registered {
            return Err(invalid(format!("voter {} is stored but not registered", principal)));
        }
        if !voter.has_voted {
            if voter.voted_proposal_id != ProposalId::default() {
                return Err(invalid(format!("voter {} has a vote target but has not voted", principal)));
            }
            continue;
        }
        if phase < Phase::VotingOpen {
            return Err(invalid(format!("voter {} voted while {}", principal, phase)));
        }
        let slot = tallied
            .get_mut(voter.voted_proposal_id.index().unwrap_or(usize::MAX))
            .ok_or_else(|| invalid(format!("voter {} voted for unknown proposal {}", principal, voter.voted_proposal_id)))?;
        *slot += 1;
    }
    for (index, (proposal, expected)) in snapshot.proposals.iter().zip(&tallied).enumerate() {
        if proposal.vote_count != *expected {
            return Err(invalid(format!(
                "proposal {} counts {} votes but {} voters chose it",
                index, proposal.vote_count, expected
            )));
        }
    }

    match (phase, snapshot.winning_proposal_id) {
        (Phase::TallyDone, Some(winner)) => {
            let expected = tally_votes(&snapshot.proposals);
            if winner != expected {
                return Err(invalid(format!("winner {} does not match tally {}", winner, expected)));
            }
        }
        (Phase::TallyDone, None) => return Err(invalid("tally done without a winner")),
        (_, Some(_)) => return Err(invalid(format!("winner recorded while {}", phase))),
        (_, None) => {}
    }
    Ok(())
}
