//! Ballot registry: voters, proposals and the vote record.
//!
//! Methods here assume the caller has already passed the role and phase
//! guards; they validate only their own arguments, and each one either
//! applies all of its mutations or none.

use log::{debug, info};
use std::collections::HashMap;

use ballot_shared_types::{Principal, Proposal, ProposalId, Voter};

use crate::error::{BallotError, BallotResult, Role};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BallotRegistry {
    pub(crate) voters: HashMap<Principal, Voter>,
    pub(crate) proposals: Vec<Proposal>,
    pub(crate) winning_proposal_id: Option<ProposalId>,
}

impl BallotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_voter(&mut self, principal: Principal) -> BallotResult<()> {
        if self.voters.get(&principal).is_some_and(|v| v.is_registered) {
            return Err(BallotError::AlreadyRegistered(principal));
        }
        self.voters.insert(principal, Voter::registered());
        debug!("Registered voter {}", principal);
        Ok(())
    }

    /// Record of `principal`; an unknown principal reads as unregistered.
    pub fn voter(&self, principal: &Principal) -> Voter {
        self.voters.get(principal).copied().unwrap_or_default()
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.voter(principal).is_registered
    }

    /// Appends a proposal and returns its id, which is its index.
    pub fn submit_proposal(
        &mut self,
        description: &str,
        max_len: Option<usize>,
    ) -> BallotResult<ProposalId> {
        if description.trim().is_empty() {
            return Err(BallotError::EmptyProposal);
        }
        if let Some(max) = max_len {
            let len = description.chars().count();
            if len > max {
                return Err(BallotError::DescriptionTooLong { len, max });
            }
        }
        let id = ProposalId::from(self.proposals.len());
        self.proposals.push(Proposal::new(description));
        debug!("Registered proposal {}", id);
        Ok(id)
    }

    pub fn proposal(&self, id: ProposalId) -> BallotResult<&Proposal> {
        self.proposals
            .get(id.index().unwrap_or(usize::MAX))
            .ok_or(BallotError::ProposalNotFound(id))
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.values().filter(|v| v.is_registered).count()
    }

    /// Records `voter`'s single vote for `id`.
    pub fn cast_vote(&mut self, voter: Principal, id: ProposalId) -> BallotResult<()> {
        let record = self
            .voters
            .get(&voter)
            .copied()
            .ok_or(BallotError::Unauthorized(Role::Voter))?;
        if record.has_voted {
            return Err(BallotError::AlreadyVoted(voter));
        }
        let index = match id.index() {
            Some(index) if index < self.proposals.len() => index,
            _ => return Err(BallotError::ProposalNotFound(id)),
        };

        // All checks passed; apply the three mutations together.
        self.proposals[index].vote_count += 1;
        self.voters.insert(
            voter,
            Voter {
                is_registered: true,
                has_voted: true,
                voted_proposal_id: id,
            },
        );
        debug!("Voter {} voted for proposal {}", voter, id);
        Ok(())
    }

    /// Computes and freezes the winner.
    pub fn tally(&mut self) -> ProposalId {
        let winner = tally_votes(&self.proposals);
        self.winning_proposal_id = Some(winner);
        info!(
            "Tally complete: proposal {} wins with {} votes",
            winner,
            self.proposal(winner).map_or(0, |p| p.vote_count)
        );
        winner
    }

    pub fn winning_proposal_id(&self) -> Option<ProposalId> {
        self.winning_proposal_id
    }
}

/// Index of the proposal with the most votes. Scans in ascending order and
/// only replaces the leader on a strictly greater count, so the lowest
/// index wins ties and an all-zero (or empty) list yields id 0.
pub fn tally_votes(proposals: &[Proposal]) -> ProposalId {
    let mut winner = 0usize;
    let mut best = 0u64;
    for (index, proposal) in proposals.iter().enumerate() {
        if proposal.vote_count > best {
            best = proposal.vote_count;
            winner = index;
        }
    }
    ProposalId::from(winner)
}
