//! Persisted shape of a ballot, independent of any storage backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Hash, Phase, Principal, Proposal, ProposalId, Voter};

/// Full state of one ballot: phase, voter table, proposal list and winner.
///
/// Who administers the ballot is not part of the state; that is decided by
/// whoever hosts the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSnapshot {
    pub phase: Phase,
    pub voters: BTreeMap<Principal, Voter>,
    pub proposals: Vec<Proposal>,
    pub winning_proposal_id: Option<ProposalId>,
}

impl BallotSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// BLAKE3 digest of the canonical encoding.
    pub fn state_hash(&self) -> Hash {
        match self.to_bytes() {
            Ok(bytes) => blake3::hash(&bytes).into(),
            Err(_) => [0u8; 32], // Plain data; encoding cannot fail
        }
    }

    /// Total number of votes recorded across all proposals.
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }
}
