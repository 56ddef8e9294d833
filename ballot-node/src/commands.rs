//! Subcommands and their execution against a ballot.

use anyhow::Result;
use clap::Subcommand;
use std::fmt::Write;

use ballot_registry::{AdministratorCheck, Ballot, EventSink};
use ballot_shared_types::{Principal, ProposalId};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show phase, counts, winner and state hash
    Status,
    /// Register a voter (administrator only)
    RegisterVoter { principal: Principal },
    /// Open proposal submission
    StartProposals,
    /// Close proposal submission
    EndProposals,
    /// Open the voting session
    StartVoting,
    /// Close the voting session
    EndVoting,
    /// Count the votes and freeze the winner
    Tally,
    /// Submit a proposal (registered voters only)
    SubmitProposal { description: String },
    /// Vote for a proposal by id
    Vote { proposal_id: u64 },
    /// Look up a voter record
    Voter { principal: Principal },
    /// Look up a proposal
    Proposal { proposal_id: u64 },
    /// Print the configuration file location
    ConfigPath,
}

impl Command {
    /// Whether a successful run changes the ballot.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::Status | Command::Voter { .. } | Command::Proposal { .. } | Command::ConfigPath
        )
    }
}

/// Runs `command` as `caller` and returns the text to print.
pub fn execute<A, S>(ballot: &Ballot<A, S>, caller: &Principal, command: &Command) -> Result<String>
where
    A: AdministratorCheck,
    S: EventSink,
{
    let output = match command {
        Command::Status => status(ballot),
        Command::RegisterVoter { principal } => {
            ballot.register_voter(caller, *principal)?;
            format!("registered voter {}", principal)
        }
        Command::StartProposals => {
            ballot.start_proposals_registration(caller)?;
            format!("phase: {}", ballot.phase())
        }
        Command::EndProposals => {
            ballot.end_proposals_registration(caller)?;
            format!("phase: {}", ballot.phase())
        }
        Command::StartVoting => {
            ballot.start_voting_session(caller)?;
            format!("phase: {}", ballot.phase())
        }
        Command::EndVoting => {
            ballot.end_voting_session(caller)?;
            format!("phase: {}", ballot.phase())
        }
        Command::Tally => {
            let winner = ballot.tally(caller)?;
            format!("winning proposal: {}", winner.0)
        }
        Command::SubmitProposal { description } => {
            let id = ballot.submit_proposal(caller, description)?;
            format!("proposal id: {}", id.0)
        }
        Command::Vote { proposal_id } => {
            ballot.cast_vote(caller, ProposalId(*proposal_id))?;
            format!("voted for proposal {}", proposal_id)
        }
        Command::Voter { principal } => {
            let voter = ballot.get_voter(caller, principal)?;
            format!(
                "registered: {}\nhas voted: {}\nvoted proposal id: {}",
                voter.is_registered, voter.has_voted, voter.voted_proposal_id.0
            )
        }
        Command::Proposal { proposal_id } => {
            let proposal = ballot.get_proposal(caller, ProposalId(*proposal_id))?;
            format!(
                "description: {}\nvote count: {}",
                proposal.description, proposal.vote_count
            )
        }
        Command::ConfigPath => anyhow::bail!("config-path does not operate on a ballot"),
    };
    Ok(output)
}

fn status<A: AdministratorCheck, S: EventSink>(ballot: &Ballot<A, S>) -> String {
    let summary = ballot.summary();
    let mut out = String::new();
    let _ = writeln!(out, "phase: {} ({})", summary.phase, summary.phase.code());
    let _ = writeln!(out, "voters: {}", summary.voter_count);
    let _ = writeln!(out, "proposals: {}", summary.proposal_count);
    let _ = writeln!(out, "votes cast: {}", summary.total_votes);
    match summary.winning_proposal_id {
        Some(id) => {
            let _ = writeln!(out, "winning proposal: {}", id.0);
        }
        None => {
            let _ = writeln!(out, "winning proposal: pending");
        }
    }
    let _ = write!(out, "state hash: 0x{}", hex::encode(ballot.snapshot().state_hash()));
    out
}
