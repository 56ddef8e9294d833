//! Structured audit records for ballot activity.

use tracing::{event, Level};

use ballot_shared_types::{BallotEvent, Phase, Principal, ProposalId};

/// Logs a committed phase change.
#[tracing::instrument(level = "info", skip_all)]
pub fn log_workflow_status_changed(previous: Phase, new: Phase) {
    event!(
        Level::INFO,
        previous = previous.code(),
        new = new.code(),
        "Workflow status changed: {} -> {}",
        previous,
        new
    );
}

#[tracing::instrument(level = "info", skip_all)]
pub fn log_voter_registered(voter: &Principal) {
    event!(Level::INFO, voter = %voter, "Voter registered");
}

#[tracing::instrument(level = "info", skip_all)]
pub fn log_proposal_registered(proposal_id: ProposalId) {
    event!(Level::INFO, proposal_id = proposal_id.0, "Proposal registered");
}

#[tracing::instrument(level = "info", skip_all)]
pub fn log_vote_cast(voter: &Principal, proposal_id: ProposalId) {
    event!(Level::INFO, voter = %voter, proposal_id = proposal_id.0, "Vote cast");
}

/// Routes an event to the matching audit record.
pub fn log_ballot_event(ballot_event: &BallotEvent) {
    match ballot_event {
        BallotEvent::WorkflowStatusChanged { previous, new } => {
            log_workflow_status_changed(*previous, *new)
        }
        BallotEvent::VoterRegistered { voter } => log_voter_registered(voter),
        BallotEvent::ProposalRegistered { proposal_id } => log_proposal_registered(*proposal_id),
        BallotEvent::Voted { voter, proposal_id } => log_vote_cast(voter, *proposal_id),
    }
}

/// Logs a rejected operation.
#[tracing::instrument(level = "warn", skip_all)]
pub fn log_operation_rejected(operation: &str, caller: &Principal, error: &str) {
    event!(Level::WARN, caller = %caller, "{} rejected: {}", operation, error);
}
