//! Ballot Registry
//!
//! This crate implements a single-administrator voting registry: a workflow
//! controller that drives one ballot through six fixed phases, and a
//! registry of voters, proposals and votes guarded by that workflow.
//!
//! # Usage
//!
//! ```rust
//! use ballot_registry::{Ballot, RecordingSink, SingleAdministrator};
//! use ballot_shared_types::{Principal, ProposalId};
//!
//! let admin = Principal::repeat_byte(0xaa);
//! let voter = Principal::repeat_byte(0x01);
//! let ballot = Ballot::new(SingleAdministrator(admin), RecordingSink::new());
//!
//! ballot.register_voter(&admin, voter).unwrap();
//! ballot.start_proposals_registration(&admin).unwrap();
//! let id = ballot.submit_proposal(&voter, "Alice").unwrap();
//! ballot.end_proposals_registration(&admin).unwrap();
//! ballot.start_voting_session(&admin).unwrap();
//! ballot.cast_vote(&voter, id).unwrap();
//! ballot.end_voting_session(&admin).unwrap();
//! assert_eq!(ballot.tally(&admin).unwrap(), ProposalId(0));
//! ```

pub mod audit_log;
pub mod ballot;
pub mod config;
pub mod error;
pub mod events;
pub mod guards;
pub mod registry;
pub mod state;
pub mod workflow;

pub use ballot::{Ballot, BallotSummary};
pub use config::BallotConfig;
pub use error::{BallotError, BallotResult, Operation, Role};
pub use events::{AuditLogSink, ChannelSink, EventSink, FanoutSink, NullSink, RecordingSink, SinkError};
pub use guards::{AdministratorCheck, SingleAdministrator};
pub use registry::{tally_votes, BallotRegistry};
pub use state::BallotState;
pub use workflow::{PhaseChange, Transition, WorkflowController};

// Re-export the shared data types
pub use ballot_shared_types::*;
