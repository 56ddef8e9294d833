use ballot_registry::{
    Ballot, BallotConfig, BallotError, BallotEvent, Operation, Phase, Principal, ProposalId,
    RecordingSink, Role, SingleAdministrator, Voter,
};

const ADMIN: Principal = Principal([0xaa; 20]);
const SECOND: Principal = Principal([0x02; 20]);
const THIRD: Principal = Principal([0x03; 20]);
const FOURTH: Principal = Principal([0x04; 20]);
const FIFTH: Principal = Principal([0x05; 20]);

type TestBallot = Ballot<SingleAdministrator, RecordingSink>;

fn new_ballot_with(config: BallotConfig) -> (TestBallot, RecordingSink) {
    let _ = env_logger::builder().is_test(true).try_init();
    let sink = RecordingSink::new();
    (
        Ballot::with_config(config, SingleAdministrator(ADMIN), sink.clone()),
        sink,
    )
}

fn new_ballot() -> (TestBallot, RecordingSink) {
    new_ballot_with(BallotConfig::default())
}

/// SECOND and FOURTH registered, "Alice" (0) and "Bob" (1) submitted,
/// proposals closed.
fn ballot_with_proposals() -> (TestBallot, RecordingSink) {
    let (ballot, sink) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.register_voter(&ADMIN, FOURTH).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    ballot.submit_proposal(&SECOND, "Alice").unwrap();
    ballot.submit_proposal(&FOURTH, "Bob").unwrap();
    ballot.end_proposals_registration(&ADMIN).unwrap();
    sink.clear();
    (ballot, sink)
}

/// Four voters, three proposals, voting open, SECOND voted 0 and THIRD voted 1.
fn ballot_mid_vote() -> TestBallot {
    let (ballot, _) = new_ballot();
    for voter in [SECOND, THIRD, FOURTH, FIFTH] {
        ballot.register_voter(&ADMIN, voter).unwrap();
    }
    ballot.start_proposals_registration(&ADMIN).unwrap();
    ballot.submit_proposal(&SECOND, "Alice").unwrap();
    ballot.submit_proposal(&THIRD, "Bob").unwrap();
    ballot.submit_proposal(&FOURTH, "John").unwrap();
    ballot.end_proposals_registration(&ADMIN).unwrap();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&SECOND, ProposalId(0)).unwrap();
    ballot.cast_vote(&THIRD, ProposalId(1)).unwrap();
    ballot
}

// Registration

#[test]
fn test_register_voter_and_read_back() {
    let (ballot, sink) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    let voter = ballot.get_voter(&SECOND, &SECOND).unwrap();
    assert!(voter.is_registered);
    assert!(!voter.has_voted);
    assert_eq!(voter.voted_proposal_id, ProposalId(0));
    assert_eq!(sink.events(), vec![BallotEvent::VoterRegistered { voter: SECOND }]);
}

#[test]
fn test_only_administrator_registers_voters() {
    let (ballot, sink) = new_ballot();
    assert_eq!(
        ballot.register_voter(&THIRD, SECOND),
        Err(BallotError::Unauthorized(Role::Administrator))
    );
    assert!(sink.events().is_empty());
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let (ballot, sink) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    assert_eq!(
        ballot.register_voter(&ADMIN, SECOND),
        Err(BallotError::AlreadyRegistered(SECOND))
    );
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn test_administrator_may_register_itself() {
    let (ballot, _) = new_ballot();
    ballot.register_voter(&ADMIN, ADMIN).unwrap();
    assert!(ballot.get_voter(&ADMIN, &ADMIN).unwrap().is_registered);
}

#[test]
fn test_registration_is_phase_independent_by_default() {
    let (ballot, _) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.register_voter(&ADMIN, THIRD).unwrap();
    ballot.cast_vote(&THIRD, ProposalId(1)).unwrap();
    assert_eq!(ballot.get_proposal(&THIRD, ProposalId(1)).unwrap().vote_count, 1);
}

#[test]
fn test_strict_config_limits_registration_to_setup() {
    let (ballot, _) = new_ballot_with(BallotConfig::strict());
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    assert_eq!(
        ballot.register_voter(&ADMIN, THIRD),
        Err(BallotError::PhaseMismatch {
            operation: Operation::RegisterVoter,
            current: Phase::ProposalsOpen,
            required: Phase::NotStarted,
        })
    );
    assert!(!ballot.get_voter(&SECOND, &THIRD).unwrap().is_registered);
}

#[test]
fn test_only_voters_read_voters_in_any_phase() {
    let (ballot, _) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    let assert_denied = || {
        assert_eq!(
            ballot.get_voter(&THIRD, &SECOND),
            Err(BallotError::Unauthorized(Role::Voter))
        );
        // The administrator is not a voter unless registered as one.
        assert_eq!(
            ballot.get_voter(&ADMIN, &SECOND),
            Err(BallotError::Unauthorized(Role::Voter))
        );
        assert!(ballot.get_voter(&SECOND, &SECOND).unwrap().is_registered);
    };
    assert_denied();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    assert_denied();
    ballot.end_proposals_registration(&ADMIN).unwrap();
    assert_denied();
    ballot.start_voting_session(&ADMIN).unwrap();
    assert_denied();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_denied();
    ballot.tally(&ADMIN).unwrap();
    assert_eq!(ballot.phase(), Phase::TallyDone);
    assert_denied();
}

#[test]
fn test_voter_lookup_of_unregistered_principal() {
    let (ballot, _) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    assert_eq!(ballot.get_voter(&SECOND, &THIRD), Ok(Voter::default()));
}

// Proposals

#[test]
fn test_proposals_not_allowed_before_registration_opens() {
    let (ballot, _) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    let err = ballot.submit_proposal(&SECOND, "Alice").unwrap_err();
    assert_eq!(
        err,
        BallotError::PhaseMismatch {
            operation: Operation::SubmitProposal,
            current: Phase::NotStarted,
            required: Phase::ProposalsOpen,
        }
    );
}

#[test]
fn test_only_voters_submit_proposals() {
    let (ballot, _) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    assert_eq!(
        ballot.submit_proposal(&THIRD, "Alice"),
        Err(BallotError::Unauthorized(Role::Voter))
    );
}

#[test]
fn test_empty_proposal_is_rejected() {
    let (ballot, sink) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    sink.clear();
    assert_eq!(ballot.submit_proposal(&SECOND, ""), Err(BallotError::EmptyProposal));
    assert_eq!(ballot.submit_proposal(&SECOND, "   "), Err(BallotError::EmptyProposal));
    assert!(sink.events().is_empty());
    assert_eq!(ballot.summary().proposal_count, 0);
}

#[test]
fn test_configured_description_limit() {
    let config = BallotConfig {
        max_description_len: Some(8),
        ..BallotConfig::default()
    };
    let (ballot, _) = new_ballot_with(config);
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    assert_eq!(
        ballot.submit_proposal(&SECOND, "a very long idea"),
        Err(BallotError::DescriptionTooLong { len: 16, max: 8 })
    );
    assert_eq!(ballot.submit_proposal(&SECOND, "short"), Ok(ProposalId(0)));
}

#[test]
fn test_proposal_ids_follow_submission_order() {
    let (ballot, sink) = new_ballot();
    ballot.register_voter(&ADMIN, SECOND).unwrap();
    ballot.register_voter(&ADMIN, THIRD).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    sink.clear();

    assert_eq!(ballot.submit_proposal(&SECOND, "Alice"), Ok(ProposalId(0)));
    assert_eq!(ballot.submit_proposal(&THIRD, "Bob"), Ok(ProposalId(1)));
    assert_eq!(ballot.submit_proposal(&SECOND, "Carol"), Ok(ProposalId(2)));

    let bob = ballot.get_proposal(&SECOND, ProposalId(1)).unwrap();
    assert_eq!(bob.description, "Bob");
    assert_eq!(bob.vote_count, 0);
    assert_eq!(
        sink.events(),
        (0..3)
            .map(|i| BallotEvent::ProposalRegistered { proposal_id: ProposalId(i) })
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_get_proposal_out_of_range() {
    let (ballot, _) = ballot_with_proposals();
    assert_eq!(
        ballot.get_proposal(&SECOND, ProposalId(2)),
        Err(BallotError::ProposalNotFound(ProposalId(2)))
    );
}

#[test]
fn test_only_voters_read_proposals_in_any_phase() {
    let (ballot, _) = ballot_with_proposals();
    let assert_denied = || {
        assert_eq!(
            ballot.get_proposal(&THIRD, ProposalId(0)),
            Err(BallotError::Unauthorized(Role::Voter))
        );
    };
    assert_denied();
    ballot.start_voting_session(&ADMIN).unwrap();
    assert_denied();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_denied();
    ballot.tally(&ADMIN).unwrap();
    assert_denied();
}

#[test]
fn test_proposals_closed_rejects_submission() {
    let (ballot, _) = ballot_with_proposals();
    assert!(ballot.submit_proposal(&SECOND, "Late").unwrap_err().is_phase_error());
}

// Voting

#[test]
fn test_vote_before_session_starts() {
    let (ballot, _) = ballot_with_proposals();
    assert_eq!(
        ballot.cast_vote(&SECOND, ProposalId(0)),
        Err(BallotError::PhaseMismatch {
            operation: Operation::CastVote,
            current: Phase::ProposalsClosed,
            required: Phase::VotingOpen,
        })
    );
}

#[test]
fn test_only_voters_vote() {
    let (ballot, _) = ballot_with_proposals();
    assert_eq!(
        ballot.cast_vote(&THIRD, ProposalId(0)),
        Err(BallotError::Unauthorized(Role::Voter))
    );
}

#[test]
fn test_second_vote_is_rejected_and_first_kept() {
    let (ballot, _) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&SECOND, ProposalId(1)).unwrap();
    assert_eq!(
        ballot.cast_vote(&SECOND, ProposalId(0)),
        Err(BallotError::AlreadyVoted(SECOND))
    );
    let record = ballot.get_voter(&SECOND, &SECOND).unwrap();
    assert!(record.has_voted);
    assert_eq!(record.voted_proposal_id, ProposalId(1));
    assert_eq!(ballot.get_proposal(&SECOND, ProposalId(0)).unwrap().vote_count, 0);
    assert_eq!(ballot.get_proposal(&SECOND, ProposalId(1)).unwrap().vote_count, 1);
}

#[test]
fn test_vote_for_unknown_proposal() {
    let (ballot, sink) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    sink.clear();
    let before = ballot.snapshot();
    assert_eq!(
        ballot.cast_vote(&SECOND, ProposalId(2)),
        Err(BallotError::ProposalNotFound(ProposalId(2)))
    );
    assert_eq!(ballot.snapshot(), before);
    assert!(sink.events().is_empty());
    // The rejected attempt did not use up the vote.
    ballot.cast_vote(&SECOND, ProposalId(0)).unwrap();
}

#[test]
fn test_votes_accumulate() {
    let (ballot, _) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&SECOND, ProposalId(0)).unwrap();
    assert_eq!(ballot.get_proposal(&SECOND, ProposalId(0)).unwrap().vote_count, 1);
    ballot.cast_vote(&FOURTH, ProposalId(0)).unwrap();
    assert_eq!(ballot.get_proposal(&SECOND, ProposalId(0)).unwrap().vote_count, 2);
}

#[test]
fn test_vote_touches_only_the_caller() {
    let (ballot, _) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&SECOND, ProposalId(1)).unwrap();
    let other = ballot.get_voter(&FOURTH, &FOURTH).unwrap();
    assert!(!other.has_voted);
    assert_eq!(other.voted_proposal_id, ProposalId(0));
}

#[test]
fn test_vote_emits_voted_event() {
    let (ballot, sink) = ballot_with_proposals();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&SECOND, ProposalId(0)).unwrap();
    assert_eq!(
        sink.last(),
        Some(BallotEvent::Voted {
            voter: SECOND,
            proposal_id: ProposalId(0),
        })
    );
}

#[test]
fn test_voting_closed_rejects_votes() {
    let ballot = ballot_mid_vote();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert!(ballot.cast_vote(&FOURTH, ProposalId(2)).unwrap_err().is_phase_error());
}

// Tally

#[test]
fn test_tally_requires_voting_closed() {
    let ballot = ballot_mid_vote();
    assert!(matches!(
        ballot.tally(&ADMIN),
        Err(BallotError::IllegalTransition { current: Phase::VotingOpen, .. })
    ));
}

#[test]
fn test_only_administrator_tallies() {
    let ballot = ballot_mid_vote();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_eq!(ballot.tally(&SECOND), Err(BallotError::Unauthorized(Role::Administrator)));
    assert_eq!(ballot.phase(), Phase::VotingClosed);
    assert_eq!(ballot.winning_proposal_id(), None);
}

#[test]
fn test_tally_picks_majority() {
    let ballot = ballot_mid_vote();
    ballot.cast_vote(&FOURTH, ProposalId(1)).unwrap();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_eq!(ballot.tally(&ADMIN), Ok(ProposalId(1)));
    assert_eq!(ballot.winning_proposal_id(), Some(ProposalId(1)));
    assert_eq!(ballot.phase(), Phase::TallyDone);
}

#[test]
fn test_tally_picks_late_proposal_with_most_votes() {
    let ballot = ballot_mid_vote();
    ballot.cast_vote(&FOURTH, ProposalId(2)).unwrap();
    ballot.cast_vote(&FIFTH, ProposalId(2)).unwrap();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_eq!(ballot.tally(&ADMIN), Ok(ProposalId(2)));
}

#[test]
fn test_tally_tie_goes_to_lowest_index() {
    // Alice 1, Bob 1, John 0
    let ballot = ballot_mid_vote();
    ballot.end_voting_session(&ADMIN).unwrap();
    assert_eq!(ballot.tally(&ADMIN), Ok(ProposalId(0)));
}

#[test]
fn test_tally_emits_final_status_change() {
    let sink = RecordingSink::new();
    let ballot = Ballot::new(SingleAdministrator(ADMIN), sink.clone());
    ballot.start_proposals_registration(&ADMIN).unwrap();
    ballot.end_proposals_registration(&ADMIN).unwrap();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.end_voting_session(&ADMIN).unwrap();
    ballot.tally(&ADMIN).unwrap();
    assert_eq!(
        sink.last(),
        Some(BallotEvent::WorkflowStatusChanged {
            previous: Phase::VotingClosed,
            new: Phase::TallyDone,
        })
    );
}

#[test]
fn test_winner_is_frozen_after_tally() {
    let ballot = ballot_mid_vote();
    ballot.end_voting_session(&ADMIN).unwrap();
    let winner = ballot.tally(&ADMIN).unwrap();
    assert!(ballot.tally(&ADMIN).is_err());
    assert!(ballot.cast_vote(&FIFTH, ProposalId(2)).is_err());
    assert_eq!(ballot.winning_proposal_id(), Some(winner));
}

// End to end

#[test]
fn test_end_to_end_two_voters_same_choice() {
    let (ballot, _) = new_ballot();
    let v1 = Principal::repeat_byte(0x11);
    let v2 = Principal::repeat_byte(0x22);
    ballot.register_voter(&ADMIN, v1).unwrap();
    ballot.register_voter(&ADMIN, v2).unwrap();
    ballot.start_proposals_registration(&ADMIN).unwrap();
    assert_eq!(ballot.submit_proposal(&v1, "Alice"), Ok(ProposalId(0)));
    assert_eq!(ballot.submit_proposal(&v2, "Bob"), Ok(ProposalId(1)));
    ballot.end_proposals_registration(&ADMIN).unwrap();
    ballot.start_voting_session(&ADMIN).unwrap();
    ballot.cast_vote(&v1, ProposalId(0)).unwrap();
    ballot.cast_vote(&v2, ProposalId(0)).unwrap();
    ballot.end_voting_session(&ADMIN).unwrap();

    assert_eq!(ballot.tally(&ADMIN), Ok(ProposalId(0)));
    assert_eq!(ballot.get_proposal(&v1, ProposalId(0)).unwrap().vote_count, 2);
}

#[test]
fn test_end_to_end_no_votes_defaults_to_first() {
    for proposal_count in [1usize, 2, 5] {
        let (ballot, _) = new_ballot();
        ballot.register_voter(&ADMIN, SECOND).unwrap();
        ballot.start_proposals_registration(&ADMIN).unwrap();
        for i in 0..proposal_count {
            ballot.submit_proposal(&SECOND, &format!("option {}", i)).unwrap();
        }
        ballot.end_proposals_registration(&ADMIN).unwrap();
        ballot.start_voting_session(&ADMIN).unwrap();
        ballot.end_voting_session(&ADMIN).unwrap();
        assert_eq!(ballot.tally(&ADMIN), Ok(ProposalId(0)));
    }
}

#[test]
fn test_restore_continues_where_snapshot_left_off() {
    let ballot = ballot_mid_vote();
    let snapshot = ballot.snapshot();
    let restored = Ballot::restore(
        snapshot,
        BallotConfig::default(),
        SingleAdministrator(ADMIN),
        RecordingSink::new(),
    )
    .unwrap();
    assert_eq!(restored.cast_vote(&SECOND, ProposalId(2)), Err(BallotError::AlreadyVoted(SECOND)));
    restored.cast_vote(&FOURTH, ProposalId(1)).unwrap();
    restored.end_voting_session(&ADMIN).unwrap();
    assert_eq!(restored.tally(&ADMIN), Ok(ProposalId(1)));
}
