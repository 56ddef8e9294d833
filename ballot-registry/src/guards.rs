//! Authorization and phase guards run at the top of every operation.

use std::collections::HashMap;

use ballot_shared_types::{Phase, Principal, Voter};

use crate::error::{BallotError, BallotResult, Operation, Role};

/// Answers "is this caller the administrator?". Supplied by whoever hosts
/// the ballot; the registry never authenticates callers itself.
pub trait AdministratorCheck {
    fn is_administrator(&self, caller: &Principal) -> bool;
}

/// The common case: exactly one fixed administrator principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleAdministrator(pub Principal);

impl AdministratorCheck for SingleAdministrator {
    fn is_administrator(&self, caller: &Principal) -> bool {
        self.0 == *caller
    }
}

impl<F> AdministratorCheck for F
where
    F: Fn(&Principal) -> bool,
{
    fn is_administrator(&self, caller: &Principal) -> bool {
        self(caller)
    }
}

pub fn require_administrator<A: AdministratorCheck + ?Sized>(
    check: &A,
    caller: &Principal,
) -> BallotResult<()> {
    if check.is_administrator(caller) {
        Ok(())
    } else {
        Err(BallotError::Unauthorized(Role::Administrator))
    }
}

/// Returns the caller's own record when they are a registered voter.
pub fn require_registered_voter<'a>(
    voters: &'a HashMap<Principal, Voter>,
    caller: &Principal,
) -> BallotResult<&'a Voter> {
    voters
        .get(caller)
        .filter(|voter| voter.is_registered)
        .ok_or(BallotError::Unauthorized(Role::Voter))
}

pub fn require_phase(operation: Operation, current: Phase, required: Phase) -> BallotResult<()> {
    if current == required {
        Ok(())
    } else {
        Err(BallotError::PhaseMismatch {
            operation,
            current,
            required,
        })
    }
}
