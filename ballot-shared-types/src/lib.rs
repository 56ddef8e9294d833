//! Data structures shared by the ballot registry and its front ends.
//!
//! Everything in this crate is plain data: identities, the workflow phase
//! enumeration, voter and proposal records, the events the registry emits
//! and the snapshot shape used by storage backends.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod governance;
pub mod phase;
pub mod snapshot;

pub use governance::{BallotEvent, Proposal, ProposalId, Voter};
pub use phase::{Phase, UnknownPhase};
pub use snapshot::BallotSnapshot;

pub type Hash = [u8; 32];

/// Length in bytes of a principal identifier.
pub const PRINCIPAL_LEN: usize = 20;

/// Opaque account identifier of a caller (administrator or voter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Principal(pub [u8; PRINCIPAL_LEN]);

/// Errors produced when parsing a principal from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalParseError {
    #[error("invalid hex in principal: {0}")]
    InvalidHex(String),
    #[error("principal must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl Principal {
    /// Creates a principal from raw bytes.
    pub fn from_bytes(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Principal(bytes)
    }

    /// Deterministic principal filled with `seed`, handy for fixtures.
    pub fn repeat_byte(seed: u8) -> Self {
        Principal([seed; PRINCIPAL_LEN])
    }

    pub fn to_bytes(&self) -> [u8; PRINCIPAL_LEN] {
        self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| PrincipalParseError::InvalidHex(e.to_string()))?;
        let array: [u8; PRINCIPAL_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PrincipalParseError::InvalidLength {
                expected: PRINCIPAL_LEN,
                actual: bytes.len(),
            })?;
        Ok(Principal(array))
    }
}

impl From<[u8; PRINCIPAL_LEN]> for Principal {
    fn from(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Principal(bytes)
    }
}

impl AsRef<[u8]> for Principal {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Principals travel as their hex text so JSON snapshots can key maps by them.
impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
