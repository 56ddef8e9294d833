//! Tunables of a ballot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallotConfig {
    /// Only accept voter registrations while the ballot is `NotStarted`.
    /// Off by default: registration is gated on the administrator alone.
    pub restrict_registration_to_setup: bool,
    /// Upper bound on proposal description length, in characters.
    pub max_description_len: Option<usize>,
}

impl BallotConfig {
    /// Configuration with the `NotStarted`-only registration window.
    pub fn strict() -> Self {
        Self {
            restrict_registration_to_setup: true,
            ..Self::default()
        }
    }
}
