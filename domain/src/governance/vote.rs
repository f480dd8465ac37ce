//! Ballot values.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A HEAD member's ballot.
///
/// # Example
///
/// ```
/// use boardroom_domain::governance::VoteValue;
///
/// let vote: VoteValue = "approve".parse().unwrap();
/// assert_eq!(vote, VoteValue::Approve);
/// assert!("maybe".parse::<VoteValue>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Approve,
    Veto,
    Abstain,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Approve => "approve",
            VoteValue::Veto => "veto",
            VoteValue::Abstain => "abstain",
        }
    }
}

impl FromStr for VoteValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(VoteValue::Approve),
            "veto" => Ok(VoteValue::Veto),
            "abstain" => Ok(VoteValue::Abstain),
            other => Err(DomainError::InvalidVote(other.to_string())),
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding verdict submitted by a human operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanVerdict {
    Approve,
    Reject,
}

impl FromStr for HumanVerdict {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(HumanVerdict::Approve),
            "reject" | "veto" => Ok(HumanVerdict::Reject),
            other => Err(DomainError::InvalidVote(other.to_string())),
        }
    }
}
