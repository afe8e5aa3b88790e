//! Collaborative approval outcomes.
//!
//! Spendings and project modifications carry a map of investor votes and a
//! terminal status. How votes turn into an outcome is owned by whichever
//! component stores that data; this module only defines the seam.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single investor's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: String,
    pub status: VoteStatus,
    pub cast_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Approve,
    Reject,
    Abstain,
}

/// Status of an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Outcome {
    /// Whether no further votes can change the outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Vote counts, latest vote per voter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub approve: usize,
    pub reject: usize,
    pub abstain: usize,
}

impl VoteTally {
    /// Count votes, keeping only the most recent vote of each voter.
    #[must_use]
    pub fn from_votes(votes: &[Vote]) -> Self {
        let mut latest: HashMap<&str, &Vote> = HashMap::new();
        for vote in votes {
            latest
                .entry(vote.voter_id.as_str())
                .and_modify(|seen| {
                    if vote.cast_at >= seen.cast_at {
                        *seen = vote;
                    }
                })
                .or_insert(vote);
        }

        latest.values().fold(Self::default(), |mut tally, vote| {
            match vote.status {
                VoteStatus::Approve => tally.approve += 1,
                VoteStatus::Reject => tally.reject += 1,
                VoteStatus::Abstain => tally.abstain += 1,
            }
            tally
        })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.approve + self.reject + self.abstain
    }
}

/// Decides the outcome of an approval request from its votes.
pub trait ApprovalPolicy: Send + Sync {
    fn decide_outcome(&self, votes: &[Vote]) -> Outcome;
}

/// Adapts a closure into an [`ApprovalPolicy`].
///
/// ```
/// use ipm_server::approvals::{ApprovalPolicy, FnPolicy, Outcome, Vote, VoteTally};
///
/// let policy = FnPolicy(|votes: &[Vote]| {
///     if VoteTally::from_votes(votes).reject > 0 {
///         Outcome::Rejected
///     } else {
///         Outcome::Pending
///     }
/// });
/// assert_eq!(policy.decide_outcome(&[]), Outcome::Pending);
/// ```
pub struct FnPolicy<F>(pub F);

impl<F> ApprovalPolicy for FnPolicy<F>
where
    F: Fn(&[Vote]) -> Outcome + Send + Sync,
{
    fn decide_outcome(&self, votes: &[Vote]) -> Outcome {
        (self.0)(votes)
    }
}
