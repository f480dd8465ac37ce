//! The governance transition function.
//!
//! Convergence is a pure function of a decision snapshot: [`evaluate`]
//! inspects the HEAD ballots and the round counter and returns the single
//! [`Transition`] that should be committed. The caller applies it with
//! [`Decision::apply`] under an optimistic version check, so evaluating the
//! same snapshot twice always yields the same answer and only one commit can
//! win.
//!
//! ```text
//!   both approve ──────────────► Resolve(Approved)
//!   both veto ─────────────────► Resolve(Vetoed)
//!   split / abstain
//!     ├─ veto_round >= max ────► Escalate(Deadlock)
//!     └─ otherwise ────────────► AdvanceRound(veto_round + 1)
//!   one ballot missing ────────► Await
//!   already terminal ──────────► Noop
//! ```

use super::decision::{Decision, DecisionStatus, Resolution};
use super::vote::{HumanVerdict, VoteValue};
use crate::core::error::DomainError;
use chrono::{DateTime, Duration, Utc};

/// A state change to commit on a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The decision is already terminal.
    Noop,
    /// Waiting for the other HEAD ballot.
    Await,
    /// HEAD converged; `status` is `Approved` or `Vetoed`.
    Resolve { status: DecisionStatus },
    /// Open the next advisory round.
    AdvanceRound { round: u32 },
    /// Hand the decision to a human.
    Escalate {
        reason: String,
        resolution: Resolution,
    },
    /// A human operator settled the decision directly.
    Override {
        status: DecisionStatus,
        reason: Option<String>,
    },
}

impl Transition {
    /// Whether committing this transition makes the decision terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Transition::Resolve { .. } | Transition::Escalate { .. } | Transition::Override { .. }
        )
    }

    /// Whether committing this transition changes stored state.
    pub fn is_change(&self) -> bool {
        !matches!(self, Transition::Noop | Transition::Await)
    }
}

/// Evaluate HEAD convergence for a decision snapshot.
pub fn evaluate(decision: &Decision, max_veto_rounds: u32) -> Transition {
    if decision.is_terminal() {
        return Transition::Noop;
    }
    let Some(votes) = decision.head_votes() else {
        return Transition::Await;
    };
    match votes {
        (VoteValue::Approve, VoteValue::Approve) => Transition::Resolve {
            status: DecisionStatus::Approved,
        },
        (VoteValue::Veto, VoteValue::Veto) => Transition::Resolve {
            status: DecisionStatus::Vetoed,
        },
        // The split is checked against the round count before it is bumped,
        // so a budget of N escalates on the (N+1)th split.
        _ if decision.veto_round >= max_veto_rounds => Transition::Escalate {
            reason: deadlock_reason(decision),
            resolution: Resolution::Deadlock,
        },
        _ => Transition::AdvanceRound {
            round: decision.veto_round + 1,
        },
    }
}

/// Transition for a pending decision whose round deadline has passed.
pub fn lapse(decision: &Decision, now: DateTime<Utc>) -> Transition {
    if decision.is_terminal() {
        return Transition::Noop;
    }
    if !decision.deadline_lapsed(now) {
        return Transition::Await;
    }
    Transition::Escalate {
        reason: lapse_reason(decision),
        resolution: Resolution::DeadlineLapsed,
    }
}

fn deadlock_reason(decision: &Decision) -> String {
    format!(
        "Decision deadlock after {} rounds: {}",
        decision.veto_round, decision.title
    )
}

fn lapse_reason(decision: &Decision) -> String {
    format!(
        "Decision deadline lapsed in round {}: {}",
        decision.veto_round, decision.title
    )
}

/// Transition for a human override.
///
/// Allowed while the decision is pending or escalated; a decision already
/// approved or vetoed cannot be overridden.
pub fn human_override(
    decision: &Decision,
    verdict: HumanVerdict,
    reason: Option<String>,
) -> Result<Transition, DomainError> {
    match decision.status {
        DecisionStatus::Approved | DecisionStatus::Vetoed => {
            Err(DomainError::AlreadyResolved(decision.id.to_string()))
        }
        DecisionStatus::Pending | DecisionStatus::Escalated => Ok(Transition::Override {
            status: match verdict {
                HumanVerdict::Approve => DecisionStatus::Approved,
                HumanVerdict::Reject => DecisionStatus::Vetoed,
            },
            reason,
        }),
    }
}

impl Decision {
    /// Apply a transition to this snapshot.
    ///
    /// `next_round_window` is the advisory window granted when a new round
    /// opens. Returns `false` when nothing changed.
    pub fn apply(
        &mut self,
        transition: &Transition,
        now: DateTime<Utc>,
        next_round_window: Duration,
    ) -> bool {
        match transition {
            Transition::Noop | Transition::Await => return false,
            Transition::Resolve { status } => {
                self.status = *status;
                self.resolved_at = Some(now);
                self.resolution = Some(Resolution::Consensus);
            }
            Transition::AdvanceRound { round } => {
                self.veto_round = *round;
                self.round_deadline = now + next_round_window;
            }
            Transition::Escalate { resolution, .. } => {
                self.status = DecisionStatus::Escalated;
                self.resolved_at = Some(now);
                self.resolution = Some(resolution.clone());
            }
            Transition::Override { status, reason } => {
                self.status = *status;
                self.resolved_at = Some(now);
                self.resolution = Some(Resolution::Human {
                    reason: reason.clone(),
                });
            }
        }
        self.updated_at = now;
        true
    }

    /// Escalation reason for a decision that was escalated automatically.
    ///
    /// Used to rebuild a lost escalation record; `None` unless the decision
    /// ended in deadlock or a lapsed deadline.
    pub fn escalation_reason(&self) -> Option<String> {
        match self.resolution {
            Some(Resolution::Deadlock) => Some(deadlock_reason(self)),
            Some(Resolution::DeadlineLapsed) => Some(lapse_reason(self)),
            _ => None,
        }
    }
}
