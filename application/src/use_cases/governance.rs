//! Decision governance use case
//!
//! Drives decisions through the protocol over the [`DecisionStore`]:
//!
//! - [`GovernanceService::propose`] creates a decision and asks HEAD to vote.
//! - [`GovernanceService::cast_vote`] records a ballot and re-evaluates.
//! - [`GovernanceService::human_override`] settles a decision directly.
//! - [`GovernanceService::sweep`] escalates decisions whose round deadline
//!   lapsed and rebuilds lost escalation records.
//!
//! Every state change goes through [`GovernanceService::commit`]: evaluate
//! the pure transition on a snapshot, apply it, and compare-and-swap on the
//! snapshot's version. A stale commit re-reads and re-evaluates. Only the
//! caller whose commit wins performs side effects (broadcast, advisory
//! request, escalation), so each decision gets exactly one terminal
//! transition and one resolution broadcast.

use crate::config::GovernanceConfig;
use crate::ports::audit_log::AuditLog;
use crate::ports::channel_bus::ChannelBus;
use crate::ports::decision_store::{CasOutcome, DecisionStore, StoreError};
use crate::use_cases::escalation::{
    EscalationError, EscalationManager, EscalationOutcome, EscalationRequest,
};
use boardroom_domain::governance::{evaluate, human_override, lapse};
use boardroom_domain::{
    AgentId, AgentMessage, AgentRole, AuditEvent, Channel, Decision, DecisionId, DecisionStatus,
    EscalationId, HumanVerdict, MessageBody, ProposalPayload, Recipient, Resolution,
    ResolutionPayload, StatusResponsePayload, Tier, Transition, VoteAction, VotePayload,
    VoteRequestPayload, VoteValue,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Upper bound on re-evaluations when commits keep losing to other writers.
const MAX_COMMIT_ATTEMPTS: usize = 16;

/// Errors that can occur while governing a decision
#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Decision not found: {0}")]
    NotFound(DecisionId),

    #[error("Decision {0} is already resolved")]
    AlreadyResolved(DecisionId),

    #[error("Escalation failed for decision {decision_id}: {source}")]
    Escalation {
        decision_id: DecisionId,
        #[source]
        source: EscalationError,
    },

    #[error("Gave up committing decision {0} after repeated concurrent writes")]
    Contention(DecisionId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Why a vote was dropped without effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    UnknownDecision(DecisionId),
    UnknownVoter(String),
    InvalidVote(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::UnknownDecision(id) => write!(f, "unknown decision {id}"),
            DropReason::UnknownVoter(voter) => write!(f, "unknown voter role {voter:?}"),
            DropReason::InvalidVote(vote) => write!(f, "invalid vote value {vote:?}"),
        }
    }
}

/// What a vote did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Only one HEAD ballot is present.
    Awaiting,
    /// HEAD converged; this caller committed the resolution.
    Resolved(DecisionStatus),
    /// HEAD split; a C-level advisory round opened.
    AdvancedRound(u32),
    /// The round budget ran out; the decision was handed to a human.
    Escalated(EscalationId),
    /// The decision was already terminal; nothing changed.
    AlreadyTerminal,
    /// A C-level opinion was stored.
    AdvisoryRecorded,
    /// Logged and dropped.
    Dropped(DropReason),
}

/// Result of one deadline sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Decisions escalated because their round deadline lapsed.
    pub lapsed: Vec<DecisionId>,
    /// Escalated decisions whose missing escalation record was rebuilt.
    pub recovered: Vec<DecisionId>,
    pub failures: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.lapsed.is_empty() && self.recovered.is_empty() && self.failures == 0
    }
}

enum Commit {
    Unchanged(Transition),
    Committed(Decision, Transition),
}

/// The decision governance state machine.
pub struct GovernanceService {
    decisions: Arc<dyn DecisionStore>,
    bus: Arc<dyn ChannelBus>,
    escalations: Arc<EscalationManager>,
    audit: Arc<dyn AuditLog>,
    config: GovernanceConfig,
}

impl GovernanceService {
    pub fn new(
        decisions: Arc<dyn DecisionStore>,
        bus: Arc<dyn ChannelBus>,
        escalations: Arc<EscalationManager>,
        audit: Arc<dyn AuditLog>,
        config: GovernanceConfig,
    ) -> Self {
        Self {
            decisions,
            bus,
            escalations,
            audit,
            config,
        }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn escalations(&self) -> &Arc<EscalationManager> {
        &self.escalations
    }

    // ==================== Queries ====================

    pub async fn get(&self, id: &DecisionId) -> Result<Option<Decision>, GovernanceError> {
        Ok(self.decisions.get(id).await?)
    }

    pub async fn list(&self, status: DecisionStatus) -> Result<Vec<Decision>, GovernanceError> {
        Ok(self.decisions.list_by_status(status).await?)
    }

    /// Counts reported in a `status_response`.
    pub async fn status_counts(&self) -> Result<StatusResponsePayload, GovernanceError> {
        let pending_escalations = match self.escalations.pending().await {
            Ok(pending) => pending.len(),
            Err(EscalationError::Store(e)) => return Err(e.into()),
            Err(_) => 0,
        };
        Ok(StatusResponsePayload {
            pending_decisions: self.list(DecisionStatus::Pending).await?.len(),
            escalated_decisions: self.list(DecisionStatus::Escalated).await?.len(),
            pending_escalations,
        })
    }

    // ==================== Propose ====================

    /// Create a decision and request HEAD votes.
    ///
    /// Proposals are always accepted; there is no duplicate detection.
    pub async fn propose(
        &self,
        proposed_by: &AgentId,
        proposal: ProposalPayload,
    ) -> Result<Decision, GovernanceError> {
        let now = Utc::now();
        let tier = proposal.tier();
        let decision = Decision::propose(
            proposal.title,
            proposal.description,
            proposed_by.clone(),
            tier,
            now,
            self.config.head_round_deadline,
        );
        let decision = self.decisions.insert(decision).await?;
        info!(
            decision_id = %decision.id,
            proposed_by = %proposed_by,
            tier = tier.as_str(),
            "Decision proposed: {}",
            decision.title
        );

        let request = self.vote_request(&decision, 1, VoteAction::CastVote);
        let message = AgentMessage::new(AgentId::orchestrator(), Recipient::Head, request)
            .with_response_deadline(now + self.config.head_round_deadline);
        self.publish(&Channel::Head, &message).await;
        Ok(decision)
    }

    // ==================== Vote ====================

    /// Record a vote and re-evaluate convergence.
    ///
    /// HEAD ballots overwrite the member's previous vote. C-level voters
    /// record an advisory opinion that never gates the outcome.
    pub async fn cast_vote(&self, vote: VotePayload) -> Result<VoteOutcome, GovernanceError> {
        let role = match vote.voter_type.parse::<AgentRole>() {
            Ok(role) => role,
            Err(_) => return Ok(self.drop_vote(&vote, DropReason::UnknownVoter(vote.voter_type.clone()))),
        };

        if role.tier() == Tier::CLevel {
            let opinion = match &vote.reasoning {
                Some(reasoning) => format!("{}: {}", vote.vote, reasoning),
                None => vote.vote.clone(),
            };
            let recorded = self
                .decisions
                .record_advisory(&vote.decision_id, role, opinion, Utc::now())
                .await?;
            return Ok(match recorded {
                Some(_) => {
                    debug!(decision_id = %vote.decision_id, role = %role, "Advisory opinion recorded");
                    VoteOutcome::AdvisoryRecorded
                }
                None => self.drop_vote(&vote, DropReason::UnknownDecision(vote.decision_id.clone())),
            });
        }

        let value = match vote.vote.parse::<VoteValue>() {
            Ok(value) => value,
            Err(_) => return Ok(self.drop_vote(&vote, DropReason::InvalidVote(vote.vote.clone()))),
        };

        let Some(snapshot) = self
            .decisions
            .record_vote(&vote.decision_id, role, value, Utc::now())
            .await?
        else {
            return Ok(self.drop_vote(&vote, DropReason::UnknownDecision(vote.decision_id.clone())));
        };
        debug!(
            decision_id = %snapshot.id,
            role = %role,
            vote = %value,
            round = snapshot.veto_round,
            "HEAD vote recorded"
        );

        let max_rounds = self.config.max_veto_rounds;
        match self
            .commit(snapshot, |d| Ok(evaluate(d, max_rounds)))
            .await?
        {
            Commit::Unchanged(Transition::Noop) => {
                debug!(decision_id = %vote.decision_id, "Vote on resolved decision ignored");
                Ok(VoteOutcome::AlreadyTerminal)
            }
            Commit::Unchanged(_) => Ok(VoteOutcome::Awaiting),
            Commit::Committed(decision, transition) => self.on_committed(&decision, &transition).await,
        }
    }

    fn drop_vote(&self, vote: &VotePayload, reason: DropReason) -> VoteOutcome {
        warn!(
            decision_id = %vote.decision_id,
            voter = %vote.voter_type,
            "Dropping vote: {}",
            reason
        );
        VoteOutcome::Dropped(reason)
    }

    // ==================== Human override ====================

    /// Settle a pending or escalated decision by human verdict.
    pub async fn human_override(
        &self,
        id: &DecisionId,
        verdict: HumanVerdict,
        reason: Option<String>,
    ) -> Result<Decision, GovernanceError> {
        let snapshot = self
            .decisions
            .get(id)
            .await?
            .ok_or_else(|| GovernanceError::NotFound(id.clone()))?;

        let commit = self
            .commit(snapshot, |d| {
                human_override(d, verdict, reason.clone())
                    .map_err(|_| GovernanceError::AlreadyResolved(d.id.clone()))
            })
            .await?;
        let Commit::Committed(decision, _) = commit else {
            return Err(GovernanceError::AlreadyResolved(id.clone()));
        };
        info!(
            decision_id = %decision.id,
            status = %decision.status,
            "Decision overridden by human"
        );

        let event = AuditEvent::new(
            boardroom_domain::audit::HUMAN_DECISION_EVENT,
            AgentId::human(),
            json!({
                "decisionId": decision.id,
                "decision": decision.status,
                "reason": reason,
            }),
            Utc::now(),
        );
        if let Err(e) = self.audit.append(event).await {
            warn!(decision_id = %decision.id, "Failed to audit human decision: {}", e);
        }

        self.publish_resolution(&decision).await;
        Ok(decision)
    }

    // ==================== Deadline sweep ====================

    /// Escalate lapsed pending decisions and rebuild lost escalation records.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, GovernanceError> {
        let mut report = SweepReport::default();

        for decision in self.decisions.list_by_status(DecisionStatus::Pending).await? {
            if !decision.deadline_lapsed(now) {
                continue;
            }
            let id = decision.id.clone();
            let result = match self.commit(decision, |d| Ok(lapse(d, now))).await {
                Ok(Commit::Committed(decision, transition)) => {
                    self.on_committed(&decision, &transition).await.map(|_| true)
                }
                Ok(Commit::Unchanged(_)) => Ok(false),
                Err(e) => Err(e),
            };
            match result {
                Ok(true) => {
                    info!(decision_id = %id, "Round deadline lapsed, decision escalated");
                    report.lapsed.push(id);
                }
                Ok(false) => {}
                Err(e) => {
                    error!(decision_id = %id, "Deadline escalation failed: {}", e);
                    report.failures += 1;
                }
            }
        }

        for decision in self.decisions.list_by_status(DecisionStatus::Escalated).await? {
            if !decision.needs_escalation_record() {
                continue;
            }
            let Some(reason) = decision.escalation_reason() else {
                continue;
            };
            match self.escalate(&decision, reason).await {
                Ok(outcome) if outcome.reused => {
                    debug!(
                        decision_id = %decision.id,
                        escalation_id = %outcome.id(),
                        "Linked escalation record persisted by another writer"
                    );
                }
                Ok(_) => {
                    info!(decision_id = %decision.id, "Rebuilt missing escalation record");
                    report.recovered.push(decision.id);
                }
                Err(e) => {
                    error!(decision_id = %decision.id, "Escalation recovery failed: {}", e);
                    report.failures += 1;
                }
            }
        }

        Ok(report)
    }

    // ==================== Commit & side effects ====================

    /// Evaluate, apply and compare-and-swap until the commit wins or the
    /// transition is no longer a change.
    async fn commit<F>(&self, mut snapshot: Decision, decide: F) -> Result<Commit, GovernanceError>
    where
        F: Fn(&Decision) -> Result<Transition, GovernanceError> + Send + Sync,
    {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let transition = decide(&snapshot)?;
            if !transition.is_change() {
                return Ok(Commit::Unchanged(transition));
            }
            let mut next = snapshot.clone();
            next.apply(&transition, Utc::now(), self.config.clevel_round_deadline);
            match self.decisions.compare_and_swap(next).await? {
                CasOutcome::Committed(stored) => return Ok(Commit::Committed(stored, transition)),
                CasOutcome::Stale(current) => {
                    debug!(
                        decision_id = %current.id,
                        version = current.version,
                        "Concurrent write, re-evaluating"
                    );
                    snapshot = current;
                }
                CasOutcome::Missing => return Err(GovernanceError::NotFound(snapshot.id)),
            }
        }
        Err(GovernanceError::Contention(snapshot.id))
    }

    async fn on_committed(
        &self,
        decision: &Decision,
        transition: &Transition,
    ) -> Result<VoteOutcome, GovernanceError> {
        match transition {
            Transition::Resolve { status } | Transition::Override { status, .. } => {
                info!(decision_id = %decision.id, status = %status, "Decision resolved");
                self.publish_resolution(decision).await;
                Ok(VoteOutcome::Resolved(*status))
            }
            Transition::AdvanceRound { round } => {
                info!(
                    decision_id = %decision.id,
                    round = round,
                    "HEAD split, opening C-level advisory round"
                );
                let request = self.vote_request(decision, *round, VoteAction::ProvideAnalysis);
                let message = AgentMessage::new(AgentId::orchestrator(), Recipient::CLevel, request)
                    .with_response_deadline(Utc::now() + self.config.clevel_round_deadline);
                self.publish(&Channel::CLevel, &message).await;
                Ok(VoteOutcome::AdvancedRound(*round))
            }
            Transition::Escalate { reason, .. } => {
                let outcome = self.escalate(decision, reason.clone()).await?;
                Ok(VoteOutcome::Escalated(outcome.id().clone()))
            }
            Transition::Noop | Transition::Await => Ok(VoteOutcome::Awaiting),
        }
    }

    async fn escalate(
        &self,
        decision: &Decision,
        reason: String,
    ) -> Result<EscalationOutcome, GovernanceError> {
        let request = EscalationRequest::new(reason).for_decision(decision.id.clone());
        let outcome = self
            .escalations
            .trigger_escalation(request)
            .await
            .map_err(|source| GovernanceError::Escalation {
                decision_id: decision.id.clone(),
                source,
            })?;
        self.decisions
            .attach_escalation(&decision.id, outcome.id().clone())
            .await?;
        Ok(outcome)
    }

    fn vote_request(&self, decision: &Decision, round: u32, action: VoteAction) -> MessageBody {
        MessageBody::VoteRequest(VoteRequestPayload {
            decision_id: decision.id.clone(),
            title: decision.title.clone(),
            description: decision.description.clone(),
            proposed_by: decision.proposed_by.clone(),
            decision_type: decision.decision_type,
            round,
            action,
            ceo_vote: decision.ceo_vote,
            dao_vote: decision.dao_vote,
        })
    }

    async fn publish_resolution(&self, decision: &Decision) {
        let body = MessageBody::DecisionResolved(ResolutionPayload {
            decision_id: decision.id.clone(),
            title: decision.title.clone(),
            result: decision.status,
            resolved_by: decision.resolution.clone().unwrap_or(Resolution::Consensus),
            veto_round: decision.veto_round,
        });
        let message = AgentMessage::new(AgentId::orchestrator(), Recipient::All, body);
        self.publish(&Channel::Broadcast, &message).await;
    }

    /// Publishing is best-effort; the deadline sweep covers lost messages.
    async fn publish(&self, channel: &Channel, message: &AgentMessage) {
        match self.bus.publish(channel, message).await {
            Ok(reached) => debug!(
                channel = %channel,
                kind = %message.message_type,
                reached = reached,
                "Published"
            ),
            Err(e) => warn!(
                channel = %channel,
                kind = %message.message_type,
                "Publish failed: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        MemoryAudit, MockDecisionStore, MockEscalationStore, RecordingBus, RecordingNotifier,
    };
    use boardroom_domain::{MessageKind, NotificationChannel};
    use chrono::Duration;

    // ==================== Fixture ====================

    struct Fixture {
        service: GovernanceService,
        decisions: Arc<MockDecisionStore>,
        escalations: Arc<MockEscalationStore>,
        notifier: Arc<RecordingNotifier>,
        bus: Arc<RecordingBus>,
        audit: Arc<MemoryAudit>,
    }

    fn fixture(config: GovernanceConfig) -> Fixture {
        let decisions = Arc::new(MockDecisionStore::default());
        let escalations = Arc::new(MockEscalationStore::default());
        let bus = Arc::new(RecordingBus::default());
        let audit = Arc::new(MemoryAudit::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = Arc::new(EscalationManager::new(
            escalations.clone(),
            notifier.clone(),
            vec![NotificationChannel::Dashboard],
        ));
        let service = GovernanceService::new(
            decisions.clone(),
            bus.clone(),
            manager,
            audit.clone(),
            config,
        );
        Fixture {
            service,
            decisions,
            escalations,
            notifier,
            bus,
            audit,
        }
    }

    async fn propose(f: &Fixture, title: &str) -> DecisionId {
        f.service
            .propose(
                &AgentId::new("cmo"),
                ProposalPayload::new(title, "").with_tier(boardroom_domain::DecisionTier::Minor),
            )
            .await
            .unwrap()
            .id
    }

    async fn vote(f: &Fixture, id: &DecisionId, voter: &str, value: VoteValue) -> VoteOutcome {
        f.service
            .cast_vote(VotePayload::new(id.clone(), voter, value))
            .await
            .unwrap()
    }

    // ==================== Propose ====================

    #[tokio::test]
    async fn test_propose_requests_head_votes() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch campaign").await;

        let decision = f.decisions.snapshot(&id);
        assert_eq!(decision.status, DecisionStatus::Pending);
        assert_eq!(decision.veto_round, 0);

        let requests = f.bus.on(&Channel::Head, MessageKind::VoteRequest);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].requires_response);
        match requests[0].body().unwrap() {
            MessageBody::VoteRequest(p) => {
                assert_eq!(p.decision_id, id);
                assert_eq!(p.round, 1);
                assert_eq!(p.action, VoteAction::CastVote);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_both_approve_resolves_once() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch campaign").await;

        assert_eq!(vote(&f, &id, "ceo", VoteValue::Approve).await, VoteOutcome::Awaiting);
        assert_eq!(
            vote(&f, &id, "dao", VoteValue::Approve).await,
            VoteOutcome::Resolved(DecisionStatus::Approved)
        );

        let decision = f.decisions.snapshot(&id);
        assert_eq!(decision.status, DecisionStatus::Approved);
        assert_eq!(decision.veto_round, 0);
        assert!(decision.resolved_at.is_some());
        assert_eq!(f.bus.count(MessageKind::DecisionResolved), 1);

        // A late vote is a no-op, not a second broadcast.
        assert_eq!(
            vote(&f, &id, "dao", VoteValue::Veto).await,
            VoteOutcome::AlreadyTerminal
        );
        assert_eq!(f.decisions.snapshot(&id).dao_vote, Some(VoteValue::Approve));
        assert_eq!(f.bus.count(MessageKind::DecisionResolved), 1);
    }

    #[tokio::test]
    async fn test_both_veto_in_reverse_order() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Cut budget").await;

        vote(&f, &id, "dao", VoteValue::Veto).await;
        vote(&f, &id, "ceo", VoteValue::Veto).await;

        assert_eq!(f.decisions.snapshot(&id).status, DecisionStatus::Vetoed);
        let resolved = f.bus.on(&Channel::Broadcast, MessageKind::DecisionResolved);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].payload["result"], "vetoed");
    }

    #[tokio::test]
    async fn test_split_opens_advisory_round_then_converges() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch campaign").await;

        vote(&f, &id, "ceo", VoteValue::Veto).await;
        assert_eq!(
            vote(&f, &id, "dao", VoteValue::Approve).await,
            VoteOutcome::AdvancedRound(1)
        );
        let decision = f.decisions.snapshot(&id);
        assert_eq!(decision.veto_round, 1);
        assert_eq!(decision.status, DecisionStatus::Pending);

        let advisory = f.bus.on(&Channel::CLevel, MessageKind::VoteRequest);
        assert_eq!(advisory.len(), 1);
        assert_eq!(advisory[0].payload["action"], "provide_analysis");
        assert_eq!(advisory[0].payload["ceoVote"], "veto");
        assert_eq!(advisory[0].payload["daoVote"], "approve");

        assert_eq!(
            vote(&f, &id, "ceo", VoteValue::Approve).await,
            VoteOutcome::Resolved(DecisionStatus::Approved)
        );
        assert_eq!(f.decisions.snapshot(&id).veto_round, 1);
    }

    #[tokio::test]
    async fn test_round_budget_exhaustion_escalates() {
        let f = fixture(GovernanceConfig::default().with_max_veto_rounds(3));
        let id = propose(&f, "Expand to APAC").await;

        vote(&f, &id, "ceo", VoteValue::Veto).await;
        assert_eq!(vote(&f, &id, "dao", VoteValue::Approve).await, VoteOutcome::AdvancedRound(1));
        assert_eq!(vote(&f, &id, "ceo", VoteValue::Veto).await, VoteOutcome::AdvancedRound(2));
        assert_eq!(vote(&f, &id, "dao", VoteValue::Approve).await, VoteOutcome::AdvancedRound(3));

        let outcome = vote(&f, &id, "ceo", VoteValue::Veto).await;
        assert!(matches!(outcome, VoteOutcome::Escalated(_)));

        let decision = f.decisions.snapshot(&id);
        assert_eq!(decision.status, DecisionStatus::Escalated);
        assert_eq!(decision.veto_round, 3);
        assert_eq!(decision.resolution, Some(Resolution::Deadlock));
        assert!(decision.escalation_id.is_some());

        let escalations = f.escalations.escalations.lock().unwrap().clone();
        assert_eq!(escalations.len(), 1);
        assert_eq!(
            escalations[0].reason,
            "Decision deadlock after 3 rounds: Expand to APAC"
        );
        assert_eq!(escalations[0].decision_id, Some(id.clone()));

        assert_eq!(
            vote(&f, &id, "dao", VoteValue::Veto).await,
            VoteOutcome::AlreadyTerminal
        );
        assert_eq!(f.escalations.escalations.lock().unwrap().len(), 1);
        assert_eq!(f.bus.count(MessageKind::DecisionResolved), 0);
    }

    #[tokio::test]
    async fn test_abstain_counts_as_disagreement() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Rebrand").await;
        vote(&f, &id, "ceo", VoteValue::Abstain).await;
        assert_eq!(
            vote(&f, &id, "dao", VoteValue::Abstain).await,
            VoteOutcome::AdvancedRound(1)
        );
    }

    // ==================== Concurrency ====================

    #[tokio::test]
    async fn test_stale_commit_reevaluates_latest_votes() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Hire CTO").await;
        vote(&f, &id, "ceo", VoteValue::Approve).await;

        // The CEO flips to veto between the DAO's re-read and its commit.
        *f.decisions.interleave.lock().unwrap() = Some((AgentRole::Ceo, VoteValue::Veto));
        let outcome = vote(&f, &id, "dao", VoteValue::Approve).await;

        assert_eq!(outcome, VoteOutcome::AdvancedRound(1));
        assert_eq!(f.bus.count(MessageKind::DecisionResolved), 0);
        let decision = f.decisions.snapshot(&id);
        assert_eq!(decision.ceo_vote, Some(VoteValue::Veto));
        assert_eq!(decision.status, DecisionStatus::Pending);
    }

    #[tokio::test]
    async fn test_concurrent_final_votes_broadcast_once() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Open office").await;
        vote(&f, &id, "ceo", VoteValue::Approve).await;

        let (a, b) = tokio::join!(
            vote(&f, &id, "dao", VoteValue::Approve),
            vote(&f, &id, "ceo", VoteValue::Approve)
        );
        let resolved = [&a, &b]
            .iter()
            .filter(|o| matches!(o, VoteOutcome::Resolved(_)))
            .count();
        assert_eq!(resolved, 1);
        assert_eq!(f.bus.count(MessageKind::DecisionResolved), 1);
    }

    // ==================== Benign drops ====================

    #[tokio::test]
    async fn test_benign_votes_are_dropped() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch campaign").await;

        let outcome = f
            .service
            .cast_vote(VotePayload::new(id.clone(), "intern", VoteValue::Approve))
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Dropped(DropReason::UnknownVoter(_))));

        let mut bad = VotePayload::new(id.clone(), "ceo", VoteValue::Approve);
        bad.vote = "maybe".to_string();
        let outcome = f.service.cast_vote(bad).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Dropped(DropReason::InvalidVote(_))));

        let outcome = vote(&f, &DecisionId::new("missing"), "ceo", VoteValue::Approve).await;
        assert!(matches!(outcome, VoteOutcome::Dropped(DropReason::UnknownDecision(_))));

        assert!(f.decisions.snapshot(&id).ceo_vote.is_none());
    }

    #[tokio::test]
    async fn test_clevel_vote_is_advisory_only() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch campaign").await;

        let outcome = f
            .service
            .cast_vote(
                VotePayload::opinion(id.clone(), "cfo", "approve")
                    .with_reasoning("within budget"),
            )
            .await
            .unwrap();
        assert_eq!(outcome, VoteOutcome::AdvisoryRecorded);

        let decision = f.decisions.snapshot(&id);
        assert_eq!(
            decision.c_level_votes.get(&AgentRole::Cfo).map(String::as_str),
            Some("approve: within budget")
        );
        assert!(decision.ceo_vote.is_none());
        assert_eq!(decision.status, DecisionStatus::Pending);
    }

    // ==================== Human override ====================

    #[tokio::test]
    async fn test_human_override_without_votes() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Emergency hire").await;

        let decision = f
            .service
            .human_override(&id, HumanVerdict::Approve, Some("board call".to_string()))
            .await
            .unwrap();
        assert_eq!(decision.status, DecisionStatus::Approved);
        assert_eq!(
            decision.resolution,
            Some(Resolution::Human {
                reason: Some("board call".to_string())
            })
        );

        let resolved = f.bus.on(&Channel::Broadcast, MessageKind::DecisionResolved);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].payload["resolvedBy"]["kind"], "human");

        let events = f.audit.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "human_decision");
    }

    #[tokio::test]
    async fn test_human_override_conflicts_on_resolved() {
        let f = fixture(GovernanceConfig::default());
        let id = propose(&f, "Launch").await;
        vote(&f, &id, "ceo", VoteValue::Veto).await;
        vote(&f, &id, "dao", VoteValue::Veto).await;

        let result = f
            .service
            .human_override(&id, HumanVerdict::Approve, None)
            .await;
        assert!(matches!(result, Err(GovernanceError::AlreadyResolved(_))));

        let result = f
            .service
            .human_override(&DecisionId::new("nope"), HumanVerdict::Approve, None)
            .await;
        assert!(matches!(result, Err(GovernanceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_human_override_settles_escalated_decision() {
        let f = fixture(GovernanceConfig::default().with_max_veto_rounds(0));
        let id = propose(&f, "Acquire startup").await;
        vote(&f, &id, "ceo", VoteValue::Veto).await;
        vote(&f, &id, "dao", VoteValue::Approve).await;
        assert_eq!(f.decisions.snapshot(&id).status, DecisionStatus::Escalated);

        let decision = f
            .service
            .human_override(&id, HumanVerdict::Reject, None)
            .await
            .unwrap();
        assert_eq!(decision.status, DecisionStatus::Vetoed);
    }

    // ==================== Sweep ====================

    #[tokio::test]
    async fn test_sweep_escalates_lapsed_rounds() {
        let f = fixture(GovernanceConfig::default());
        let stale = propose(&f, "Stale idea").await;
        vote(&f, &stale, "ceo", VoteValue::Approve).await;

        let report = f.service.sweep(Utc::now()).await.unwrap();
        assert!(report.is_empty());

        let report = f
            .service
            .sweep(Utc::now() + Duration::hours(25))
            .await
            .unwrap();
        assert_eq!(report.lapsed, vec![stale.clone()]);

        let decision = f.decisions.snapshot(&stale);
        assert_eq!(decision.status, DecisionStatus::Escalated);
        assert_eq!(decision.resolution, Some(Resolution::DeadlineLapsed));
        let escalations = f.escalations.escalations.lock().unwrap();
        assert_eq!(
            escalations[0].reason,
            "Decision deadline lapsed in round 0: Stale idea"
        );
    }

    #[tokio::test]
    async fn test_escalation_persist_failure_is_surfaced_and_recovered() {
        let f = fixture(GovernanceConfig::default().with_max_veto_rounds(0));
        let id = propose(&f, "Merge divisions").await;
        vote(&f, &id, "ceo", VoteValue::Veto).await;

        *f.escalations.fail_inserts.lock().unwrap() = true;
        let result = f
            .service
            .cast_vote(VotePayload::new(id.clone(), "dao", VoteValue::Approve))
            .await;
        assert!(matches!(result, Err(GovernanceError::Escalation { .. })));
        assert!(f.decisions.snapshot(&id).needs_escalation_record());

        *f.escalations.fail_inserts.lock().unwrap() = false;
        let report = f.service.sweep(Utc::now()).await.unwrap();
        assert_eq!(report.recovered, vec![id.clone()]);
        assert!(!f.decisions.snapshot(&id).needs_escalation_record());

        // Nothing left to recover on the next pass.
        assert!(f.service.sweep(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_during_slow_notification_keeps_one_record() {
        let f = fixture(GovernanceConfig::default().with_max_veto_rounds(0));
        *f.notifier.delay.lock().unwrap() = Some(std::time::Duration::from_millis(300));
        let id = propose(&f, "Close Berlin office").await;
        vote(&f, &id, "ceo", VoteValue::Veto).await;

        // The sweep lands while the deadlock notification is still in flight.
        let (outcome, report) = tokio::join!(
            vote(&f, &id, "dao", VoteValue::Approve),
            async {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                f.service.sweep(Utc::now()).await.unwrap()
            }
        );

        let escalations = f.escalations.escalations.lock().unwrap().clone();
        assert_eq!(escalations.len(), 1);
        assert_eq!(outcome, VoteOutcome::Escalated(escalations[0].id.clone()));
        assert!(report.recovered.is_empty());
        assert_eq!(
            f.decisions.snapshot(&id).escalation_id,
            Some(escalations[0].id.clone())
        );
        assert_eq!(f.notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_counts() {
        let f = fixture(GovernanceConfig::default().with_max_veto_rounds(0));
        propose(&f, "One").await;
        let two = propose(&f, "Two").await;
        vote(&f, &two, "ceo", VoteValue::Veto).await;
        vote(&f, &two, "dao", VoteValue::Approve).await;

        let counts = f.service.status_counts().await.unwrap();
        assert_eq!(counts.pending_decisions, 1);
        assert_eq!(counts.escalated_decisions, 1);
        assert_eq!(counts.pending_escalations, 1);
    }
}
