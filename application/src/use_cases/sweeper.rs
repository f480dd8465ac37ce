//! Periodic deadline sweep.
//!
//! Governance messages ride a non-durable bus, so a lost vote request would
//! otherwise leave a decision pending forever. The sweeper runs
//! [`GovernanceService::sweep`] on a fixed interval until cancelled.

use crate::use_cases::governance::GovernanceService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub struct DeadlineSweeper {
    governance: Arc<GovernanceService>,
    interval: Duration,
}

impl DeadlineSweeper {
    pub fn new(governance: Arc<GovernanceService>, interval: Duration) -> Self {
        Self {
            governance,
            interval,
        }
    }

    /// Sweep until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        // `interval` panics on a zero period.
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "Deadline sweeper started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            match self.governance.sweep(Utc::now()).await {
                Ok(report) if report.is_empty() => debug!("Sweep found nothing to do"),
                Ok(report) => info!(
                    lapsed = report.lapsed.len(),
                    recovered = report.recovered.len(),
                    failures = report.failures,
                    "Sweep finished"
                ),
                Err(e) => error!("Sweep failed: {}", e),
            }
        }
        info!("Deadline sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GovernanceConfig;
    use crate::test_support::{
        MemoryAudit, MockDecisionStore, MockEscalationStore, RecordingBus, RecordingNotifier,
    };
    use crate::use_cases::escalation::EscalationManager;
    use boardroom_domain::{AgentId, DecisionStatus, ProposalPayload};

    #[tokio::test]
    async fn test_sweeper_escalates_and_stops_on_cancel() {
        let decisions = Arc::new(MockDecisionStore::default());
        let manager = Arc::new(EscalationManager::new(
            Arc::new(MockEscalationStore::default()),
            Arc::new(RecordingNotifier::default()),
            vec![],
        ));
        let config = GovernanceConfig::default()
            .with_head_round_deadline(chrono::Duration::zero())
            .with_sweep_interval(Duration::from_millis(10));
        let governance = Arc::new(GovernanceService::new(
            decisions.clone(),
            Arc::new(RecordingBus::default()),
            manager,
            Arc::new(MemoryAudit::default()),
            config,
        ));
        let decision = governance
            .propose(&AgentId::new("coo"), ProposalPayload::new("Close site", ""))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let sweeper = DeadlineSweeper::new(governance, Duration::from_millis(10));
        let handle = tokio::spawn(sweeper.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(
            decisions.snapshot(&decision.id).status,
            DecisionStatus::Escalated
        );
    }
}
