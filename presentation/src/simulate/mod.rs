//! Scripted board simulation
//!
//! Runs a proposal through the live dispatcher with scripted CEO, DAO and
//! CFO agents on the bus, and reports how the decision settled.

mod agents;

pub use agents::{ScriptedAdvisor, ScriptedHead, Transcript};

use boardroom_application::{ChannelBus, EscalationError, GovernanceError, GovernanceService};
use boardroom_domain::{
    AgentId, AgentMessage, Channel, Decision, DecisionId, DecisionStatus, Escalation, MessageBody,
    MessageKind, ProposalPayload, Recipient, VoteAction, VoteValue,
};
use clap::ValueEnum;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL: Duration = Duration::from_millis(10);

/// Voting script for the two HEAD members
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// CEO and DAO both approve
    Consensus,
    /// CEO and DAO both veto
    Veto,
    /// DAO vetoes once, then approves after the advisory round
    Persuaded,
    /// DAO keeps vetoing until the decision escalates
    Deadlock,
}

impl Scenario {
    fn ceo_script(&self) -> Vec<VoteValue> {
        match self {
            Scenario::Veto => vec![VoteValue::Veto],
            _ => vec![VoteValue::Approve],
        }
    }

    fn dao_script(&self) -> Vec<VoteValue> {
        match self {
            Scenario::Consensus => vec![VoteValue::Approve],
            Scenario::Veto | Scenario::Deadlock => vec![VoteValue::Veto],
            Scenario::Persuaded => vec![VoteValue::Veto, VoteValue::Approve],
        }
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Simulation timed out after {0:?}: {1}")]
    Timeout(Duration, &'static str),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Escalation(#[from] EscalationError),
}

/// Outcome of one simulated proposal
#[derive(Debug)]
pub struct SimulationReport {
    pub scenario: Scenario,
    pub decision: Decision,
    pub escalation: Option<Escalation>,
    pub transcript: Vec<(Channel, AgentMessage)>,
}

/// Drives a proposal through a running orchestrator.
///
/// The caller must already have the dispatcher subscribed to the
/// orchestrator channel of `bus`.
pub struct Simulation {
    bus: Arc<dyn ChannelBus>,
    governance: Arc<GovernanceService>,
    timeout: Duration,
}

impl Simulation {
    pub fn new(bus: Arc<dyn ChannelBus>, governance: Arc<GovernanceService>) -> Self {
        Self {
            bus,
            governance,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn run(
        &self,
        scenario: Scenario,
        title: &str,
        parent: &CancellationToken,
    ) -> Result<SimulationReport, SimulationError> {
        let token = parent.child_token();
        let _guard = token.clone().drop_guard();
        let transcript = self.cast(scenario, &token);

        let proposal = AgentMessage::new(
            AgentId::new("cmo"),
            Recipient::Agent(AgentId::orchestrator()),
            MessageBody::Decision(ProposalPayload::new(
                title,
                format!("Simulated proposal ({scenario:?})"),
            )),
        );
        info!(scenario = ?scenario, "Starting simulation: {}", title);
        self.publish(&proposal).await;

        let (governance, transcript_ref) = (&self.governance, &transcript);
        let id = self
            .wait("vote request", move || async move {
                Ok::<_, SimulationError>(opened_decision(transcript_ref, title))
            })
            .await?;
        let id_ref = &id;
        let decision = self
            .wait("settled decision", move || async move {
                let decision = governance.get(id_ref).await?;
                Ok::<_, SimulationError>(decision.filter(settled))
            })
            .await?;
        if decision.escalation_id.is_none() {
            self.wait("resolution broadcast", move || async move {
                Ok::<_, SimulationError>(announced(transcript_ref, id_ref).then_some(()))
            })
            .await?;
        }

        let escalation = match &decision.escalation_id {
            Some(escalation_id) => self.governance.escalations().get(escalation_id).await?,
            None => None,
        };

        Ok(SimulationReport {
            scenario,
            decision,
            escalation,
            transcript: transcript.entries(),
        })
    }

    /// Subscribe the scripted cast and the transcript recorder.
    fn cast(&self, scenario: Scenario, token: &CancellationToken) -> Transcript {
        let bus = &self.bus;
        let ceo = Arc::new(ScriptedHead::new("ceo", scenario.ceo_script(), bus.clone()));
        let dao = Arc::new(ScriptedHead::new("dao", scenario.dao_script(), bus.clone()).with_revote());
        let cfo = Arc::new(ScriptedAdvisor::new(
            "cfo",
            "Cash runway supports it",
            bus.clone(),
        ));

        let transcript = Transcript::default();
        for channel in [
            Channel::Orchestrator,
            Channel::Head,
            Channel::CLevel,
            Channel::Broadcast,
        ] {
            bus.subscribe(&channel, transcript.recorder(channel.clone()), token);
        }

        bus.subscribe(&Channel::Head, ceo, token);
        bus.subscribe(&Channel::Head, dao.clone(), token);
        bus.subscribe(&Channel::CLevel, dao, token);
        bus.subscribe(&Channel::CLevel, cfo, token);
        transcript
    }

    async fn publish(&self, message: &AgentMessage) {
        if let Err(e) = self.bus.publish(&Channel::Orchestrator, message).await {
            warn!("Failed to publish simulated proposal: {}", e);
        }
    }

    async fn wait<T, F, Fut>(&self, what: &'static str, mut poll: F) -> Result<T, SimulationError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Option<T>, SimulationError>>,
    {
        let waited = tokio::time::timeout(self.timeout, async {
            loop {
                if let Some(found) = poll().await? {
                    return Ok(found);
                }
                tokio::time::sleep(POLL).await;
            }
        })
        .await;
        match waited {
            Ok(result) => result,
            Err(_) => Err(SimulationError::Timeout(self.timeout, what)),
        }
    }
}

/// Terminal, with the escalation attached when there is one.
fn settled(decision: &Decision) -> bool {
    match decision.status {
        DecisionStatus::Pending => false,
        DecisionStatus::Escalated => decision.escalation_id.is_some(),
        _ => true,
    }
}

fn opened_decision(transcript: &Transcript, title: &str) -> Option<DecisionId> {
    transcript
        .entries()
        .into_iter()
        .filter(|(channel, _)| *channel == Channel::Head)
        .find_map(|(_, message)| match message.body() {
            Ok(MessageBody::VoteRequest(request))
                if request.action == VoteAction::CastVote && request.title == title =>
            {
                Some(request.decision_id)
            }
            _ => None,
        })
}

fn announced(transcript: &Transcript, id: &DecisionId) -> bool {
    transcript.entries().iter().any(|(channel, message)| {
        *channel == Channel::Broadcast
            && message.kind() == Some(MessageKind::DecisionResolved)
            && matches!(message.body(), Ok(MessageBody::DecisionResolved(r)) if r.decision_id == *id)
    })
}
