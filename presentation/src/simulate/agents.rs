//! Scripted board members that answer vote requests over the bus.

use async_trait::async_trait;
use boardroom_application::{ChannelBus, MessageSink};
use boardroom_domain::{
    AgentId, AgentMessage, Channel, MessageBody, Recipient, VoteAction, VotePayload,
    VoteRequestPayload, VoteValue,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// A HEAD member casting a predetermined vote per round.
///
/// Round `n` uses `script[n]`, the last entry repeating once the script
/// runs out. Members that do not `revote` only answer the opening request.
pub struct ScriptedHead {
    role: &'static str,
    script: Vec<VoteValue>,
    revote: bool,
    bus: Arc<dyn ChannelBus>,
}

impl ScriptedHead {
    pub fn new(role: &'static str, script: Vec<VoteValue>, bus: Arc<dyn ChannelBus>) -> Self {
        Self {
            role,
            script,
            revote: false,
            bus,
        }
    }

    /// Also re-vote whenever an advisory round opens.
    pub fn with_revote(mut self) -> Self {
        self.revote = true;
        self
    }

    fn ballot(&self, round: u32) -> Option<VoteValue> {
        let last = self.script.len().checked_sub(1)?;
        let index = usize::try_from(round).unwrap_or(usize::MAX).min(last);
        self.script.get(index).copied()
    }

    fn answers(&self, request: &VoteRequestPayload) -> bool {
        match request.action {
            VoteAction::CastVote => true,
            VoteAction::ProvideAnalysis => self.revote,
        }
    }
}

#[async_trait]
impl MessageSink for ScriptedHead {
    async fn deliver(&self, message: AgentMessage) {
        let Some(request) = vote_request(&message) else {
            return;
        };
        if !self.answers(&request) {
            return;
        }
        // The opening request is round 1 but the first scripted ballot.
        let round = match request.action {
            VoteAction::CastVote => 0,
            VoteAction::ProvideAnalysis => request.round,
        };
        let Some(vote) = self.ballot(round) else {
            return;
        };
        debug!(role = self.role, round = request.round, vote = %vote, "Scripted vote");
        let body = MessageBody::Vote(VotePayload::new(request.decision_id, self.role, vote));
        send(self.bus.as_ref(), self.role, body).await;
    }
}

/// A C-level member replying to each advisory round with an opinion.
pub struct ScriptedAdvisor {
    role: &'static str,
    opinion: String,
    bus: Arc<dyn ChannelBus>,
}

impl ScriptedAdvisor {
    pub fn new(role: &'static str, opinion: impl Into<String>, bus: Arc<dyn ChannelBus>) -> Self {
        Self {
            role,
            opinion: opinion.into(),
            bus,
        }
    }
}

#[async_trait]
impl MessageSink for ScriptedAdvisor {
    async fn deliver(&self, message: AgentMessage) {
        let Some(request) = vote_request(&message) else {
            return;
        };
        if request.action != VoteAction::ProvideAnalysis {
            return;
        }
        let body = MessageBody::Vote(
            VotePayload::opinion(request.decision_id, self.role, "advise")
                .with_reasoning(format!("{} (round {})", self.opinion, request.round)),
        );
        send(self.bus.as_ref(), self.role, body).await;
    }
}

/// Every message seen on the observed channels, in arrival order.
#[derive(Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<(Channel, AgentMessage)>>>,
}

impl Transcript {
    pub fn recorder(&self, channel: Channel) -> Arc<dyn MessageSink> {
        Arc::new(Recorder {
            channel,
            entries: self.entries.clone(),
        })
    }

    pub fn entries(&self) -> Vec<(Channel, AgentMessage)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

struct Recorder {
    channel: Channel,
    entries: Arc<Mutex<Vec<(Channel, AgentMessage)>>>,
}

#[async_trait]
impl MessageSink for Recorder {
    async fn deliver(&self, message: AgentMessage) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((self.channel.clone(), message));
    }
}

fn vote_request(message: &AgentMessage) -> Option<VoteRequestPayload> {
    match message.body() {
        Ok(MessageBody::VoteRequest(request)) => Some(request),
        _ => None,
    }
}

async fn send(bus: &dyn ChannelBus, from: &'static str, body: MessageBody) {
    let message = AgentMessage::new(
        AgentId::new(from),
        Recipient::Agent(AgentId::orchestrator()),
        body,
    );
    if let Err(e) = bus.publish(&Channel::Orchestrator, &message).await {
        warn!(agent = from, "Scripted agent could not publish: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_application::{BusError, Subscription};
    use boardroom_domain::{DecisionId, DecisionTier};
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct Outbox(Mutex<Vec<AgentMessage>>);

    #[async_trait]
    impl ChannelBus for Outbox {
        async fn publish(&self, _: &Channel, message: &AgentMessage) -> Result<usize, BusError> {
            self.0.lock().unwrap().push(message.clone());
            Ok(1)
        }

        fn subscribe(
            &self,
            channel: &Channel,
            _: Arc<dyn MessageSink>,
            parent: &CancellationToken,
        ) -> Subscription {
            Subscription::new(channel.clone(), parent.child_token())
        }
    }

    fn request(action: VoteAction, round: u32) -> AgentMessage {
        AgentMessage::new(
            AgentId::orchestrator(),
            Recipient::Head,
            MessageBody::VoteRequest(VoteRequestPayload {
                decision_id: DecisionId::new("d-1"),
                title: "Expand".to_string(),
                description: String::new(),
                proposed_by: AgentId::new("cmo"),
                decision_type: DecisionTier::Major,
                round,
                action,
                ceo_vote: None,
                dao_vote: None,
            }),
        )
    }

    fn votes(outbox: &Outbox) -> Vec<VotePayload> {
        outbox
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|m| match m.body().unwrap() {
                MessageBody::Vote(v) => v,
                other => panic!("unexpected body {other:?}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_head_follows_script_and_repeats_last() {
        let outbox = Arc::new(Outbox::default());
        let dao = ScriptedHead::new(
            "dao",
            vec![VoteValue::Veto, VoteValue::Approve],
            outbox.clone(),
        )
        .with_revote();

        dao.deliver(request(VoteAction::CastVote, 1)).await;
        dao.deliver(request(VoteAction::ProvideAnalysis, 1)).await;
        dao.deliver(request(VoteAction::ProvideAnalysis, 5)).await;

        let cast: Vec<_> = votes(&outbox).into_iter().map(|v| v.vote).collect();
        assert_eq!(cast, vec!["veto", "approve", "approve"]);
    }

    #[tokio::test]
    async fn test_head_without_revote_ignores_advisory_rounds() {
        let outbox = Arc::new(Outbox::default());
        let ceo = ScriptedHead::new("ceo", vec![VoteValue::Approve], outbox.clone());

        ceo.deliver(request(VoteAction::ProvideAnalysis, 1)).await;
        assert!(votes(&outbox).is_empty());

        ceo.deliver(request(VoteAction::CastVote, 1)).await;
        assert_eq!(votes(&outbox).len(), 1);
    }

    #[tokio::test]
    async fn test_advisor_only_answers_analysis_requests() {
        let outbox = Arc::new(Outbox::default());
        let cfo = ScriptedAdvisor::new("cfo", "Budget allows it", outbox.clone());

        cfo.deliver(request(VoteAction::CastVote, 1)).await;
        cfo.deliver(request(VoteAction::ProvideAnalysis, 2)).await;

        let cast = votes(&outbox);
        assert_eq!(cast.len(), 1);
        assert_eq!(cast[0].voter_type, "cfo");
        assert_eq!(cast[0].reasoning.as_deref(), Some("Budget allows it (round 2)"));
    }
}
