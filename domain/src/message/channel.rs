//! Named pub/sub channels.

use crate::core::error::DomainError;
use crate::core::ids::AgentId;
use std::str::FromStr;

const PREFIX: &str = "channel:";
const AGENT_PREFIX: &str = "channel:agent:";

/// A named topic on the channel bus.
///
/// Wire names follow `channel:agent:<agentId>`, `channel:broadcast`,
/// `channel:head`, `channel:clevel` and `channel:orchestrator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Private inbox of a single agent.
    Agent(AgentId),
    /// Every agent.
    Broadcast,
    /// HEAD tier (CEO + DAO).
    Head,
    /// C-level advisory tier.
    CLevel,
    /// Inbound channel of the orchestrator.
    Orchestrator,
}

impl Channel {
    pub fn agent(id: impl Into<AgentId>) -> Self {
        Channel::Agent(id.into())
    }

    /// Wire name of the channel.
    pub fn name(&self) -> String {
        match self {
            Channel::Agent(id) => format!("{AGENT_PREFIX}{id}"),
            Channel::Broadcast => format!("{PREFIX}broadcast"),
            Channel::Head => format!("{PREFIX}head"),
            Channel::CLevel => format!("{PREFIX}clevel"),
            Channel::Orchestrator => format!("{PREFIX}orchestrator"),
        }
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(agent) = s.strip_prefix(AGENT_PREFIX) {
            if agent.is_empty() {
                return Err(DomainError::InvalidChannel(s.to_string()));
            }
            return Ok(Channel::Agent(AgentId::new(agent)));
        }
        match s.strip_prefix(PREFIX) {
            Some("broadcast") => Ok(Channel::Broadcast),
            Some("head") => Ok(Channel::Head),
            Some("clevel") | Some("c-level") => Ok(Channel::CLevel),
            Some("orchestrator") => Ok(Channel::Orchestrator),
            _ => Err(DomainError::InvalidChannel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
