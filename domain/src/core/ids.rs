//! Identifier value objects.
//!
//! Every identifier is an opaque string newtype. Generated identifiers use
//! UUID v4; identifiers received over the wire are accepted verbatim.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a new unique identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an [`AgentMessage`](crate::message::AgentMessage).
    MessageId
);

string_id!(
    /// Identifier of a [`Decision`](crate::governance::Decision).
    DecisionId
);

string_id!(
    /// Identifier of an [`Escalation`](crate::governance::Escalation).
    EscalationId
);

string_id!(
    /// Identifier of a queued task.
    TaskId
);

string_id!(
    /// Identifier of an agent (e.g. `"ceo"`, `"cmo-1"`, `"orchestrator"`).
    AgentId
);

impl AgentId {
    /// The orchestrator's own sender id.
    pub fn orchestrator() -> Self {
        Self::new("orchestrator")
    }

    /// Sender id used for actions submitted by a human operator.
    pub fn human() -> Self {
        Self::new("human")
    }
}
