//! Agent messages: the envelope, typed bodies and channel names.

pub mod body;
pub mod channel;
pub mod envelope;

pub use body::{
    AlertPayload, MessageBody, MessageKind, ProposalPayload, ResolutionPayload,
    StatusResponsePayload, TaskPayload, VoteAction, VotePayload, VoteRequestPayload,
};
pub use channel::Channel;
pub use envelope::{AgentMessage, Priority, Recipient};
