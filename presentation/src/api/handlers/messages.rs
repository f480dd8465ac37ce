//! Message injection handler

use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use boardroom_application::{DispatchError, DispatchOutcome};
use boardroom_domain::{AgentMessage, MessageId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectResponse {
    pub message_id: MessageId,
    /// `handled` or `unhandled`
    pub outcome: String,
    /// Message type tag as received
    pub kind: String,
}

/// Run an agent message through the dispatcher and report the outcome.
///
/// Decode failures are the caller's fault (400); handler failures are ours (500).
pub async fn inject_message(
    State(state): State<AppState>,
    message: Result<Json<AgentMessage>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<InjectResponse>>> {
    let Json(message) = message?;
    let message_id = message.id.clone();
    let kind = message.message_type.clone();

    let outcome = match state.dispatcher.process_message(message).await {
        DispatchOutcome::Handled(_) => "handled",
        DispatchOutcome::Unhandled(_) => "unhandled",
        DispatchOutcome::Failed(err @ DispatchError::Decode { .. }) => {
            return Err(ApiError::BadRequest(err.to_string()));
        }
        DispatchOutcome::Failed(err) => return Err(ApiError::Internal(err.to_string())),
    };

    Ok(Json(ApiResponse::ok(InjectResponse {
        message_id,
        outcome: outcome.to_string(),
        kind,
    })))
}
