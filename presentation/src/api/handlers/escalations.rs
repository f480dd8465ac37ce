//! Escalation handlers

use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use boardroom_application::EscalationRequest;
use boardroom_domain::{DecisionId, Escalation, EscalationId, NotificationChannel};
use serde::{Deserialize, Serialize};

/// Body of `POST /escalations/:id/respond`
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

/// Body of `POST /escalate`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateRequest {
    pub reason: String,
    #[serde(default)]
    pub decision_id: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailedDelivery {
    pub channel: NotificationChannel,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EscalateResponse {
    pub escalation: Escalation,
    pub delivered: Vec<NotificationChannel>,
    pub failed: Vec<FailedDelivery>,
    /// The decision was already escalated; the existing record is returned.
    #[serde(default)]
    pub reused: bool,
}

pub async fn list_pending_escalations(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Escalation>>>> {
    let pending = state.governance.escalations().pending().await?;
    Ok(Json(ApiResponse::ok(pending)))
}

/// Record the human response; the linked decision is not changed.
pub async fn respond_to_escalation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<RespondRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Escalation>>> {
    let Json(request) = request?;
    if request.response.trim().is_empty() {
        return Err(ApiError::BadRequest("response must not be empty".to_string()));
    }
    let escalation = state
        .governance
        .escalations()
        .respond_to_escalation(&EscalationId::new(id), &request.response)
        .await?;
    Ok(Json(ApiResponse::ok(escalation)))
}

/// Open a manual escalation.
pub async fn escalate(
    State(state): State<AppState>,
    request: Result<Json<EscalateRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<EscalateResponse>>> {
    let Json(request) = request?;
    let channels = request
        .channels
        .iter()
        .map(|raw| {
            raw.parse::<NotificationChannel>()
                .map_err(|_| ApiError::BadRequest(format!("unknown channel '{raw}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut escalation = EscalationRequest::new(request.reason).with_channels(channels);
    if let Some(decision_id) = request.decision_id {
        escalation = escalation.for_decision(DecisionId::new(decision_id));
    }

    let outcome = state
        .governance
        .escalations()
        .trigger_escalation(escalation)
        .await?;
    Ok(Json(ApiResponse::ok(EscalateResponse {
        escalation: outcome.escalation,
        delivered: outcome.delivered,
        failed: outcome
            .failed
            .into_iter()
            .map(|(channel, err)| FailedDelivery {
                channel,
                error: err.to_string(),
            })
            .collect(),
        reused: outcome.reused,
    })))
}
