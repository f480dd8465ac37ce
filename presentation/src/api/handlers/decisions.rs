//! Decision handlers

use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use boardroom_domain::{Decision, DecisionId, DecisionStatus, HumanVerdict};
use serde::Deserialize;

/// Body of `POST /decisions/:id/human-decision`
#[derive(Debug, Deserialize)]
pub struct HumanDecisionRequest {
    /// `approve` or `reject`
    pub decision: String,
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn list_pending_decisions(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Decision>>>> {
    let decisions = state.governance.list(DecisionStatus::Pending).await?;
    Ok(Json(ApiResponse::ok(decisions)))
}

pub async fn list_escalated_decisions(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Decision>>>> {
    let decisions = state.governance.list(DecisionStatus::Escalated).await?;
    Ok(Json(ApiResponse::ok(decisions)))
}

pub async fn get_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Decision>>> {
    let decision = state
        .governance
        .get(&DecisionId::new(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Decision {id} not found")))?;
    Ok(Json(ApiResponse::ok(decision)))
}

/// Settle a pending or escalated decision by human verdict.
pub async fn human_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<HumanDecisionRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Decision>>> {
    let Json(request) = request?;
    let verdict: HumanVerdict = request.decision.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "decision must be 'approve' or 'reject', got '{}'",
            request.decision
        ))
    })?;

    let reason = request.reason.filter(|r| !r.trim().is_empty());
    let decision = state
        .governance
        .human_override(&DecisionId::new(&id), verdict, reason)
        .await?;

    tracing::info!(decision_id = %id, status = %decision.status, "Human decision recorded");
    Ok(Json(ApiResponse::ok(decision)))
}
