//! Health handler

use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::ApiResult;
use axum::{Json, extract::State};
use boardroom_domain::StatusResponsePayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    pub governance: StatusResponsePayload,
}

pub async fn health_check(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<HealthResponse>>> {
    let governance = state.governance.status_counts().await?;
    Ok(Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        governance,
    })))
}
