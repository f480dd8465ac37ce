//! HTTP API
//!
//! An axum router over the governance and escalation use cases. Every
//! response body is an [`ApiResponse`] envelope.

mod error;
pub mod handlers;
mod response;
mod router;
mod state;

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use router::create_router;
pub use state::AppState;
