//! Visitor heartbeat endpoint feeding the advisory presence map.

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::presence::PresenceMap;

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub visitor_id: String,
}

/// POST /api/presence/heartbeat - Record that a visitor is active.
/// Best effort only; the map resets on restart.
pub async fn heartbeat(Json(payload): Json<HeartbeatRequest>) -> ApiResult<Value> {
    if payload.visitor_id.trim().is_empty() {
        return Err(ApiError::validation_error("visitor_id required"));
    }

    PresenceMap::instance().touch(payload.visitor_id.trim());

    Ok(ApiResponse::success(json!({ "message": "ok" })))
}
