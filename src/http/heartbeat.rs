//! Liveness probe.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    status: &'static str,
}

pub fn routes() -> Router {
    Router::new().route("/heartbeat", get(heartbeat))
}

async fn heartbeat() -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse { status: "ok" })
}
