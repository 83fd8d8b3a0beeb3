use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "gsc-backend";

/// Liveness payload; says nothing about the database.
#[derive(Debug, Clone, Serialize)]
pub struct Heartbeat {
    pub name: &'static str,
    pub status: &'static str,
}

/// GET /heartbeat
pub async fn heartbeat_handler() -> Json<Heartbeat> {
    Json(Heartbeat {
        name: SERVICE_NAME,
        status: "running",
    })
}
