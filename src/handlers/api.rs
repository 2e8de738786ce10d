use axum::response::Json;
use serde::{Deserialize, Serialize};

pub const HEALTH_MESSAGE: &str = "Twilio Media Stream Server is running!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Liveness check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}
