use crate::{types::HealthResponse, AppState};
use axum::{extract::State, Json};

/// Liveness plus credential presence (never values)
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credentials = &state.config.credentials;
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        api_keys_configured: state.config.api_keys_configured(),
        groq_configured: credentials.groq_configured(),
        tavily_configured: credentials.tavily_configured(),
        secret_key_configured: credentials.secret_key_configured(),
        model: state.config.llm.model.clone(),
        active_jobs: state.jobs.active_count(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
