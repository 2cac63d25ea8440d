use crate::{
    research::{coordinator::spawn_research, Job},
    types::{AppError, ErrorResponse, Result, StartResearchRequest, StartResearchResponse},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

/// Start a background research job
#[utoipa::path(
    post,
    path = "/start_research",
    request_body = StartResearchRequest,
    responses(
        (status = 200, description = "Research started", body = StartResearchResponse),
        (status = 400, description = "Missing or empty query", body = ErrorResponse),
        (status = 500, description = "API keys not configured", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn start_research(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StartResearchRequest>, JsonRejection>,
) -> Result<Json<StartResearchResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected start_research body");
        AppError::InvalidInput("Request must be JSON with a query field".to_string())
    })?;

    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter a research query".to_string(),
        ));
    }

    if !state.config.api_keys_configured() {
        tracing::error!("Research requested without GROQ_API_KEY/TAVILY_API_KEY");
        return Err(AppError::Config(
            "API keys not found. Please check your .env file".to_string(),
        ));
    }

    let research_id = state.jobs.create(query.to_string());
    tracing::info!(research_id = %research_id, "Research job created");

    spawn_research(
        &state.tasks,
        state.coordinator.clone(),
        research_id.clone(),
        query.to_string(),
    );

    Ok(Json(StartResearchResponse {
        research_id,
        status: "started".to_string(),
    }))
}

/// Current snapshot of a research job
#[utoipa::path(
    get,
    path = "/research_progress/{research_id}",
    params(("research_id" = String, Path, description = "Id returned by /start_research")),
    responses(
        (status = 200, description = "Job snapshot", body = Job),
        (status = 404, description = "Unknown research id", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn research_progress(
    State(state): State<AppState>,
    Path(research_id): Path<String>,
) -> Result<Json<Job>> {
    state
        .jobs
        .get(&research_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Research ID not found".to_string()))
}
