use crate::{
    api::handlers::{download, health, pages, research},
    research::{Job, JobStatus},
    types::{ErrorResponse, HealthResponse, StartResearchRequest, StartResearchResponse},
    AppState,
};
use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quarry API",
        description = "Background research jobs: web search, staged LLM analysis and report export"
    ),
    paths(
        research::start_research,
        research::research_progress,
        download::download_report,
        health::health_check
    ),
    components(schemas(
        StartResearchRequest,
        StartResearchResponse,
        HealthResponse,
        ErrorResponse,
        Job,
        JobStatus
    )),
    tags(
        (name = "research", description = "Research job lifecycle"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::index))
        .route("/start_research", post(research::start_research))
        .route(
            "/research_progress/{research_id}",
            get(research::research_progress),
        )
        .route(
            "/research_result/{research_id}",
            get(pages::research_result),
        )
        .route(
            "/download/{format}/{research_id}",
            get(download::download_report),
        )
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
