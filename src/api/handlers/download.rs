use crate::{
    export::ExportFormat,
    types::{AppError, ErrorResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

/// Download a completed report as markdown, pdf or json
#[utoipa::path(
    get,
    path = "/download/{format}/{research_id}",
    params(
        ("format" = String, Path, description = "markdown, pdf or json"),
        ("research_id" = String, Path, description = "Id of a completed job")
    ),
    responses(
        (status = 200, description = "File attachment"),
        (status = 400, description = "Not completed or invalid format", body = ErrorResponse),
        (status = 404, description = "Unknown research id", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn download_report(
    State(state): State<AppState>,
    Path((format, research_id)): Path<(String, String)>,
) -> Result<Response> {
    let job = state
        .jobs
        .get(&research_id)
        .ok_or_else(|| AppError::NotFound("Research not found".to_string()))?;

    if !job.is_completed() {
        return Err(AppError::InvalidInput("Research not completed".to_string()));
    }

    let format: ExportFormat = format.parse()?;
    let report = job.result.unwrap_or_default();

    let file = state
        .exporter
        .export(format, &report, &job.query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %format, "Export failed"))?;

    tracing::info!(path = %file.path.display(), "Serving export");
    Ok((
        [
            (header::CONTENT_TYPE, file.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
