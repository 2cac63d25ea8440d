use crate::{api::views, render, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub error: Option<String>,
}

pub async fn index(Query(params): Query<IndexParams>) -> Html<String> {
    Html(views::index_page(params.error.as_deref()))
}

/// Rendered report, or the index page with an error banner
pub async fn research_result(
    State(state): State<AppState>,
    Path(research_id): Path<String>,
) -> Response {
    let Some(job) = state.jobs.get(&research_id) else {
        return (
            StatusCode::NOT_FOUND,
            Html(views::index_page(Some("Research not found"))),
        )
            .into_response();
    };

    if !job.is_completed() {
        return (
            StatusCode::BAD_REQUEST,
            Html(views::index_page(Some("Research not completed yet"))),
        )
            .into_response();
    }

    let report = render::render(job.result.as_deref().unwrap_or_default());
    Html(views::report_page(&job.id, &job.query, &report)).into_response()
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(views::index_page(Some("Page not found"))),
    )
}
