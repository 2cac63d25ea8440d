//! HTTP API Handlers and Routes
//!
//! Built on Axum. JSON endpoints drive the research lifecycle; the HTML
//! pages are rendered server side.
//!
//! # Endpoints
//!
//! - `GET /` - Query form, optional `?error=` banner
//! - `POST /start_research` - Create a job and run it in the background
//! - `GET /research_progress/{id}` - Job snapshot for polling
//! - `GET /research_result/{id}` - Rendered report page
//! - `GET /download/{format}/{id}` - `markdown`, `pdf` or `json` attachment
//! - `GET /health` - Liveness and credential presence
//! - `GET /api-docs/openapi.json` - OpenAPI document

/// Request handlers for each endpoint.
pub mod handlers;
/// Router configuration and OpenAPI document.
pub mod routes;
/// HTML page templates.
pub mod views;
