// HTTP request handlers
use crate::application::dashboard_service::DashboardError;
use crate::domain::metro::Metro;
use crate::infrastructure::http_response::pdf_download_response;
use crate::presentation::app_state::AppState;
use crate::presentation::html::render_page;
use crate::presentation::view::{render, DashboardPage};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the metros the dashboard can switch between
pub async fn list_metros(State(state): State<Arc<AppState>>) -> Json<Vec<Metro>> {
    Json(state.dashboard_service.catalog().all().to_vec())
}

async fn current_page(state: &AppState) -> DashboardPage {
    let snapshot = state.dashboard_service.snapshot().await;
    render(&snapshot, state.dashboard_service.catalog())
}

/// Render the dashboard as HTML
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&current_page(&state).await))
}

/// Render the dashboard view model as JSON
pub async fn dashboard_json(State(state): State<Arc<AppState>>) -> Json<DashboardPage> {
    Json(current_page(&state).await)
}

/// Switch the selected metro, then send the browser back to the dashboard
pub async fn select_metro(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.select_metro(&id).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e @ DashboardError::UnknownMetro(_)) => {
            tracing::warn!("Rejected metro selection: {}", e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

/// Re-run the whole load cycle for the selected metro
pub async fn retry(State(state): State<Arc<AppState>>) -> Redirect {
    let _ = state.dashboard_service.retry().await;
    Redirect::to("/")
}

/// Download the project table as a PDF
pub async fn export_pdf(State(state): State<Arc<AppState>>) -> Response {
    let today = chrono::Local::now().date_naive();

    match state.dashboard_service.export(today).await {
        Ok(Some(export)) => match pdf_download_response(export) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Error exporting PDF: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
