// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_json, dashboard_page, export_pdf, health_check, list_metros, retry, select_metro,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the dashboard router. When `data_dir` is set, the per-metro JSON
/// files are served from it under /data.
pub fn create_router(state: Arc<AppState>, data_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(dashboard_page))
        .route("/dashboard", get(dashboard_json))
        .route("/metros", get(list_metros))
        .route("/metros/:id/select", post(select_metro))
        .route("/retry", post(retry))
        .route("/export.pdf", get(export_pdf))
        .with_state(state);

    if let Some(dir) = data_dir {
        router = router.nest_service("/data", ServeDir::new(dir));
    }

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::metro_loader::tests::FakeRepository;
    use crate::application::metro_loader::MetroDataLoader;
    use crate::domain::metro::{Metro, MetroCatalog};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state(repository: FakeRepository) -> Arc<AppState> {
        let catalog = Arc::new(
            MetroCatalog::new(vec![
                Metro::new("santa-clara", "Santa Clara", "Santa Clara County"),
                Metro::new("austin", "Austin", "Austin Metro"),
            ])
            .unwrap(),
        );
        let initial = catalog.first().clone();
        let loader = MetroDataLoader::new(Arc::new(repository));
        Arc::new(AppState {
            dashboard_service: DashboardService::new(catalog, loader, initial),
        })
    }

    async fn fetch(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        send(router, Method::GET, uri).await
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = create_router(test_state(FakeRepository::default()), None);

        let (status, _, body) = fetch(&router, "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_dashboard_flow() {
        let state = test_state(FakeRepository::default());
        let router = create_router(state.clone(), None);

        let (_, _, body) = fetch(&router, "/dashboard").await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["view"]["state"], "loading");

        let (status, _, _) = fetch(&router, "/export.pdf").await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        state.dashboard_service.start().await.await.unwrap();

        let (status, _, body) = fetch(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("Santa Clara County"));
        assert!(html.contains("Pipeline by Stage"));

        let (status, headers, body) = fetch(&router, "/export.pdf").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_select_metro_redirects_and_starts_loading() {
        let state = test_state(FakeRepository::default());
        let router = create_router(state.clone(), None);
        state.dashboard_service.start().await.await.unwrap();

        let (status, headers, _) = send(&router, Method::POST, "/metros/austin/select").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/");
        assert_eq!(state.dashboard_service.snapshot().await.selected.id, "austin");

        let (status, _, _) = send(&router, Method::POST, "/metros/denver/select").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_load_renders_retry() {
        let state = test_state(FakeRepository {
            fail_analytics: true,
            ..Default::default()
        });
        let router = create_router(state.clone(), None);
        state.dashboard_service.start().await.await.unwrap();

        let (_, _, body) = fetch(&router, "/").await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("Failed to load data for Santa Clara County. Please try again."));
        assert!(html.contains(r#"action="/retry""#));

        let (status, _, _) = send(&router, Method::POST, "/retry").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_state_changes_reject_get() {
        let state = test_state(FakeRepository::default());
        let router = create_router(state.clone(), None);
        state.dashboard_service.start().await.await.unwrap();

        let (status, _, _) = fetch(&router, "/metros/austin/select").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _, _) = fetch(&router, "/retry").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(state.dashboard_service.snapshot().await.selected.id, "santa-clara");
        assert!(state.dashboard_service.snapshot().await.data().is_some());
    }

    #[tokio::test]
    async fn test_list_metros() {
        let router = create_router(test_state(FakeRepository::default()), None);

        let (_, _, body) = fetch(&router, "/metros").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json[0]["id"], "santa-clara");
        assert_eq!(json[1]["display"], "Austin Metro");
    }
}
