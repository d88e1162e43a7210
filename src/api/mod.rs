// src/api/mod.rs — HTTP JSON API for the dashboard front end

pub mod auth;
pub mod handlers;
pub mod types;

use axum::routing::{get, patch, post, put};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::analysis::debounce::SelectionDebouncer;
use crate::analysis::AnalysisService;
use crate::infra::config::ApiConfig;
use crate::roster::{Roster, UserId};

/// One debounced selection stream per viewer.
pub struct SelectionStreams {
    delay: Duration,
    streams: Mutex<HashMap<UserId, Arc<SelectionDebouncer>>>,
}

impl SelectionStreams {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            streams: Mutex::new(HashMap::new()),
        }
    }

    pub fn for_user(&self, user_id: UserId) -> Arc<SelectionDebouncer> {
        let mut streams = self
            .streams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            streams
                .entry(user_id)
                .or_insert_with(|| Arc::new(SelectionDebouncer::new(self.delay))),
        )
    }
}

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub roster: Arc<Roster>,
    pub service: Arc<AnalysisService>,
    pub selections: Arc<SelectionStreams>,
    pub token: Option<String>,
}

impl ApiState {
    pub fn new(
        roster: Arc<Roster>,
        service: Arc<AnalysisService>,
        debounce: Duration,
        token: Option<String>,
    ) -> Self {
        Self {
            roster,
            service,
            selections: Arc::new(SelectionStreams::new(debounce)),
            token,
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            axum::http::HeaderValue::from_static("http://localhost:3000"),
            axum::http::HeaderValue::from_static("http://localhost:5173"),
            axum::http::HeaderValue::from_static("http://127.0.0.1:3000"),
            axum::http::HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/stats", get(handlers::get_stats))
        .route("/api/v1/users/{id}/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/users/{id}/selection", post(handlers::select_employee))
        .route(
            "/api/v1/employees/{id}/analysis",
            get(handlers::get_analysis).post(handlers::create_analysis),
        )
        .route(
            "/api/v1/employees/{id}/action-plan",
            get(handlers::get_action_plan).post(handlers::create_action_plan),
        )
        .route(
            "/api/v1/employees/{id}/action-plan/steps/{index}",
            patch(handlers::update_step),
        )
        .route(
            "/api/v1/employees/{id}/training-effectiveness",
            put(handlers::rate_training),
        )
        .route("/api/v1/teams/analysis", post(handlers::team_analysis))
        .route("/api/v1/export.csv", get(handlers::export_csv))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(config: &ApiConfig, state: ApiState) -> anyhow::Result<()> {
    let port = config.port;
    let addr = format!("127.0.0.1:{port}");

    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down API server");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::offline::OfflineProvider;
    use crate::roster::sample;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state(token: Option<&str>) -> ApiState {
        ApiState::new(
            Arc::new(sample::roster().unwrap()),
            Arc::new(AnalysisService::new(Arc::new(OfflineProvider))),
            Duration::from_millis(500),
            token.map(String::from),
        )
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state(None));
        let req = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_required_when_configured() {
        let app = build_router(test_state(Some("s3cret")));
        let req = Request::builder()
            .uri("/api/v1/stats")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/api/v1/stats")
            .header("authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_selection_stream_per_user() {
        let streams = SelectionStreams::new(Duration::from_millis(500));
        let a = streams.for_user(101);
        let b = streams.for_user(101);
        let c = streams.for_user(102);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
