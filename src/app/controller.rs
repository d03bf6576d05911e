//! HTTP controller - routes requests to the application service.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::app::AppState;

/// Body of the `/health` response.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `"ok"` or `"error"`
    pub status: &'static str,
    /// `"up"` or `"down"`
    pub database: &'static str,
}

/// Root controller routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_hello))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_hello(State(state): State<AppState>) -> &'static str {
    state.service.get_hello()
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "ok",
                database: "up",
            }),
        ),
        Err(e) => {
            warn!("Database ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: "error",
                    database: "down",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{init_test_tracing, test_state};
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    async fn send(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_root_returns_greeting() {
        init_test_tracing();
        let (status, body) = send(router(test_state(DatabaseConnection::Disconnected)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Hello World!");
    }

    #[tokio::test]
    async fn test_health_with_live_database() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let (status, body) = send(router(test_state(db)), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "database": "up"}));
    }

    #[tokio::test]
    async fn test_health_with_disconnected_database() {
        let (status, body) =
            send(router(test_state(DatabaseConnection::Disconnected)), "/health").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["database"], "down");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) =
            send(router(test_state(DatabaseConnection::Disconnected)), "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
