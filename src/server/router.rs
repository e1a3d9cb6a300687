use axum::{Json, Router, http::Method, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers::handle_playlist, state::AppState};
use crate::config::ServerConfig;

/// Create the application router.
pub fn create_router(config: &ServerConfig, state: AppState) -> anyhow::Result<Router> {
    let cors = if config.cors_allowed_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(config.cors_allowed_origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/playlist", get(handle_playlist))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyClient;
    use axum::{body::Body, http::Request, http::StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let client = ProxyClient::new(Duration::from_secs(1)).unwrap();
        create_router(&ServerConfig::default(), AppState::new(client)).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_playlist_requires_url() {
        let response = app()
            .oneshot(Request::get("/playlist").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_playlist_rejects_invalid_url() {
        let response = app()
            .oneshot(
                Request::get("/playlist?url=not-a-url")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_playlist_rejects_negative_window() {
        let response = app()
            .oneshot(
                Request::get("/playlist?url=http://127.0.0.1:9/a.m3u8&window=-5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_cors_origin() {
        let client = ProxyClient::new(Duration::from_secs(1)).unwrap();
        let config = ServerConfig {
            cors_allowed_origin: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        assert!(create_router(&config, AppState::new(client)).is_err());
    }
}
