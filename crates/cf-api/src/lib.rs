//! HTTP surface for Context First
//!
//! Health and banner endpoints plus the CORS policy the frontend dev
//! server needs. Business routes mount here once the API layer lands.

#![warn(unreachable_pub)]

pub mod config;

pub use config::{ApiConfig, ApiConfigError};

use serde_json::json;
use warp::Filter;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "context-first-api";

/// All routes of the HTTP surface
#[must_use]
pub fn routes(
    config: &ApiConfig,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&json!({
                "status": "ok",
                "service": SERVICE_NAME,
            }))
        });

    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "message": "Context First API",
            "version": env!("CARGO_PKG_VERSION"),
        }))
    });

    let cors = warp::cors()
        .allow_origin(config.frontend_origin.as_str())
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"])
        .allow_credentials(true);

    health.or(root).with(cors)
}

/// Run the HTTP surface until the process is stopped
pub async fn serve(config: ApiConfig) {
    tracing::info!(bind = %config.bind, "http surface listening");
    warp::serve(routes(&config)).run(config.bind).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn health_reports_ok() {
        let routes = routes(&ApiConfig::default());

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&routes)
            .await;

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn root_reports_the_banner() {
        let routes = routes(&ApiConfig::default());

        let response = warp::test::request().path("/").reply(&routes).await;

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Context First API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unknown_path_is_rejected() {
        let routes = routes(&ApiConfig::default());

        let response = warp::test::request().path("/nope").reply(&routes).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn cors_allows_the_frontend_origin() {
        let routes = routes(&ApiConfig::default());

        let response = warp::test::request()
            .method("OPTIONS")
            .path("/health")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "GET")
            .reply(&routes)
            .await;

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn cors_rejects_unknown_origins() {
        let routes = routes(&ApiConfig::default());

        let response = warp::test::request()
            .method("OPTIONS")
            .path("/health")
            .header("origin", "http://evil.example")
            .header("access-control-request-method", "GET")
            .reply(&routes)
            .await;

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
