//! Observability HTTP Routes
//!
//! Landing page, health check, and the referential-integrity report.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::errors::ErrorEnvelope;
use crate::repository::ConsistencyReport;

use super::adapter::catch_async;
use super::server::page_not_found;
use super::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Landing response
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub name: &'static str,
    pub campgrounds: &'static str,
}

/// Landing page and health check
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(home_handler).fallback(page_not_found))
        .route("/health", get(health_handler).fallback(page_not_found))
}

/// Operator routes under /admin
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/admin/consistency",
            get(consistency_handler).fallback(page_not_found),
        )
        .with_state(state)
}

async fn home_handler() -> impl IntoResponse {
    Json(HomeResponse {
        name: "YelpCamp",
        campgrounds: "/campgrounds",
    })
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /admin/consistency: dangling references and orphan reviews.
/// Read-only; repair is a CLI operation.
async fn consistency_handler(
    State(state): State<AppState>,
) -> Result<Json<ConsistencyReport>, ErrorEnvelope> {
    catch_async("consistency_check", async move {
        Ok(Json(state.integrity.check().await?))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
    }
}
