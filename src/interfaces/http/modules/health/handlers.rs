//! Health check and API info handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::trips::dto::to_iso;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    /// Deployment environment name, e.g. `development`
    pub environment: String,
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub timestamp: String,
    #[schema(example = "development")]
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiEndpoints {
    pub auth: String,
    pub trips: String,
}

/// `GET /api` response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub endpoints: ApiEndpoints,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: to_iso(Utc::now()),
        environment: state.environment,
    })
}

#[utoipa::path(
    get,
    path = "/api",
    tag = "Health",
    responses((status = 200, description = "API description", body = ApiInfo))
)]
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Fuel Track API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ApiEndpoints {
            auth: "/api/auth".to_string(),
            trips: "/api/trips".to_string(),
        },
    })
}
