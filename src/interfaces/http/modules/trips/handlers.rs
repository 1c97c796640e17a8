//! Trip API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::debug;

use super::dto::{CreateTripRequest, TripListParams, UpdateTripRequest};
use crate::application::{PaginatedTrips, TripResponse, TripService};
use crate::domain::TripQuery;
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

const TRIP_NOT_FOUND: &str = "Trip not found";

#[derive(Clone)]
pub struct TripHandlerState {
    pub service: Arc<TripService>,
}

#[utoipa::path(
    get,
    path = "/api/trips",
    tag = "Trips",
    params(TripListParams),
    responses(
        (status = 200, description = "Page of trips", body = PaginatedTrips),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_trips(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<TripListParams>,
) -> Result<Json<PaginatedTrips>, ApiError> {
    let query = TripQuery::from(params);
    debug!(user_id = %user.user_id, ?query, "Listing trips");
    Ok(Json(state.service.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    tag = "Trips",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 404, description = "Trip not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_trip(
    State(state): State<TripHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ApiError> {
    state
        .service
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(TRIP_NOT_FOUND))
}

#[utoipa::path(
    post,
    path = "/api/trips",
    tag = "Trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = TripResponse),
        (status = 400, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_trip(
    State(state): State<TripHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), ApiError> {
    let trip = state.service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

#[utoipa::path(
    patch,
    path = "/api/trips/{id}",
    tag = "Trips",
    params(("id" = String, Path, description = "Trip id")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated", body = TripResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_trip(
    State(state): State<TripHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTripRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    state
        .service
        .update(&id, request.into())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(TRIP_NOT_FOUND))
}

#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    tag = "Trips",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 204, description = "Trip cancelled"),
        (status = 404, description = "Trip not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_trip(
    State(state): State<TripHandlerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.service.soft_delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(TRIP_NOT_FOUND))
    }
}
