//! API Router with Swagger UI

use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthResponse, AuthService, AuthUser, PaginatedTrips, TripResponse, TripService};
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::shared::PaginationMeta;

use super::modules::{auth, health, metrics, trips};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        health::api_info,
        // Auth
        auth::login,
        auth::register,
        // Trips
        trips::list_trips,
        trips::get_trip,
        trips::create_trip,
        trips::update_trip,
        trips::delete_trip,
    ),
    components(
        schemas(
            ErrorBody,
            PaginationMeta,
            health::HealthResponse,
            health::ApiInfo,
            health::ApiEndpoints,
            auth::LoginRequest,
            auth::RegisterRequest,
            AuthResponse,
            AuthUser,
            trips::CreateTripRequest,
            trips::UpdateTripRequest,
            TripResponse,
            PaginatedTrips,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and API description"),
        (name = "Authentication", description = "Login and registration, JWT issuance"),
        (name = "Trips", description = "Fuel delivery trips: search, paging, create, update, cancel"),
    ),
    info(
        title = "Fuel Track API",
        version = "1.0.0",
        description = "REST API for scheduling and tracking fuel delivery trips",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running server
#[derive(Clone)]
pub struct RouterContext {
    pub trip_service: Arc<TripService>,
    pub auth_service: Arc<AuthService>,
    pub environment: String,
    /// `None` disables rate limiting on `/api`
    pub rate_limiter: Option<Arc<RateLimiter>>,
    /// `None` leaves `/metrics` unmounted
    pub metrics: Option<PrometheusHandle>,
}

/// Create the API router with all routes
pub fn create_api_router(ctx: RouterContext) -> Router {
    let auth_guard = AuthState {
        verifier: ctx.auth_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth::AuthHandlerState {
            service: ctx.auth_service.clone(),
        });

    // Trip routes (protected)
    let trip_routes = Router::new()
        .route("/", get(trips::list_trips).post(trips::create_trip))
        .route(
            "/{id}",
            get(trips::get_trip)
                .put(trips::update_trip)
                .patch(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .layer(middleware::from_fn_with_state(auth_guard, auth_middleware))
        .with_state(trips::TripHandlerState {
            service: ctx.trip_service.clone(),
        });

    let mut api_routes = Router::new()
        .route("/api", get(health::api_info))
        .nest("/api/auth", auth_routes)
        .nest("/api/trips", trip_routes);

    if let Some(limiter) = ctx.rate_limiter {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            environment: ctx.environment,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(api_routes);

    if let Some(handle) = ctx.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
