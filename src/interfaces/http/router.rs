//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CarService, ReservationService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, bookings, cars, health};
use crate::interfaces::http::modules::auth::AuthAppState;
use crate::interfaces::http::modules::bookings::BookingAppState;
use crate::interfaces::http::modules::cars::CarAppState;

/// Unified state for all routes. Axum extracts the specific handler state
/// via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<ReservationService>,
    pub fleet: Arc<CarService>,
    pub identity: Arc<UserService>,
    pub auth: AuthState,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for BookingAppState {
    fn from_ref(s: &AppState) -> Self {
        BookingAppState {
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for CarAppState {
    fn from_ref(s: &AppState) -> Self {
        CarAppState {
            fleet: Arc::clone(&s.fleet),
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for AuthAppState {
    fn from_ref(s: &AppState) -> Self {
        AuthAppState {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

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
                        .description(Some("JWT Bearer token"))
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
        health::handlers::health_check,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_current_user,
        // Cars
        cars::handlers::create_car,
        cars::handlers::list_cars,
        cars::handlers::list_free_cars,
        cars::handlers::get_car,
        cars::handlers::check_availability,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::cancel_booking,
    ),
    components(schemas(
        auth::dto::RegisterRequest,
        auth::dto::LoginRequest,
        auth::dto::LoginResponse,
        auth::dto::UserDto,
        cars::dto::CreateCarRequest,
        cars::dto::CarDto,
        cars::dto::AvailabilityRequest,
        cars::dto::AvailabilityResponse,
        bookings::dto::CreateBookingRequest,
        bookings::dto::BookingDto,
        bookings::dto::CancelBookingResponse,
        health::handlers::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Cars", description = "Fleet management"),
        (name = "Bookings", description = "Car reservations"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

/// Build the REST API router.
pub fn create_api_router(
    reservations: Arc<ReservationService>,
    fleet: Arc<CarService>,
    identity: Arc<UserService>,
    jwt_config: JwtConfig,
) -> Router {
    let state = AppState {
        reservations,
        fleet,
        identity,
        auth: AuthState { jwt_config },
    };

    let protected = Router::new()
        .route("/api/v1/auth/me", get(auth::handlers::get_current_user))
        .route(
            "/api/v1/cars",
            post(cars::handlers::create_car).get(cars::handlers::list_cars),
        )
        .route("/api/v1/cars/free", get(cars::handlers::list_free_cars))
        .route("/api/v1/cars/{car_id}", get(cars::handlers::get_car))
        .route(
            "/api/v1/cars/{car_id}/availability",
            post(cars::handlers::check_availability),
        )
        .route(
            "/api/v1/bookings",
            post(bookings::handlers::create_booking).get(bookings::handlers::list_bookings),
        )
        .route(
            "/api/v1/bookings/{booking_id}",
            get(bookings::handlers::get_booking).delete(bookings::handlers::cancel_booking),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(health::handlers::health_check))
        .route("/api/v1/auth/register", post(auth::handlers::register))
        .route("/api/v1/auth/login", post(auth::handlers::login));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(protected)
        .merge(public)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
