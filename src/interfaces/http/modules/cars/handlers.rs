//! Car HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{AvailabilityRequest, AvailabilityResponse, CarDto, CreateCarRequest};
use crate::application::fleet::CarService;
use crate::application::reservations::ReservationService;
use crate::interfaces::http::common::{
    domain_error_response, parse_timestamp, ApiResponse, ValidatedJson,
};

/// Application state for car handlers.
#[derive(Clone)]
pub struct CarAppState {
    pub fleet: Arc<CarService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    request_body = CreateCarRequest,
    responses(
        (status = 200, description = "Car registered", body = ApiResponse<CarDto>),
        (status = 409, description = "License plate taken"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn create_car(
    State(state): State<CarAppState>,
    ValidatedJson(request): ValidatedJson<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarDto>>, (StatusCode, Json<ApiResponse<CarDto>>)> {
    let car = state
        .fleet
        .register_car(&request.brand, &request.model, &request.license_plate)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CarDto::from(car))))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All cars", body = ApiResponse<Vec<CarDto>>)
    )
)]
pub async fn list_cars(
    State(state): State<CarAppState>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, (StatusCode, Json<ApiResponse<Vec<CarDto>>>)> {
    let cars = state.fleet.list_cars().await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        cars.into_iter().map(CarDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/free",
    tag = "Cars",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cars with no live booking covering now", body = ApiResponse<Vec<CarDto>>)
    )
)]
pub async fn list_free_cars(
    State(state): State<CarAppState>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, (StatusCode, Json<ApiResponse<Vec<CarDto>>>)> {
    let cars = state
        .fleet
        .list_free_now()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        cars.into_iter().map(CarDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{car_id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("car_id" = i32, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(
    State(state): State<CarAppState>,
    Path(car_id): Path<i32>,
) -> Result<Json<ApiResponse<CarDto>>, (StatusCode, Json<ApiResponse<CarDto>>)> {
    let car = state
        .fleet
        .get_car(car_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(CarDto::from(car))))
}

#[utoipa::path(
    post,
    path = "/api/v1/cars/{car_id}/availability",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("car_id" = i32, Path, description = "Car ID")),
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability over the window", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Invalid window")
    )
)]
pub async fn check_availability(
    State(state): State<CarAppState>,
    Path(car_id): Path<i32>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<
    Json<ApiResponse<AvailabilityResponse>>,
    (StatusCode, Json<ApiResponse<AvailabilityResponse>>),
> {
    let start = parse_timestamp("start_date", &request.start_date).map_err(domain_error_response)?;
    let end = parse_timestamp("end_date", &request.end_date).map_err(domain_error_response)?;

    let available = state
        .reservations
        .check_availability(car_id, start, end)
        .await
        .map_err(domain_error_response)?;

    let message = if available {
        "Car is available in the requested window".to_string()
    } else {
        "Car is already booked in the requested window".to_string()
    };
    Ok(Json(ApiResponse::success(AvailabilityResponse {
        available,
        message,
    })))
}
