//! Booking HTTP handlers
//!
//! The authenticated caller is resolved by the auth middleware; ownership
//! checks happen in the reservation service, not here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::{BookingDto, CancelBookingResponse, CreateBookingRequest, ListBookingsParams};
use crate::application::reservations::ReservationService;
use crate::interfaces::http::common::{
    domain_error_response, parse_timestamp, ApiResponse,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid window"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car already booked in the window")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let start = parse_timestamp("start_date", &request.start_date).map_err(domain_error_response)?;
    let end = parse_timestamp("end_date", &request.end_date).map_err(domain_error_response)?;

    let booking = state
        .reservations
        .create_booking(&user.user_id, request.car_id, start, end)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(ListBookingsParams),
    responses(
        (status = 200, description = "Bookings, optionally filtered by owner", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(params): Query<ListBookingsParams>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)> {
    let bookings = state
        .reservations
        .list_bookings(params.user_id.as_deref())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .reservations
        .get_booking(booking_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<CancelBookingResponse>),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<
    Json<ApiResponse<CancelBookingResponse>>,
    (StatusCode, Json<ApiResponse<CancelBookingResponse>>),
> {
    state
        .reservations
        .cancel_booking(booking_id, &user.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CancelBookingResponse {
        message: "Booking cancelled".to_string(),
    })))
}
