//! Auth HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserDto};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for auth handlers.
#[derive(Clone)]
pub struct AuthAppState {
    pub identity: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<UserDto>),
        (status = 409, description = "Username or email taken"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn register(
    State(state): State<AuthAppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .identity
        .register(&request.username, &request.email, &request.password)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthAppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let auth = state
        .identity
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        access_token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserDto::from(auth.user),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .identity
        .get_user(&user.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
