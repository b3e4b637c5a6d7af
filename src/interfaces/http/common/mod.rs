//! Shared HTTP response types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Uniform response envelope for all endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload, `null` on error
    pub data: Option<T>,
    /// Error description, `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a domain error
pub fn domain_error_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto the standard error shape used by handlers
pub fn domain_error_response<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (domain_error_status(&e), Json(ApiResponse::error(e.to_string())))
}

/// Parse an ISO-8601 timestamp from a request field
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Validation(format!("Invalid {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_taxonomy() {
        assert_eq!(
            domain_error_status(&DomainError::not_found("Booking", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            domain_error_status(&DomainError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            domain_error_status(&DomainError::Conflict("taken".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            domain_error_status(&DomainError::Forbidden("not yours".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            domain_error_status(&DomainError::Storage("db gone".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339() {
        let ts = parse_timestamp("start_date", "2025-01-01T10:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-01T10:00:00+00:00");

        let err = parse_timestamp("start_date", "2025-01-01 10:00").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn error_envelope_skips_data() {
        let resp: ApiResponse<()> = ApiResponse::error("boom");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
