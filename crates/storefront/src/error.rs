//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Admission outcomes are not
//! errors: the guard extractors redirect on their own and never produce an
//! `AppError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Booking API call failed.
    #[error("Booking API error: {0}")]
    Api(#[from] ApiError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::Status { status, .. }) if status.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            Self::Api(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) => "Internal error".to_string(),
            Self::Api(err) if err.is_unauthorized() => "Invalid credentials".to_string(),
            Self::Api(ApiError::Status { status, message }) if status.is_client_error() => {
                message.clone()
            }
            Self::Api(_) => "Booking service unavailable".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = AppError::Storage(StorageError::Corrupt("x".to_string()));
        assert!(err.to_string().starts_with("Storage error: "));
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_status_mapping() {
        let unauthorized = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "wrong password".to_string(),
        };
        assert_eq!(get_status(unauthorized.into()), StatusCode::UNAUTHORIZED);

        let conflict = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: "email taken".to_string(),
        };
        assert_eq!(get_status(conflict.into()), StatusCode::BAD_REQUEST);

        let upstream = ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: String::new(),
        };
        assert_eq!(get_status(upstream.into()), StatusCode::BAD_GATEWAY);
    }
}
