use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auction::Rejection;

/// HTTP-facing error envelope. Domain rejections from the rule engine are
/// converted in via `From<Rejection>`; everything else is constructed with
/// the helpers below.
#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn db(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Database(err) => {
                tracing::error!(?err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error occurred".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        let msg = rejection.to_string();
        match rejection {
            Rejection::ProductNotFound => AppError::NotFound(msg),
            Rejection::SelfBidForbidden | Rejection::NotOwner => AppError::Forbidden(msg),
            Rejection::DuplicateBid | Rejection::AlreadySold => AppError::Conflict(msg),
            Rejection::AuctionClosed
            | Rejection::AuctionStillOpen
            | Rejection::InvalidAmount
            | Rejection::BelowBasePrice => AppError::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(rejection: Rejection) -> StatusCode {
        AppError::from(rejection).into_response().status()
    }

    #[test]
    fn rejections_map_to_expected_statuses() {
        assert_eq!(status_of(Rejection::ProductNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(Rejection::SelfBidForbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(Rejection::NotOwner), StatusCode::FORBIDDEN);
        assert_eq!(status_of(Rejection::DuplicateBid), StatusCode::CONFLICT);
        assert_eq!(status_of(Rejection::AlreadySold), StatusCode::CONFLICT);
        assert_eq!(status_of(Rejection::AuctionClosed), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Rejection::BelowBasePrice), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Rejection::InvalidAmount), StatusCode::BAD_REQUEST);
    }
}
