use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable code carried in the `error` field of every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::PreconditionFailed(_) => "precondition_failed",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::InvalidInput(msg) => AppError::Validation(msg),
            DomainError::PreconditionFailed(msg) => AppError::PreconditionFailed(msg),
            DomainError::InvalidCredentials(msg) => AppError::Unauthenticated(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message,
            "error": self.code(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(err: &AppError) -> serde_json::Value {
        let bytes = err
            .error_response()
            .into_body()
            .try_into_bytes()
            .expect("body should be in memory");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (AppError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::PreconditionFailed("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.error_response().status(), status, "{:?}", err);
        }
    }

    #[test]
    fn body_carries_message_and_code() {
        let body = body_json(&AppError::NotFound("Product not found".into()));
        assert_eq!(body["message"], "Product not found");
        assert_eq!(body["error"], "not_found");
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let body = body_json(&AppError::Internal("connection refused".into()));
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["error"], "internal_error");
    }

    #[test]
    fn domain_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(DomainError::NotFound("gone".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidInput("bad".into())),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::PreconditionFailed("not completed".into())),
            AppError::PreconditionFailed(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidCredentials("Invalid password".into())),
            AppError::Unauthenticated(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Internal("oops".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn precondition_display_is_the_bare_message() {
        let err = AppError::PreconditionFailed("Order not found or not completed".into());
        assert_eq!(err.to_string(), "Order not found or not completed");
    }
}
