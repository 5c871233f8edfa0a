pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod review_repo;
pub mod user_repo;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;
pub use review_repo::DieselReviewRepository;
pub use user_repo::DieselUserRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation => {
                    DomainError::InvalidInput(info.message().to_string())
                }
                _ => DomainError::Internal(info.message().to_string()),
            },
            DieselError::NotFound => DomainError::NotFound("Record not found".to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
