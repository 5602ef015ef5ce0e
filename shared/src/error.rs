use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    // Rejection from the overbooking guard. `available` is the headroom left
    // across all bookings overlapping the candidate window and may be negative.
    #[error("Cannot book {quantity} items. Only {available} available for this time period.")]
    CapacityExceeded { quantity: i32, available: i64 },
    // Same shape whether caught by the pre-check or the unique_item_event
    // constraint at insert time.
    #[error("This item is already booked for this event.")]
    DuplicateBooking,
    #[error("End datetime must be after start datetime.")]
    InvalidEventWindow,
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("failed to run the specified operation")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to acquire or commit a transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("login failed")]
    UnauthenticatedError,
    #[error("the authorization information is incorrect")]
    UnauthorizedError,
    #[error("the operation is not permitted for this role")]
    ForbiddenOperation,
    #[error(transparent)]
    ConversionEntityError(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // Validation errors that belong to a single request field.
    fn field(&self) -> Option<&'static str> {
        match self {
            AppError::CapacityExceeded { .. } => Some("quantity"),
            AppError::DuplicateBooking => Some("event"),
            AppError::InvalidEventWindow => Some("end_datetime"),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct FieldErrorBody {
    errors: HashMap<&'static str, Vec<String>>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::UnprocessableEntity(_)
            | AppError::CapacityExceeded { .. }
            | AppError::DuplicateBooking
            | AppError::InvalidEventWindow => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ValidationError(_) | AppError::ConvertToUuidError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthenticatedError | AppError::UnauthorizedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            e @ (AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match self.field() {
            Some(field) => {
                let mut errors = HashMap::new();
                errors.insert(field, vec![self.to_string()]);
                (status_code, Json(FieldErrorBody { errors })).into_response()
            }
            None => (
                status_code,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_carries_the_available_count() {
        let err = AppError::CapacityExceeded {
            quantity: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Cannot book 3 items. Only 2 available for this time period."
        );
    }

    #[test]
    fn capacity_error_may_report_negative_headroom() {
        let err = AppError::CapacityExceeded {
            quantity: 1,
            available: -2,
        };
        assert_eq!(
            err.to_string(),
            "Cannot book 1 items. Only -2 available for this time period."
        );
    }

    #[test]
    fn field_bound_errors_point_at_their_fields() {
        assert_eq!(
            AppError::CapacityExceeded {
                quantity: 1,
                available: 0
            }
            .field(),
            Some("quantity")
        );
        assert_eq!(AppError::DuplicateBooking.field(), Some("event"));
        assert_eq!(AppError::InvalidEventWindow.field(), Some("end_datetime"));
        assert_eq!(AppError::UnauthenticatedError.field(), None);
    }
}
