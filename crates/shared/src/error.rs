//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Boundary error type exposed to the embedding request handler.
///
/// Repository and checkout errors are mapped into these categories at the
/// crate boundary; the handler only needs the category, message, and codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate resource (period for a month, SKU, receipt number).
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Stock changed under a committing sale.
    #[error("Stock conflict: {0}")]
    StockConflict(String),

    /// Input validation failure (discount, quantity, prices).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mutation rejected because the accounting period is locked.
    #[error("Period locked: {0}")]
    PeriodLocked(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::AlreadyExists(_) | Self::StockConflict(_) => 409,
            Self::InsufficientStock(_) => 422,
            Self::Validation(_) => 400,
            Self::PeriodLocked(_) => 423,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::StockConflict(_) => "STOCK_CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PeriodLocked(_) => "PERIOD_LOCKED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::AlreadyExists(String::new()).status_code(), 409);
        assert_eq!(AppError::InsufficientStock(String::new()).status_code(), 422);
        assert_eq!(AppError::StockConflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::PeriodLocked(String::new()).status_code(), 423);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::AlreadyExists(String::new()).error_code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(
            AppError::InsufficientStock(String::new()).error_code(),
            "INSUFFICIENT_STOCK"
        );
        assert_eq!(
            AppError::StockConflict(String::new()).error_code(),
            "STOCK_CONFLICT"
        );
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::PeriodLocked(String::new()).error_code(),
            "PERIOD_LOCKED"
        );
        assert_eq!(AppError::Database(String::new()).error_code(), "DATABASE_ERROR");
        assert_eq!(AppError::Internal(String::new()).error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::AlreadyExists("msg".into()).to_string(),
            "Already exists: msg"
        );
        assert_eq!(
            AppError::InsufficientStock("msg".into()).to_string(),
            "Insufficient stock: msg"
        );
        assert_eq!(
            AppError::StockConflict("msg".into()).to_string(),
            "Stock conflict: msg"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::PeriodLocked("msg".into()).to_string(),
            "Period locked: msg"
        );
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }
}
