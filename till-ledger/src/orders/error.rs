//! Ledger error type

use super::ids::IdKind;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Draft rejected before any storage access
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Order not found: {0}")]
    NotFound(String),

    /// Order is not in a state that allows the transition
    #[error("Order {order_id} is already {status}")]
    Conflict { order_id: String, status: String },

    #[error("No free {kind} identifier after {attempts} attempts")]
    ExhaustedRetries { kind: IdKind, attempts: u32 },

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// SQLITE_BUSY / SQLITE_LOCKED surfaced after the busy timeout expired
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Persistence(sqlx::Error::Database(db)) => {
                matches!(db.code().as_deref(), Some("5") | Some("6"))
            }
            Self::Persistence(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Persistence(sqlx::Error::Migrate(Box::new(err)))
    }
}

// ========== AppError boundary ==========

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation { field, reason } => {
                let code = match field.as_str() {
                    "tendered" | "change" => ErrorCode::TenderAmountNotAllowed,
                    f if f.starts_with("lines") => ErrorCode::OrderLineInvalid,
                    _ => ErrorCode::ValidationFailed,
                };
                AppError::with_message(code, format!("Invalid {field}: {reason}"))
                    .with_detail("field", field)
            }
            LedgerError::NotFound(order_id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
                    .with_detail("order_id", order_id)
            }
            LedgerError::Conflict { order_id, status } => AppError::with_message(
                ErrorCode::OrderAlreadyRefunded,
                format!("Order {order_id} is already {status}"),
            )
            .with_detail("order_id", order_id),
            LedgerError::ExhaustedRetries { kind, attempts } => {
                tracing::error!(%kind, attempts, "Identifier space exhausted");
                AppError::new(ErrorCode::IdSpaceExhausted)
                    .with_detail("kind", kind.prefix())
                    .with_detail("attempts", attempts)
            }
            err @ LedgerError::Persistence(_) if err.is_busy() => {
                tracing::warn!(error = %err, "Store busy");
                AppError::new(ErrorCode::SystemBusy)
            }
            LedgerError::Persistence(e) => {
                tracing::error!(error = %e, "Database error");
                AppError::database(e.to_string())
            }
        }
    }
}
