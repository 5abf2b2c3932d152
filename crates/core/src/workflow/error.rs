//! Workflow error types for the transaction lifecycle.

use thiserror::Error;
use uuid::Uuid;

use crate::workflow::types::TransactionStatus;

/// Maximum length of the free-text category label.
pub const MAX_CATEGORY_LEN: usize = 100;
/// Maximum length of the description and the rejection reason.
pub const MAX_TEXT_LEN: usize = 1000;

/// Errors that can occur during workflow operations.
///
/// Every variant is detected before any mutation; a failed operation
/// leaves the transaction untouched.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted approve/reject on a transaction that is not pending.
    #[error("Transaction is {from}, only pending transactions can become {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },

    /// Actor's role lacks the approval capability.
    #[error("Role {role} is not allowed to approve or reject transactions")]
    NotAuthorizedToApprove {
        /// The acting user's role.
        role: String,
    },

    /// Transaction not found.
    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    /// Expense submitted without a proof reference.
    #[error("A proof upload is required for expense transactions")]
    ProofRequired,

    /// Category label missing or blank.
    #[error("Category is required")]
    CategoryRequired,

    /// Category label too long.
    #[error("Category must be at most {MAX_CATEGORY_LEN} characters")]
    CategoryTooLong,

    /// Description too long.
    #[error("Description must be at most {MAX_TEXT_LEN} characters")]
    DescriptionTooLong,

    /// Amount is negative.
    #[error("Amount must not be negative")]
    NegativeAmount,

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Rejection reason too long.
    #[error("Rejection reason must be at most {MAX_TEXT_LEN} characters")]
    RejectionReasonTooLong,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ProofRequired
            | Self::CategoryRequired
            | Self::CategoryTooLong
            | Self::DescriptionTooLong
            | Self::NegativeAmount
            | Self::RejectionReasonRequired
            | Self::RejectionReasonTooLong => 400,

            Self::NotAuthorizedToApprove { .. } => 403,

            Self::TransactionNotFound(_) => 404,

            Self::InvalidTransition { .. } => 422,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::NotAuthorizedToApprove { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::ProofRequired => "PROOF_REQUIRED",
            Self::CategoryRequired => "CATEGORY_REQUIRED",
            Self::CategoryTooLong => "CATEGORY_TOO_LONG",
            Self::DescriptionTooLong => "DESCRIPTION_TOO_LONG",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::RejectionReasonTooLong => "REJECTION_REASON_TOO_LONG",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: TransactionStatus::Approved,
            to: TransactionStatus::Rejected,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_STATE_TRANSITION");
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_validation_errors_are_400() {
        assert_eq!(WorkflowError::ProofRequired.status_code(), 400);
        assert_eq!(WorkflowError::CategoryRequired.status_code(), 400);
        assert_eq!(WorkflowError::NegativeAmount.status_code(), 400);
        assert_eq!(WorkflowError::RejectionReasonRequired.status_code(), 400);
    }

    #[test]
    fn test_authorization_error() {
        let err = WorkflowError::NotAuthorizedToApprove {
            role: "marbot".to_string(),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "NOT_AUTHORIZED_TO_APPROVE");
        assert!(err.to_string().contains("marbot"));
    }

    #[test]
    fn test_not_found_error() {
        let err = WorkflowError::TransactionNotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "TRANSACTION_NOT_FOUND");
    }

    #[test]
    fn test_database_error() {
        let err = WorkflowError::Database("connection reset".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
