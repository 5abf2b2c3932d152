//! Workflow service: creation admission and state transitions.
//!
//! All methods are associated functions that validate inputs and the
//! current status, returning the appropriate `WorkflowAction` or
//! `CreationDecision` with audit trail information. Persistence is the
//! caller's concern; nothing here mutates anything.

use chrono::Utc;
use uuid::Uuid;

use rust_decimal::Decimal;

use crate::workflow::error::{MAX_CATEGORY_LEN, MAX_TEXT_LEN, WorkflowError};
use crate::workflow::policy::decide_initial_status;
use crate::workflow::types::{
    CreationDecision, NewTransaction, TransactionKind, TransactionStatus, WorkflowAction,
};

/// Stateless service for the transaction lifecycle.
pub struct WorkflowService;

impl WorkflowService {
    /// Admits a new transaction: validates the typed input, then applies
    /// the threshold policy to compute the initial status.
    ///
    /// The status is never caller-supplied; `NewTransaction` cannot even
    /// express one. Auto-approved transactions get `approved_at` stamped
    /// now and no approver (nobody human decided them).
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - the category is blank or longer than 100 characters
    /// - the amount is negative
    /// - the description exceeds 1000 characters
    /// - the kind is expense and no proof reference is present
    pub fn admit(
        new: &NewTransaction,
        threshold: Decimal,
    ) -> Result<CreationDecision, WorkflowError> {
        Self::validate(new)?;

        let status = decide_initial_status(new.kind, new.amount, threshold);
        let approved_at = match status {
            TransactionStatus::Approved => Some(Utc::now()),
            _ => None,
        };

        Ok(CreationDecision {
            status,
            approved_at,
        })
    }

    /// Approve a pending transaction.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless the transaction
    /// is currently pending. The authorization gate is the caller's
    /// responsibility and must be consulted before this.
    pub fn approve(
        current_status: TransactionStatus,
        approved_by: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Approve {
                new_status: TransactionStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Approved,
            }),
        }
    }

    /// Reject a pending transaction with a reason.
    ///
    /// The reason is checked before the state, so a blank reason on an
    /// already-decided transaction still reports the validation error.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::RejectionReasonRequired` if the reason is blank
    /// - `WorkflowError::RejectionReasonTooLong` over 1000 characters
    /// - `WorkflowError::InvalidTransition` if not pending
    pub fn reject(
        current_status: TransactionStatus,
        approved_by: Uuid,
        rejection_reason: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        if rejection_reason.trim().is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }
        if rejection_reason.chars().count() > MAX_TEXT_LEN {
            return Err(WorkflowError::RejectionReasonTooLong);
        }

        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Reject {
                new_status: TransactionStatus::Rejected,
                approved_by,
                approved_at: Utc::now(),
                rejection_reason,
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Rejected,
            }),
        }
    }

    fn validate(new: &NewTransaction) -> Result<(), WorkflowError> {
        if new.category.trim().is_empty() {
            return Err(WorkflowError::CategoryRequired);
        }
        if new.category.chars().count() > MAX_CATEGORY_LEN {
            return Err(WorkflowError::CategoryTooLong);
        }
        if new.amount.is_sign_negative() {
            return Err(WorkflowError::NegativeAmount);
        }
        if let Some(description) = &new.description
            && description.chars().count() > MAX_TEXT_LEN
        {
            return Err(WorkflowError::DescriptionTooLong);
        }
        if new.kind == TransactionKind::Expense
            && new.proof_path.as_deref().is_none_or(|p| p.trim().is_empty())
        {
            return Err(WorkflowError::ProofRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const THRESHOLD: Decimal = dec!(1_000_000);

    fn expense(amount: Decimal) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            category: "Renovasi".to_string(),
            amount,
            description: None,
            proof_path: Some("transactions/kwitansi-01.jpg".to_string()),
            occurred_on: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        }
    }

    fn income(amount: Decimal) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Income,
            category: "Kotak Jumat".to_string(),
            amount,
            description: None,
            proof_path: None,
            occurred_on: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        }
    }

    #[test]
    fn test_admit_income_approved_regardless_of_amount() {
        let decision = WorkflowService::admit(&income(dec!(50_000_000)), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Approved);
        assert!(decision.approved_at.is_some());
    }

    #[test]
    fn test_admit_income_without_proof_is_fine() {
        let decision = WorkflowService::admit(&income(dec!(100_000)), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Approved);
    }

    #[test]
    fn test_admit_small_expense_auto_approved() {
        let decision = WorkflowService::admit(&expense(dec!(500_000)), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Approved);
        assert!(decision.approved_at.is_some());
    }

    #[test]
    fn test_admit_large_expense_pending() {
        let decision = WorkflowService::admit(&expense(dec!(2_000_000)), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Pending);
        assert!(decision.approved_at.is_none());
    }

    #[test]
    fn test_admit_boundary_expense_auto_approved() {
        let decision = WorkflowService::admit(&expense(THRESHOLD), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Approved);

        let decision =
            WorkflowService::admit(&expense(dec!(1_000_000.01)), THRESHOLD).unwrap();
        assert_eq!(decision.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_admit_expense_without_proof_fails() {
        let mut tx = expense(dec!(200_000));
        tx.proof_path = None;
        assert!(matches!(
            WorkflowService::admit(&tx, THRESHOLD),
            Err(WorkflowError::ProofRequired)
        ));

        tx.proof_path = Some("   ".to_string());
        assert!(matches!(
            WorkflowService::admit(&tx, THRESHOLD),
            Err(WorkflowError::ProofRequired)
        ));
    }

    #[test]
    fn test_admit_blank_category_fails() {
        let mut tx = income(dec!(100_000));
        tx.category = "  ".to_string();
        assert!(matches!(
            WorkflowService::admit(&tx, THRESHOLD),
            Err(WorkflowError::CategoryRequired)
        ));
    }

    #[test]
    fn test_admit_overlong_category_fails() {
        let mut tx = income(dec!(100_000));
        tx.category = "x".repeat(101);
        assert!(matches!(
            WorkflowService::admit(&tx, THRESHOLD),
            Err(WorkflowError::CategoryTooLong)
        ));
    }

    #[test]
    fn test_admit_negative_amount_fails() {
        let tx = income(dec!(-1));
        assert!(matches!(
            WorkflowService::admit(&tx, THRESHOLD),
            Err(WorkflowError::NegativeAmount)
        ));
    }

    #[test]
    fn test_approve_from_pending() {
        let reviewer = Uuid::new_v4();
        let action = WorkflowService::approve(TransactionStatus::Pending, reviewer).unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Approved);
        if let WorkflowAction::Approve { approved_by, .. } = action {
            assert_eq!(approved_by, reviewer);
        } else {
            panic!("expected Approve action");
        }
    }

    #[test]
    fn test_approve_terminal_states_fail() {
        let reviewer = Uuid::new_v4();
        for status in [TransactionStatus::Approved, TransactionStatus::Rejected] {
            assert!(matches!(
                WorkflowService::approve(status, reviewer),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_from_pending() {
        let reviewer = Uuid::new_v4();
        let action = WorkflowService::reject(
            TransactionStatus::Pending,
            reviewer,
            "insufficient documentation".to_string(),
        )
        .unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Rejected);
        if let WorkflowAction::Reject {
            approved_by,
            rejection_reason,
            ..
        } = action
        {
            assert_eq!(approved_by, reviewer);
            assert_eq!(rejection_reason, "insufficient documentation");
        } else {
            panic!("expected Reject action");
        }
    }

    #[test]
    fn test_reject_blank_reason_fails_before_state_check() {
        let reviewer = Uuid::new_v4();
        // Blank reason reported even when the state is already terminal.
        assert!(matches!(
            WorkflowService::reject(TransactionStatus::Approved, reviewer, "  ".to_string()),
            Err(WorkflowError::RejectionReasonRequired)
        ));
        assert!(matches!(
            WorkflowService::reject(TransactionStatus::Pending, reviewer, String::new()),
            Err(WorkflowError::RejectionReasonRequired)
        ));
    }

    #[test]
    fn test_reject_overlong_reason_fails() {
        let reviewer = Uuid::new_v4();
        let reason = "x".repeat(1001);
        assert!(matches!(
            WorkflowService::reject(TransactionStatus::Pending, reviewer, reason),
            Err(WorkflowError::RejectionReasonTooLong)
        ));
    }

    #[test]
    fn test_reject_terminal_states_fail() {
        let reviewer = Uuid::new_v4();
        for status in [TransactionStatus::Approved, TransactionStatus::Rejected] {
            assert!(matches!(
                WorkflowService::reject(status, reviewer, "reason".to_string()),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }
}
