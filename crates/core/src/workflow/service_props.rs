//! Property-based tests for the workflow state machine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{
    NewTransaction, TransactionKind, TransactionStatus, WorkflowAction,
};

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,100}".prop_map(|s| s.trim().to_string())
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Pending + approve → Approved carrying the reviewer.
    #[test]
    fn prop_approve_from_pending_succeeds(reviewer in arb_uuid()) {
        let action = WorkflowService::approve(TransactionStatus::Pending, reviewer);
        prop_assert!(action.is_ok());
        let action = action.unwrap();
        prop_assert_eq!(action.new_status(), TransactionStatus::Approved);
        if let WorkflowAction::Approve { approved_by, .. } = action {
            prop_assert_eq!(approved_by, reviewer);
        } else {
            prop_assert!(false, "expected Approve action");
        }
    }

    /// Approve from any terminal state fails and names the state.
    #[test]
    fn prop_approve_terminal_fails(status in arb_status(), reviewer in arb_uuid()) {
        prop_assume!(status.is_terminal());
        let result = WorkflowService::approve(status, reviewer);
        match result {
            Err(WorkflowError::InvalidTransition { from, .. }) => {
                prop_assert_eq!(from, status);
            }
            _ => prop_assert!(false, "expected InvalidTransition"),
        }
    }

    /// Pending + reject with a real reason → Rejected carrying reason.
    #[test]
    fn prop_reject_from_pending_succeeds(
        reviewer in arb_uuid(),
        reason in arb_reason()
    ) {
        prop_assume!(!reason.trim().is_empty());
        let action =
            WorkflowService::reject(TransactionStatus::Pending, reviewer, reason.clone());
        prop_assert!(action.is_ok());
        let action = action.unwrap();
        prop_assert_eq!(action.new_status(), TransactionStatus::Rejected);
        if let WorkflowAction::Reject { rejection_reason, approved_by, .. } = action {
            prop_assert_eq!(rejection_reason, reason);
            prop_assert_eq!(approved_by, reviewer);
        } else {
            prop_assert!(false, "expected Reject action");
        }
    }

    /// A blank reason always fails, whatever the current state.
    #[test]
    fn prop_reject_blank_reason_fails(
        status in arb_status(),
        reviewer in arb_uuid(),
        spaces in " {0,10}"
    ) {
        let result = WorkflowService::reject(status, reviewer, spaces);
        prop_assert!(matches!(result, Err(WorkflowError::RejectionReasonRequired)));
    }

    /// Admission never yields Rejected and stamps approved_at exactly
    /// for auto-approved outcomes.
    #[test]
    fn prop_admit_decision_consistent(
        amount in arb_amount(),
        threshold in arb_amount(),
        is_expense in any::<bool>()
    ) {
        let kind = if is_expense {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        };
        let new = NewTransaction {
            kind,
            category: "Operasional".to_string(),
            amount,
            description: None,
            proof_path: Some("transactions/bukti.jpg".to_string()),
            occurred_on: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        };
        let decision = WorkflowService::admit(&new, threshold).unwrap();
        prop_assert_ne!(decision.status, TransactionStatus::Rejected);
        prop_assert_eq!(
            decision.approved_at.is_some(),
            decision.status == TransactionStatus::Approved
        );
    }
}
