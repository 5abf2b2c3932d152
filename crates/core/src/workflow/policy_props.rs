//! Property-based tests for the threshold policy.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::workflow::policy::decide_initial_status;
use crate::workflow::types::{TransactionKind, TransactionStatus};

/// Strategy for rupiah amounts with two fractional digits, 0..=10^13.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Income never waits for review, whatever the amount or threshold.
    #[test]
    fn prop_income_always_approved(amount in arb_amount(), threshold in arb_amount()) {
        prop_assert_eq!(
            decide_initial_status(TransactionKind::Income, amount, threshold),
            TransactionStatus::Approved
        );
    }

    /// The expense decision is exactly the strict comparison.
    #[test]
    fn prop_expense_decision_matches_comparison(
        amount in arb_amount(),
        threshold in arb_amount()
    ) {
        let status = decide_initial_status(TransactionKind::Expense, amount, threshold);
        if amount > threshold {
            prop_assert_eq!(status, TransactionStatus::Pending);
        } else {
            prop_assert_eq!(status, TransactionStatus::Approved);
        }
    }

    /// An expense exactly at the threshold is auto-approved; one cent
    /// more flips it to pending.
    #[test]
    fn prop_boundary_is_strict(threshold in arb_amount()) {
        prop_assert_eq!(
            decide_initial_status(TransactionKind::Expense, threshold, threshold),
            TransactionStatus::Approved
        );
        let just_above = threshold + Decimal::new(1, 2);
        prop_assert_eq!(
            decide_initial_status(TransactionKind::Expense, just_above, threshold),
            TransactionStatus::Pending
        );
    }

    /// The decision never lands outside {approved, pending}.
    #[test]
    fn prop_never_rejected_at_creation(amount in arb_amount(), threshold in arb_amount()) {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            prop_assert_ne!(
                decide_initial_status(kind, amount, threshold),
                TransactionStatus::Rejected
            );
        }
    }
}
