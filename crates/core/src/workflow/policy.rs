//! Threshold auto-approval policy.
//!
//! Pure and referentially transparent so it can be tested without
//! persistence. The threshold is always an explicit parameter; there is
//! no ambient configuration lookup here.

use rust_decimal::Decimal;

use crate::workflow::types::{TransactionKind, TransactionStatus};

/// Decides the initial status of a new transaction.
///
/// - Income is approved immediately, regardless of amount.
/// - An expense strictly above the threshold goes to `Pending`.
/// - An expense at or below the threshold is auto-approved; the
///   comparison is strict (`>`), so an expense exactly equal to the
///   threshold does not need review.
///
/// A later change to the configured threshold never reclassifies rows
/// that were already decided; callers re-run this only at creation.
#[must_use]
pub fn decide_initial_status(
    kind: TransactionKind,
    amount: Decimal,
    threshold: Decimal,
) -> TransactionStatus {
    match kind {
        TransactionKind::Income => TransactionStatus::Approved,
        TransactionKind::Expense => {
            if amount > threshold {
                TransactionStatus::Pending
            } else {
                TransactionStatus::Approved
            }
        }
    }
}
