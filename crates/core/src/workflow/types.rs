//! Workflow domain types for the transaction lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction kind. Immutable after creation.
///
/// Only expenses carry the proof requirement and can land in the
/// approval queue; income is always auto-approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (donations, Friday collection box, rentals).
    Income,
    /// Money going out. Requires an uploaded proof reference.
    Expense,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction status in the approval workflow.
///
/// The status is computed at creation and only ever changes along:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Waiting for chairperson review (large expense).
    Pending,
    /// Approved, counted in all public totals.
    Approved,
    /// Rejected with a reason. Terminal; recreate to retry.
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is allowed out of this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed creation input.
///
/// This enumerates exactly the fields a caller may supply. Status, the
/// public identifier, and the audit fields are not representable here;
/// they are computed by the workflow at creation time.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Income or expense.
    pub kind: TransactionKind,
    /// Category label, e.g. "Kotak Jumat", "Operasional".
    pub category: String,
    /// Non-negative amount in rupiah.
    pub amount: Decimal,
    /// Optional free-text notes.
    pub description: Option<String>,
    /// Reference to an uploaded proof artifact. Required for expenses.
    pub proof_path: Option<String>,
    /// The calendar date the transaction happened (not when recorded).
    pub occurred_on: NaiveDate,
}

/// The outcome of admitting a new transaction.
///
/// `approved_at` is `Some` exactly when the policy auto-approved; the
/// auto-approval path never stamps an approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationDecision {
    /// The computed initial status.
    pub status: TransactionStatus,
    /// Decision timestamp for auto-approved transactions.
    pub approved_at: Option<DateTime<Utc>>,
}

/// A validated state transition with its audit data.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Approve a pending transaction.
    Approve {
        /// The new status (Approved).
        new_status: TransactionStatus,
        /// The reviewer who approved.
        approved_by: Uuid,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending transaction.
    Reject {
        /// The new status (Rejected).
        new_status: TransactionStatus,
        /// The reviewer who rejected.
        approved_by: Uuid,
        /// When the rejection happened.
        approved_at: DateTime<Utc>,
        /// Why the transaction was rejected.
        rejection_reason: String,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> TransactionStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}
