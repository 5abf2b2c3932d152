//! Transaction repository for bookkeeping database operations.
//!
//! Creation applies the workflow admission (validation + threshold
//! policy) as an explicit pre-persistence step; the computed status is
//! written together with the row, never patched afterwards.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use amanah_core::workflow::{self, NewTransaction, WorkflowError, WorkflowService};

use crate::entities::{
    sea_orm_active_enums::{TransactionKind, TransactionStatus},
    transactions,
};

/// Input for creating a transaction.
///
/// Status and the public identifier are deliberately absent; both are
/// computed here.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Income or expense.
    pub kind: workflow::TransactionKind,
    /// Category label.
    pub category: String,
    /// Amount in rupiah.
    pub amount: Decimal,
    /// Optional notes.
    pub description: Option<String>,
    /// Proof reference; required for expenses.
    pub proof_path: Option<String>,
    /// When the transaction happened.
    pub occurred_on: NaiveDate,
    /// User recording the transaction (None for automated imports).
    pub recorded_by: Option<Uuid>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by kind.
    pub kind: Option<TransactionKind>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Filter by occurrence date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by occurrence date range end.
    pub date_to: Option<NaiveDate>,
    /// Cap on the number of rows returned.
    pub limit: Option<u64>,
}

/// Approved income/expense totals for one calendar month.
#[derive(Debug, Clone)]
pub struct MonthlyTotals {
    /// Display label, e.g. "Jan 2026".
    pub label: String,
    /// Approved income total.
    pub income: Decimal,
    /// Approved expense total.
    pub expense: Decimal,
}

/// Indonesian month abbreviations, indexed by month number - 1.
const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Transaction repository for CRUD and reporting queries.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction, computing its initial status from the
    /// threshold policy before the insert.
    ///
    /// Auto-approved rows carry `approved_at` but no `approved_by`;
    /// pending rows carry neither until a reviewer decides.
    ///
    /// # Errors
    ///
    /// Returns a validation error from the workflow admission (missing
    /// expense proof, blank category, negative amount), or a database
    /// error if the insert fails. Nothing is persisted on error.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
        approval_threshold: Decimal,
    ) -> Result<transactions::Model, WorkflowError> {
        let new = NewTransaction {
            kind: input.kind,
            category: input.category.clone(),
            amount: input.amount,
            description: input.description.clone(),
            proof_path: input.proof_path.clone(),
            occurred_on: input.occurred_on,
        };
        let decision = WorkflowService::admit(&new, approval_threshold)?;

        let now = Utc::now().into();
        let row = transactions::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            kind: Set(input.kind.into()),
            category: Set(input.category),
            amount: Set(input.amount),
            description: Set(input.description),
            proof_path: Set(input.proof_path),
            recorded_by: Set(input.recorded_by),
            occurred_on: Set(input.occurred_on),
            status: Set(decision.status.into()),
            approved_by: Set(None),
            approved_at: Set(decision.approved_at.map(Into::into)),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        row.insert(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))
    }

    /// Finds a transaction by its public identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::Uuid.eq(uuid))
            .one(&self.db)
            .await
    }

    /// Lists transactions matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: TransactionFilter) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find();

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }

        query
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(filter.limit)
            .all(&self.db)
            .await
    }

    /// Lists the most recent transactions, optionally sorting pending
    /// rows first (the chairperson dashboard view).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(
        &self,
        limit: u64,
        pending_first: bool,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find();
        if pending_first {
            query = query.order_by(
                Expr::cust("CASE status WHEN 'pending' THEN 1 WHEN 'approved' THEN 2 ELSE 3 END"),
                Order::Asc,
            );
        }
        query
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Deletes a transaction by its public identifier.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::TransactionNotFound` if no row matches,
    /// or a database error.
    pub async fn delete_by_uuid(&self, uuid: Uuid) -> Result<(), WorkflowError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Uuid.eq(uuid))
            .exec(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(WorkflowError::TransactionNotFound(uuid));
        }
        Ok(())
    }

    /// Sums approved amounts of the given kind, optionally restricted
    /// to an occurrence date window (`from` inclusive, `to` exclusive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn approved_total(
        &self,
        kind: TransactionKind,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Decimal, DbErr> {
        let mut query = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Amount.sum(), "total")
            .filter(transactions::Column::Kind.eq(kind))
            .filter(transactions::Column::Status.eq(TransactionStatus::Approved));

        if let Some(from) = from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(transactions::Column::OccurredOn.lt(to));
        }

        let total: Option<Option<Decimal>> = query.into_tuple().one(&self.db).await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }

    /// Approved income and expense totals for each of the last `months`
    /// calendar months, oldest first. Used for the transparency chart.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying queries fail.
    pub async fn monthly_series(
        &self,
        months: u32,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyTotals>, DbErr> {
        let mut series = Vec::with_capacity(months as usize);

        for offset in (0..months).rev() {
            let (year, month) = shift_month(today.year(), today.month(), offset);
            let (from, to) = month_window(year, month);
            let label = format!("{} {year}", MONTH_ABBR[(month - 1) as usize]);

            let income = self
                .approved_total(TransactionKind::Income, Some(from), Some(to))
                .await?;
            let expense = self
                .approved_total(TransactionKind::Expense, Some(from), Some(to))
                .await?;

            series.push(MonthlyTotals {
                label,
                income,
                expense,
            });
        }

        Ok(series)
    }

    /// Counts all transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, DbErr> {
        transactions::Entity::find().count(&self.db).await
    }

    /// Counts pending transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_pending(&self) -> Result<u64, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .count(&self.db)
            .await
    }
}

/// Steps `offset` months back from (year, month).
fn shift_month(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = year * 12 + (month as i32 - 1) - offset as i32;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

/// First day of the month and first day of the following month.
fn month_window(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let from = NaiveDate::from_ymd_opt(year, month, 1).expect("valid first of month");
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let to = NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid first of month");
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_month_within_year() {
        assert_eq!(shift_month(2026, 8, 0), (2026, 8));
        assert_eq!(shift_month(2026, 8, 5), (2026, 3));
    }

    #[test]
    fn test_shift_month_across_year() {
        assert_eq!(shift_month(2026, 2, 5), (2025, 9));
        assert_eq!(shift_month(2026, 1, 1), (2025, 12));
        assert_eq!(shift_month(2026, 1, 13), (2024, 12));
    }

    #[test]
    fn test_month_window_regular_and_december() {
        let (from, to) = month_window(2026, 7);
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());

        let (from, to) = month_window(2025, 12);
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
