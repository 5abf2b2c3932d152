//! Approval repository: the pending queue and the approve/reject
//! transitions.
//!
//! The state check and the state mutation form one atomic unit: the
//! update is a compare-and-set filtered on `status = 'pending'`, so of
//! two concurrent decisions exactly one wins and the loser observes an
//! invalid transition.

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

use amanah_core::workflow::{
    Role, TransactionStatus as CoreStatus, WorkflowAction, WorkflowError, WorkflowService,
};

use crate::entities::{
    sea_orm_active_enums::TransactionStatus,
    transactions, users,
};

/// A pending queue item with the recorder's display name resolved.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    /// Transaction data.
    pub transaction: transactions::Model,
    /// Name of the user who recorded it, if known.
    pub recorded_by_name: Option<String>,
}

/// Approval repository for queue reads and lifecycle transitions.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists pending transactions above the threshold, newest first.
    ///
    /// Auto-approval already keeps small expenses out of `pending`, but
    /// the amount filter is re-applied here: the threshold is
    /// configuration and may have changed since a row was created, and
    /// a change must only affect this view, never stored status.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotAuthorizedToApprove` if the viewer's
    /// role lacks the approval capability (the same capability governs
    /// read and write), or a database error.
    pub async fn list_pending_above_threshold(
        &self,
        viewer_role: Role,
        threshold: Decimal,
    ) -> Result<Vec<PendingTransaction>, WorkflowError> {
        if !viewer_role.can_approve() {
            return Err(WorkflowError::NotAuthorizedToApprove {
                role: viewer_role.to_string(),
            });
        }

        let pending = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .filter(transactions::Column::Amount.gt(threshold))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        // Resolve recorder names in one query.
        let recorder_ids: Vec<Uuid> = pending.iter().filter_map(|t| t.recorded_by).collect();
        let names: HashMap<Uuid, String> = if recorder_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(recorder_ids))
                .all(&self.db)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        Ok(pending
            .into_iter()
            .map(|transaction| {
                let recorded_by_name = transaction
                    .recorded_by
                    .and_then(|id| names.get(&id).cloned());
                PendingTransaction {
                    transaction,
                    recorded_by_name,
                }
            })
            .collect())
    }

    /// Approves a pending transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the actor's role lacks the approval capability
    /// - the transaction is not found
    /// - the transaction is not pending (including losing a race)
    /// - the database operation fails
    pub async fn approve(
        &self,
        transaction_uuid: Uuid,
        approved_by: Uuid,
        actor_role: Role,
    ) -> Result<transactions::Model, WorkflowError> {
        if !actor_role.can_approve() {
            return Err(WorkflowError::NotAuthorizedToApprove {
                role: actor_role.to_string(),
            });
        }

        let transaction = self.fetch(transaction_uuid).await?;
        let current = CoreStatus::from(&transaction.status);
        let action = WorkflowService::approve(current, approved_by)?;

        let WorkflowAction::Approve {
            approved_by,
            approved_at,
            ..
        } = action
        else {
            return Err(WorkflowError::Database(
                "approve produced an unexpected action".to_string(),
            ));
        };

        let update = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::Status,
                Expr::value(TransactionStatus::Approved),
            )
            .col_expr(
                transactions::Column::ApprovedBy,
                Expr::value(Some(approved_by)),
            )
            .col_expr(
                transactions::Column::ApprovedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    approved_at,
                ))),
            )
            .filter(transactions::Column::Uuid.eq(transaction_uuid))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending));

        self.finish_transition(update, transaction_uuid, CoreStatus::Approved)
            .await
    }

    /// Rejects a pending transaction with a reason.
    ///
    /// The reason is validated before the state check, per the workflow
    /// service.
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`Self::approve`], plus validation errors
    /// for a blank or overlong reason.
    pub async fn reject(
        &self,
        transaction_uuid: Uuid,
        approved_by: Uuid,
        actor_role: Role,
        reason: String,
    ) -> Result<transactions::Model, WorkflowError> {
        if !actor_role.can_approve() {
            return Err(WorkflowError::NotAuthorizedToApprove {
                role: actor_role.to_string(),
            });
        }

        let transaction = self.fetch(transaction_uuid).await?;
        let current = CoreStatus::from(&transaction.status);
        let action = WorkflowService::reject(current, approved_by, reason)?;

        let WorkflowAction::Reject {
            approved_by,
            approved_at,
            rejection_reason,
            ..
        } = action
        else {
            return Err(WorkflowError::Database(
                "reject produced an unexpected action".to_string(),
            ));
        };

        let update = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::Status,
                Expr::value(TransactionStatus::Rejected),
            )
            .col_expr(
                transactions::Column::ApprovedBy,
                Expr::value(Some(approved_by)),
            )
            .col_expr(
                transactions::Column::ApprovedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    approved_at,
                ))),
            )
            .col_expr(
                transactions::Column::RejectionReason,
                Expr::value(Some(rejection_reason)),
            )
            .filter(transactions::Column::Uuid.eq(transaction_uuid))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending));

        self.finish_transition(update, transaction_uuid, CoreStatus::Rejected)
            .await
    }

    async fn fetch(&self, uuid: Uuid) -> Result<transactions::Model, WorkflowError> {
        transactions::Entity::find()
            .filter(transactions::Column::Uuid.eq(uuid))
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::TransactionNotFound(uuid))
    }

    /// Executes the compare-and-set and reloads the row. Zero affected
    /// rows means a concurrent decision won; the reload tells us the
    /// state that beat us.
    async fn finish_transition(
        &self,
        update: sea_orm::UpdateMany<transactions::Entity>,
        transaction_uuid: Uuid,
        target: CoreStatus,
    ) -> Result<transactions::Model, WorkflowError> {
        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            let current = self.fetch(transaction_uuid).await?;
            return Err(WorkflowError::InvalidTransition {
                from: CoreStatus::from(&current.status),
                to: target,
            });
        }

        self.fetch(transaction_uuid).await
    }
}
