//! Transaction bookkeeping routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::{forbidden_response, internal_error_response, workflow_error_response};
use crate::AppState;
use amanah_core::workflow::{self, TransactionKind};
use amanah_db::entities::{sea_orm_active_enums, transactions};
use amanah_db::repositories::transaction::{
    CreateTransactionInput, TransactionFilter, TransactionRepository,
};
use amanah_shared::types::format_rupiah;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{uuid}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by kind ("income" or "expense").
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by occurrence date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by occurrence date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Request body for creating a transaction.
///
/// Exactly the accepted fields; status and audit fields are computed
/// server-side and cannot be supplied.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// "income" or "expense".
    pub kind: String,
    /// Category label.
    pub category: String,
    /// Amount in rupiah, as a decimal string.
    pub amount: String,
    /// Optional notes.
    pub description: Option<String>,
    /// Proof reference; required for expenses.
    pub proof_path: Option<String>,
    /// When the transaction happened (YYYY-MM-DD).
    pub occurred_on: NaiveDate,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Public identifier.
    pub uuid: Uuid,
    /// Kind.
    pub kind: String,
    /// Category label.
    pub category: String,
    /// Amount as a decimal string.
    pub amount: String,
    /// Display amount, e.g. "Rp 1.250.000".
    pub formatted_amount: String,
    /// Notes.
    pub description: Option<String>,
    /// Occurrence date.
    pub occurred_on: String,
    /// Approval status.
    pub status: String,
    /// Whether a proof reference is attached.
    pub has_proof: bool,
    /// Reviewer id, when a human decided.
    pub approved_by: Option<Uuid>,
    /// Decision timestamp.
    pub approved_at: Option<String>,
    /// Rejection reason, when rejected.
    pub rejection_reason: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl TransactionResponse {
    /// Builds the wire representation of a stored transaction.
    #[must_use]
    pub fn from_model(model: transactions::Model) -> Self {
        Self {
            uuid: model.uuid,
            kind: workflow::TransactionKind::from(&model.kind).to_string(),
            category: model.category,
            amount: model.amount.to_string(),
            formatted_amount: format_rupiah(model.amount),
            description: model.description,
            occurred_on: model.occurred_on.to_string(),
            status: workflow::TransactionStatus::from(&model.status).to_string(),
            has_proof: model.proof_path.is_some(),
            approved_by: model.approved_by,
            approved_at: model.approved_at.map(|t| t.to_rfc3339()),
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions with filters.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if !auth.role().is_some_and(|r| r.can_manage_finance()) {
        return forbidden_response("Only the treasurer may browse the ledger");
    }

    let filter = TransactionFilter {
        kind: query
            .kind
            .as_deref()
            .and_then(TransactionKind::parse)
            .map(Into::into),
        status: query
            .status
            .as_deref()
            .and_then(workflow::TransactionStatus::parse)
            .map(Into::into),
        date_from: query.from,
        date_to: query.to,
        limit: None,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list(filter).await {
        Ok(rows) => {
            let items: Vec<TransactionResponse> =
                rows.into_iter().map(TransactionResponse::from_model).collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            internal_error_response(&e)
        }
    }
}

/// POST `/transactions` - Record a new transaction.
///
/// The initial status is computed from the threshold policy; any status
/// a client tries to send is simply not part of the request type.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    if !auth.role().is_some_and(|r| r.can_manage_finance()) {
        return forbidden_response("Only the treasurer may record transactions");
    }

    let Some(kind) = TransactionKind::parse(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_kind",
                "message": "Kind must be 'income' or 'expense'"
            })),
        )
            .into_response();
    };

    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Invalid amount format"
            })),
        )
            .into_response();
    };

    let input = CreateTransactionInput {
        kind,
        category: payload.category,
        amount,
        description: payload.description,
        proof_path: payload.proof_path,
        occurred_on: payload.occurred_on,
        recorded_by: Some(auth.user_id()),
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.create(input, state.approval_threshold).await {
        Ok(tx) => {
            info!(
                transaction_uuid = %tx.uuid,
                status = %status_label(&tx.status),
                "Transaction recorded"
            );
            (
                StatusCode::CREATED,
                Json(TransactionResponse::from_model(tx)),
            )
                .into_response()
        }
        Err(e) => {
            if e.status_code() >= 500 {
                error!(error = %e, "Failed to create transaction");
            }
            workflow_error_response(&e)
        }
    }
}

/// DELETE `/transactions/{uuid}` - Remove a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.role().is_some_and(|r| r.can_manage_finance()) {
        return forbidden_response("Only the treasurer may delete transactions");
    }

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.delete_by_uuid(uuid).await {
        Ok(()) => {
            info!(transaction_uuid = %uuid, deleted_by = %auth.user_id(), "Transaction deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            if e.status_code() >= 500 {
                error!(error = %e, "Failed to delete transaction");
            }
            workflow_error_response(&e)
        }
    }
}

fn status_label(status: &sea_orm_active_enums::TransactionStatus) -> &'static str {
    workflow::TransactionStatus::from(status).as_str()
}
