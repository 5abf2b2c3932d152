//! Approval queue routes for the chairperson.
//!
//! The approval capability gates every endpoint here, reads included;
//! the repository consults the same gate again before any mutation.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::{forbidden_response, workflow_error_response};
use crate::routes::transactions::TransactionResponse;
use crate::AppState;
use amanah_db::repositories::ApprovalRepository;
use amanah_shared::types::format_rupiah;

/// Creates the approval routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approvals", get(list_pending))
        .route("/approvals/{uuid}/approve", post(approve))
        .route("/approvals/{uuid}/reject", post(reject))
}

/// Request body for rejecting a transaction.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Why the expense is being rejected.
    pub rejection_reason: String,
}

/// One pending queue item.
#[derive(Debug, Serialize)]
pub struct PendingItemResponse {
    /// The transaction awaiting review.
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    /// Who recorded it.
    pub recorded_by_name: Option<String>,
}

/// GET `/approvals` - Pending transactions above the threshold.
///
/// Returns the current threshold alongside the queue so the caller can
/// explain why each item qualifies.
async fn list_pending(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return forbidden_response("Unknown role");
    };

    let repo = ApprovalRepository::new((*state.db).clone());
    match repo
        .list_pending_above_threshold(role, state.approval_threshold)
        .await
    {
        Ok(items) => {
            let pending: Vec<PendingItemResponse> = items
                .into_iter()
                .map(|item| PendingItemResponse {
                    transaction: TransactionResponse::from_model(item.transaction),
                    recorded_by_name: item.recorded_by_name,
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "pending": pending,
                    "threshold": state.approval_threshold.to_string(),
                    "formatted_threshold": format_rupiah(state.approval_threshold),
                })),
            )
                .into_response()
        }
        Err(e) => {
            if e.status_code() >= 500 {
                error!(error = %e, "Failed to list pending approvals");
            }
            workflow_error_response(&e)
        }
    }
}

/// POST `/approvals/{uuid}/approve` - Approve a pending transaction.
async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> impl IntoResponse {
    decide(state, auth, uuid, Decision::Approve).await
}

/// POST `/approvals/{uuid}/reject` - Reject a pending transaction.
async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    decide(state, auth, uuid, Decision::Reject(payload.rejection_reason)).await
}

enum Decision {
    Approve,
    Reject(String),
}

async fn decide(
    state: AppState,
    auth: AuthUser,
    uuid: Uuid,
    decision: Decision,
) -> axum::response::Response {
    let Some(role) = auth.role() else {
        return forbidden_response("Unknown role");
    };

    let repo = ApprovalRepository::new((*state.db).clone());
    let result = match decision {
        Decision::Approve => repo.approve(uuid, auth.user_id(), role).await,
        Decision::Reject(reason) => repo.reject(uuid, auth.user_id(), role, reason).await,
    };

    match result {
        Ok(tx) => {
            info!(
                transaction_uuid = %uuid,
                reviewer = %auth.user_id(),
                role = %role,
                "Transaction decided"
            );
            (
                StatusCode::OK,
                Json(TransactionResponse::from_model(tx)),
            )
                .into_response()
        }
        Err(e) => {
            if e.status_code() >= 500 {
                error!(error = %e, transaction_uuid = %uuid, "Failed to decide transaction");
            }
            workflow_error_response(&e)
        }
    }
}
