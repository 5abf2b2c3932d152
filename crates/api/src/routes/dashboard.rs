//! Role-shaped dashboard statistics.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{Datelike, Utc};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::middleware::AuthUser;
use crate::routes::{forbidden_response, internal_error_response};
use crate::AppState;
use amanah_db::entities::sea_orm_active_enums::TransactionKind;
use amanah_db::repositories::{TransactionRepository, UserRepository};
use amanah_shared::types::format_rupiah;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET `/dashboard` - Financial stats shaped by the caller's role.
///
/// Everyone authenticated sees the approved balance; approvers also see
/// the pending queue size; the administrator additionally sees system
/// totals.
#[allow(clippy::too_many_lines)]
async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(role) = auth.role() else {
        return forbidden_response("Unknown role");
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());

    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);

    let base = async {
        let income = tx_repo
            .approved_total(TransactionKind::Income, None, None)
            .await?;
        let expense = tx_repo
            .approved_total(TransactionKind::Expense, None, None)
            .await?;
        let monthly_income = tx_repo
            .approved_total(TransactionKind::Income, Some(month_start), None)
            .await?;
        let monthly_expense = tx_repo
            .approved_total(TransactionKind::Expense, Some(month_start), None)
            .await?;
        Ok::<_, sea_orm::DbErr>((income, expense, monthly_income, monthly_expense))
    }
    .await;

    let (income, expense, monthly_income, monthly_expense) = match base {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "Failed to build dashboard stats");
            return internal_error_response(&e);
        }
    };

    let balance = income - expense;
    let mut stats = Map::new();
    stats.insert("balance".into(), Value::String(balance.to_string()));
    stats.insert(
        "formatted_balance".into(),
        Value::String(format_rupiah(balance)),
    );
    stats.insert(
        "monthly_income".into(),
        Value::String(monthly_income.to_string()),
    );
    stats.insert(
        "formatted_monthly_income".into(),
        Value::String(format_rupiah(monthly_income)),
    );
    stats.insert(
        "monthly_expense".into(),
        Value::String(monthly_expense.to_string()),
    );
    stats.insert(
        "formatted_monthly_expense".into(),
        Value::String(format_rupiah(monthly_expense)),
    );

    if role.can_approve() {
        match tx_repo.count_pending().await {
            Ok(count) => {
                stats.insert("pending_approvals".into(), Value::from(count));
            }
            Err(e) => {
                error!(error = %e, "Failed to count pending approvals");
                return internal_error_response(&e);
            }
        }
    }

    if role == amanah_core::workflow::Role::SuperAdmin {
        let user_repo = UserRepository::new((*state.db).clone());
        let counts = async {
            let users = user_repo.count().await?;
            let transactions = tx_repo.count().await?;
            Ok::<_, sea_orm::DbErr>((users, transactions))
        }
        .await;
        match counts {
            Ok((users, transactions)) => {
                stats.insert("total_users".into(), Value::from(users));
                stats.insert("total_transactions".into(), Value::from(transactions));
            }
            Err(e) => {
                error!(error = %e, "Failed to count system totals");
                return internal_error_response(&e);
            }
        }
    }

    // Approvers get the queue-priority view of recent activity.
    let recent = match tx_repo.recent(10, role.can_approve()).await {
        Ok(rows) => rows
            .into_iter()
            .map(crate::routes::transactions::TransactionResponse::from_model)
            .collect::<Vec<_>>(),
        Err(e) => {
            error!(error = %e, "Failed to list recent transactions");
            return internal_error_response(&e);
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "role": role.as_str(),
            "stats": Value::Object(stats),
            "recent_transactions": recent,
        })),
    )
        .into_response()
}
