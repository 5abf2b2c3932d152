//! Public financial transparency routes.
//!
//! No authentication: this is the data behind the public "keuangan"
//! page. Only approved transactions are counted and listed.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::routes::internal_error_response;
use crate::routes::transactions::TransactionResponse;
use crate::AppState;
use amanah_db::entities::sea_orm_active_enums::{TransactionKind, TransactionStatus};
use amanah_db::repositories::transaction::{TransactionFilter, TransactionRepository};
use amanah_shared::types::format_rupiah;

/// Number of months in the public chart.
const CHART_MONTHS: u32 = 6;
/// Number of recent transactions shown publicly.
const RECENT_LIMIT: u64 = 50;

/// Creates the public finance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/finance/public", get(public_summary))
}

/// One month of chart data.
#[derive(Debug, Serialize)]
struct ChartPoint {
    /// Display label, e.g. "Mar 2026".
    label: String,
    /// Approved income total, as a decimal string.
    income: String,
    /// Approved expense total, as a decimal string.
    expense: String,
}

/// GET `/finance/public` - Balance, monthly chart, recent transactions.
async fn public_summary(State(state): State<AppState>) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    let totals = async {
        let income = repo
            .approved_total(TransactionKind::Income, None, None)
            .await?;
        let expense = repo
            .approved_total(TransactionKind::Expense, None, None)
            .await?;
        let today = chrono::Utc::now().date_naive();
        let series = repo.monthly_series(CHART_MONTHS, today).await?;
        let recent = repo
            .list(TransactionFilter {
                status: Some(TransactionStatus::Approved),
                limit: Some(RECENT_LIMIT),
                ..Default::default()
            })
            .await?;
        Ok::<_, sea_orm::DbErr>((income, expense, series, recent))
    }
    .await;

    let (income, expense, series, recent) = match totals {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "Failed to build public finance summary");
            return internal_error_response(&e);
        }
    };

    let balance = income - expense;
    let chart: Vec<ChartPoint> = series
        .into_iter()
        .map(|m| ChartPoint {
            label: m.label,
            income: m.income.to_string(),
            expense: m.expense.to_string(),
        })
        .collect();
    let transactions: Vec<TransactionResponse> = recent
        .into_iter()
        .map(TransactionResponse::from_model)
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "summary": {
                "income": income.to_string(),
                "expense": expense.to_string(),
                "balance": balance.to_string(),
                "formatted_income": format_rupiah(income),
                "formatted_expense": format_rupiah(expense),
                "formatted_balance": format_rupiah(balance),
            },
            "chart": chart,
            "transactions": transactions,
        })),
    )
        .into_response()
}
