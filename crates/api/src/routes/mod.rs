//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::Response};
use axum::response::IntoResponse;
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use amanah_core::workflow::WorkflowError;
use amanah_shared::AppError;

pub mod approvals;
pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod health;
pub mod transactions;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(approvals::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(finance::routes())
        .merge(protected_routes)
}

/// Renders a workflow error as an HTTP response.
pub(crate) fn workflow_error_response(err: &WorkflowError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// Renders an application error as an HTTP response.
///
/// Infrastructure kinds deliberately hide their detail from callers.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// The standard 403 body for a failed capability check.
pub(crate) fn forbidden_response(message: &str) -> Response {
    app_error_response(&AppError::Forbidden(message.to_string()))
}

/// The standard 500 body for infrastructure failures.
pub(crate) fn internal_error_response(err: impl std::fmt::Display) -> Response {
    app_error_response(&AppError::Internal(err.to_string()))
}
