//! The `/api/dashboard` route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, auth::Claims, period::Period, user::get_user_by_subject,
};

use super::aggregation::{get_budget_summary, get_monthly_stats};

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardApiState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The month and year a dashboard request targets. Both default to the
/// current wall-clock month.
#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    month: Option<u8>,
    year: Option<i32>,
}

impl PeriodParams {
    fn resolve(self) -> Period {
        let current = Period::current();

        Period {
            month: self.month.unwrap_or(current.month),
            year: self.year.unwrap_or(current.year),
        }
    }
}

/// A handler for the caller's monthly income, expense and balance totals.
pub async fn get_monthly_stats_endpoint(
    State(state): State<DashboardApiState>,
    claims: Claims,
    Query(params): Query<PeriodParams>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();
    let period = params.resolve();

    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| get_monthly_stats(user.id, period.month, period.year, &connection));

    match result {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A handler for the caller's budgets joined with their monthly spending.
pub async fn get_budget_summary_endpoint(
    State(state): State<DashboardApiState>,
    claims: Claims,
    Query(params): Query<PeriodParams>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();
    let period = params.resolve();

    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| get_budget_summary(user.id, period.month, period.year, &connection));

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}
