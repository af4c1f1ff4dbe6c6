//! The `/api/budgets` route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error, auth::Claims, database_id::BudgetId, user::get_user_by_subject,
};

use super::db::{BudgetQuery, delete_budget, get_budgets, upsert_budget};

/// The state needed for the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetApiState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string filters accepted when listing budgets.
#[derive(Debug, Deserialize)]
pub struct BudgetListParams {
    month: Option<u8>,
    year: Option<i32>,
    category: Option<String>,
}

/// A handler for listing the caller's budgets, filtered by the query string.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetApiState>,
    claims: Claims,
    Query(params): Query<BudgetListParams>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let query = BudgetQuery {
        month: params.month,
        year: params.year,
        category: params.category,
    };
    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| get_budgets(user.id, &query, &connection));

    match result {
        Ok(budgets) => (StatusCode::OK, Json(budgets)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// One budget in the bulk upsert request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetEntry {
    category: String,
    monthly_limit: f64,
    month: u8,
    year: i32,
}

/// A handler for creating or replacing budgets in bulk.
///
/// The body must be a JSON object with a `budgets` array. Entries that do
/// not have the expected shape are skipped; entries with the right shape but
/// invalid values, such as a month of zero, fail the whole request.
pub async fn upsert_budgets_endpoint(
    State(state): State<BudgetApiState>,
    claims: Claims,
    Json(body): Json<Value>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = get_user_by_subject(&claims.sub, &connection).and_then(|user| {
        let entries = body
            .get("budgets")
            .and_then(Value::as_array)
            .ok_or(Error::InvalidBudgetPayload)?;

        let mut stored = Vec::new();

        for entry in entries {
            let Ok(entry) = serde_json::from_value::<BudgetEntry>(entry.clone()) else {
                tracing::debug!("skipping malformed budget entry: {entry}");
                continue;
            };

            stored.push(upsert_budget(
                user.id,
                &entry.category,
                entry.monthly_limit,
                entry.month,
                entry.year,
                &connection,
            )?);
        }

        Ok(stored)
    });

    match result {
        Ok(budgets) => (StatusCode::OK, Json(budgets)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A handler for deleting a budget owned by the caller.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetApiState>,
    claims: Claims,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| delete_budget(budget_id, user.id, &connection));

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}
