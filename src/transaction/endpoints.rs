//! The `/api/transactions` route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::Claims,
    database_id::{TransactionId, UserId},
    user::get_user_by_subject,
};

use super::{
    db::{
        TransactionQuery, TransactionUpdate, create_transaction, delete_transaction,
        get_transaction, get_transactions, update_transaction,
    },
    models::{TransactionBuilder, TransactionType},
};

/// The state needed for the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string filters accepted when listing transactions.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    month: Option<u8>,
    year: Option<i32>,
    category: Option<String>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    limit: Option<u32>,
}

impl TransactionListParams {
    fn into_query(self) -> Result<TransactionQuery, Error> {
        let transaction_type = match self.transaction_type {
            Some(text) => Some(TransactionType::parse(&text)?),
            None => None,
        };

        Ok(TransactionQuery {
            month: self.month,
            year: self.year,
            category: self.category,
            transaction_type,
            limit: self.limit,
        })
    }
}

/// A handler for listing the caller's transactions, filtered by the query
/// string.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionApiState>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = params.into_query().and_then(|query| {
        get_user_by_subject(&claims.sub, &connection)
            .and_then(|user| get_transactions(user.id, &query, &connection))
    });

    match result {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// The request body for creating a transaction.
///
/// Every field is optional at the serde level so that a missing field
/// produces the application's own 400 response instead of a deserialization
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    title: Option<String>,
    amount: Option<f64>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    category: Option<String>,
    date: Option<Date>,
    notes: Option<String>,
}

impl CreateTransaction {
    fn into_builder(self, user_id: UserId) -> Result<TransactionBuilder, Error> {
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(Error::MissingField("title"))?;
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        let transaction_type = self
            .transaction_type
            .ok_or(Error::MissingField("type"))
            .and_then(|text| TransactionType::parse(&text))?;
        let category = self
            .category
            .filter(|category| !category.trim().is_empty())
            .ok_or(Error::MissingField("category"))?;
        let date = self.date.ok_or(Error::MissingField("date"))?;

        Ok(TransactionBuilder {
            user_id,
            title,
            amount,
            transaction_type,
            category,
            date,
            notes: self.notes,
        })
    }
}

/// A handler for creating a transaction for the caller.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionApiState>,
    claims: Claims,
    Json(body): Json<CreateTransaction>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = get_user_by_subject(&claims.sub, &connection).and_then(|user| {
        let builder = body.into_builder(user.id)?;
        create_transaction(builder, &connection)
    });

    match result {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A handler for fetching a single transaction owned by the caller.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionApiState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| get_transaction(transaction_id, user.id, &connection));

    match result {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// The request body for partially updating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransaction {
    title: Option<String>,
    amount: Option<f64>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    category: Option<String>,
    date: Option<Date>,
    notes: Option<String>,
}

impl UpdateTransaction {
    fn into_update(self) -> Result<TransactionUpdate, Error> {
        let transaction_type = match self.transaction_type {
            Some(text) => Some(TransactionType::parse(&text)?),
            None => None,
        };

        Ok(TransactionUpdate {
            title: self.title,
            amount: self.amount,
            transaction_type,
            category: self.category,
            date: self.date,
            notes: self.notes,
        })
    }
}

/// A handler for partially updating a transaction owned by the caller.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionApiState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
    Json(body): Json<UpdateTransaction>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = body.into_update().and_then(|update| {
        get_user_by_subject(&claims.sub, &connection)
            .and_then(|user| update_transaction(transaction_id, user.id, update, &connection))
    });

    match result {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A handler for deleting a transaction owned by the caller.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionApiState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = get_user_by_subject(&claims.sub, &connection)
        .and_then(|user| delete_transaction(transaction_id, user.id, &connection));

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}
