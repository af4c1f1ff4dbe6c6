//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or empty on a create request.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A transaction was given an amount of zero or less.
    ///
    /// Amounts are always positive; [TransactionType](crate::transaction::TransactionType)
    /// decides whether the amount adds to or subtracts from the balance.
    #[error("transaction amounts must be greater than zero")]
    NonPositiveAmount,

    /// A budget was given a negative monthly limit.
    #[error("budget limits must be zero or greater")]
    NegativeLimit,

    /// A string could not be parsed as a transaction type.
    #[error("'{0}' is not a valid transaction type, expected 'income' or 'expense'")]
    InvalidTransactionType(String),

    /// A month number outside 1-12 was supplied.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A year outside the range of representable dates was supplied.
    #[error("{0} is not a valid year")]
    InvalidYear(i32),

    /// The bulk budget request body did not contain a `budgets` array.
    #[error("the request body must contain a 'budgets' array")]
    InvalidBudgetPayload,

    /// The caller's identity has no matching user record.
    ///
    /// The identity provider authenticated the caller but the identity-sync
    /// webhook has not provisioned a user row for them yet.
    #[error("no user record exists for the caller's identity")]
    UserNotFound,

    /// The requested resource does not exist or belongs to another user.
    ///
    /// Rows owned by other users are reported as not found rather than
    /// forbidden so that callers cannot probe for their existence.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::MissingField(_)
            | Error::NonPositiveAmount
            | Error::NegativeLimit
            | Error::InvalidTransactionType(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::InvalidBudgetPayload => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_owned()),
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingBudget => (StatusCode::NOT_FOUND, self.to_string()),
            // SQL errors are not intended to be shown to the client.
            Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
