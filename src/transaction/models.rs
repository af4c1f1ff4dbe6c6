//! The transaction domain model.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{TransactionId, UserId},
};

/// Whether a transaction adds to or subtracts from the user's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The wire and database representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse the wire representation back into the enum.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType] for anything other than
    /// "income" or "expense".
    pub fn parse(text: &str) -> Result<Self, Error> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// A single income or expense record owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the owning user.
    pub user_id: UserId,
    /// A short description of the transaction, e.g. "Weekly groceries".
    pub title: String,
    /// The amount of money, always greater than zero.
    /// [TransactionType] decides the sign at display time.
    pub amount: f64,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category id. A soft reference: unknown ids resolve to "Other"
    /// at display time via [resolve_category](crate::category::resolve_category).
    pub category: String,
    /// The date the transaction occurred.
    pub date: Date,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// The fields needed to create a [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The ID of the owning user.
    pub user_id: UserId,
    /// A short description of the transaction.
    pub title: String,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// Whether this is income or an expense.
    pub transaction_type: TransactionType,
    /// The category id.
    pub category: String,
    /// The date the transaction occurred.
    pub date: Date,
    /// Free-form notes.
    pub notes: Option<String>,
}
