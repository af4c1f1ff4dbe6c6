//! Database operations for transactions.

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    database_id::{TransactionId, UserId},
    period::{Period, month_bounds, year_bounds},
};

use super::models::{Transaction, TransactionBuilder, TransactionType};

/// Create the transaction table in the database.
///
/// `transaction` is a SQL keyword so the table name is quoted everywhere.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_transaction_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            amount REAL NOT NULL,
            type TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            notes TEXT
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
         ON \"transaction\" (user_id, date)",
        (),
    )?;

    Ok(())
}

/// Create a transaction in the database from `builder`.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the amount is zero or less, or an
/// error if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, title, amount, type, category, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, title, amount, type, category, date, notes",
        )?
        .query_row(
            params![
                builder.user_id,
                builder.title,
                builder.amount,
                builder.transaction_type.as_str(),
                builder.category,
                builder.date,
                builder.notes,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `transaction_id` belonging to `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user, or an error if there is an SQL error.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, title, amount, type, category, date, notes
             FROM \"transaction\"
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![transaction_id, user_id], map_transaction_row)?;

    Ok(transaction)
}

/// Optional filters for listing a user's transactions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Keep only transactions in this calendar month (1-12). When set without
    /// `year`, the current year is assumed.
    pub month: Option<u8>,
    /// Keep only transactions in this calendar year.
    pub year: Option<i32>,
    /// Keep only transactions with this category id.
    pub category: Option<String>,
    /// Keep only income or only expense transactions.
    pub transaction_type: Option<TransactionType>,
    /// Return at most this many transactions.
    pub limit: Option<u32>,
}

/// Retrieve the transactions belonging to `user_id` that match `query`.
///
/// Results are ordered most recent first, with the higher id winning ties on
/// the same date.
///
/// # Errors
/// Returns an error if the query's month or year is invalid, or if there is
/// an SQL error.
pub fn get_transactions(
    user_id: UserId,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut sql = "SELECT id, user_id, title, amount, type, category, date, notes
         FROM \"transaction\"
         WHERE user_id = ?1"
        .to_owned();
    let mut parameters: Vec<Value> = vec![Value::from(user_id)];

    let date_range = match (query.month, query.year) {
        (Some(month), year) => Some(month_bounds(
            month,
            year.unwrap_or_else(|| Period::current().year),
        )?),
        (None, Some(year)) => Some(year_bounds(year)?),
        (None, None) => None,
    };

    if let Some((start, end)) = date_range {
        sql.push_str(&format!(
            " AND date BETWEEN ?{} AND ?{}",
            parameters.len() + 1,
            parameters.len() + 2
        ));
        parameters.push(Value::from(start.to_string()));
        parameters.push(Value::from(end.to_string()));
    }

    if let Some(category) = &query.category {
        sql.push_str(&format!(" AND category = ?{}", parameters.len() + 1));
        parameters.push(Value::from(category.clone()));
    }

    if let Some(transaction_type) = query.transaction_type {
        sql.push_str(&format!(" AND type = ?{}", parameters.len() + 1));
        parameters.push(Value::from(transaction_type.as_str().to_owned()));
    }

    sql.push_str(" ORDER BY date DESC, id DESC");

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT ?{}", parameters.len() + 1));
        parameters.push(Value::from(i64::from(limit)));
    }

    let transactions = connection
        .prepare(&sql)?
        .query_map(params_from_iter(parameters), map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// The fields of a [Transaction] that a partial update may change.
///
/// Fields left as `None` keep their stored value. That makes notes
/// merge-only: an update can replace them but never clear them, since an
/// absent field and a null one are indistinguishable here.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// A new title.
    pub title: Option<String>,
    /// A new amount, must be greater than zero.
    pub amount: Option<f64>,
    /// A new transaction type.
    pub transaction_type: Option<TransactionType>,
    /// A new category id.
    pub category: Option<String>,
    /// A new date.
    pub date: Option<Date>,
    /// New notes.
    pub notes: Option<String>,
}

/// Apply `update` to the transaction with `transaction_id` belonging to
/// `user_id`, returning the updated row.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist or belongs to another user, [Error::NonPositiveAmount] if the new
/// amount is zero or less, or an error if there is an SQL error.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(transaction_id, user_id, connection)
        .map_err(|_| Error::UpdateMissingTransaction)?;

    let title = update.title.unwrap_or(existing.title);
    let amount = update.amount.unwrap_or(existing.amount);
    let transaction_type = update.transaction_type.unwrap_or(existing.transaction_type);
    let category = update.category.unwrap_or(existing.category);
    let date = update.date.unwrap_or(existing.date);
    let notes = update.notes.or(existing.notes);

    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let transaction = connection
        .prepare(
            "UPDATE \"transaction\"
             SET title = ?1, amount = ?2, type = ?3, category = ?4, date = ?5, notes = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING id, user_id, title, amount, type, category, date, notes",
        )?
        .query_row(
            params![
                title,
                amount,
                transaction_type.as_str(),
                category,
                date,
                notes,
                transaction_id,
                user_id,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete the transaction with `transaction_id` belonging to `user_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the transaction does not
/// exist or belongs to another user, or an error if there is an SQL error.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        params![transaction_id, user_id],
    )?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingTransaction)
    } else {
        Ok(())
    }
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let type_text: String = row.get("type")?;
    let transaction_type = TransactionType::parse(&type_text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index("type").unwrap_or_default(),
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })?;

    Ok(Transaction {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        amount: row.get("amount")?,
        transaction_type,
        category: row.get("category")?,
        date: row.get("date")?,
        notes: row.get("notes")?,
    })
}
