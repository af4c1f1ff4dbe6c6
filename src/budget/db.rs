//! Database operations for budgets.

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};

use crate::{
    Error,
    database_id::{BudgetId, UserId},
};

use super::models::Budget;

/// Create the budget table in the database.
///
/// The unique index enforces at most one budget per user, category, month
/// and year, which is what lets [upsert_budget] use ON CONFLICT.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_budget_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category TEXT NOT NULL,
            monthly_limit REAL NOT NULL,
            month INTEGER NOT NULL,
            year INTEGER NOT NULL,
            UNIQUE (user_id, category, month, year)
        )",
        (),
    )?;

    Ok(())
}

/// Optional filters for listing a user's budgets.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BudgetQuery {
    /// Keep only budgets for this calendar month (1-12).
    pub month: Option<u8>,
    /// Keep only budgets for this calendar year.
    pub year: Option<i32>,
    /// Keep only budgets for this category id.
    pub category: Option<String>,
}

/// Retrieve the budgets belonging to `user_id` that match `query`.
///
/// Results are ordered by year, then month, then category.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn get_budgets(
    user_id: UserId,
    query: &BudgetQuery,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let mut sql = "SELECT id, user_id, category, monthly_limit, month, year
         FROM budget
         WHERE user_id = ?1"
        .to_owned();
    let mut parameters: Vec<Value> = vec![Value::from(user_id)];

    if let Some(month) = query.month {
        sql.push_str(&format!(" AND month = ?{}", parameters.len() + 1));
        parameters.push(Value::from(i64::from(month)));
    }

    if let Some(year) = query.year {
        sql.push_str(&format!(" AND year = ?{}", parameters.len() + 1));
        parameters.push(Value::from(i64::from(year)));
    }

    if let Some(category) = &query.category {
        sql.push_str(&format!(" AND category = ?{}", parameters.len() + 1));
        parameters.push(Value::from(category.clone()));
    }

    sql.push_str(" ORDER BY year, month, category");

    let budgets = connection
        .prepare(&sql)?
        .query_map(params_from_iter(parameters), map_budget_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(budgets)
}

/// Create or replace the budget for `user_id`, `category`, `month` and
/// `year`, returning the stored row.
///
/// Writing an existing combination keeps the row's id and replaces the limit.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is outside 1-12,
/// [Error::NegativeLimit] if `monthly_limit` is below zero, or an error if
/// there is an SQL error.
pub fn upsert_budget(
    user_id: UserId,
    category: &str,
    monthly_limit: f64,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Budget, Error> {
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidMonth(month));
    }

    if monthly_limit < 0.0 {
        return Err(Error::NegativeLimit);
    }

    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, monthly_limit, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, category, month, year)
             DO UPDATE SET monthly_limit = excluded.monthly_limit
             RETURNING id, user_id, category, monthly_limit, month, year",
        )?
        .query_row(
            params![user_id, category, monthly_limit, month, year],
            map_budget_row,
        )?;

    Ok(budget)
}

/// Delete the budget with `budget_id` belonging to `user_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if the budget does not exist or
/// belongs to another user, or an error if there is an SQL error.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        params![budget_id, user_id],
    )?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingBudget)
    } else {
        Ok(())
    }
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        category: row.get("category")?,
        monthly_limit: row.get("monthly_limit")?,
        month: row.get("month")?,
        year: row.get("year")?,
    })
}
