//! The budget domain model.

use serde::{Deserialize, Serialize};

use crate::database_id::{BudgetId, UserId};

/// A monthly spending limit for one category.
///
/// At most one budget exists per user, category, month and year; writing the
/// same combination again replaces the limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The ID of the owning user.
    pub user_id: UserId,
    /// The category id the limit applies to.
    pub category: String,
    /// The spending limit for the month, zero or greater.
    pub monthly_limit: f64,
    /// The month number, 1 (January) through 12 (December).
    pub month: u8,
    /// The calendar year.
    pub year: i32,
}
