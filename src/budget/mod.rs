//! Monthly spending limits per category: the domain model, database
//! operations, and the `/api/budgets` handlers.

mod db;
mod endpoints;
mod models;

pub use db::{
    BudgetQuery, create_budget_table, delete_budget, get_budgets, upsert_budget,
};
pub use endpoints::{
    delete_budget_endpoint, get_budgets_endpoint, upsert_budgets_endpoint,
};
pub use models::Budget;
