//! Read-only aggregations over transactions and budgets, and the
//! `/api/dashboard` handlers.

mod aggregation;
mod endpoints;

pub use aggregation::{
    BudgetSummaryLine, MonthlyStats, compute_budget_summary, compute_monthly_stats,
    get_budget_summary, get_monthly_stats, spending_by_category,
};
pub use endpoints::{get_budget_summary_endpoint, get_monthly_stats_endpoint};
