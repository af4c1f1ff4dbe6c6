//! Pure aggregation over transactions and budgets, plus thin wrappers that
//! load the inputs from the database.
//!
//! The aggregation functions take slices so they can be tested without a
//! database and reused by any future reporting surface.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    budget::{Budget, BudgetQuery, get_budgets},
    database_id::UserId,
    transaction::{Transaction, TransactionQuery, TransactionType, get_transactions},
};

/// The income, expense and balance totals for one month, with expenses
/// broken down by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expenses: f64,
    /// Income minus expenses. Negative when the user overspent.
    pub balance: f64,
    /// Expense totals per category id. Only categories with at least one
    /// expense appear.
    pub category_summary: BTreeMap<String, f64>,
}

/// One budget joined with the spending recorded against its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummaryLine {
    /// The underlying budget.
    #[serde(flatten)]
    pub budget: Budget,
    /// The total spent in the budget's category.
    pub spent: f64,
    /// The limit minus the spending. Negative when over budget.
    pub remaining: f64,
    /// How much of the limit is used, as a percentage capped at 100.
    /// Zero when the limit itself is zero.
    pub percentage: f64,
}

/// Sum the expense transactions per category id.
///
/// Income transactions are ignored regardless of their category.
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        if transaction.transaction_type == TransactionType::Expense {
            *totals.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
        }
    }

    totals
}

/// Compute the income, expense and balance totals for `transactions`.
pub fn compute_monthly_stats(transactions: &[Transaction]) -> MonthlyStats {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expenses += transaction.amount,
        }
    }

    MonthlyStats {
        income,
        expenses,
        balance: income - expenses,
        category_summary: spending_by_category(transactions),
    }
}

/// Join `budgets` with the spending recorded against their categories.
///
/// Lines come back ordered by category id so the output is stable. Spending
/// in a category with no budget is not reported here, it only shows up in
/// [MonthlyStats::category_summary].
pub fn compute_budget_summary(
    budgets: Vec<Budget>,
    spending: &BTreeMap<String, f64>,
) -> Vec<BudgetSummaryLine> {
    let mut lines: Vec<BudgetSummaryLine> = budgets
        .into_iter()
        .map(|budget| {
            let spent = spending.get(&budget.category).copied().unwrap_or(0.0);
            let remaining = budget.monthly_limit - spent;
            let percentage = if budget.monthly_limit > 0.0 {
                (spent / budget.monthly_limit * 100.0).min(100.0)
            } else {
                0.0
            };

            BudgetSummaryLine {
                budget,
                spent,
                remaining,
                percentage,
            }
        })
        .collect();

    lines.sort_by(|a, b| a.budget.category.cmp(&b.budget.category));

    lines
}

/// Load the transactions for `month` and `year` and compute their totals.
///
/// # Errors
/// Returns an error if the month or year is invalid, or if there is an SQL
/// error.
pub fn get_monthly_stats(
    user_id: UserId,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<MonthlyStats, Error> {
    let query = TransactionQuery {
        month: Some(month),
        year: Some(year),
        ..Default::default()
    };
    let transactions = get_transactions(user_id, &query, connection)?;

    Ok(compute_monthly_stats(&transactions))
}

/// Load the budgets and transactions for `month` and `year` and join them
/// into budget summary lines.
///
/// # Errors
/// Returns an error if the month or year is invalid, or if there is an SQL
/// error.
pub fn get_budget_summary(
    user_id: UserId,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Vec<BudgetSummaryLine>, Error> {
    let transaction_query = TransactionQuery {
        month: Some(month),
        year: Some(year),
        ..Default::default()
    };
    let transactions = get_transactions(user_id, &transaction_query, connection)?;

    let budget_query = BudgetQuery {
        month: Some(month),
        year: Some(year),
        ..Default::default()
    };
    let budgets = get_budgets(user_id, &budget_query, connection)?;

    Ok(compute_budget_summary(
        budgets,
        &spending_by_category(&transactions),
    ))
}

#[cfg(test)]
mod aggregation_tests {
    use std::collections::BTreeMap;

    use time::macros::date;

    use crate::{
        budget::Budget,
        transaction::{Transaction, TransactionType},
    };

    use super::{compute_budget_summary, compute_monthly_stats, spending_by_category};

    fn transaction(
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
    ) -> Transaction {
        Transaction {
            id: 1,
            user_id: 1,
            title: "A transaction".to_owned(),
            amount,
            transaction_type,
            category: category.to_owned(),
            date: date!(2024 - 03 - 10),
            notes: None,
        }
    }

    fn budget(category: &str, monthly_limit: f64) -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            category: category.to_owned(),
            monthly_limit,
            month: 3,
            year: 2024,
        }
    }

    #[test]
    fn stats_combine_income_expenses_and_balance() {
        let transactions = [
            transaction(2000.0, TransactionType::Income, "salary"),
            transaction(50.0, TransactionType::Expense, "food"),
        ];

        let stats = compute_monthly_stats(&transactions);

        assert_eq!(stats.income, 2000.0);
        assert_eq!(stats.expenses, 50.0);
        assert_eq!(stats.balance, 1950.0);
        assert_eq!(
            stats.category_summary,
            BTreeMap::from([("food".to_owned(), 50.0)])
        );
    }

    #[test]
    fn stats_for_no_transactions_are_all_zero() {
        let stats = compute_monthly_stats(&[]);

        assert_eq!(stats.income, 0.0);
        assert_eq!(stats.expenses, 0.0);
        assert_eq!(stats.balance, 0.0);
        assert!(stats.category_summary.is_empty());
    }

    #[test]
    fn balance_goes_negative_when_overspent() {
        let transactions = [
            transaction(100.0, TransactionType::Income, "salary"),
            transaction(150.0, TransactionType::Expense, "food"),
        ];

        let stats = compute_monthly_stats(&transactions);

        assert_eq!(stats.balance, -50.0);
    }

    #[test]
    fn category_summary_ignores_income_and_sums_to_expenses() {
        let transactions = [
            transaction(2000.0, TransactionType::Income, "salary"),
            transaction(30.0, TransactionType::Expense, "food"),
            transaction(20.0, TransactionType::Expense, "food"),
            transaction(15.0, TransactionType::Expense, "transportation"),
        ];

        let summary = spending_by_category(&transactions);

        assert!(!summary.contains_key("salary"));
        assert_eq!(summary["food"], 50.0);
        assert_eq!(summary["transportation"], 15.0);

        let stats = compute_monthly_stats(&transactions);
        let total: f64 = summary.values().sum();
        assert_eq!(total, stats.expenses);
    }

    #[test]
    fn summary_line_reports_spent_remaining_and_percentage() {
        let spending = BTreeMap::from([("food".to_owned(), 50.0)]);

        let lines = compute_budget_summary(vec![budget("food", 100.0)], &spending);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spent, 50.0);
        assert_eq!(lines[0].remaining, 50.0);
        assert_eq!(lines[0].percentage, 50.0);
    }

    #[test]
    fn percentage_is_capped_but_remaining_is_not() {
        let spending = BTreeMap::from([("food".to_owned(), 150.0)]);

        let lines = compute_budget_summary(vec![budget("food", 100.0)], &spending);

        assert_eq!(lines[0].remaining, -50.0);
        assert_eq!(lines[0].percentage, 100.0);
    }

    #[test]
    fn zero_limit_budgets_report_zero_percent() {
        let spending = BTreeMap::from([("food".to_owned(), 25.0)]);

        let lines = compute_budget_summary(vec![budget("food", 0.0)], &spending);

        assert_eq!(lines[0].spent, 25.0);
        assert_eq!(lines[0].remaining, -25.0);
        assert_eq!(lines[0].percentage, 0.0);
    }

    #[test]
    fn budgets_with_no_spending_report_zero_spent() {
        let lines = compute_budget_summary(vec![budget("food", 100.0)], &BTreeMap::new());

        assert_eq!(lines[0].spent, 0.0);
        assert_eq!(lines[0].remaining, 100.0);
        assert_eq!(lines[0].percentage, 0.0);
    }

    #[test]
    fn summary_lines_are_ordered_by_category() {
        let budgets = vec![
            budget("transportation", 60.0),
            budget("entertainment", 40.0),
            budget("food", 100.0),
        ];

        let lines = compute_budget_summary(budgets, &BTreeMap::new());

        let categories: Vec<&str> = lines
            .iter()
            .map(|line| line.budget.category.as_str())
            .collect();
        assert_eq!(categories, vec!["entertainment", "food", "transportation"]);
    }
}
