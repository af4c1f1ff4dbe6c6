//! The static category registry.
//!
//! Categories are a fixed classification for transactions and budgets with
//! display metadata and income/expense eligibility. The table is defined at
//! compile time and shared read-only across all request handlers; there is no
//! mutation path. Transactions and budgets store category ids as plain text
//! without a foreign key, so an id that no longer matches anything resolves
//! to the "Other" category at read time instead of failing.

use serde::Serialize;

/// A fixed classification tag for transactions and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// The stable identifier stored on transactions and budgets.
    pub id: &'static str,
    /// The human readable name.
    pub name: &'static str,
    /// The display color as a hex string, e.g. "#FF6B6B".
    pub color: &'static str,
}

/// Every category known to the application, in display order.
///
/// "Other" is last and doubles as the fallback for unknown ids.
pub static CATEGORIES: [Category; 12] = [
    Category {
        id: "food",
        name: "Food",
        color: "#FF6B6B",
    },
    Category {
        id: "housing",
        name: "Housing",
        color: "#4ECDC4",
    },
    Category {
        id: "transportation",
        name: "Transportation",
        color: "#FFD166",
    },
    Category {
        id: "utilities",
        name: "Utilities",
        color: "#6B5B95",
    },
    Category {
        id: "entertainment",
        name: "Entertainment",
        color: "#FF8C42",
    },
    Category {
        id: "healthcare",
        name: "Healthcare",
        color: "#F25F5C",
    },
    Category {
        id: "shopping",
        name: "Shopping",
        color: "#65C3C8",
    },
    Category {
        id: "personal",
        name: "Personal",
        color: "#AEBD38",
    },
    Category {
        id: "education",
        name: "Education",
        color: "#598234",
    },
    Category {
        id: "salary",
        name: "Salary",
        color: "#2D936C",
    },
    Category {
        id: "investment",
        name: "Investment",
        color: "#5C80BC",
    },
    Category {
        id: "other",
        name: "Other",
        color: "#9C89B8",
    },
];

/// Categories that income transactions are expected to use.
const INCOME_CATEGORY_IDS: [&str; 3] = ["salary", "investment", "other"];

/// Look up a category by id, falling back to "Other" for unknown ids.
///
/// This never fails: stale or invalid ids degrade gracefully at display time.
pub fn resolve_category(id: &str) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
}

/// Whether income transactions are expected to use this category.
///
/// The partition is advisory: nothing rejects an income transaction tagged
/// with an expense-only category.
pub fn is_income_category(id: &str) -> bool {
    INCOME_CATEGORY_IDS.contains(&id)
}

/// Whether expense transactions are expected to use this category.
///
/// Everything except the income-only categories qualifies, so "other"
/// belongs to both partitions.
pub fn is_expense_category(id: &str) -> bool {
    !matches!(id, "salary" | "investment")
}
