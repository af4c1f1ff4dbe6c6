//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    budget::{delete_budget_endpoint, get_budgets_endpoint, upsert_budgets_endpoint},
    dashboard::{get_budget_summary_endpoint, get_monthly_stats_endpoint},
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    user::identity_webhook_endpoint,
};

/// Return a router with all the app's routes.
///
/// All routes except the identity webhook require a Bearer token from the
/// identity provider; the webhook is called by the provider itself.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(upsert_budgets_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::DASHBOARD_STATS, get(get_monthly_stats_endpoint))
        .route(
            endpoints::DASHBOARD_BUDGETS,
            get(get_budget_summary_endpoint),
        )
        .route(endpoints::IDENTITY_WEBHOOK, post(identity_webhook_endpoint))
        .with_state(state)
}
