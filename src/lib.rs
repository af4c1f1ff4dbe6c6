//! A personal finance tracker exposed as a JSON REST API.
//!
//! Users record income and expense transactions, set monthly budgets per
//! category, and read aggregated dashboards. Authentication is delegated to
//! an external identity provider: requests carry a Bearer JWT whose subject
//! is mirrored into a local user row by a webhook.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod app_state;
pub mod auth;
pub mod budget;
pub mod category;
pub mod dashboard;
mod database_id;
pub mod db;
pub mod endpoints;
mod error;
pub mod period;
mod routing;
pub mod transaction;
pub mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::{BudgetId, DatabaseId, TransactionId, UserId};
pub use error::Error;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
