//! The user model, identity-keyed persistence, and the identity-sync webhook.
//!
//! Accounts live in the external identity provider; this application only
//! mirrors them. The provider posts lifecycle events to
//! [endpoints::IDENTITY_WEBHOOK](crate::endpoints::IDENTITY_WEBHOOK) and the
//! handler here upserts or deletes the matching user row, keyed by the
//! provider's stable subject string.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, database_id::UserId};

/// An account mirrored from the external identity provider.
///
/// Owns all [transactions](crate::transaction::Transaction) and
/// [budgets](crate::budget::Budget); deleting a user cascades to both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// The internal database ID.
    pub id: UserId,
    /// The identity provider's stable reference for this account.
    pub subject: String,
    /// The display name reported by the identity provider.
    pub name: String,
    /// The email address reported by the identity provider.
    pub email: String,
}

/// Initialize the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            subject TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
}

/// Create a user for `subject`, or refresh the name and email of the
/// existing row for that subject.
///
/// Repeated sign-ins therefore update one row instead of creating
/// duplicates.
pub fn upsert_user(
    subject: &str,
    name: &str,
    email: &str,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(
            "INSERT INTO user (subject, name, email) VALUES (?1, ?2, ?3)
             ON CONFLICT(subject) DO UPDATE SET name = excluded.name, email = excluded.email
             RETURNING id, subject, name, email",
        )?
        .query_row((subject, name, email), map_user_row)
        .map_err(|error| error.into())
}

/// Look up the user provisioned for an identity provider subject.
///
/// # Errors
/// Returns [Error::UserNotFound] if no user row exists for `subject`, which
/// handlers report as a 404 distinct from a missing resource.
pub fn get_user_by_subject(subject: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, subject, name, email FROM user WHERE subject = :subject")?
        .query_row(&[(":subject", subject)], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => error.into(),
        })
}

/// Delete the user for `subject` along with their transactions and budgets.
///
/// Deleting an already-removed subject is a no-op: the identity provider may
/// retry webhook deliveries.
pub fn delete_user_by_subject(subject: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM user WHERE subject = ?1", [subject])?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        subject: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
    })
}

/// An account lifecycle event posted by the identity provider.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    /// The event kind, e.g. "user.created".
    #[serde(rename = "type")]
    pub event_type: String,
    /// The account the event is about.
    pub data: IdentityEventData,
}

/// The account fields carried by an [IdentityEvent].
#[derive(Debug, Deserialize)]
pub struct IdentityEventData {
    /// The identity provider's stable reference for the account.
    pub id: String,
    /// The display name, absent on deletion events.
    #[serde(default)]
    pub name: Option<String>,
    /// The email address, absent on deletion events.
    #[serde(default)]
    pub email: Option<String>,
}

/// The state needed for the identity webhook.
#[derive(Clone)]
pub struct IdentityWebhookState {
    /// The database connection for managing users.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IdentityWebhookState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for identity provider lifecycle events.
///
/// Creation and update events upsert the user row keyed by the provider
/// subject; deletion events remove the row and everything it owns. Unknown
/// event kinds are acknowledged and ignored so the provider does not retry
/// them forever.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn identity_webhook_endpoint(
    State(state): State<IdentityWebhookState>,
    Json(event): Json<IdentityEvent>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = match event.event_type.as_str() {
        "user.created" | "user.updated" => upsert_user(
            &event.data.id,
            event.data.name.as_deref().unwrap_or_default(),
            event.data.email.as_deref().unwrap_or_default(),
            &connection,
        )
        .map(|user| (StatusCode::OK, Json(user)).into_response()),
        "user.deleted" => delete_user_by_subject(&event.data.id, &connection)
            .map(|()| StatusCode::NO_CONTENT.into_response()),
        other => {
            tracing::debug!("Ignoring unrecognized identity event '{other}'");
            Ok(StatusCode::OK.into_response())
        }
    };

    result.unwrap_or_else(|error| error.into_response())
}
