//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use jsonwebtoken::DecodingKey;
use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key for verifying identity tokens from the external identity provider.
    pub decoding_key: DecodingKey,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `identity_secret` is the secret shared with the
    /// identity provider for verifying its tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, identity_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(identity_secret.as_bytes()),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// this impl tells the Claims extractor how to access the key from our state
impl FromRef<AppState> for DecodingKey {
    fn from_ref(state: &AppState) -> Self {
        state.decoding_key.clone()
    }
}
