//! Shared helpers for endpoint tests: an in-memory app, identity tokens, and
//! user provisioning.

use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, build_router, user::{User, upsert_user}};

/// The secret shared with the pretend identity provider in tests.
pub const TEST_SECRET: &str = "an unguessable test secret";

// 2100-01-01T00:00:00Z, far enough out for any test run.
const FAR_FUTURE: usize = 4102444800;

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: usize,
}

/// An [AppState] backed by a fresh in-memory database.
pub fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection, TEST_SECRET).expect("Could not create app state")
}

/// A test server running the full router, plus the state backing it for
/// direct database access in test setup.
pub fn get_test_server() -> (TestServer, AppState) {
    let state = get_test_state();
    let server = TestServer::new(build_router(state.clone()));

    (server, state)
}

/// Mint a token the way the identity provider would, signed with [TEST_SECRET].
pub fn mint_identity_token(subject: &str) -> String {
    let claims = TestClaims {
        sub: subject.to_owned(),
        exp: FAR_FUTURE,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Could not encode test token")
}

/// Create a user row for `subject` as the identity webhook would.
pub fn provision_user(state: &AppState, subject: &str) -> User {
    let connection = state.db_connection.lock().unwrap();

    upsert_user(subject, "Test User", "test@example.com", &connection)
        .expect("Could not provision test user")
}
