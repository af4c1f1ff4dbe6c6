//! Verification of identity tokens issued by the external identity provider.
//!
//! The application never issues tokens itself. Callers present a Bearer JWT
//! minted by the identity provider and signed with a shared secret; the
//! token's `sub` claim is the external-identity reference used to look up the
//! internal user record. Handlers receive the verified claims through the
//! [Claims] extractor and fail with 401 before any of their code runs when
//! the token is missing, malformed, or expired.

// The extractor below is adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;

/// The contents of an identity token.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// The identity provider's stable reference for the caller.
    pub sub: String,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

impl<S> FromRequestParts<S> for Claims
where
    DecodingKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let decoding_key = DecodingKey::from_ref(state);

        jsonwebtoken::decode::<Claims>(bearer.token(), &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// The ways resolving a caller's identity can fail.
///
/// Both variants are terminal and map to 401: there is nothing this
/// application can do to repair a missing or bad token.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no Bearer authorization header.
    MissingToken,
    /// The token failed signature or expiry validation.
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing identity token",
            AuthError::InvalidToken => "Invalid identity token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod claims_extractor_tests {
    use axum::{Json, Router, routing::get};
    use axum_test::TestServer;
    use jsonwebtoken::{DecodingKey, EncodingKey, Header};
    use serde::Serialize;

    use super::Claims;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    const TEST_SECRET: &str = "an unguessable test secret";

    async fn whoami(claims: Claims) -> Json<String> {
        Json(claims.sub)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .with_state(DecodingKey::from_secret(TEST_SECRET.as_bytes()));

        TestServer::new(app)
    }

    fn mint_token(secret: &str, exp: usize) -> String {
        let claims = TestClaims {
            sub: "idp|123".to_owned(),
            exp,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Could not encode test token")
    }

    // 2100-01-01T00:00:00Z, far enough out for any test run.
    const FAR_FUTURE: usize = 4102444800;

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let server = get_test_server();
        let token = mint_token(TEST_SECRET, FAR_FUTURE);

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<String>(), "idp|123");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let server = get_test_server();

        let response = server.get("/whoami").await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn token_with_wrong_signature_is_unauthorized() {
        let server = get_test_server();
        let token = mint_token("a different secret", FAR_FUTURE);

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = get_test_server();
        // 2000-01-01T00:00:00Z, long past.
        let token = mint_token(TEST_SECRET, 946684800);

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_unauthorized();
    }
}
