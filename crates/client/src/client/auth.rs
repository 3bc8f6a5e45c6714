//! OAuth 2.0 client credentials with a private-key JWT assertion.
//!
//! Okta service applications authenticate by signing a short-lived JWT with
//! their RS256 private key and exchanging it at the org authorization
//! server's token endpoint for an access token.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use super::conversions::TokenResponse;
use super::OktaClient;
use crate::error::{ClientError, Result};

const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Assertion lifetime. Okta rejects assertions valid for more than an hour.
const ASSERTION_TTL_SECS: u64 = 300;

/// Claims of the client assertion.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

impl AssertionClaims {
    pub fn new(client_id: &str, token_url: &str, issued_at: u64, jti: String) -> Self {
        Self {
            iss: client_id.to_string(),
            sub: client_id.to_string(),
            aud: token_url.to_string(),
            iat: issued_at,
            exp: issued_at + ASSERTION_TTL_SECS,
            jti,
        }
    }
}

/// Parses a PEM encoded RSA private key.
pub fn parse_private_key(pem: &str) -> Result<EncodingKey> {
    EncodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|e| ClientError::Config(format!("Invalid RSA private key: {}", e)))
}

/// Signs the client assertion.
pub fn sign_assertion(
    claims: &AssertionClaims,
    key: &EncodingKey,
    key_id: Option<&str>,
) -> Result<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key_id.map(str::to_string);

    encode(&header, claims, key)
        .map_err(|e| ClientError::Auth(format!("Failed to sign client assertion: {}", e)))
}

impl OktaClient {
    /// Token endpoint of the org authorization server.
    pub fn token_url(&self) -> String {
        self.url("/oauth2/v1/token")
    }

    /// Returns the access token, exchanging a fresh assertion on first use.
    pub(super) async fn access_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| self.request_access_token())
            .await?;
        Ok(token.as_str())
    }

    async fn request_access_token(&self) -> Result<String> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ClientError::Auth("System clock before UNIX epoch".to_string()))?
            .as_secs();

        let token_url = self.token_url();
        let claims = AssertionClaims::new(
            &self.config.client_id,
            &token_url,
            issued_at,
            uuid::Uuid::new_v4().to_string(),
        );
        let assertion = sign_assertion(&claims, &self.key, self.config.key_id.as_deref())?;
        let scope = self.config.scopes.join(" ");

        tracing::debug!(client_id = %self.config.client_id, scope = %scope, "Requesting access token");

        let response = self
            .client
            .post(&token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", scope.as_str()),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = match self.handle_response(response).await {
            Ok(token) => token,
            Err(ClientError::ServerError { status, message }) => {
                return Err(ClientError::Auth(format!(
                    "token endpoint returned {}: {}",
                    status, message
                )))
            }
            Err(e) => return Err(e),
        };

        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(ClientError::Auth(format!(
                "unsupported token type '{}'",
                token.token_type
            )));
        }

        tracing::debug!(expires_in = ?token.expires_in, "Obtained access token");
        Ok(token.access_token)
    }
}
