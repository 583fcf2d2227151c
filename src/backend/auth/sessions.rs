/**
 * Session Tokens
 *
 * This module verifies the credential presented when a connection is opened
 * and turns it into an identity. Credentials are HS256 JWTs whose `sub`
 * claim is the user identity.
 *
 * Token issuance lives here as well so that deployments and tests can mint
 * credentials with the same secret the server verifies against.
 */

use crate::backend::error::ChatError;
use crate::shared::UserId;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Default token lifetime: 30 days
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User identity
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Verifies credentials and issues tokens for one shared secret
#[derive(Clone)]
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
}

impl Authenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Override the lifetime of issued tokens
    pub fn with_token_ttl(mut self, secs: u64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// Create a token for `user`
    pub fn issue_token(&self, user: &UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        let claims = Claims {
            sub: user.to_string(),
            exp: now + self.token_ttl_secs,
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a raw credential and return the identity it carries
    ///
    /// Accepts either a bare token or a `Bearer <token>` value.
    ///
    /// # Errors
    ///
    /// `ChatError::Auth` for a missing, malformed, expired or subject-less token.
    pub fn authenticate(&self, raw_credential: &str) -> Result<UserId, ChatError> {
        let token = raw_credential.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(ChatError::auth("Missing credential"));
        }

        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ChatError::auth("Token expired"),
                _ => ChatError::auth("Token invalid"),
            })?
            .claims;

        let user = UserId::from(claims.sub);
        if user.is_empty() {
            return Err(ChatError::auth("Token has no subject"));
        }
        Ok(user)
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
