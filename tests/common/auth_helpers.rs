//! Authentication test helpers
//!
//! Provides utilities for generating handshake tokens.

use xfchat::backend::auth::Authenticator;

/// Secret shared by every test server
pub const TEST_SECRET: &str = "integration-test-secret";

/// Generate a valid token for `user`
pub fn token_for(user: &str) -> String {
    Authenticator::new(TEST_SECRET)
        .issue_token(&user.into())
        .expect("Failed to create test token")
}

/// Generate a token signed with the wrong secret
pub fn forged_token_for(user: &str) -> String {
    Authenticator::new("not-the-server-secret")
        .issue_token(&user.into())
        .expect("Failed to create forged token")
}
