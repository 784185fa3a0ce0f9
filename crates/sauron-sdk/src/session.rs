//! Credential state held by a client.

use secrecy::{ExposeSecret, Secret, SecretString};

/// The bearer credential of one logical session.
///
/// `present` records whether a token was ever installed, even an empty one;
/// a session counts as authenticated only while the token is non-empty.
pub struct Session {
    token: SecretString,
    present: bool,
}

impl Session {
    /// Create an empty, unauthenticated session.
    pub fn new() -> Self {
        Self {
            token: Secret::new(String::new()),
            present: false,
        }
    }

    /// Create a session that starts with `token` installed.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(token);
        session
    }

    /// Install a token and mark it present.
    pub fn set(&mut self, token: impl Into<String>) {
        self.token = Secret::new(token.into());
        self.present = true;
    }

    /// The stored token, empty if none was ever set.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Drop the token.
    pub fn clear(&mut self) {
        self.token = Secret::new(String::new());
        self.present = false;
    }

    /// Whether a token was installed since the last clear.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Whether authorized calls may proceed.
    pub fn is_authenticated(&self) -> bool {
        !self.token().is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("present", &self.present)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
