//! Domain service for authentication.
//!
//! Verifies credentials against stored hashes and restores the per-request
//! identity from the session's username.

use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No joined account exists for the username.
    #[error("You must join the club before logging in")]
    NotAMember,

    #[error("Incorrect password")]
    BadCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Member info DTO for handlers and views. Never carries the password hash.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_member: bool,
    pub is_admin: bool,
}

impl MemberInfo {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials against joined members and returns the member.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAMember`] when no joined account matches the
    /// username and [`AuthError::BadCredentials`] on a password mismatch.
    async fn login(&self, username: &str, password: &str) -> Result<MemberInfo, AuthError>;

    /// Re-fetches the member for a session identity. Only joined members
    /// resolve; anyone else is treated as unauthenticated.
    async fn current_member(&self, username: &str) -> Result<Option<MemberInfo>, AuthError>;
}
