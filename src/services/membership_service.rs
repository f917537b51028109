//! Domain service for club membership and admin rights.
//!
//! Both flows are passcode-gated flag flips: join turns a signed-up account
//! into a club member, admin grant turns a member into a moderator.

use thiserror::Error;

/// Errors specific to membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Covers both "no such unjoined account" and "wrong password" so the
    /// response does not reveal whether an account exists.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Supplied passcode does not equal the configured secret.
    #[error("Incorrect passcode")]
    WrongPasscode,

    /// The conditional flag update affected zero rows; the account changed
    /// between lookup and update.
    #[error("Failed to update membership status")]
    StorageFailure,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for MembershipError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for membership and admin grants.
#[async_trait::async_trait]
pub trait MembershipService: Send + Sync {
    /// Flips the membership flag for a signed-up account.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::InvalidCredentials`] when no unjoined
    /// account matches the username/password pair,
    /// [`MembershipError::WrongPasscode`] when the supplied passcode does not
    /// match the club secret, and [`MembershipError::StorageFailure`] when
    /// the flag update affected zero rows.
    async fn join(
        &self,
        username: &str,
        password: &str,
        supplied_passcode: &str,
    ) -> Result<(), MembershipError>;

    /// Flips the admin flag for an authenticated member. The caller is
    /// responsible for establishing the session identity first.
    async fn grant_admin(
        &self,
        username: &str,
        supplied_passcode: &str,
    ) -> Result<(), MembershipError>;
}
