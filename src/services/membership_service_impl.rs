//! `SeaORM` implementation of the `MembershipService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::db::repositories::member::verify_password;
use crate::services::membership_service::{MembershipError, MembershipService};

pub struct SeaOrmMembershipService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmMembershipService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

/// Constant-time equality for passcodes. Length still leaks; content does not.
fn passcodes_match(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[async_trait]
impl MembershipService for SeaOrmMembershipService {
    async fn join(
        &self,
        username: &str,
        password: &str,
        supplied_passcode: &str,
    ) -> Result<(), MembershipError> {
        // Only accounts that have not yet joined match here; an existing
        // member falls through to the same error as a missing account.
        let Some((_, password_hash)) = self
            .store
            .find_member_with_hash_by_status(username, false)
            .await?
        else {
            return Err(MembershipError::InvalidCredentials);
        };

        let is_valid = verify_password(password, &password_hash).await?;

        if !is_valid {
            return Err(MembershipError::InvalidCredentials);
        }

        let join_passcode = self.config.read().await.club.join_passcode.clone();

        if !passcodes_match(supplied_passcode, &join_passcode) {
            return Err(MembershipError::WrongPasscode);
        }

        let rows_affected = self.store.grant_membership(username).await?;

        if rows_affected == 0 {
            // Lost the race: the account joined (or vanished) since lookup
            return Err(MembershipError::StorageFailure);
        }

        tracing::info!("Member joined the club: {username}");

        Ok(())
    }

    async fn grant_admin(
        &self,
        username: &str,
        supplied_passcode: &str,
    ) -> Result<(), MembershipError> {
        let admin_passcode = self.config.read().await.club.admin_passcode.clone();

        if !passcodes_match(supplied_passcode, &admin_passcode) {
            return Err(MembershipError::WrongPasscode);
        }

        // Scoped to joined members; granting to an existing admin is a no-op
        // that still matches the row.
        let rows_affected = self.store.grant_admin(username).await?;

        if rows_affected == 0 {
            return Err(MembershipError::StorageFailure);
        }

        tracing::info!("Admin access granted: {username}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::passcodes_match;

    #[test]
    fn test_passcodes_match() {
        assert!(passcodes_match("open sesame", "open sesame"));
        assert!(!passcodes_match("open Sesame", "open sesame"));
        assert!(!passcodes_match("open sesam", "open sesame"));
        assert!(!passcodes_match("", "open sesame"));
        assert!(passcodes_match("", ""));
    }
}
