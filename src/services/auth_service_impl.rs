//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::db::repositories::member::verify_password;
use crate::db::{Member, Store};
use crate::services::auth_service::{AuthError, AuthService, MemberInfo};

impl From<Member> for MemberInfo {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            first_name: member.first_name,
            last_name: member.last_name,
            username: member.username,
            is_member: member.is_member,
            is_admin: member.is_admin,
        }
    }
}

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<MemberInfo, AuthError> {
        // Only joined members can log in
        let Some((member, password_hash)) = self
            .store
            .find_member_with_hash_by_status(username, true)
            .await?
        else {
            return Err(AuthError::NotAMember);
        };

        let is_valid = verify_password(password, &password_hash).await?;

        if !is_valid {
            return Err(AuthError::BadCredentials);
        }

        Ok(member.into())
    }

    async fn current_member(&self, username: &str) -> Result<Option<MemberInfo>, AuthError> {
        let member = self.store.find_member_by_status(username, true).await?;
        Ok(member.map(MemberInfo::from))
    }
}
