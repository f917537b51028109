//! `SeaORM` implementation of the `ContextService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::context_service::{ContextError, ContextService, UserContext};

pub struct SeaOrmContextService {
    store: Store,
}

impl SeaOrmContextService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContextService for SeaOrmContextService {
    async fn build_context(&self, username: Option<&str>) -> Result<UserContext, ContextError> {
        let messages = self.store.list_messages().await?;

        let member = match username {
            Some(username) => self.store.find_member_by_username(username).await?,
            None => None,
        };

        let (signed_up, has_joined, is_admin) =
            member.map_or((false, false, false), |m| (true, m.is_member, m.is_admin));

        Ok(UserContext {
            messages,
            signed_up,
            has_joined,
            is_admin,
        })
    }
}
