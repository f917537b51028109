//! `SeaORM` implementation of the `MessageService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::message_service::{MessageError, MessageService};

pub struct SeaOrmMessageService {
    store: Store,
}

impl SeaOrmMessageService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MessageService for SeaOrmMessageService {
    async fn create(
        &self,
        author_username: &str,
        title: &str,
        body: &str,
    ) -> Result<i32, MessageError> {
        let member_id = self
            .store
            .find_member_id_by_username(author_username)
            .await?
            .ok_or_else(|| MessageError::UnknownAuthor(author_username.to_string()))?;

        let id = self.store.create_message(member_id, title, body).await?;

        tracing::info!("Message {id} created by {author_username}");

        Ok(id)
    }

    async fn delete(&self, message_id: i32) -> Result<(), MessageError> {
        self.store.delete_message(message_id).await?;

        tracing::info!("Message {message_id} deleted");

        Ok(())
    }
}
