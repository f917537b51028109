//! Domain service for message creation and deletion.
//!
//! Authorization stays at the boundary: handlers establish that a session
//! identity exists (create) and that the caller is admin-flagged (delete)
//! before invoking this service.

use thiserror::Error;

/// Errors specific to message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The author's account disappeared between session restore and insert.
    #[error("Unknown author: {0}")]
    UnknownAuthor(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for MessageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for messages.
#[async_trait::async_trait]
pub trait MessageService: Send + Sync {
    /// Persists a message with a server-assigned timestamp and returns its id.
    async fn create(
        &self,
        author_username: &str,
        title: &str,
        body: &str,
    ) -> Result<i32, MessageError>;

    /// Deletes a message. Unconditional once the boundary has authorized the
    /// caller; deleting a missing id is not an error.
    async fn delete(&self, message_id: i32) -> Result<(), MessageError>;
}
