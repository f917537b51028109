//! The per-request view-model aggregator.
//!
//! Every page renders from a `UserContext` rebuilt from storage truth after
//! each state-changing operation. Re-reading instead of tracking state
//! locally trades a few extra lookups for freedom from staleness bugs; at
//! scale the unconditional message fetch would need pagination.

use thiserror::Error;

use crate::db::MessageRow;

/// Errors specific to context assembly.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ContextError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// The aggregate every page renders from: the full message list plus the
/// caller's signup/joined/admin flags.
#[derive(Debug)]
pub struct UserContext {
    pub messages: Vec<MessageRow>,
    pub signed_up: bool,
    pub has_joined: bool,
    pub is_admin: bool,
}

/// Domain service trait for context assembly.
#[async_trait::async_trait]
pub trait ContextService: Send + Sync {
    /// Builds the view model for the given session identity. `None` or an
    /// unknown username yields all-false flags; the message list is fetched
    /// unconditionally for every viewer.
    async fn build_context(&self, username: Option<&str>) -> Result<UserContext, ContextError>;
}
