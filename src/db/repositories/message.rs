use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{members, messages, prelude::*};

/// One row of the public message list, author name joined in.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MessageRow {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub author_first_name: String,
    pub author_last_name: String,
}

impl MessageRow {
    #[must_use]
    pub fn author_name(&self) -> String {
        format!("{} {}", self.author_first_name, self.author_last_name)
    }
}

pub struct MessageRepository {
    conn: DatabaseConnection,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Persist a message with a server-assigned timestamp
    pub async fn create(&self, member_id: i32, title: &str, body: &str) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = messages::ActiveModel {
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            created_at: Set(now),
            member_id: Set(member_id),
            ..Default::default()
        };

        let res = Messages::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert message")?;

        Ok(res.last_insert_id)
    }

    /// Delete a message by id. Deleting an id that does not exist is a no-op.
    pub async fn delete(&self, id: i32) -> Result<()> {
        Messages::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete message")?;

        Ok(())
    }

    /// Full message list, oldest first, with the author's name joined.
    /// Id breaks ties between messages created within the same instant.
    pub async fn list_all(&self) -> Result<Vec<MessageRow>> {
        let rows = Messages::find()
            .join(JoinType::InnerJoin, messages::Relation::Members.def())
            .select_only()
            .column(messages::Column::Id)
            .column(messages::Column::Title)
            .column(messages::Column::Body)
            .column(messages::Column::CreatedAt)
            .column_as(members::Column::FirstName, "author_first_name")
            .column_as(members::Column::LastName, "author_last_name")
            .order_by_asc(messages::Column::CreatedAt)
            .order_by_asc(messages::Column::Id)
            .into_model::<MessageRow>()
            .all(&self.conn)
            .await
            .context("Failed to list messages")?;

        Ok(rows)
    }

    /// Messages authored by one member, oldest first
    pub async fn list_by_member(&self, member_id: i32) -> Result<Vec<messages::Model>> {
        let rows = Messages::find()
            .filter(messages::Column::MemberId.eq(member_id))
            .order_by_asc(messages::Column::CreatedAt)
            .order_by_asc(messages::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list member messages")?;

        Ok(rows)
    }
}
