use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::messages;

pub mod migrator;
pub mod repositories;

pub use repositories::member::Member;
pub use repositories::message::MessageRow;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn member_repo(&self) -> repositories::member::MemberRepository {
        repositories::member::MemberRepository::new(self.conn.clone())
    }

    fn message_repo(&self) -> repositories::message::MessageRepository {
        repositories::message::MessageRepository::new(self.conn.clone())
    }

    pub async fn create_member(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> Result<i32> {
        self.member_repo()
            .create(first_name, last_name, username, password)
            .await
    }

    pub async fn find_member_by_username(&self, username: &str) -> Result<Option<Member>> {
        self.member_repo().get_by_username(username).await
    }

    pub async fn find_member_by_status(
        &self,
        username: &str,
        is_member: bool,
    ) -> Result<Option<Member>> {
        self.member_repo().get_by_status(username, is_member).await
    }

    pub async fn find_member_with_hash_by_status(
        &self,
        username: &str,
        is_member: bool,
    ) -> Result<Option<(Member, String)>> {
        self.member_repo()
            .get_with_hash_by_status(username, is_member)
            .await
    }

    pub async fn find_member_id_by_username(&self, username: &str) -> Result<Option<i32>> {
        self.member_repo().get_id_by_username(username).await
    }

    pub async fn grant_membership(&self, username: &str) -> Result<u64> {
        self.member_repo().grant_membership(username).await
    }

    pub async fn grant_admin(&self, username: &str) -> Result<u64> {
        self.member_repo().grant_admin(username).await
    }

    pub async fn remove_member(&self, id: i32) -> Result<bool> {
        self.member_repo().remove(id).await
    }

    pub async fn create_message(&self, member_id: i32, title: &str, body: &str) -> Result<i32> {
        self.message_repo().create(member_id, title, body).await
    }

    pub async fn delete_message(&self, id: i32) -> Result<()> {
        self.message_repo().delete(id).await
    }

    pub async fn list_messages(&self) -> Result<Vec<MessageRow>> {
        self.message_repo().list_all().await
    }

    pub async fn list_messages_by_member(&self, member_id: i32) -> Result<Vec<messages::Model>> {
        self.message_repo().list_by_member(member_id).await
    }
}
