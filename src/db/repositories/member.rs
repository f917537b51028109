use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tokio::task;

use crate::entities::{members, prelude::*};

/// Member data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct Member {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_member: bool,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<members::Model> for Member {
    fn from(model: members::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            is_member: model.is_member,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}

pub struct MemberRepository {
    conn: DatabaseConnection,
}

impl MemberRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a signed-up (not yet joined) member.
    /// Note: Argon2 hashing runs in `spawn_blocking` because it is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> Result<i32> {
        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = members::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_member: Set(false),
            is_admin: Set(false),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Members::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert member")?;

        Ok(res.last_insert_id)
    }

    /// Get a member by username regardless of membership status
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Member>> {
        let member = Members::find()
            .filter(members::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query member by username")?;

        Ok(member.map(Member::from))
    }

    /// Get a member by username filtered to the given membership status
    pub async fn get_by_status(&self, username: &str, is_member: bool) -> Result<Option<Member>> {
        let member = Members::find()
            .filter(members::Column::Username.eq(username))
            .filter(members::Column::IsMember.eq(is_member))
            .one(&self.conn)
            .await
            .context("Failed to query member by status")?;

        Ok(member.map(Member::from))
    }

    /// Get a member plus stored password hash, filtered to membership status
    pub async fn get_with_hash_by_status(
        &self,
        username: &str,
        is_member: bool,
    ) -> Result<Option<(Member, String)>> {
        let member = Members::find()
            .filter(members::Column::Username.eq(username))
            .filter(members::Column::IsMember.eq(is_member))
            .one(&self.conn)
            .await
            .context("Failed to query member by status")?;

        Ok(member.map(|m| {
            let password_hash = m.password_hash.clone();
            (Member::from(m), password_hash)
        }))
    }

    /// Resolve a member's numeric id from the username
    pub async fn get_id_by_username(&self, username: &str) -> Result<Option<i32>> {
        let id = Members::find()
            .filter(members::Column::Username.eq(username))
            .select_only()
            .column(members::Column::Id)
            .into_tuple::<i32>()
            .one(&self.conn)
            .await
            .context("Failed to resolve member id")?;

        Ok(id)
    }

    /// Flip the membership flag for an unjoined account.
    /// The update is conditional on `is_member = false`; zero rows affected
    /// means the account changed between lookup and update.
    pub async fn grant_membership(&self, username: &str) -> Result<u64> {
        let res = Members::update_many()
            .col_expr(members::Column::IsMember, Expr::value(true))
            .filter(members::Column::Username.eq(username))
            .filter(members::Column::IsMember.eq(false))
            .exec(&self.conn)
            .await
            .context("Failed to update membership status")?;

        Ok(res.rows_affected)
    }

    /// Flip the admin flag. Scoped to joined members so the admin flag can
    /// never be set on an account that has not joined the club.
    pub async fn grant_admin(&self, username: &str) -> Result<u64> {
        let res = Members::update_many()
            .col_expr(members::Column::IsAdmin, Expr::value(true))
            .filter(members::Column::Username.eq(username))
            .filter(members::Column::IsMember.eq(true))
            .exec(&self.conn)
            .await
            .context("Failed to update admin status")?;

        Ok(res.rows_affected)
    }

    /// Delete a member by id. Messages cascade at the schema level.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let res = Members::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete member")?;

        Ok(res.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2id hash.
/// Runs in `spawn_blocking` for the same reason hashing does.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();

    let is_valid = task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")??;

    Ok(is_valid)
}
