use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default moderator account seeded on first startup.
const DEFAULT_ADMIN_USERNAME: &str = "admin@clubhouse.local";

/// Hash the default password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Members)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Messages)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed a default admin member with a hashed password
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Members)
            .columns([
                crate::entities::members::Column::FirstName,
                crate::entities::members::Column::LastName,
                crate::entities::members::Column::Username,
                crate::entities::members::Column::PasswordHash,
                crate::entities::members::Column::IsMember,
                crate::entities::members::Column::IsAdmin,
                crate::entities::members::Column::CreatedAt,
            ])
            .values_panic([
                "Club".into(),
                "Admin".into(),
                DEFAULT_ADMIN_USERNAME.into(),
                password_hash.into(),
                true.into(),
                true.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Members).to_owned())
            .await?;

        Ok(())
    }
}
