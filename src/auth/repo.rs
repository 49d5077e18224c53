use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

use crate::auth::{errors::StoreError, repo_types::User, services::generate_access_token};

/// Persistence for [`User`] records.
///
/// `name`, `email` and `access_token` are unique. Implementations report duplicates as
/// [`StoreError::Conflict`] and blank required fields as [`StoreError::Validation`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. The store assigns `id` and mints the access token.
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_access_token(&self, token: &str) -> Result<Option<User>, StoreError>;
    /// Release underlying connections. Called once at shutdown.
    async fn close(&self);
}

fn require(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation { field });
    }
    Ok(())
}

fn validate_new_user(name: &str, email: &str, password_hash: &str) -> Result<(), StoreError> {
    require("name", name)?;
    require("email", email)?;
    require("password", password_hash)
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        validate_new_user(name, email, password_hash)?;
        let access_token = generate_access_token();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, access_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, access_token, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(&access_token)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;
        debug!(user_id = %user.id, "user row inserted");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, access_token, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_access_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, access_token, created_at
            FROM users
            WHERE access_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn close(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryUserStore;
