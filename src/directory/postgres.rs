//! PostgreSQL-backed user directory

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::{NewUser, UserDirectory, UserRecord};
use crate::auth::models::Role;
use crate::error::{Error, Result};

pub struct PostgresDirectory {
    client: Arc<Client>,
}

impl PostgresDirectory {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Create the users table if it does not exist
    pub async fn init_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    role TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
            )
            .await?;
        Ok(())
    }

    fn row_to_user(row: &Row) -> Result<UserRecord> {
        let role: String = row.get("role");
        Ok(UserRecord {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            role: Role::from_str(&role).map_err(Error::Other)?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl UserDirectory for PostgresDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, role, created_at
                 FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, role, created_at
                 FROM users WHERE id = $1",
                &[&id],
            )
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let role = user.role.to_string();

        let row = self
            .client
            .query_one(
                "INSERT INTO users (id, username, password_hash, role)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, username, password_hash, role, created_at",
                &[&id, &user.username, &user.password_hash, &role],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    Error::UserExists(user.username.clone())
                } else {
                    Error::Database(e)
                }
            })?;
        Self::row_to_user(&row)
    }

    async fn update_hash(&self, id: &str, new_hash: &str) -> Result<()> {
        let updated = self
            .client
            .execute(
                "UPDATE users SET password_hash = $2 WHERE id = $1",
                &[&id, &new_hash],
            )
            .await?;
        if updated == 0 {
            return Err(Error::UserNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<()> {
        let role = role.to_string();
        let updated = self
            .client
            .execute("UPDATE users SET role = $2 WHERE id = $1", &[&id, &role])
            .await?;
        if updated == 0 {
            return Err(Error::UserNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let rows = self
            .client
            .query(
                "SELECT id, username, password_hash, role, created_at
                 FROM users ORDER BY created_at DESC",
                &[],
            )
            .await?;
        rows.iter().map(Self::row_to_user).collect()
    }
}
