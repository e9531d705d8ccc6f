//! User directory: the persisted set of accounts consumed by login and
//! user-management routes.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDirectory;
pub use postgres::PostgresDirectory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::auth::models::Role;
use crate::auth::password::hash_password;
use crate::config::BootstrapConfig;
use crate::error::{Error, Result};

/// A stored account. The password hash never leaves the directory layer in
/// API responses; use [`UserInfo`] for those.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account creation input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Account shape exposed over the API
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserInfo {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Persisted account storage
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>>;

    async fn create(&self, user: NewUser) -> Result<UserRecord>;

    async fn update_hash(&self, id: &str, new_hash: &str) -> Result<()>;

    async fn update_role(&self, id: &str, role: Role) -> Result<()>;

    async fn list(&self) -> Result<Vec<UserRecord>>;
}

/// Validate a username for account creation
pub fn validate_username(username: &str) -> Result<()> {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{2,31}$")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    if re.is_match(username) {
        Ok(())
    } else {
        Err(Error::BadRequest(
            "Username must be 3-32 characters: letters, digits, '_', '.' or '-'".to_string(),
        ))
    }
}

/// Provision the default administrator account if it is absent.
///
/// Runs on every login attempt, before credential verification. Idempotent:
/// an existing account is left untouched apart from repairing its role back
/// to ADMIN if it drifted.
pub async fn ensure_bootstrap_admin(
    directory: &dyn UserDirectory,
    bootstrap: &BootstrapConfig,
) -> Result<()> {
    match directory.find_by_username(&bootstrap.admin_username).await? {
        Some(existing) => {
            if existing.role != Role::Admin {
                directory.update_role(&existing.id, Role::Admin).await?;
                tracing::warn!(
                    username = %existing.username,
                    "repaired bootstrap account role back to ADMIN"
                );
            }
            Ok(())
        }
        None => {
            let password = bootstrap.admin_password.clone();
            let hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await
                .map_err(|e| Error::Other(e.to_string()))?;

            directory
                .create(NewUser {
                    username: bootstrap.admin_username.clone(),
                    password_hash: hash,
                    role: Role::Admin,
                })
                .await?;
            tracing::info!(
                username = %bootstrap.admin_username,
                "provisioned bootstrap administrator account"
            );
            Ok(())
        }
    }
}
