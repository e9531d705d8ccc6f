//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use crate::api::server::{run_server, AppState};
use crate::auth::models::Role;
use crate::auth::password::hash_password;
use crate::auth::SessionAuth;
use crate::cli::{error, info, print_user_table, success, warn};
use crate::config::{self, Config};
use crate::db;
use crate::directory::{
    validate_username, MemoryDirectory, NewUser, PostgresDirectory, UserDirectory,
};
use crate::gallery::{MemoryGallery, PostgresGallery};

/// Initialize a new seatgallery.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("seatgallery.toml");

    if config_path.exists() {
        warn("seatgallery.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created seatgallery.toml");
    info("Export SESSION_SECRET and run 'seatgallery serve' to start the server");

    Ok(())
}

/// Start the HTTP server
pub async fn serve(host: Option<String>, port: Option<u16>, ephemeral: bool) -> Result<()> {
    let config = config::load_config().unwrap_or_else(|_| {
        warn("No seatgallery.toml found, using defaults");
        Config::default()
    });

    // Resolved once; missing secret is fatal before anything binds or connects
    let secret = config::session_secret()?;
    let auth = SessionAuth::new(&config.session, secret);

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let state = if ephemeral {
        warn("Running with in-memory storage; all data is lost on shutdown");
        Arc::new(AppState {
            config,
            auth,
            directory: Arc::new(MemoryDirectory::new()),
            gallery: Arc::new(MemoryGallery::new()),
        })
    } else {
        let client = db::connect(&config.database).await?;

        let directory = PostgresDirectory::new(client.clone());
        directory.init_schema().await?;

        let gallery = PostgresGallery::new(client);
        gallery.init_schema().await?;

        Arc::new(AppState {
            config,
            auth,
            directory: Arc::new(directory),
            gallery: Arc::new(gallery),
        })
    };

    run_server(state, &host, port).await?;
    Ok(())
}

/// Create an account
pub async fn user_add(username: &str, role: &str) -> Result<()> {
    let role: Role = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            error(&e);
            return Err(anyhow::anyhow!(e));
        }
    };
    validate_username(username)?;

    let directory = connect_directory().await?;
    let password = dialoguer::Password::new()
        .with_prompt(format!("Password for {}", username))
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let user = directory
        .create(NewUser {
            username: username.to_string(),
            password_hash: hash_password(&password),
            role,
        })
        .await?;

    success(&format!("Created {} account: {}", user.role, user.username));
    Ok(())
}

/// Reset an account's password
pub async fn user_passwd(username: &str) -> Result<()> {
    let directory = connect_directory().await?;

    let Some(user) = directory.find_by_username(username).await? else {
        error(&format!("No account named '{}'", username));
        return Err(anyhow::anyhow!("account not found"));
    };

    let password = dialoguer::Password::new()
        .with_prompt(format!("New password for {}", username))
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    directory
        .update_hash(&user.id, &hash_password(&password))
        .await?;

    success(&format!("Password updated for {}", username));
    Ok(())
}

/// List accounts
pub async fn user_list() -> Result<()> {
    let directory = connect_directory().await?;
    let users = directory.list().await?;
    print_user_table(&users);
    Ok(())
}

async fn connect_directory() -> Result<PostgresDirectory> {
    let config = config::load_config().unwrap_or_default();
    let client = db::connect(&config.database).await?;
    let directory = PostgresDirectory::new(client);
    directory.init_schema().await?;
    Ok(directory)
}
