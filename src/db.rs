//! PostgreSQL connection setup

use std::sync::Arc;
use tokio_postgres::{Client, NoTls};

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Connect to PostgreSQL and spawn the connection driver task
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<Client>> {
    let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    tracing::info!(
        "Connected to PostgreSQL at {}:{}/{}",
        config.host,
        config.port,
        config.dbname
    );

    Ok(Arc::new(client))
}
