use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatgallery::cli::{commands, Cli, Commands, UserAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatgallery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init().await,
        Commands::Serve {
            host,
            port,
            ephemeral,
        } => commands::serve(host, port, ephemeral).await,
        Commands::User { action } => match action {
            UserAction::Add { username, role } => commands::user_add(&username, &role).await,
            UserAction::Passwd { username } => commands::user_passwd(&username).await,
            UserAction::List => commands::user_list().await,
        },
    }
}
