use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use bizflow_core::config::Config;

#[derive(Parser)]
#[command(name = "bizflow-core", about = "BizFlow back office API", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Load demo clients, products and sales into the database
    Seed {
        /// Confirm writing demo data
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("bizflow_core=debug,tower_http=debug,audit=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => bizflow_core::server::run(config).await,
        Command::Seed { yes } => {
            anyhow::ensure!(yes, "refusing to seed without --yes");
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .connect(&config.database.url)
                .await
                .context("failed to connect to the database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run database migrations")?;
            bizflow_core::seed::run(pool).await?;
            Ok(())
        }
    }
}
