mod ingest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lonca-cli")]
#[command(about = "Lonca product feed ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the product feed and upsert every valid product
    Ingest {
        /// Feed location: file path, file:// URL, or http(s):// URL.
        /// Defaults to LONCA_FEED_URL.
        #[arg(long)]
        source: Option<String>,

        /// Extract and report without connecting to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = lonca_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Ingest { source, dry_run }) => {
            ingest::run_ingest(&config, source.as_deref(), dry_run).await?;
        }
        Some(Commands::Db { command }) => run_db(&config, command).await?,
        None => println!("no command given; run `lonca-cli --help` for usage"),
    }

    Ok(())
}

async fn run_db(config: &lonca_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let result = match command {
        DbCommands::Ping => lonca_db::health_check(&pool)
            .await
            .map(|()| println!("database reachable"))
            .map_err(anyhow::Error::from),
        DbCommands::Migrate => lonca_db::run_migrations(&pool)
            .await
            .map(|applied| println!("applied {applied} migration(s)"))
            .map_err(anyhow::Error::from),
    };
    pool.close().await;
    result
}

pub(crate) async fn connect(config: &lonca_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = lonca_db::PoolConfig::from_app_config(config);
    let pool = lonca_db::connect_pool(&config.database_url, pool_config).await?;
    tracing::debug!(
        max_connections = pool_config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}
