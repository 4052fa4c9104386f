use anyhow::{Context, Result};
use clap::Parser;
use pantry_sheet::{config::Config, database::Database, router, AppState};
use tracing_subscriber::EnvFilter;

/// Serve a local stand-in for the recipe spreadsheet API
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[clap(long, default_value = "pantry-sheet.yml")]
    config: String,

    /// The address and optionally port to bind to, overriding the configuration
    #[clap(long)]
    address: Option<String>,

    /// Path to the SQLite database, overriding the configuration
    #[clap(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // initialize tracing
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config).context("Loading configuration")?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    if let Some(path) = args.database {
        config.database.path = path;
    }

    let db = Database::connect(&config.database.path).context("Connecting to database")?;
    if config.auth.token.is_none() {
        tracing::warn!("No SHEET_TOKEN configured, the API is open to anyone");
    }
    let app = router(AppState {
        db,
        auth: config.auth,
    });

    let listener = tokio::net::TcpListener::bind(&config.server.address)
        .await
        .with_context(|| format!("Binding {}", config.server.address))?;
    tracing::info!("Listening on {}", config.server.address);
    axum::serve(listener, app).await?;
    Ok(())
}
