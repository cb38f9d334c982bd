use anyhow::{Context, Result};
use clap::Parser;
use imagebin_database::{
    InMemoryImageRepository, PostgresImageRepository, establish_pool, run_migrations,
};
use imagebin_server::{AppState, ServerConfig, create_router, init_tracing};
use imagebin_storage::FileSystemStorage;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Imagebin image hosting server", long_about = None)]
struct Args {
    /// Path to a TOML config file (default: ./imagebin.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the config
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep image records in memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    init_tracing(&config, args.verbose)?;

    let storage = FileSystemStorage::new(config.upload_dir());
    let state = if args.in_memory {
        warn!("Using in-memory repository; records are lost on exit");
        AppState::new(config.clone(), storage, InMemoryImageRepository::new())
    } else {
        let database_url = config
            .database_url()
            .clone()
            .context("database_url must be set unless --in-memory is given")?;
        let pool = tokio::task::spawn_blocking(move || {
            let pool = establish_pool(&database_url)?;
            run_migrations(&pool)?;
            Ok::<_, imagebin_error::DatabaseError>(pool)
        })
        .await??;
        AppState::new(config.clone(), storage, PostgresImageRepository::new(pool))
    };

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        port = config.port(),
        upload_dir = %config.upload_dir().display(),
        origins = ?config.origins(),
        "Server is running on port {}",
        config.port()
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
