use clap::Parser;
use drapex_api::{Engine, EngineConfig, RestApi};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Garment discovery and compatibility engine
#[derive(Parser, Debug)]
#[command(name = "drapex")]
#[command(about = "Garment discovery, outfit and pricing engine", long_about = None)]
struct Args {
    /// Path to a JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, default_value_t = 6340)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Override the configured embedding dimension
    #[arg(long)]
    embedding_dim: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Drapex v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            info!("Config file: {:?}", path);
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(dim) = args.embedding_dim {
        config.embedding_dim = dim;
    }
    config.validate()?;
    info!("Embedding dimension: {}", config.embedding_dim);
    info!("Scoring policy version: {}", config.scoring.version);

    let engine = Arc::new(Engine::new(config)?);
    info!("Engine initialized");

    let engine_http = engine.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(engine_http, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Drapex started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
