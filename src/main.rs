use starport::{GameServer, MemoryStore, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Starport - space-shop economy game server

USAGE:
    starport [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Listen host (default: 0.0.0.0)
    PORT                Listen port (default: 7777)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults (expects shop_items.json next to the binary)
    starport

    # Run with config file
    starport --config settings.json

    # Run on a custom port
    PORT=9000 starport
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starport=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            ServerConfig::from_file(&path)?
        }
        None => ServerConfig::default(),
    };
    config.apply_env();

    let server = GameServer::new(config, Arc::new(MemoryStore::new()));
    let handle = server.start().await?;

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;

    Ok(())
}
