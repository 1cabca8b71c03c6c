//! Engagerr Stub CLI
//!
//! Starts the stub content API for local development.

use engagerr_stub::{config::StubConfig, start_server, StubError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), StubError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        StubConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: engagerr-stub --config <path-to-config.toml>");
        eprintln!();
        StubConfig::default_test_config()
    };

    start_server(config).await
}

fn print_help() {
    println!("Engagerr Stub - In-memory content relationship API");
    println!();
    println!("USAGE:");
    println!("    engagerr-stub --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default '127.0.0.1')");
    println!("    - bind_port: Port number (default 8080)");
    println!("    - seed_file: JSON file with contents, relationships and suggestions");
    println!();
    println!("LOGGING:");
    println!("    Set RUST_LOG (e.g. RUST_LOG=engagerr_stub=debug) to adjust verbosity.");
}
