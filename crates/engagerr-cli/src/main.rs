//! Engagerr CLI - Command-line interface for content relationships.

use clap::Parser;
use engagerr_cli::commands;
use engagerr_cli::{Cli, CliError, Command, Config, ConsoleNotifier, Formatter};
use engagerr_sdk::{ContentRelationships, QueryCache};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        // SDK failures were already printed by the console notifier
        if !e.already_reported() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "engagerr_sdk=debug,info"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> engagerr_cli::Result<()> {
    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    // Commands that work offline
    let command = match cli.command {
        Command::Types => return commands::execute_types(&formatter),
        Command::Profile(args) => {
            return commands::execute_profile(args, &mut config, &config_path, &formatter);
        }
        command => command,
    };

    let mut sdk_config = config.get_active_profile()?.sdk_config();
    if let Some(url) = cli.api_url {
        sdk_config.base_url = url;
    }
    if let Some(creator) = cli.creator {
        sdk_config.creator_id = creator;
    }
    if let Some(token) = cli.auth_token {
        sdk_config.token = Some(token);
    }
    sdk_config.validate_locally = config.settings.validate_locally;

    let notifier = Arc::new(ConsoleNotifier::new(formatter));
    let cache = Arc::new(QueryCache::new(sdk_config.cache_config()));
    let sdk = ContentRelationships::new(&sdk_config, cache, notifier.clone())
        .map_err(|e| CliError::Config(e.to_string()))?;

    match command {
        Command::Relationships(args) => commands::execute_relationships(args, &sdk, &formatter).await?,
        Command::Family(args) => commands::execute_family(args, &sdk, &formatter).await?,
        Command::Graph(args) => commands::execute_graph(args, &sdk, &formatter).await?,
        Command::Suggestions(args) => commands::execute_suggestions(args, &sdk, &formatter).await?,
        Command::Approve(args) => commands::execute_approve(args, &sdk, &formatter).await?,
        Command::Reject(args) => commands::execute_reject(args, &sdk, &formatter).await?,
        Command::Refresh(args) => commands::execute_refresh(args, &sdk, &formatter).await?,
        Command::Types | Command::Profile(_) => {}
    }

    // Lenient reads notify without failing
    if notifier.error_count() > 0 {
        return Err(CliError::Reported("Request".to_string()));
    }
    Ok(())
}
