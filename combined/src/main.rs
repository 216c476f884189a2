//! cms-admin - administrative entry point
//!
//! CLI that dispatches to schema, module, migration, role and content commands.

mod cli;
mod commands;

use clap::Parser;

use common::{config::AppConfig, telemetry::init_tracing};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration first: it carries the default log level
    let config = AppConfig::from_env();
    init_tracing(cli.verbose, &config.log_level);
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Schema(args) => commands::schema::execute(args, config).await,
        Commands::Modules(args) => commands::modules::execute(args, config).await,
        Commands::Migrations(args) => commands::migrations::execute(args, config).await,
        Commands::Roles(args) => commands::roles::execute(args, config).await,
        Commands::Can { user, capability } => {
            commands::access::can(&user, &capability, config).await
        }
        Commands::Whoami { user } => commands::access::whoami(&user, config).await,
        Commands::Menu(args) => commands::access::menu(args, config).await,
        Commands::Pages(args) => commands::pages::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}
