//! Schema command - core table migrations.

use common::{config::AppConfig, AppResult};
use storage::Database;

use crate::cli::args::{SchemaAction, SchemaArgs};

pub async fn execute(args: SchemaArgs, config: AppConfig) -> AppResult<()> {
    // Manual control: nothing runs on connect
    let db = Database::connect_without_migrations(&config.database).await?;

    match args.action {
        SchemaAction::Up => {
            tracing::info!("Running pending schema migrations...");
            db.run_migrations().await?;
            tracing::info!("Schema is up to date");
        }
        SchemaAction::Down => {
            tracing::info!("Rolling back last schema migration...");
            db.rollback_migration().await?;
        }
        SchemaAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let status = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status);
            }
        }
        SchemaAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running schema migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh schema created");
        }
    }

    Ok(())
}
