//! Migrations command - module migrations of enabled modules.

use common::{config::AppConfig, AppError, AppResult};
use domain::MigrationReport;
use module_service_lib::service::{MigrationRunner, ModuleRegistry};

use super::Context;
use crate::cli::args::{MigrationsAction, MigrationsArgs};

pub async fn execute(args: MigrationsArgs, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;
    let enabled = ctx.modules.registry.enabled().await?;

    match args.action {
        MigrationsAction::Run => {
            let report = ctx.modules.tracker.run_pending(&enabled).await;
            print_report(&report);
            if report.has_errors() {
                return Err(AppError::internal(format!(
                    "{} migration(s) failed",
                    report.errors.len()
                )));
            }
        }
        MigrationsAction::Status => {
            for status in ctx.modules.tracker.status(&enabled).await? {
                match status.applied_at {
                    Some(at) => println!("{}/{}: applied {}", status.module, status.name, at),
                    None => println!("{}/{}: pending", status.module, status.name),
                }
            }
        }
    }

    Ok(())
}

pub fn print_report(report: &MigrationReport) {
    for key in &report.executed {
        println!("executed: {}", key);
    }
    for key in &report.skipped {
        println!("skipped: {}", key);
    }
    for error in &report.errors {
        println!("failed: {}", error);
    }
}
