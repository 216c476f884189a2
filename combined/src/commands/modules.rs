//! Modules command - registry synchronization and toggling.

use common::{config::AppConfig, AppError, AppResult};
use module_service_lib::service::ModuleRegistry;

use super::{yes_no, Context};
use crate::cli::args::{ModulesAction, ModulesArgs};

pub async fn execute(args: ModulesArgs, config: AppConfig) -> AppResult<()> {
    match args.action {
        ModulesAction::Sync { dir } => {
            let dir = dir.unwrap_or_else(|| config.modules_dir.clone());
            let ctx = Context::connect_with(&config, &dir).await?;

            let report = ctx.modules.registry.sync(&ctx.manifests).await;
            println!("added: {}, updated: {}", report.added, report.updated);
            for error in &report.errors {
                println!("error: {}", error);
            }
            if let Some(migrations) = &report.migrations {
                super::migrations::print_report(migrations);
            }
            if !report.errors.is_empty() {
                return Err(AppError::internal(format!(
                    "{} module(s) failed to synchronize",
                    report.errors.len()
                )));
            }
        }
        ModulesAction::List => {
            let ctx = Context::connect(&config).await?;
            for module in ctx.modules.registry.list().await? {
                println!(
                    "{:<24} {:<10} enabled={}",
                    module.name,
                    module.version,
                    yes_no(module.enabled)
                );
            }
        }
        ModulesAction::Enable { name } => toggle(&config, &name, true).await?,
        ModulesAction::Disable { name } => toggle(&config, &name, false).await?,
    }

    Ok(())
}

async fn toggle(config: &AppConfig, name: &str, enabled: bool) -> AppResult<()> {
    let ctx = Context::connect(config).await?;
    let Some(report) = ctx.modules.registry.set_enabled(name, enabled).await? else {
        return Err(AppError::not_found(format!("module '{}'", name)));
    };

    println!("{}: enabled={}", name.trim().to_lowercase(), yes_no(enabled));
    super::migrations::print_report(&report);
    if report.has_errors() {
        return Err(AppError::internal(format!(
            "{} migration(s) failed",
            report.errors.len()
        )));
    }
    Ok(())
}
