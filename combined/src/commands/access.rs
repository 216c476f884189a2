//! Access commands - capability checks, user overview and menus.

use access_service_lib::repository::UserDirectory;
use access_service_lib::service::CapabilityResolver;
use common::{config::AppConfig, AppResult};
use module_service_lib::service::ModuleRegistry;

use super::{yes_no, Context};
use crate::cli::args::MenuArgs;

pub async fn can(user: &str, capability: &str, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;
    let allowed = ctx.access.resolver.has_capability(user, capability).await;
    println!("{}", yes_no(allowed));
    Ok(())
}

pub async fn whoami(user: &str, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;

    if let Some(profile) = ctx.access.users.find(user).await? {
        match profile.email.as_deref() {
            Some(email) => println!("user: {} <{}>", profile.username, email),
            None => println!("user: {}", profile.username),
        }
    } else {
        println!("user: {} (no profile)", user);
    }

    let roles: Vec<String> = ctx.access.resolver.roles_of(user).await.into_iter().collect();
    println!("roles: {}", roles.join(", "));

    let enabled = ctx.modules.registry.enabled().await?;
    let entries = ctx
        .modules
        .admin_entries
        .entries_for(user, ctx.access.resolver.as_ref(), &enabled)
        .await;
    println!("admin entries:");
    for entry in entries {
        println!("  {:<24} {}", entry.module, entry.href);
    }

    Ok(())
}

pub async fn menu(args: MenuArgs, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;
    let items = ctx
        .modules
        .navigation
        .build_menu(args.kind, args.user.as_deref())
        .await;

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
