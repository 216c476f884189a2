//! Roles command - role and capability administration.

use access_service_lib::service::RoleAdministration;
use common::{config::AppConfig, AppResult};

use super::Context;
use crate::cli::args::{RolesAction, RolesArgs};

pub async fn execute(args: RolesArgs, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;
    let roles = &ctx.access.roles;

    match args.action {
        RolesAction::List => {
            for role in roles.list_roles().await? {
                println!("{}", role.name);
                println!("  capabilities: {}", role.capabilities.join(", "));
                println!("  users: {}", role.users.join(", "));
            }
        }
        RolesAction::Seed => roles.seed_defaults().await?,
        RolesAction::Create { role } => {
            let name = roles.create_role(&role).await?;
            println!("{}", name);
        }
        RolesAction::Delete { role } => roles.delete_role(&role).await?,
        RolesAction::Grant { user, role } => roles.grant_role(&user, &role).await?,
        RolesAction::Revoke { user, role } => roles.revoke_role(&user, &role).await?,
        RolesAction::AddCap { role, capability } => {
            roles.add_capability(&role, &capability).await?
        }
        RolesAction::RemoveCap { role, capability } => {
            roles.remove_capability(&role, &capability).await?
        }
    }

    Ok(())
}
