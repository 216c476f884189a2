//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use domain::NavKind;

/// Administration of roles, modules, module migrations and pages
#[derive(Parser, Debug)]
#[command(name = "cms-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Core database schema
    Schema(SchemaArgs),

    /// Module registry
    Modules(ModulesArgs),

    /// Module migrations
    Migrations(MigrationsArgs),

    /// Roles and capability grants
    Roles(RolesArgs),

    /// Check whether a user holds a capability
    Can {
        user: String,
        capability: String,
    },

    /// Show roles and admin entries of a user
    Whoami { user: String },

    /// Render a navigation menu
    Menu(MenuArgs),

    /// Pages
    Pages(PagesArgs),
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SchemaAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop everything and re-run all migrations
    Fresh,
}

#[derive(Args, Debug)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub action: ModulesAction,
}

#[derive(Subcommand, Debug)]
pub enum ModulesAction {
    /// Synchronize the registry with the manifests on disk
    Sync {
        /// Modules directory (defaults to MODULES_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List registered modules
    List,
    /// Enable a module and run its pending migrations
    Enable { name: String },
    /// Disable a module
    Disable { name: String },
}

#[derive(Args, Debug)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    pub action: MigrationsAction,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrationsAction {
    /// Run pending migrations of enabled modules
    Run,
    /// Show applied and pending migrations of enabled modules
    Status,
}

#[derive(Args, Debug)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub action: RolesAction,
}

#[derive(Subcommand, Debug)]
pub enum RolesAction {
    /// List roles with their capabilities and users
    List,
    /// Install the default roles and grants
    Seed,
    /// Create a role
    Create { role: String },
    /// Delete a role that no user holds
    Delete { role: String },
    /// Assign a role to a user
    Grant { user: String, role: String },
    /// Remove a role from a user
    Revoke { user: String, role: String },
    /// Grant a capability to a role
    AddCap { role: String, capability: String },
    /// Withdraw a capability from a role
    RemoveCap { role: String, capability: String },
}

#[derive(Args, Debug)]
pub struct MenuArgs {
    /// auth, user or admin
    pub kind: NavKind,

    /// Render for this user instead of an anonymous visitor
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Args, Debug)]
pub struct PagesArgs {
    #[command(subcommand)]
    pub action: PagesAction,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum PagesAction {
    /// List pages, home page first
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_role_grant() {
        let cli = Cli::parse_from(["cms-admin", "roles", "grant", "alice", "editor"]);
        match cli.command {
            Commands::Roles(RolesArgs {
                action: RolesAction::Grant { user, role },
            }) => {
                assert_eq!(user, "alice");
                assert_eq!(role, "editor");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_menu_kind() {
        let cli = Cli::parse_from(["cms-admin", "-v", "menu", "admin", "--user", "root"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Menu(args) => {
                assert_eq!(args.kind, NavKind::Admin);
                assert_eq!(args.user.as_deref(), Some("root"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["cms-admin", "menu", "sidebar"]).is_err());
    }
}
