//! Module manifests, navigation contributions and registry records.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{DEFAULT_MODULE_VERSION, DEFAULT_NAV_ORDER, MAX_MODULE_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::migration::MigrationReport;

static MODULE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid regex"));

fn default_version() -> String {
    DEFAULT_MODULE_VERSION.to_string()
}

fn default_order() -> i32 {
    DEFAULT_NAV_ORDER
}

/// Navigation section a menu is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Auth,
    User,
    Admin,
}

impl std::str::FromStr for NavKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auth" => Ok(NavKind::Auth),
            "user" => Ok(NavKind::User),
            "admin" => Ok(NavKind::Admin),
            other => Err(DomainError::validation(format!(
                "Unknown navigation kind '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for NavKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavKind::Auth => write!(f, "auth"),
            NavKind::User => write!(f, "user"),
            NavKind::Admin => write!(f, "admin"),
        }
    }
}

/// Who may see a navigation entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Always,
    /// Only anonymous visitors
    Guest,
    /// Only authenticated users
    Auth,
}

impl Visibility {
    pub fn allows(&self, authenticated: bool) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::Guest => !authenticated,
            Visibility::Auth => authenticated,
        }
    }
}

/// Single navigation contribution of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub title: String,
    pub href: String,
    #[serde(default = "default_order")]
    pub order: i32,
    /// All of these must be held (logical AND)
    #[serde(default, alias = "caps", alias = "requiredCapabilities")]
    pub required_capabilities: Vec<String>,
    #[serde(default, alias = "minAge")]
    pub min_age: Option<u32>,
    #[serde(default, alias = "visible_if", alias = "visibilityCondition")]
    pub visibility: Visibility,
}

/// Navigation contributions grouped per section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSections {
    #[serde(default)]
    pub auth: Vec<NavEntry>,
    #[serde(default)]
    pub user: Vec<NavEntry>,
    #[serde(default)]
    pub admin: Vec<NavEntry>,
}

/// Declarative module description read from `module.json`.
///
/// Accepts camelCase keys as well as the older snake_case keys
/// (`service`, `enabled`, `auth_nav`, `caps`, `visible_if`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModuleManifest {
    #[serde(default, alias = "service")]
    #[validate(regex(path = *MODULE_NAME_RE))]
    pub name: String,
    #[serde(default = "default_version")]
    #[validate(length(min = 1, max = 32))]
    pub version: String,
    #[serde(default, alias = "enabled", alias = "enabledByDefault")]
    pub enabled_by_default: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "adminEntry")]
    pub admin_entry: Option<String>,
    #[serde(default, alias = "requiredCapability")]
    pub required_capability: Option<String>,
    #[serde(default, alias = "navigationEntries")]
    pub navigation: NavigationSections,
    #[serde(default)]
    pub auth_nav: Vec<NavEntry>,
    #[serde(default)]
    pub user_nav: Vec<NavEntry>,
    #[serde(default)]
    pub admin_nav: Vec<NavEntry>,
}

impl ModuleManifest {
    /// Minimal manifest, mostly useful for tests and programmatic registration.
    pub fn new(name: impl Into<String>, version: impl Into<String>, enabled_by_default: bool) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            enabled_by_default,
            description: String::new(),
            author: String::new(),
            admin_entry: None,
            required_capability: None,
            navigation: NavigationSections::default(),
            auth_nav: Vec::new(),
            user_nav: Vec::new(),
            admin_nav: Vec::new(),
        }
    }

    /// Trim and lowercase the name, default an empty version, then validate.
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.name = self.name.trim().to_lowercase();
        self.version = self.version.trim().to_string();
        if self.version.is_empty() {
            self.version = default_version();
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("Module manifest requires a name"));
        }
        if self.name.len() > MAX_MODULE_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Module name exceeds {} characters",
                MAX_MODULE_NAME_LENGTH
            )));
        }
        self.validate()?;
        Ok(self)
    }

    /// Every entry declared for `kind`, section-style entries first.
    pub fn nav(&self, kind: NavKind) -> impl Iterator<Item = &NavEntry> {
        let (sectioned, legacy) = match kind {
            NavKind::Auth => (&self.navigation.auth, &self.auth_nav),
            NavKind::User => (&self.navigation.user, &self.user_nav),
            NavKind::Admin => (&self.navigation.admin, &self.admin_nav),
        };
        sectioned.iter().chain(legacy.iter())
    }

    pub fn with_nav(mut self, kind: NavKind, entry: NavEntry) -> Self {
        match kind {
            NavKind::Auth => self.navigation.auth.push(entry),
            NavKind::User => self.navigation.user.push(entry),
            NavKind::Admin => self.navigation.admin.push(entry),
        }
        self
    }
}

impl NavEntry {
    pub fn new(title: impl Into<String>, href: impl Into<String>, order: i32) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            order,
            required_capabilities: Vec::new(),
            min_age: None,
            visibility: Visibility::Always,
        }
    }

    pub fn requiring(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.push(capability.into());
        self
    }

    pub fn visible(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn min_age(mut self, age: u32) -> Self {
        self.min_age = Some(age);
        self
    }
}

/// Rendered navigation item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub href: String,
}

/// Persisted module state.
///
/// `enabled` is administrator-owned once the record exists; `admin_toggled`
/// records whether an administrator ever changed it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    pub version: String,
    pub enabled: bool,
    pub admin_toggled: bool,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a registry synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    /// Manifests or records that could not be synchronized
    pub errors: Vec<String>,
    /// Present when the pass triggered a migration run
    pub migrations: Option<MigrationReport>,
}
