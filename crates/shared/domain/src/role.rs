//! Role, capability and username value rules.
//!
//! Names are trimmed and lowercased before validation, so `" Editor "` and
//! `"editor"` refer to the same role.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

static ROLE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid regex"));
static CAPABILITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_.-]+$").expect("valid regex"));

fn check_length(kind: &str, value: &str) -> DomainResult<()> {
    let len = value.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(DomainError::validation(format!(
            "{} must be {}-{} characters",
            kind, MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Normalize and validate a role name (2-64 chars of `[a-z0-9_-]`).
pub fn normalize_role_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim().to_lowercase();
    check_length("Role name", &name)?;
    if !ROLE_NAME_RE.is_match(&name) {
        return Err(DomainError::validation(
            "Role name may only contain a-z, 0-9, '_' and '-'",
        ));
    }
    Ok(name)
}

/// Normalize and validate a capability (2-64 chars of `[a-z0-9_.-]`).
pub fn normalize_capability(raw: &str) -> DomainResult<String> {
    let cap = raw.trim().to_lowercase();
    check_length("Capability", &cap)?;
    if !CAPABILITY_RE.is_match(&cap) {
        return Err(DomainError::validation(
            "Capability may only contain a-z, 0-9, '_', '.' and '-'",
        ));
    }
    Ok(cap)
}

/// Normalize a username for case-insensitive comparison.
pub fn normalize_username(raw: &str) -> DomainResult<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(DomainError::validation("Username must not be empty"));
    }
    Ok(name)
}

/// Role with its grants and assigned users, as shown by role listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub name: String,
    pub capabilities: Vec<String>,
    pub users: Vec<String>,
}
