//! Admin entry points of modules.
//!
//! Built once from the manifests: every module maps to one admin route and
//! the capability that guards it.

use std::collections::BTreeMap;

use serde::Serialize;

use access_service_lib::service::CapabilityResolver;
use domain::{ModuleManifest, CAP_VIEW_ADMIN, DEFAULT_ADMIN_ENTRY, MODULES_ROUTE_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminEntry {
    pub module: String,
    pub href: String,
    pub required_capability: String,
}

#[derive(Debug, Clone, Default)]
pub struct AdminEntryRegistry {
    entries: BTreeMap<String, AdminEntry>,
}

impl AdminEntryRegistry {
    pub fn from_manifests(manifests: &[ModuleManifest]) -> Self {
        let entries = manifests
            .iter()
            .filter_map(|manifest| manifest.clone().normalized().ok())
            .map(|manifest| {
                let entry = AdminEntry {
                    module: manifest.name.clone(),
                    href: resolve_href(&manifest.name, manifest.admin_entry.as_deref()),
                    required_capability: manifest
                        .required_capability
                        .as_deref()
                        .map(|c| c.trim().to_lowercase())
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| CAP_VIEW_ADMIN.to_string()),
                };
                (manifest.name.clone(), entry)
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, module: &str) -> Option<&AdminEntry> {
        self.entries.get(module)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `enabled` modules whose capability `user` holds, by module name.
    pub async fn entries_for(
        &self,
        user: &str,
        resolver: &dyn CapabilityResolver,
        enabled: &[String],
    ) -> Vec<AdminEntry> {
        let mut visible = Vec::new();
        for (module, entry) in &self.entries {
            if !enabled.iter().any(|e| e == module) {
                continue;
            }
            if resolver.has_capability(user, &entry.required_capability).await {
                visible.push(entry.clone());
            }
        }
        visible
    }
}

/// Absolute routes are kept; relative ones live under the module's folder.
fn resolve_href(module: &str, entry: Option<&str>) -> String {
    let entry = entry
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_ADMIN_ENTRY);

    if entry.starts_with('/') || entry.contains("://") {
        return entry.to_string();
    }

    let relative = entry.trim_start_matches("./");
    format!("{}/{}/{}", MODULES_ROUTE_PREFIX, module, relative)
}
