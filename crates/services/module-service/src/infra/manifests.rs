//! Manifest discovery.
//!
//! Every immediate sub-directory of the modules root that contains a
//! `module.json` is a module. A broken manifest is reported and skipped; it
//! never stops the scan.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::{ModuleManifest, MANIFEST_FILE_NAME};

/// Result of scanning a modules directory
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Valid manifests, ordered by folder name
    pub manifests: Vec<ModuleManifest>,
    /// `folder: reason` for every skipped manifest
    pub errors: Vec<String>,
}

/// Reads module manifests from a directory tree.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    root: PathBuf,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the root. A missing root yields an empty report.
    pub fn scan(&self) -> AppResult<ScanReport> {
        let mut report = ScanReport::default();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(root = %self.root.display(), "Modules directory does not exist");
                return Ok(report);
            }
            Err(e) => return Err(AppError::from(e)),
        };

        let mut folders: Vec<(String, PathBuf)> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| (entry.file_name().to_string_lossy().into_owned(), entry.path()))
            .filter(|(_, path)| path.join(MANIFEST_FILE_NAME).is_file())
            .collect();
        folders.sort_by_key(|(folder, _)| folder.to_lowercase());

        for (folder, path) in folders {
            match Self::load(&path) {
                Ok(manifest) => {
                    debug!(module = %manifest.name, version = %manifest.version, "Manifest loaded");
                    report.manifests.push(manifest);
                }
                Err(e) => {
                    warn!(folder = %folder, error = %e, "Skipping module manifest");
                    report.errors.push(format!("{}: {}", folder, e));
                }
            }
        }

        Ok(report)
    }

    /// Load and validate the manifest of one module folder.
    ///
    /// A manifest without a name takes the folder name.
    pub fn load(dir: &Path) -> AppResult<ModuleManifest> {
        let raw = fs::read_to_string(dir.join(MANIFEST_FILE_NAME))?;
        let mut manifest: ModuleManifest = serde_json::from_str(&raw)?;

        if manifest.name.trim().is_empty() {
            manifest.name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        manifest
            .normalized()
            .map_err(|e| AppError::manifest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_module(root: &Path, folder: &str, json: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE_NAME), json).unwrap();
    }

    #[test]
    fn test_scan_skips_broken_manifests() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "zeta", r#"{"name": "zeta", "version": "2.0.0"}"#);
        write_module(tmp.path(), "Alpha", r#"{"enabled": true}"#);
        write_module(tmp.path(), "broken", "{ not json");
        write_module(tmp.path(), "badname", r#"{"name": "has space"}"#);
        fs::create_dir_all(tmp.path().join("no_manifest")).unwrap();
        fs::write(tmp.path().join("stray.txt"), "x").unwrap();

        let report = ManifestSource::new(tmp.path()).scan().unwrap();
        let names: Vec<_> = report.manifests.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(report.manifests[0].enabled_by_default);
        assert_eq!(report.manifests[0].version, "1.0.0");
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("badname:"));
        assert!(report.errors[1].starts_with("broken:"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let report = ManifestSource::new(tmp.path().join("nope")).scan().unwrap();

        assert!(report.manifests.is_empty());
        assert!(report.errors.is_empty());
    }
}
