//! Migration tracking records and run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key of an applied module migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub module: String,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Catalog entry joined with its applied state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatus {
    pub module: String,
    pub name: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Outcome of a `run_pending` pass.
///
/// `executed` and `skipped` hold `module/name` keys; `errors` holds
/// `module/name: message` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub executed: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

impl MigrationReport {
    pub fn key(module: &str, name: &str) -> String {
        format!("{}/{}", module, name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold another report into this one, keeping order.
    pub fn merge(&mut self, other: MigrationReport) {
        self.executed.extend(other.executed);
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_merge() {
        let mut first = MigrationReport {
            executed: vec![MigrationReport::key("a", "001")],
            ..Default::default()
        };
        first.merge(MigrationReport {
            skipped: vec!["b/001".into()],
            errors: vec!["c/001: boom".into()],
            ..Default::default()
        });

        assert_eq!(first.executed, vec!["a/001"]);
        assert_eq!(first.skipped, vec!["b/001"]);
        assert!(first.has_errors());
    }
}
