//! Infrastructure layer - manifest files on disk.

mod manifests;

pub use manifests::{ManifestSource, ScanReport};
