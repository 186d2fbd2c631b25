//! Application services for gr-tagger
//!
//! Everything the CLI and GUI share: tag composition from a metadata
//! record, the per-file tagging pipeline and batch driver, thumbnail
//! generation, folder scanning, and the app configuration.

pub mod config;
pub mod pipeline;
pub mod scan;
pub mod tags;
pub mod thumbnail;

pub use config::Config;
pub use pipeline::{BatchSummary, FileReport, MetadataBackend, Tagger};
pub use tags::compose_tags;

/// Application version from the crate manifest.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
