//! Persistent stores for gr-tagger
//!
//! Two independent JSON blobs under the application data directory: the
//! capped tagging history and the descriptor-tag option toggles. Both are
//! best-effort; persistence failures never interrupt tagging.

pub mod history;
pub mod options;

pub use history::{HistoryStore, MAX_HISTORY};
pub use options::OptionsStore;
