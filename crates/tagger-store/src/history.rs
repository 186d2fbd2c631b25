//! Persisted history of recently tagged files

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tagger_types::{HistoryEntry, Result};

/// Maximum number of retained history entries
pub const MAX_HISTORY: usize = 50;

/// Ordered, size-capped history list, newest first, backed by
/// `history.json` in the store directory.
pub struct HistoryStore {
    store_path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Create or load the history store.
    ///
    /// A missing or unreadable file yields an empty history; entries that
    /// fail to parse are dropped wholesale rather than aborting the load.
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join("history.json");

        let entries = if store_path.exists() {
            File::open(&store_path)
                .ok()
                .and_then(|f| serde_json::from_reader(BufReader::new(f)).ok())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            entries,
        })
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.entries)?;
        Ok(())
    }

    /// History is best-effort: log persistence failures and move on.
    fn save_best_effort(&self) {
        if let Err(e) = self.save() {
            eprintln!(
                "failed to persist history to {}: {e}",
                self.store_path.display()
            );
        }
    }

    /// Validate loaded entries against the world and persist the result.
    ///
    /// Entries whose backing file no longer exists are discarded. A
    /// thumbnail is regenerated when the stored preview is absent or is a
    /// transient resource locator (older versions persisted `file://`
    /// URLs that do not survive restarts). Predicates are injected so the
    /// store stays testable without a filesystem.
    pub fn heal<E, R>(&mut self, exists: E, regenerate: R)
    where
        E: Fn(&Path) -> bool,
        R: Fn(&Path) -> Option<String>,
    {
        self.entries.retain(|e| exists(Path::new(&e.file_path)));

        for entry in &mut self.entries {
            let stale = match entry.thumbnail_base64.as_deref() {
                None => true,
                Some(preview) => !is_inline_preview(preview),
            };
            if stale {
                entry.thumbnail_base64 = regenerate(Path::new(&entry.file_path));
            }
        }

        self.save_best_effort();
    }

    /// Prepend an entry, enforce the cap, persist synchronously.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY);
        self.save_best_effort();
    }

    /// Empty both the in-memory list and the persisted file.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save_best_effort();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a stored preview is usable inline data (bare base64 or a data
/// URI) as opposed to a transient resource locator.
fn is_inline_preview(preview: &str) -> bool {
    if preview.starts_with("data:") {
        return true;
    }
    !preview.contains("://")
}
