//! Persisted descriptor-tag option toggles

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tagger_types::{OptionKey, OptionsState, Result};

/// The EV/ISO/WB toggles, backed by `options.json` in the store
/// directory, independent from the history blob.
pub struct OptionsStore {
    store_path: PathBuf,
    state: OptionsState,
}

impl OptionsStore {
    /// Create or load the options store; defaults are all-enabled.
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join("options.json");

        let state = if store_path.exists() {
            File::open(&store_path)
                .ok()
                .and_then(|f| serde_json::from_reader(BufReader::new(f)).ok())
                .unwrap_or_default()
        } else {
            OptionsState::default()
        };

        Ok(Self { store_path, state })
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.state)?;
        Ok(())
    }

    fn save_best_effort(&self) {
        if let Err(e) = self.save() {
            eprintln!(
                "failed to persist options to {}: {e}",
                self.store_path.display()
            );
        }
    }

    pub fn state(&self) -> OptionsState {
        self.state
    }

    pub fn set(&mut self, key: OptionKey, value: bool) {
        self.state.set(key, value);
        self.save_best_effort();
    }

    pub fn set_all(&mut self, value: bool) {
        self.state.set_all(value);
        self.save_best_effort();
    }

    /// Replace the whole state at once (GUI checkbox sync).
    pub fn replace(&mut self, state: OptionsState) {
        if state != self.state {
            self.state = state;
            self.save_best_effort();
        }
    }
}
