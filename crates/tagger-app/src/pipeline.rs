//! The tagging pipeline: read metadata, compose tags, check for an
//! existing recipe tag, write.

use crate::tags::compose_tags;
use crate::thumbnail::create_thumbnail;
use std::path::{Path, PathBuf};
use tagger_exiftool::ExifTool;
use tagger_store::HistoryStore;
use tagger_types::{HistoryEntry, OptionsState, Result, TagOutcome, TagSet};

/// Metadata operations the pipeline needs from the tool layer.
pub trait MetadataBackend {
    fn read_record(&self, path: &Path) -> Result<tagger_types::MetadataRecord>;
    fn already_tagged(&self, path: &Path, recipe_tag: &str) -> Result<bool>;
    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()>;
}

impl MetadataBackend for ExifTool {
    fn read_record(&self, path: &Path) -> Result<tagger_types::MetadataRecord> {
        ExifTool::read_record(self, path)
    }

    fn already_tagged(&self, path: &Path, recipe_tag: &str) -> Result<bool> {
        ExifTool::already_tagged(self, path, recipe_tag)
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        ExifTool::write_tags(self, path, tags)
    }
}

/// Drives the read/compose/check/write sequence for files and batches.
pub struct Tagger<B: MetadataBackend> {
    backend: B,
}

impl<B: MetadataBackend> Tagger<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Tag a single file. Soft skips (no tone, already tagged) are
    /// outcomes, not errors; only tool failures return `Err`.
    pub fn tag_file(&self, path: &Path, options: &OptionsState) -> Result<TagOutcome> {
        let record = self.backend.read_record(path)?;

        let Some(tags) = compose_tags(&record, options) else {
            return Ok(TagOutcome::SkippedNoTone);
        };

        if self.backend.already_tagged(path, tags.recipe_tag())? {
            return Ok(TagOutcome::SkippedAlreadyTagged {
                tag: tags.recipe_tag().to_string(),
            });
        }

        self.backend.write_tags(path, &tags)?;

        // The record had a tone or compose_tags would have bailed
        let tone = record.tone.unwrap_or_default().trim().to_string();
        Ok(TagOutcome::Applied { tone, tags })
    }

    /// Tag a list of files sequentially. A failure on one file is
    /// recorded and the batch moves on; `on_file` fires after each file
    /// for progress reporting.
    pub fn tag_batch<F>(
        &self,
        paths: &[PathBuf],
        options: &OptionsState,
        mut on_file: F,
    ) -> BatchSummary
    where
        F: FnMut(usize, &FileReport),
    {
        let mut summary = BatchSummary::new(paths.len());

        for (index, path) in paths.iter().enumerate() {
            let result = self
                .tag_file(path, options)
                .map_err(|e| e.to_string());
            let report = FileReport {
                path: path.clone(),
                result,
            };
            on_file(index, &report);
            summary.record(report);
        }

        summary
    }
}

/// What happened to one file in a batch.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: std::result::Result<TagOutcome, String>,
}

impl FileReport {
    fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// One-line status message for this file.
    pub fn message(&self) -> String {
        let name = self.filename();
        match &self.result {
            Ok(TagOutcome::Applied { tags, .. }) => {
                format!("Tagged {name} with {}", tags.recipe_tag())
            }
            Ok(TagOutcome::SkippedNoTone) => {
                format!("Skipped {name}: no ImageTone metadata found")
            }
            Ok(TagOutcome::SkippedAlreadyTagged { tag }) => {
                format!("Skipped {name}: already tagged with {tag}")
            }
            Err(msg) => format!("Error tagging {name}: {msg}"),
        }
    }
}

/// Aggregated results of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub applied: usize,
    pub skipped_no_tone: usize,
    pub skipped_already_tagged: usize,
    pub failed: usize,
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            total,
            reports: Vec::with_capacity(total),
            ..Self::default()
        }
    }

    fn record(&mut self, report: FileReport) {
        match &report.result {
            Ok(TagOutcome::Applied { .. }) => self.applied += 1,
            Ok(TagOutcome::SkippedNoTone) => self.skipped_no_tone += 1,
            Ok(TagOutcome::SkippedAlreadyTagged { .. }) => self.skipped_already_tagged += 1,
            Err(_) => self.failed += 1,
        }
        self.reports.push(report);
    }

    pub fn skipped(&self) -> usize {
        self.skipped_no_tone + self.skipped_already_tagged
    }

    /// Closing status line for a finished batch.
    pub fn message(&self) -> String {
        format!(
            "Done: {} tagged, {} skipped, {} failed",
            self.applied,
            self.skipped(),
            self.failed
        )
    }
}

/// Record a successful tagging in the history, generating a thumbnail
/// on the way in.
pub fn record_in_history(
    history: &mut HistoryStore,
    path: &Path,
    tone: String,
    tags: TagSet,
    thumbnail_px: u32,
) {
    let thumbnail = create_thumbnail(path, thumbnail_px);
    history.append(HistoryEntry::new(path, tone, tags, thumbnail));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use tagger_types::{Error, MetadataRecord};

    /// In-memory backend: canned records, mutable keyword sets.
    #[derive(Default)]
    struct FakeBackend {
        records: HashMap<PathBuf, MetadataRecord>,
        keywords: RefCell<HashMap<PathBuf, HashSet<String>>>,
        fail_on: Option<PathBuf>,
        writes: RefCell<usize>,
    }

    impl FakeBackend {
        fn with_tone(mut self, path: &str, tone: &str) -> Self {
            self.records.insert(
                PathBuf::from(path),
                MetadataRecord {
                    tone: Some(tone.to_string()),
                    ..MetadataRecord::default()
                },
            );
            self
        }

        fn with_empty(mut self, path: &str) -> Self {
            self.records
                .insert(PathBuf::from(path), MetadataRecord::default());
            self
        }
    }

    impl MetadataBackend for FakeBackend {
        fn read_record(&self, path: &Path) -> Result<MetadataRecord> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(Error::ToolExecution("Error: File not found".to_string()));
            }
            Ok(self.records.get(path).cloned().unwrap_or_default())
        }

        fn already_tagged(&self, path: &Path, recipe_tag: &str) -> Result<bool> {
            Ok(self
                .keywords
                .borrow()
                .get(path)
                .is_some_and(|set| set.contains(recipe_tag)))
        }

        fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
            *self.writes.borrow_mut() += 1;
            let mut keywords = self.keywords.borrow_mut();
            let set = keywords.entry(path.to_path_buf()).or_default();
            for tag in tags.iter() {
                set.insert(tag.clone());
            }
            Ok(())
        }
    }

    #[test]
    fn tags_a_file_with_a_tone() {
        let tagger = Tagger::new(FakeBackend::default().with_tone("a.jpg", "Positive Film"));
        let outcome = tagger
            .tag_file(Path::new("a.jpg"), &OptionsState::default())
            .unwrap();

        match outcome {
            TagOutcome::Applied { tone, tags } => {
                assert_eq!(tone, "Positive Film");
                assert_eq!(tags.recipe_tag(), "Positive Film Film Recipe");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn skips_without_tone_and_writes_nothing() {
        let backend = FakeBackend::default().with_empty("flat.jpg");
        let tagger = Tagger::new(backend);
        let outcome = tagger
            .tag_file(Path::new("flat.jpg"), &OptionsState::default())
            .unwrap();
        assert_eq!(outcome, TagOutcome::SkippedNoTone);
        assert_eq!(*tagger.backend.writes.borrow(), 0);
    }

    #[test]
    fn second_run_is_idempotent() {
        let backend = FakeBackend::default().with_tone("a.jpg", "Negative Film");
        let tagger = Tagger::new(backend);
        let options = OptionsState::default();

        let first = tagger.tag_file(Path::new("a.jpg"), &options).unwrap();
        assert!(matches!(first, TagOutcome::Applied { .. }));

        let second = tagger.tag_file(Path::new("a.jpg"), &options).unwrap();
        assert_eq!(
            second,
            TagOutcome::SkippedAlreadyTagged {
                tag: "Negative Film Film Recipe".to_string()
            }
        );
        assert_eq!(*tagger.backend.writes.borrow(), 1);
    }

    #[test]
    fn batch_continues_past_failures_and_counts() {
        let mut backend = FakeBackend::default()
            .with_tone("a.jpg", "Positive Film")
            .with_empty("b.jpg")
            .with_tone("c.jpg", "Vivid");
        backend.fail_on = Some(PathBuf::from("broken.jpg"));
        let tagger = Tagger::new(backend);

        let paths: Vec<PathBuf> = ["a.jpg", "broken.jpg", "b.jpg", "c.jpg"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let mut seen = Vec::new();
        let summary = tagger.tag_batch(&paths, &OptionsState::default(), |i, report| {
            seen.push((i, report.path.clone()));
        });

        assert_eq!(summary.total, 4);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.skipped_no_tone, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.message(), "Done: 2 tagged, 1 skipped, 1 failed");
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[1].1, PathBuf::from("broken.jpg"));
    }

    #[test]
    fn report_messages_name_the_file() {
        let report = FileReport {
            path: PathBuf::from("/photos/R0001234.jpg"),
            result: Ok(TagOutcome::SkippedNoTone),
        };
        assert_eq!(
            report.message(),
            "Skipped R0001234.jpg: no ImageTone metadata found"
        );

        let report = FileReport {
            path: PathBuf::from("/photos/R0001234.jpg"),
            result: Err("Error: File not found".to_string()),
        };
        assert_eq!(
            report.message(),
            "Error tagging R0001234.jpg: Error: File not found"
        );
    }
}
