//! Core types for gr-tagger
//!
//! Film-recipe tagging for Ricoh GR JPEGs: metadata records read through
//! exiftool, composed tag sets, and the persisted history entry shape.

pub mod error;

pub use error::{Error, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

/// Accept a JSON string or number, yielding trimmed non-empty text.
///
/// exiftool is inconsistent here: `ExposureCompensation` arrives as `-0.3`
/// or `"-0.3"` depending on the file, and tone names are plain strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Accept a JSON integer, float, or numeric string.
fn lenient_integer<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Ok(n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))),
        Some(Value::String(s)) => Ok(s.trim().parse().ok()),
        _ => Ok(None),
    }
}

/// Metadata read from a single image via exiftool.
///
/// Field names match the exiftool tag names verbatim; every field is
/// optional because cameras other than the GR simply omit them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataRecord {
    /// The camera's named film-simulation profile (e.g. "Positive Film")
    #[serde(rename = "ImageTone", default, deserialize_with = "string_or_number")]
    pub tone: Option<String>,

    /// Exposure compensation as raw decimal text (e.g. "-0.3")
    #[serde(
        rename = "ExposureCompensation",
        default,
        deserialize_with = "string_or_number"
    )]
    pub exposure_compensation: Option<String>,

    /// ISO sensitivity
    #[serde(rename = "ISO", default, deserialize_with = "lenient_integer")]
    pub iso: Option<i64>,

    /// White balance mode (e.g. "Auto", "Daylight")
    #[serde(rename = "WhiteBalance", default, deserialize_with = "string_or_number")]
    pub white_balance: Option<String>,
}

/// Ordered list of tags to apply to one image.
///
/// Invariant: never empty; the first element is always the tone-derived
/// recipe tag, followed by descriptor tags in fixed order (EV, ISO, WB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Start a tag set with the recipe tag.
    pub fn new(recipe_tag: String) -> Self {
        Self(vec![recipe_tag])
    }

    /// Append a descriptor tag.
    pub fn push(&mut self, tag: String) {
        self.0.push(tag);
    }

    /// The tone-derived recipe tag (always present).
    pub fn recipe_tag(&self) -> &str {
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of tagging a single file. Soft skips are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tags were written to the file
    Applied { tone: String, tags: TagSet },
    /// No ImageTone field in the metadata; nothing to derive
    SkippedNoTone,
    /// The recipe tag is already present in the file's keywords
    SkippedAlreadyTagged { tag: String },
}

/// Entry in the persisted tagging history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique id, epoch milliseconds at creation time
    pub id: i64,

    /// File name for display
    pub filename: String,

    /// Full path to the tagged file
    pub file_path: String,

    /// The tone the recipe tag was derived from
    pub tone: String,

    /// The tags that were applied
    pub tags: TagSet,

    /// When the tags were written
    pub tagged_at: DateTime<Utc>,

    /// Base64-encoded JPEG thumbnail (optional)
    #[serde(default)]
    pub thumbnail_base64: Option<String>,
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Creation-time epoch milliseconds, bumped past the previous id so two
/// entries created in the same millisecond stay distinct.
fn next_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let prev = LAST_ID
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(last.max(now - 1) + 1)
        })
        .unwrap_or(now - 1);
    prev.max(now - 1) + 1
}

impl HistoryEntry {
    /// Build an entry for a freshly tagged file.
    pub fn new(file_path: &Path, tone: String, tags: TagSet, thumbnail_base64: Option<String>) -> Self {
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        Self {
            id: next_id(),
            filename,
            file_path: file_path.display().to_string(),
            tone,
            tags,
            tagged_at: Utc::now(),
            thumbnail_base64,
        }
    }

    /// Local wall-clock time for display in the history list.
    pub fn timestamp_display(&self) -> String {
        self.tagged_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Which descriptor tag an option toggle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    Ev,
    Iso,
    Wb,
}

impl OptionKey {
    pub fn label(&self) -> &'static str {
        match self {
            OptionKey::Ev => "ev",
            OptionKey::Iso => "iso",
            OptionKey::Wb => "wb",
        }
    }
}

impl std::str::FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ev" => Ok(OptionKey::Ev),
            "iso" => Ok(OptionKey::Iso),
            "wb" => Ok(OptionKey::Wb),
            other => Err(format!("unknown option key: {other}")),
        }
    }
}

fn default_true() -> bool {
    true
}

/// User-selected inclusion options for descriptor tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsState {
    /// Include "EV: <value>" when exposure compensation is present
    #[serde(default = "default_true")]
    pub ev: bool,

    /// Include "ISO: <value>" when ISO is present
    #[serde(default = "default_true")]
    pub iso: bool,

    /// Include "WB: <value>" when white balance is present
    #[serde(default = "default_true")]
    pub wb: bool,
}

impl Default for OptionsState {
    fn default() -> Self {
        Self {
            ev: true,
            iso: true,
            wb: true,
        }
    }
}

impl OptionsState {
    pub fn get(&self, key: OptionKey) -> bool {
        match key {
            OptionKey::Ev => self.ev,
            OptionKey::Iso => self.iso,
            OptionKey::Wb => self.wb,
        }
    }

    pub fn set(&mut self, key: OptionKey, value: bool) {
        match key {
            OptionKey::Ev => self.ev = value,
            OptionKey::Iso => self.iso = value,
            OptionKey::Wb => self.wb = value,
        }
    }

    pub fn set_all(&mut self, value: bool) {
        self.ev = value;
        self.iso = value;
        self.wb = value;
    }
}
