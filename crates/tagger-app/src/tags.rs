//! Tag composition from a metadata record
//!
//! The recipe tag is derived from the tone; descriptor tags follow in
//! fixed order (EV, ISO, WB), each gated by its option toggle and only
//! emitted when the source field is present.

use tagger_types::{MetadataRecord, OptionsState, TagSet};

/// Compose the tag set for one image, or `None` when the record has no
/// usable `ImageTone`.
pub fn compose_tags(record: &MetadataRecord, options: &OptionsState) -> Option<TagSet> {
    let tone = record.tone.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let mut tags = TagSet::new(format!("{tone} Film Recipe"));

    if options.ev {
        if let Some(ev) = record.exposure_compensation.as_deref() {
            tags.push(format!("EV: {}", signed_ev(ev)));
        }
    }
    if options.iso {
        if let Some(iso) = record.iso {
            tags.push(format!("ISO: {iso}"));
        }
    }
    if options.wb {
        if let Some(wb) = record.white_balance.as_deref() {
            tags.push(format!("WB: {wb}"));
        }
    }

    Some(tags)
}

/// EV values carry an explicit sign; exiftool omits the `+` on
/// non-negative values, so prepend one unless a sign is already there.
fn signed_ev(raw: &str) -> String {
    if raw.starts_with('-') || raw.starts_with('+') {
        raw.to_string()
    } else {
        format!("+{raw}")
    }
}
