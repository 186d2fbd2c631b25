//! Normalization of existing keyword metadata
//!
//! exiftool reports `Keywords` and `Subject` as a JSON array when a file
//! has several values and as a plain string when it has one (sometimes a
//! comma-joined string written by other software). Everything is folded
//! into a flat set of trimmed, non-empty strings before membership tests.

use serde_json::Value;
use std::collections::BTreeSet;

/// Flatten one keyword-bearing field into individual tag strings.
pub fn normalize_field(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(normalize_field).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => Vec::new(),
    }
}

/// Collect the normalized union of the `Keywords` and `Subject` fields of
/// one exiftool record object.
pub fn existing_tag_set(record: &Value) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for field in ["Keywords", "Subject"] {
        if let Some(value) = record.get(field) {
            tags.extend(normalize_field(value));
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_array_values() {
        let value = json!(["Positive Film Film Recipe", "EV: -0.3"]);
        assert_eq!(
            normalize_field(&value),
            vec!["Positive Film Film Recipe", "EV: -0.3"]
        );
    }

    #[test]
    fn splits_comma_joined_strings() {
        let value = json!(" Positive Film Film Recipe , ISO: 200 ,, ");
        assert_eq!(
            normalize_field(&value),
            vec!["Positive Film Film Recipe", "ISO: 200"]
        );
    }

    #[test]
    fn unions_keywords_and_subject() {
        let record = json!({
            "SourceFile": "a.jpg",
            "Keywords": "Positive Film Film Recipe",
            "Subject": ["Positive Film Film Recipe", "WB: Daylight"]
        });
        let tags = existing_tag_set(&record);
        assert!(tags.contains("Positive Film Film Recipe"));
        assert!(tags.contains("WB: Daylight"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn missing_fields_yield_empty_set() {
        let record = json!({"SourceFile": "a.jpg"});
        assert!(existing_tag_set(&record).is_empty());
    }
}
