//! Thin process adapter around the external exiftool binary
//!
//! One short-lived child process per call: reads capture the GR's
//! proprietary `ImageTone` (plus EV/ISO/WB), writes append tags to the
//! `Keywords` and `Subject` fields. No pooling, no concurrency.

pub mod keywords;
pub mod resolve;

pub use resolve::{resolve_executable, ToolCommand};

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;
use tagger_types::{Error, MetadataRecord, Result, TagSet};

/// Parsed output of one exiftool invocation.
#[derive(Debug, Clone)]
pub enum ToolValue {
    /// `-json` was requested and stdout parsed as JSON
    Json(Value),
    /// Raw stdout text (no `-json`, or JSON parsing failed)
    Text(String),
}

/// Handle on a resolved exiftool invocation.
#[derive(Debug, Clone)]
pub struct ExifTool {
    command: ToolCommand,
}

impl ExifTool {
    /// Resolve exiftool relative to the running application.
    pub fn locate() -> Self {
        let base_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| Path::new(".").to_path_buf());
        Self {
            command: resolve::resolve_executable(&base_dir),
        }
    }

    pub fn with_command(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Parse a user-configured command line override.
    pub fn from_command_line(line: &str) -> Result<Self> {
        ToolCommand::from_command_line(line)
            .map(Self::with_command)
            .map_err(Error::Config)
    }

    pub fn command(&self) -> &ToolCommand {
        &self.command
    }

    /// Spawn exiftool with `args`, wait for it to exit, and interpret the
    /// captured output.
    pub fn invoke(&self, args: &[String]) -> Result<ToolValue> {
        let output = Command::new(&self.command.program)
            .args(&self.command.leading_args)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolNotFound(resolve::not_found_message(&self.command, cfg!(windows)))
                } else {
                    Error::Io(e)
                }
            })?;

        let wants_json = args.iter().any(|a| a == "-json");
        interpret(
            output.status.success(),
            output.status.code(),
            &output.stdout,
            &output.stderr,
            wants_json,
        )
    }

    /// Probe the binary with `-ver`; returns the reported version.
    pub fn probe(&self) -> Result<String> {
        match self.invoke(&["-ver".to_string()])? {
            ToolValue::Text(v) => Ok(v.trim().to_string()),
            ToolValue::Json(v) => Ok(v.to_string()),
        }
    }

    /// Read the tone/EV/ISO/WB record for one file.
    pub fn read_record(&self, path: &Path) -> Result<MetadataRecord> {
        match self.invoke(&read_args(path))? {
            ToolValue::Json(value) => first_record(value),
            // exiftool produced something that is not JSON; treat it as a
            // file with no readable tone rather than a hard failure
            ToolValue::Text(_) => Ok(MetadataRecord::default()),
        }
    }

    /// Read-only query of the file's existing keyword/subject tags.
    pub fn existing_tags(&self, path: &Path) -> Result<BTreeSet<String>> {
        match self.invoke(&query_args(path))? {
            ToolValue::Json(value) => {
                let record = value
                    .as_array()
                    .and_then(|a| a.first())
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(keywords::existing_tag_set(&record))
            }
            ToolValue::Text(_) => Ok(BTreeSet::new()),
        }
    }

    /// Whether the recipe tag is already present on the file.
    pub fn already_tagged(&self, path: &Path, recipe_tag: &str) -> Result<bool> {
        Ok(self.existing_tags(path)?.contains(recipe_tag))
    }

    /// Append each tag to both `Keywords` and `Subject`, preserving the
    /// file modification time and overwriting in place.
    ///
    /// The underlying `+=` is append-only; callers must consult
    /// [`already_tagged`](Self::already_tagged) first to avoid duplicate
    /// accumulation.
    pub fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        self.invoke(&write_args(path, tags))?;
        Ok(())
    }
}

/// Arguments for the metadata read.
pub fn read_args(path: &Path) -> Vec<String> {
    vec![
        "-json".to_string(),
        "-ImageTone".to_string(),
        "-ExposureCompensation".to_string(),
        "-ISO".to_string(),
        "-WhiteBalance".to_string(),
        path.display().to_string(),
    ]
}

/// Arguments for the existing-tags query.
pub fn query_args(path: &Path) -> Vec<String> {
    vec![
        "-json".to_string(),
        "-Keywords".to_string(),
        "-Subject".to_string(),
        path.display().to_string(),
    ]
}

/// Arguments for the tag write: `-P` preserves the modification time,
/// `-overwrite_original` avoids `_original` backup copies.
pub fn write_args(path: &Path, tags: &TagSet) -> Vec<String> {
    let mut args = vec!["-P".to_string(), "-overwrite_original".to_string()];
    for tag in tags.iter() {
        args.push(format!("-Keywords+={tag}"));
        args.push(format!("-Subject+={tag}"));
    }
    args.push(path.display().to_string());
    args
}

/// Classify one finished invocation.
///
/// Exit zero with `-json` parses stdout, silently falling back to the raw
/// text when parsing fails. Nonzero exits surface stderr verbatim, or a
/// generic exit-code message when stderr is empty.
fn interpret(
    success: bool,
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
    wants_json: bool,
) -> Result<ToolValue> {
    if success {
        if wants_json {
            if let Ok(value) = serde_json::from_slice::<Value>(stdout) {
                return Ok(ToolValue::Json(value));
            }
        }
        return Ok(ToolValue::Text(
            String::from_utf8_lossy(stdout).into_owned(),
        ));
    }

    let stderr_text = String::from_utf8_lossy(stderr).trim().to_string();
    if stderr_text.is_empty() {
        let code_text = code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Err(Error::ToolExecution(format!(
            "exiftool exited with code {code_text}"
        )))
    } else {
        Err(Error::ToolExecution(stderr_text))
    }
}

/// Extract and deserialize the first record of exiftool's JSON array.
fn first_record(value: Value) -> Result<MetadataRecord> {
    match value.as_array().and_then(|a| a.first()).cloned() {
        Some(record) => Ok(serde_json::from_value(record)?),
        None => Ok(MetadataRecord::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn read_args_request_all_recipe_fields() {
        let args = read_args(Path::new("photo.jpg"));
        assert_eq!(
            args,
            vec![
                "-json",
                "-ImageTone",
                "-ExposureCompensation",
                "-ISO",
                "-WhiteBalance",
                "photo.jpg"
            ]
        );
    }

    #[test]
    fn write_args_append_to_keywords_and_subject_in_order() {
        let mut tags = TagSet::new("Positive Film Film Recipe".to_string());
        tags.push("ISO: 200".to_string());
        let args = write_args(Path::new("photo.jpg"), &tags);
        assert_eq!(
            args,
            vec![
                "-P",
                "-overwrite_original",
                "-Keywords+=Positive Film Film Recipe",
                "-Subject+=Positive Film Film Recipe",
                "-Keywords+=ISO: 200",
                "-Subject+=ISO: 200",
                "photo.jpg"
            ]
        );
    }

    #[test]
    fn interpret_parses_json_on_success() {
        let stdout = br#"[{"SourceFile":"a.jpg","ImageTone":"Positive Film"}]"#;
        let value = interpret(true, Some(0), stdout, b"", true).unwrap();
        match value {
            ToolValue::Json(v) => {
                assert_eq!(v[0]["ImageTone"], json!("Positive Film"));
            }
            ToolValue::Text(_) => panic!("expected JSON"),
        }
    }

    #[test]
    fn interpret_falls_back_to_text_on_bad_json() {
        let value = interpret(true, Some(0), b"1 image files updated\n", b"", true).unwrap();
        match value {
            ToolValue::Text(t) => assert_eq!(t, "1 image files updated\n"),
            ToolValue::Json(_) => panic!("expected text"),
        }
    }

    #[test]
    fn interpret_surfaces_stderr_on_failure() {
        let err = interpret(false, Some(1), b"", b"Error: File not found\n", true).unwrap_err();
        match err {
            Error::ToolExecution(msg) => assert_eq!(msg, "Error: File not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn interpret_reports_exit_code_when_stderr_is_empty() {
        let err = interpret(false, Some(2), b"", b"", false).unwrap_err();
        match err {
            Error::ToolExecution(msg) => assert_eq!(msg, "exiftool exited with code 2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_record_takes_head_of_array() {
        let value = json!([{"ImageTone": "Negative Film", "ISO": 800}]);
        let record = first_record(value).unwrap();
        assert_eq!(record.tone.as_deref(), Some("Negative Film"));
        assert_eq!(record.iso, Some(800));
    }

    #[test]
    fn first_record_defaults_on_empty_output() {
        let record = first_record(json!([])).unwrap();
        assert!(record.tone.is_none());
    }

    #[test]
    fn launch_failure_maps_to_tool_not_found() {
        let tool = ExifTool::with_command(ToolCommand::new(PathBuf::from(
            "definitely-not-a-real-exiftool-binary",
        )));
        let err = tool.invoke(&["-ver".to_string()]).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }
}
