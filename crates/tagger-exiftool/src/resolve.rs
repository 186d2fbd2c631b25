//! Locating the exiftool executable
//!
//! Resolution is ordered, first-existing-wins, and pure over an injected
//! existence predicate so it can be tested without touching the filesystem.

use std::path::{Path, PathBuf};

/// How to launch exiftool.
///
/// Some Windows installs ship the perl-based distribution, which runs as
/// `perl.exe exiftool.pl`, so an invocation is a program plus leading
/// arguments rather than a bare path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    /// Parse a user-supplied command line, e.g. `perl /opt/exiftool/exiftool`.
    pub fn from_command_line(line: &str) -> Result<Self, String> {
        let words = shell_words::split(line).map_err(|e| e.to_string())?;
        let mut iter = words.into_iter();
        let program = iter.next().ok_or_else(|| "empty command line".to_string())?;
        Ok(Self::new(program).with_leading_args(iter.collect()))
    }
}

/// Resolve the exiftool invocation for the running platform.
///
/// `base_dir` is the directory the application executable lives in.
pub fn resolve_executable(base_dir: &Path) -> ToolCommand {
    resolve_with(base_dir, cfg!(windows), |p| p.exists())
}

/// Resolution core with an injected existence predicate.
///
/// Windows (the primary target) checks, in order: the packaged perl
/// distribution under `resources/exiftool_files`, a packaged
/// `resources/exiftool.exe`, then `exiftool.exe` beside the application.
/// Other platforms check a bundled `resources/exiftool` then one beside
/// the application. Everything falls back to `exiftool` on the search
/// path; whether that actually launches is decided at spawn time.
pub fn resolve_with<F>(base_dir: &Path, windows: bool, exists: F) -> ToolCommand
where
    F: Fn(&Path) -> bool,
{
    if windows {
        let perl = base_dir.join("resources").join("exiftool_files").join("perl.exe");
        let script = base_dir
            .join("resources")
            .join("exiftool_files")
            .join("exiftool.pl");
        if exists(&perl) && exists(&script) {
            return ToolCommand::new(perl)
                .with_leading_args(vec![script.display().to_string()]);
        }

        for candidate in [
            base_dir.join("resources").join("exiftool.exe"),
            base_dir.join("exiftool.exe"),
        ] {
            if exists(&candidate) {
                return ToolCommand::new(candidate);
            }
        }
    } else {
        for candidate in [
            base_dir.join("resources").join("exiftool"),
            base_dir.join("exiftool"),
        ] {
            if exists(&candidate) {
                return ToolCommand::new(candidate);
            }
        }
    }

    ToolCommand::new(if windows { "exiftool.exe" } else { "exiftool" })
}

/// Remediation message for a failed launch of `command`.
pub fn not_found_message(command: &ToolCommand, windows: bool) -> String {
    if windows {
        format!(
            "exiftool could not be launched ({}). Expected a bundled copy under resources\\ next to the application.",
            command.program.display()
        )
    } else {
        format!(
            "exiftool could not be launched ({}). Install exiftool and make sure it is on your PATH.",
            command.program.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base() -> PathBuf {
        PathBuf::from("/app")
    }

    #[test]
    fn prefers_packaged_perl_distribution_on_windows() {
        let cmd = resolve_with(&base(), true, |p| {
            p.ends_with("perl.exe") || p.ends_with("exiftool.pl")
        });
        assert!(cmd.program.ends_with("perl.exe"));
        assert_eq!(cmd.leading_args.len(), 1);
        assert!(cmd.leading_args[0].ends_with("exiftool.pl"));
    }

    #[test]
    fn falls_back_to_packaged_exe_then_sibling() {
        let packaged = base().join("resources").join("exiftool.exe");
        let cmd = resolve_with(&base(), true, |p| p == packaged);
        assert_eq!(cmd.program, packaged);

        let sibling = base().join("exiftool.exe");
        let cmd = resolve_with(&base(), true, |p| p == sibling);
        assert_eq!(cmd.program, sibling);
    }

    #[test]
    fn uses_search_path_when_nothing_is_bundled() {
        let cmd = resolve_with(&base(), true, |_| false);
        assert_eq!(cmd.program, PathBuf::from("exiftool.exe"));

        let cmd = resolve_with(&base(), false, |_| false);
        assert_eq!(cmd.program, PathBuf::from("exiftool"));
    }

    #[test]
    fn perl_pair_requires_both_files() {
        // Only perl.exe present: skip the pair, land on the PATH fallback
        let cmd = resolve_with(&base(), true, |p| p.ends_with("perl.exe"));
        assert_eq!(cmd.program, PathBuf::from("exiftool.exe"));
    }

    #[test]
    fn parses_command_line_override() {
        let cmd = ToolCommand::from_command_line("perl \"/opt/Image-ExifTool/exiftool\"").unwrap();
        assert_eq!(cmd.program, PathBuf::from("perl"));
        assert_eq!(cmd.leading_args, vec!["/opt/Image-ExifTool/exiftool"]);

        assert!(ToolCommand::from_command_line("   ").is_err());
    }
}
