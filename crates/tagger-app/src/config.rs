//! Configuration management for gr-tagger
//!
//! Config stored at: ~/.config/gr-tagger/config.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tagger_exiftool::ExifTool;
use tagger_types::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Command line override for the exiftool binary (optional)
    #[serde(default)]
    pub exiftool_cmd: Option<String>,

    /// Data directory override for history/options storage
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Longest edge of generated history thumbnails, in pixels
    #[serde(default = "default_thumbnail_px")]
    pub thumbnail_px: u32,
}

fn default_thumbnail_px() -> u32 {
    96
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exiftool_cmd: None,
            data_dir: None,
            thumbnail_px: default_thumbnail_px(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no user config directory".to_string()))?
            .join("gr-tagger");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding history.json and options.json
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("no user data directory".to_string()))?
            .join("gr-tagger");
        Ok(data_dir)
    }

    /// Build the exiftool handle: configured command line if set,
    /// otherwise the bundled/PATH resolution.
    pub fn exiftool(&self) -> Result<ExifTool> {
        match self.exiftool_cmd.as_deref() {
            Some(line) => ExifTool::from_command_line(line),
            None => Ok(ExifTool::locate()),
        }
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "GR Tagger Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "ExifTool:      {}",
            self.exiftool_cmd.as_deref().unwrap_or("(auto-detect)")
        )?;
        writeln!(
            f,
            "Data dir:      {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Thumbnail px:  {}", self.thumbnail_px)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:   {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_autodetect_everything() {
        let config = Config::default();
        assert!(config.exiftool_cmd.is_none());
        assert!(config.data_dir.is_none());
        assert_eq!(config.thumbnail_px, 96);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"exiftool_cmd": "perl /opt/exiftool"}"#).unwrap();
        assert_eq!(config.exiftool_cmd.as_deref(), Some("perl /opt/exiftool"));
        assert_eq!(config.thumbnail_px, 96);
    }

    #[test]
    fn data_dir_override_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/gr-tagger-test")),
            ..Config::default()
        };
        assert_eq!(
            config.data_dir().unwrap(),
            PathBuf::from("/tmp/gr-tagger-test")
        );
    }
}
