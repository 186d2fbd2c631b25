//! JPEG discovery and validation

use std::path::{Path, PathBuf};
use tagger_types::{Error, Result};
use walkdir::WalkDir;

/// Only JPEGs carry the GR's ImageTone field
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Check if a path looks like a JPEG file
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| JPEG_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan a directory recursively for JPEG files, sorted by path
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::UnsupportedFile(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_jpeg(path) {
            images.push(path.to_path_buf());
        }
    }

    images.sort();
    Ok(images)
}

/// Expand a mixed list of files and folders into JPEG paths.
///
/// Files must exist and be JPEGs; directories are scanned recursively.
/// Non-JPEG files in an explicit list are rejected rather than silently
/// dropped.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(scan_directory(path)?);
        } else if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        } else if is_jpeg(path) {
            images.push(path.clone());
        } else {
            return Err(Error::UnsupportedFile(format!(
                "not a JPEG file: {}",
                path.display()
            )));
        }
    }

    Ok(images)
}

/// Keep only the JPEGs out of a dropped-file list, in drop order.
/// Unlike [`expand_paths`] this never fails; the GUI reports an empty
/// result as "no JPEG images found".
pub fn filter_jpegs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();
    for path in paths {
        if path.is_dir() {
            if let Ok(found) = scan_directory(path) {
                images.extend(found);
            }
        } else if is_jpeg(path) {
            images.push(path.clone());
        }
    }
    images
}
