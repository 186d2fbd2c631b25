//! Command handlers

use crate::cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tagger_app::pipeline::record_in_history;
use tagger_app::thumbnail::create_thumbnail;
use tagger_app::{scan, Config, Tagger};
use tagger_store::{HistoryStore, OptionsStore};
use tagger_types::{Error, OptionKey, Result, TagOutcome};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.exiftool.is_some() {
        config.exiftool_cmd = cli.exiftool.clone();
    }

    match &cli.command {
        Commands::Tag {
            paths,
            no_ev,
            no_iso,
            no_wb,
            no_history,
        } => cmd_tag(
            &cli,
            &config,
            paths.clone(),
            [*no_ev, *no_iso, *no_wb],
            *no_history,
        ),

        Commands::History { limit, clear } => cmd_history(&config, *limit, *clear),

        Commands::Options { set, all } => cmd_options(&config, set.clone(), all.clone()),

        Commands::Config {
            show,
            set_exiftool,
            set_data_dir,
            set_thumbnail_px,
            reset,
        } => cmd_config(
            *show,
            set_exiftool.clone(),
            set_data_dir.clone(),
            *set_thumbnail_px,
            *reset,
        ),

        Commands::Doctor => cmd_doctor(&config),
    }
}

/// Open the history store and run its self-healing pass: prune entries
/// whose backing file is gone, regenerate lost previews, persist.
fn open_history(config: &Config) -> Result<HistoryStore> {
    let mut history = HistoryStore::open(&config.data_dir()?)?;
    let thumbnail_px = config.thumbnail_px;
    history.heal(
        |path| path.exists(),
        |path| create_thumbnail(path, thumbnail_px),
    );
    Ok(history)
}

fn cmd_tag(
    cli: &Cli,
    config: &Config,
    paths: Vec<PathBuf>,
    [no_ev, no_iso, no_wb]: [bool; 3],
    no_history: bool,
) -> Result<()> {
    let images = scan::expand_paths(&paths)?;
    if images.is_empty() {
        return Err(Error::FileNotFound("No JPEG images found".to_string()));
    }

    // Persisted toggles are the baseline; flags only switch off
    let data_dir = config.data_dir()?;
    let mut options = OptionsStore::open(&data_dir)?.state();
    if no_ev {
        options.ev = false;
    }
    if no_iso {
        options.iso = false;
    }
    if no_wb {
        options.wb = false;
    }

    if cli.verbose {
        eprintln!("Found {} JPEG files", images.len());
    }

    let tagger = Tagger::new(config.exiftool()?);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let verbose = cli.verbose;
    let summary = tagger.tag_batch(&images, &options, |_, report| {
        if verbose {
            pb.println(report.message());
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    if !no_history {
        let mut history = open_history(config)?;
        for report in &summary.reports {
            if let Ok(TagOutcome::Applied { tone, tags }) = &report.result {
                record_in_history(
                    &mut history,
                    &report.path,
                    tone.clone(),
                    tags.clone(),
                    config.thumbnail_px,
                );
            }
        }
    }

    for report in &summary.reports {
        if report.result.is_err() {
            eprintln!("{}", report.message());
        }
    }

    println!("{}", summary.message());
    Ok(())
}

fn cmd_history(config: &Config, limit: usize, clear: bool) -> Result<()> {
    let mut history = open_history(config)?;

    if clear {
        history.clear();
        println!("History cleared");
        return Ok(());
    }

    if history.is_empty() {
        println!("No tagging history");
        return Ok(());
    }

    for entry in history.entries().iter().take(limit) {
        let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
        println!(
            "{}  {}  {}  [{}]",
            entry.timestamp_display(),
            entry.filename,
            entry.tone,
            tags.join(", ")
        );
    }

    Ok(())
}

fn cmd_options(config: &Config, set: Vec<String>, all: Option<String>) -> Result<()> {
    let data_dir = config.data_dir()?;
    let mut store = OptionsStore::open(&data_dir)?;

    if let Some(value) = all {
        store.set_all(parse_on_off(&value)?);
    }

    for assignment in set {
        let (key, value) = parse_toggle(&assignment)?;
        store.set(key, value);
    }

    let state = store.state();
    println!("ev:  {}", state.ev);
    println!("iso: {}", state.iso);
    println!("wb:  {}", state.wb);
    Ok(())
}

/// Parse "ev=false" style assignments.
fn parse_toggle(assignment: &str) -> Result<(OptionKey, bool)> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| Error::Config(format!("expected KEY=BOOL, got: {assignment}")))?;

    let key: OptionKey = key
        .parse()
        .map_err(Error::Config)?;
    let value: bool = value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("expected true or false, got: {value}")))?;

    Ok((key, value))
}

fn parse_on_off(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(Error::Config(format!("expected on or off, got: {other}"))),
    }
}

fn cmd_config(
    show: bool,
    set_exiftool: Option<String>,
    set_data_dir: Option<PathBuf>,
    set_thumbnail_px: Option<u32>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(exiftool) = set_exiftool {
        config.exiftool_cmd = if exiftool.trim().is_empty() {
            None
        } else {
            Some(exiftool)
        };
        modified = true;
    }

    if let Some(data_dir) = set_data_dir {
        config.data_dir = Some(data_dir);
        modified = true;
    }

    if let Some(px) = set_thumbnail_px {
        config.thumbnail_px = px;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_doctor(config: &Config) -> Result<()> {
    let tool = config.exiftool()?;
    let command = tool.command();

    println!("ExifTool: {}", command.program.display());
    if !command.leading_args.is_empty() {
        println!("Args:     {}", command.leading_args.join(" "));
    }

    let version = tool.probe()?;
    println!("Version:  {}", version);
    println!("OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tagger_types::{HistoryEntry, TagSet};
    use tempfile::tempdir;

    #[test]
    fn open_history_heals_on_load() {
        let dir = tempdir().unwrap();
        let kept_file = dir.path().join("kept.jpg");
        std::fs::write(&kept_file, b"").unwrap();

        let entry = |path: &Path| {
            HistoryEntry::new(
                path,
                "Positive Film".to_string(),
                TagSet::new("Positive Film Film Recipe".to_string()),
                Some("dGVzdA==".to_string()),
            )
        };

        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        // Seed a history with one live entry and one whose file is gone
        let mut seeded = HistoryStore::open(dir.path()).unwrap();
        seeded.append(entry(&kept_file));
        seeded.append(entry(&dir.path().join("deleted.jpg")));
        drop(seeded);

        let history = open_history(&config).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].filename, "kept.jpg");

        // The pruned list was persisted, not just filtered in memory
        let reloaded = HistoryStore::open(dir.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].filename, "kept.jpg");
    }

    #[test]
    fn toggle_assignments_parse() {
        assert_eq!(parse_toggle("ev=false").unwrap(), (OptionKey::Ev, false));
        assert_eq!(parse_toggle("WB=true").unwrap(), (OptionKey::Wb, true));
        assert!(parse_toggle("ev").is_err());
        assert!(parse_toggle("focus=true").is_err());
        assert!(parse_toggle("ev=maybe").is_err());
    }

    #[test]
    fn on_off_parses() {
        assert!(parse_on_off("on").unwrap());
        assert!(!parse_on_off("OFF").unwrap());
        assert!(parse_on_off("yes").is_err());
    }
}
