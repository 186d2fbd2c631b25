//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gr-tagger")]
#[command(version)]
#[command(about = "Tag Ricoh GR JPEGs with their film recipe via exiftool")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// ExifTool command line override (e.g. "perl /opt/exiftool")
    #[arg(long, global = true)]
    pub exiftool: Option<String>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tag JPEG files or folders with their film recipe
    Tag {
        /// JPEG files or folders to tag
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Omit the "EV: ..." descriptor tag
        #[arg(long)]
        no_ev: bool,

        /// Omit the "ISO: ..." descriptor tag
        #[arg(long)]
        no_iso: bool,

        /// Omit the "WB: ..." descriptor tag
        #[arg(long)]
        no_wb: bool,

        /// Skip the history record for this run
        #[arg(long)]
        no_history: bool,
    },

    /// Show the tagging history
    History {
        /// Limit number of entries shown
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,

        /// Clear the history
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the persisted descriptor-tag toggles
    Options {
        /// Set one toggle, e.g. "ev=false" or "wb=true"
        #[arg(long, value_name = "KEY=BOOL")]
        set: Vec<String>,

        /// Turn every toggle on or off at once
        #[arg(long, value_name = "on|off")]
        all: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the exiftool command line (empty string to auto-detect)
        #[arg(long)]
        set_exiftool: Option<String>,

        /// Set the data directory for history/options storage
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set the thumbnail edge length in pixels
        #[arg(long)]
        set_thumbnail_px: Option<u32>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Check that exiftool can be found and executed
    Doctor,
}
