//! GR Tagger - film recipe tagging for Ricoh GR JPEGs
//!
//! A CLI that reads the GR's ImageTone metadata via exiftool and writes
//! matching keyword tags back into the files.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
