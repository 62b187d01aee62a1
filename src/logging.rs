//! Logger setup. The dashboard owns the terminal, so it logs to a file;
//! headless commands log to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

pub enum LogDestination {
    File,
    Stderr,
}

pub fn log_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "applyintel")
        .map(|dirs| dirs.data_dir().join("applyintel.log"))
        .unwrap_or_else(|| PathBuf::from("applyintel.log"))
}

fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn initialize(destination: LogDestination, verbose: bool) -> Result<()> {
    let level = level_filter(verbose);
    let config = build_config();

    match destination {
        LogDestination::File => {
            let path = log_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            WriteLogger::init(level, config, file)?;
        }
        LogDestination::Stderr => {
            // Stdout is reserved for command output.
            TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}
