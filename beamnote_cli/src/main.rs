//! # Beamnote CLI
//!
//! Reads beam results from a spreadsheet and writes a typeset technical note.
//! Progress goes to stdout as three lines (reading, compiling, success);
//! logs and errors go to stderr.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use beamnote_core::config::NoteConfig;
use beamnote_core::file_io::load_config;
use beamnote_core::report::prepare;

mod cli;
mod logging;

use crate::cli::{Cli, LogFormatArg};
use crate::logging::{init_logging, LogConfig, LogFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    debug!(?config, "resolved configuration");

    println!("Reading beam data from {}...", config.input.display());
    let note = prepare(&config)
        .with_context(|| format!("failed to prepare note from {}", config.input.display()))?;

    println!("Generating technical note PDF...");
    let artifacts = note
        .publish(&config)
        .with_context(|| format!("failed to compile {}", config.source_path().display()))?;

    println!("Success: {}", artifacts.pdf_path.display());
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<NoteConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NoteConfig::default(),
    };
    cli.apply_overrides(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamnote_core::config::Engine;
    use std::fs;

    #[test]
    fn test_config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beamnote.json");
        fs::write(&path, r#"{"engine": "latex", "stride": 4, "output_stem": "FromFile"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "beamnote",
            "--config",
            path.to_str().unwrap(),
            "--stride",
            "3",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.engine, Engine::Latex);
        assert_eq!(config.stride, 3);
        assert_eq!(config.output_stem, "FromFile");
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["beamnote", "--config", "/definitely/not/here.json"]).unwrap();
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
