//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use beamnote_core::config::{Engine, NoteConfig};

#[derive(Debug, Parser)]
#[command(
    name = "beamnote",
    version,
    about = "Render a beam analysis technical note from a spreadsheet",
    long_about = "Render a beam analysis technical note from a spreadsheet.\n\n\
                  Reads position, shear force and bending moment columns, then typesets a note\n\
                  with a sampled results table and shear / moment envelope diagrams.\n\
                  With no options it reads beam_data.xlsx and includes beam.png if present."
)]
pub struct Cli {
    /// JSON config file; command-line options override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spreadsheet with the beam results (.xlsx, .xls, .ods or .csv).
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Worksheet to read (default: first sheet).
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Schematic image, included only if the file exists.
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// File stem of the markup source and PDF.
    #[arg(short, long, value_name = "STEM")]
    pub output: Option<String>,

    /// Directory for the markup source and PDF.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Typesetting engine.
    #[arg(short, long, value_enum)]
    pub engine: Option<EngineArg>,

    /// Keep every Nth row in the results table.
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,

    /// Author shown in the page header.
    #[arg(long)]
    pub author: Option<String>,

    /// Author reference (student or staff number) shown in the page header.
    #[arg(long)]
    pub reference: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact")]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Typst,
    Latex,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Typst => Engine::Typst,
            EngineArg::Latex => Engine::Latex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Apply command-line values on top of a base config.
    pub fn apply_overrides(&self, config: &mut NoteConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(image) = &self.image {
            config.image = image.clone();
        }
        if let Some(output) = &self.output {
            config.output_stem = output.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(engine) = self.engine {
            config.engine = engine.into();
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(author) = &self.author {
            config.meta.author = author.clone();
        }
        if let Some(reference) = &self.reference {
            config.meta.reference = reference.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let cli = Cli::try_parse_from(["beamnote"]).unwrap();
        let mut config = NoteConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, NoteConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "beamnote",
            "--input",
            "results.csv",
            "--engine",
            "latex",
            "--stride",
            "3",
            "--output",
            "Note",
            "--author",
            "A. Tester",
        ])
        .unwrap();
        let mut config = NoteConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.input, Path::new("results.csv"));
        assert_eq!(config.engine, Engine::Latex);
        assert_eq!(config.stride, 3);
        assert_eq!(config.output_stem, "Note");
        assert_eq!(config.meta.author, "A. Tester");
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["beamnote", "-v", "-q"]).is_err());
    }
}
