//! # Note Configuration
//!
//! `NoteConfig` holds every value that shapes a technical note: where the data
//! comes from, where the output goes, which typesetting engine compiles it and
//! the text of the title block. All fields have defaults, so an empty JSON
//! object (or no config file at all) reproduces the standard note.
//!
//! ## Example
//!
//! ```rust
//! use beamnote_core::config::{Engine, NoteConfig};
//!
//! let config = NoteConfig::default();
//! assert_eq!(config.stride, 2);
//! assert_eq!(config.engine, Engine::Typst);
//! assert!(config.source_path().ends_with("Beam_Analysis_Tech_Note.typ"));
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{NoteError, NoteResult};

/// Default table sampling stride (every second row)
pub const DEFAULT_STRIDE: usize = 2;

/// Typesetting backend used to compile the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Typst, compiled in-process
    #[default]
    Typst,
    /// LaTeX, compiled by an external `pdflatex`
    Latex,
}

impl Engine {
    /// File extension of the retained markup source
    pub fn source_extension(&self) -> &'static str {
        match self {
            Engine::Typst => "typ",
            Engine::Latex => "tex",
        }
    }

    /// Name of the compiler, as shown in errors and logs
    pub fn compiler_name(&self) -> &'static str {
        match self {
            Engine::Typst => "typst",
            Engine::Latex => "pdflatex",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Typst => "typst",
            Engine::Latex => "latex",
        })
    }
}

/// Spreadsheet header text for each of the three data columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub position: String,
    pub shear: String,
    pub moment: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            position: "X".to_string(),
            shear: "Shear force".to_string(),
            moment: "Bending Moment".to_string(),
        }
    }
}

/// Title block and running header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteMeta {
    /// Author shown in the left running header
    pub author: String,
    /// Author reference (student or staff number), shown after the author
    pub reference: String,
    /// Banner title
    pub title: String,
    /// Banner subtitle line
    pub subtitle: String,
    /// Right running header
    pub note_kind: String,
    /// Parameter line of the geometry subsection
    pub geometry: String,
}

impl Default for NoteMeta {
    fn default() -> Self {
        NoteMeta {
            author: "Structural Engineer".to_string(),
            reference: "BN-001".to_string(),
            title: "TECHNICAL NOTE: BENDING & SHEAR RESPONSE".to_string(),
            subtitle: "Structural Engineering Laboratory - 2026".to_string(),
            note_kind: "Beam Analysis Tech Note".to_string(),
            geometry: "Parameters: L=12.0m, Support: Pinned-Roller.".to_string(),
        }
    }
}

impl NoteMeta {
    /// Left running header text (`author | reference`, or just the author)
    pub fn header_line(&self) -> String {
        if self.reference.is_empty() {
            self.author.clone()
        } else {
            format!("{} | {}", self.author, self.reference)
        }
    }
}

/// Complete configuration for one note run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteConfig {
    /// Spreadsheet with the beam results
    pub input: PathBuf,
    /// Worksheet name (first sheet when unset)
    pub sheet: Option<String>,
    /// Header text of the data columns
    pub columns: ColumnNames,
    /// Optional schematic image, included only if it exists
    pub image: PathBuf,
    /// Directory receiving the markup source and the PDF
    pub output_dir: PathBuf,
    /// File stem of the markup source and the PDF
    pub output_stem: String,
    /// Typesetting engine
    pub engine: Engine,
    /// Table sampling stride
    pub stride: usize,
    /// Title block text
    pub meta: NoteMeta,
}

impl Default for NoteConfig {
    fn default() -> Self {
        NoteConfig {
            input: PathBuf::from("beam_data.xlsx"),
            sheet: None,
            columns: ColumnNames::default(),
            image: PathBuf::from("beam.png"),
            output_dir: PathBuf::from("."),
            output_stem: "Beam_Analysis_Tech_Note".to_string(),
            engine: Engine::default(),
            stride: DEFAULT_STRIDE,
            meta: NoteMeta::default(),
        }
    }
}

impl NoteConfig {
    /// Check values that would otherwise fail late or silently.
    pub fn validate(&self) -> NoteResult<()> {
        if self.stride == 0 {
            return Err(NoteError::invalid_input("stride", "0", "Stride must be at least 1"));
        }
        if self.output_stem.trim().is_empty() {
            return Err(NoteError::invalid_input("output_stem", "", "Output name must not be empty"));
        }
        if self.output_stem.contains(['/', '\\']) {
            return Err(NoteError::invalid_input(
                "output_stem",
                self.output_stem.clone(),
                "Output name must be a file stem, use output_dir for the directory",
            ));
        }
        Ok(())
    }

    /// Path of the retained markup source
    pub fn source_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_stem, self.engine.source_extension()))
    }

    /// Path of the compiled PDF
    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.pdf", self.output_stem))
    }
}
