//! # Report Document
//!
//! The in-memory structure of a technical note, independent of the markup
//! language it is eventually rendered to.
//!
//! ## Structure
//!
//! ```text
//! ReportDocument
//! ├── title: TitleBlock (banner, running header)
//! └── sections: Vec<Section>
//!     ├── Analytical Framework
//!     │   └── System Geometry (parameter line, optional schematic figure)
//!     ├── Computation Matrix (stride-sampled results table)
//!     └── Stress Envelopes
//!         ├── Shear Force (V) Diagram
//!         └── Bending Moment (M) Diagram
//! ```
//!
//! The document is built once by [`assemble`], rendered once and discarded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::NoteConfig;
use crate::data::{BeamData, Field, Row};
use crate::plot::Diagram;

const INTRO_TEXT: &str = "This report evaluates the internal mechanical response of a structural beam \
under discrete loading. The simulation aims to isolate the shear and flexural envelopes for design verification.";

const MATRIX_TEXT: &str = "The dataset below represents the calculated stress points along the span.";

const FIGURE_CAPTION: &str = "Schematic Load Diagram";

/// Schematic width as a fraction of the text width
const FIGURE_WIDTH: f64 = 0.55;

/// Title banner and running header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBlock {
    pub title: String,
    pub subtitle: String,
    pub header_left: String,
    pub header_right: String,
}

/// A numbered section (or subsection, when nested).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
    pub subsections: Vec<Section>,
}

impl Section {
    fn new(heading: impl Into<String>) -> Self {
        Section {
            heading: heading.into(),
            blocks: Vec::new(),
            subsections: Vec::new(),
        }
    }

    fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn with_subsection(mut self, section: Section) -> Self {
        self.subsections.push(section);
        self
    }
}

/// Content element of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(String),
    /// Vertical space in centimetres
    Spacing(f64),
    Figure(Figure),
    Table(ResultsTable),
    Diagram(Diagram),
}

/// A captioned figure whose image may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Image path as written in the markup, `None` when the file is missing
    pub image: Option<PathBuf>,
    pub caption: String,
    /// Image width as a fraction of the text width
    pub width: f64,
}

/// One formatted line of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub position: String,
    pub shear: String,
    pub moment: String,
}

impl TableRow {
    /// Position with 2 decimals, shear and moment with 1 decimal
    pub fn from_row(row: &Row) -> Self {
        TableRow {
            position: format!("{:.2}", row.position),
            shear: format!("{:.1}", row.shear),
            moment: format!("{:.1}", row.moment),
        }
    }
}

/// The sampled results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsTable {
    pub headers: [String; 3],
    pub rows: Vec<TableRow>,
}

impl ResultsTable {
    /// Table of every `stride`-th row, starting with the first
    pub fn sampled(rows: &[Row], stride: usize) -> Self {
        ResultsTable {
            headers: [
                "x (m)".to_string(),
                "V (kN)".to_string(),
                "M (kNm)".to_string(),
            ],
            rows: sample_rows(rows, stride).map(TableRow::from_row).collect(),
        }
    }
}

/// Root of the note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: TitleBlock,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// All blocks, depth-first in document order
    pub fn blocks(&self) -> Vec<&Block> {
        fn walk<'a>(section: &'a Section, out: &mut Vec<&'a Block>) {
            out.extend(section.blocks.iter());
            for sub in &section.subsections {
                walk(sub, out);
            }
        }

        let mut out = Vec::new();
        for section in &self.sections {
            walk(section, &mut out);
        }
        out
    }

    /// The results table, if any
    pub fn table(&self) -> Option<&ResultsTable> {
        self.blocks().into_iter().find_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// The schematic figure, if any
    pub fn figure(&self) -> Option<&Figure> {
        self.blocks().into_iter().find_map(|b| match b {
            Block::Figure(figure) => Some(figure),
            _ => None,
        })
    }

    /// All envelope diagrams in document order
    pub fn diagrams(&self) -> Vec<&Diagram> {
        self.blocks()
            .into_iter()
            .filter_map(|b| match b {
                Block::Diagram(diagram) => Some(diagram),
                _ => None,
            })
            .collect()
    }
}

/// Rows 0, stride, 2*stride, ... in original order. A stride of 0 is treated as 1.
pub fn sample_rows(rows: &[Row], stride: usize) -> impl Iterator<Item = &Row> {
    rows.iter().step_by(stride.max(1))
}

/// Build the note structure from the loaded rows.
///
/// # Arguments
///
/// * `data` - Full row sequence; the table samples it, the diagrams use all of it
/// * `config` - Title block text, image path and stride
/// * `image_present` - Whether the schematic image exists; without it the
///   figure keeps its caption but carries no image reference
pub fn assemble(data: &BeamData, config: &NoteConfig, image_present: bool) -> ReportDocument {
    let meta = &config.meta;
    let rows = data.rows();

    let title = TitleBlock {
        title: meta.title.clone(),
        subtitle: meta.subtitle.clone(),
        header_left: meta.header_line(),
        header_right: meta.note_kind.clone(),
    };

    let figure = Figure {
        image: image_present.then(|| markup_path(&config.image)),
        caption: FIGURE_CAPTION.to_string(),
        width: FIGURE_WIDTH,
    };

    let framework = Section::new("Analytical Framework")
        .with_block(Block::Paragraph(INTRO_TEXT.to_string()))
        .with_subsection(
            Section::new("System Geometry")
                .with_block(Block::Paragraph(meta.geometry.clone()))
                .with_block(Block::Figure(figure)),
        );

    let matrix = Section::new("Computation Matrix")
        .with_block(Block::Paragraph(MATRIX_TEXT.to_string()))
        .with_block(Block::Spacing(0.3))
        .with_block(Block::Table(ResultsTable::sampled(rows, config.stride)));

    let envelopes = Section::new("Stress Envelopes")
        .with_subsection(
            Section::new("Shear Force (V) Diagram")
                .with_block(Block::Diagram(Diagram::from_rows(rows, Field::Shear))),
        )
        .with_subsection(
            Section::new("Bending Moment (M) Diagram")
                .with_block(Block::Diagram(Diagram::from_rows(rows, Field::Moment))),
        );

    ReportDocument {
        title,
        sections: vec![framework, matrix, envelopes],
    }
}

/// Markup paths always use forward slashes
fn markup_path(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', "/"))
}
