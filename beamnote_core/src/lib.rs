//! # beamnote_core - Beam Analysis Technical Notes
//!
//! `beamnote_core` turns a spreadsheet of beam results (position, shear force,
//! bending moment) into a typeset technical note: a title banner, an
//! introduction, a schematic figure, a sampled results table and shear and
//! moment envelope diagrams.
//!
//! ## Pipeline
//!
//! ```text
//! spreadsheet ──load_rows──▶ BeamData ──assemble──▶ ReportDocument
//!                                                        │ render
//!                                                        ▼
//!                               PDF ◀──compile── Typst / LaTeX markup
//! ```
//!
//! Every step except compilation is a pure function: the same rows and
//! config always give byte-identical markup.
//!
//! ## Quick Start
//!
//! ```rust
//! use beamnote_core::config::{Engine, NoteConfig};
//! use beamnote_core::data::{BeamData, Row};
//! use beamnote_core::document::assemble;
//! use beamnote_core::render::render;
//!
//! let data = BeamData::new(vec![
//!     Row::new(0.0, 0.0, 0.0),
//!     Row::new(2.0, -10.0, 15.0),
//!     Row::new(4.0, -10.0, 35.0),
//!     Row::new(6.0, 0.0, 50.0),
//! ]);
//! let doc = assemble(&data, &NoteConfig::default(), false);
//! assert_eq!(doc.table().unwrap().rows.len(), 2);
//!
//! let markup = render(&doc, Engine::Typst);
//! assert!(markup.contains("(0, 0) (2, -10) (4, -10) (6, 0) "));
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Note configuration and engine selection
//! - [`data`] - Spreadsheet loading into ordered rows
//! - [`document`] - Document tree and assembly
//! - [`plot`] - Envelope coordinate formatting
//! - [`render`] - Typst and LaTeX markup
//! - [`pdf`] - Compilation to PDF
//! - [`report`] - End-to-end pipeline
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes and config files

pub mod config;
pub mod data;
pub mod document;
pub mod errors;
pub mod file_io;
pub mod pdf;
pub mod plot;
pub mod render;
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use config::{Engine, NoteConfig};
pub use data::{load_rows, BeamData, Field, Row};
pub use document::{assemble, ReportDocument};
pub use errors::{NoteError, NoteResult};
pub use report::{generate, prepare, NoteArtifacts, PreparedNote};
