//! # Note Pipeline
//!
//! Runs the note from spreadsheet to PDF in two steps, so a caller can report
//! progress between them:
//!
//! 1. [`prepare`] - validate the config, load the rows, probe the schematic
//!    image, assemble the document and render its markup
//! 2. [`PreparedNote::publish`] - write the markup source, compile it and
//!    write the PDF
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamnote_core::config::NoteConfig;
//! use beamnote_core::report::prepare;
//!
//! let config = NoteConfig::default();
//! let note = prepare(&config)?;
//! let artifacts = note.publish(&config)?;
//! println!("Wrote {}", artifacts.pdf_path.display());
//! # Ok::<(), beamnote_core::errors::NoteError>(())
//! ```

use std::borrow::Cow;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Engine, NoteConfig};
use crate::data::{load_rows, BeamData};
use crate::document::{assemble, ReportDocument};
use crate::errors::{NoteError, NoteResult};
use crate::file_io::write_atomic;
use crate::pdf::{compile_latex, compile_typst};
use crate::render::render;

/// A note whose markup is ready to compile.
#[derive(Debug, Clone)]
pub struct PreparedNote {
    pub data: BeamData,
    pub document: ReportDocument,
    /// Rendered markup for the configured engine
    pub source: String,
    pub engine: Engine,
}

/// Files produced by a published note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteArtifacts {
    /// Retained markup source
    pub source_path: PathBuf,
    /// Compiled PDF
    pub pdf_path: PathBuf,
}

/// Load the data and build the note markup.
///
/// # Returns
///
/// * `Ok(PreparedNote)` - Document and markup for `config.engine`
/// * `Err(NoteError)` - Invalid config or unreadable input; a missing
///   schematic image is not an error
pub fn prepare(config: &NoteConfig) -> NoteResult<PreparedNote> {
    config.validate()?;

    info!(input = %config.input.display(), "reading beam data");
    let data = load_rows(&config.input, &config.columns, config.sheet.as_deref())?;
    if data.is_empty() {
        warn!(input = %config.input.display(), "no data rows found, table and diagrams will be empty");
    }

    let image_present = config.image.is_file();
    debug!(image = %config.image.display(), present = image_present, "schematic image probe");

    let config = if image_present {
        resolve_image(config)?
    } else {
        Cow::Borrowed(config)
    };
    let document = assemble(&data, &config, image_present);
    let source = render(&document, config.engine);
    debug!(engine = %config.engine, rows = data.len(), bytes = source.len(), "rendered markup");

    Ok(PreparedNote {
        data,
        document,
        source,
        engine: config.engine,
    })
}

impl PreparedNote {
    /// Write the markup source, compile it and write the PDF.
    ///
    /// The source is kept on disk next to the PDF. Relative paths (input,
    /// image, output directory) resolve against the working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(NoteArtifacts)` - Paths of the markup source and the PDF
    /// * `Err(NoteError::CompileFailed)` - The compiler rejected the markup
    /// * `Err(NoteError::CompilerUnavailable)` - `pdflatex` is not installed
    /// * `Err(NoteError::FileError)` - Output could not be written
    pub fn publish(&self, config: &NoteConfig) -> NoteResult<NoteArtifacts> {
        let workdir = env::current_dir()
            .map_err(|e| NoteError::file_error("resolve working directory", ".", e.to_string()))?;

        let source_path = config.source_path();
        write_atomic(&source_path, self.source.as_bytes())?;
        debug!(path = %source_path.display(), "wrote markup source");

        info!(engine = %self.engine, "compiling note");
        let pdf_path = match self.engine {
            Engine::Typst => {
                let image = self.document.figure().and_then(|f| f.image.as_deref());
                let root = typst_root(image, &workdir);
                let pdf_bytes = compile_typst(self.source.clone(), &root)?;
                let pdf_path = config.pdf_path();
                write_atomic(&pdf_path, &pdf_bytes)?;
                pdf_path
            }
            Engine::Latex => compile_latex(&source_path, &config.output_dir, &workdir)?,
        };

        info!(pdf = %pdf_path.display(), "note written");
        Ok(NoteArtifacts {
            source_path,
            pdf_path,
        })
    }
}

/// Load, render and compile in one call.
pub fn generate(config: &NoteConfig) -> NoteResult<NoteArtifacts> {
    prepare(config)?.publish(config)
}

/// Typst cannot reach files above its world root, so the image is made
/// absolute before it goes into the markup. pdflatex reads `../` paths
/// itself and keeps the path as given.
fn resolve_image(config: &NoteConfig) -> NoteResult<Cow<'_, NoteConfig>> {
    if config.engine != Engine::Typst || config.image.is_absolute() {
        return Ok(Cow::Borrowed(config));
    }
    let image = fs::canonicalize(&config.image)
        .map_err(|e| NoteError::file_error("resolve image", config.image.display().to_string(), e.to_string()))?;
    debug!(image = %image.display(), "resolved schematic image");
    Ok(Cow::Owned(NoteConfig {
        image,
        ..config.clone()
    }))
}

/// Typst resolves absolute paths against the world root, so an absolute
/// image path needs the filesystem root as the world root.
fn typst_root(image: Option<&Path>, workdir: &Path) -> PathBuf {
    match image {
        Some(image) if image.is_absolute() => image
            .ancestors()
            .last()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| workdir.to_path_buf()),
        _ => workdir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typst_root_relative_image() {
        let root = typst_root(Some(Path::new("beam.png")), Path::new("/work"));
        assert_eq!(root, Path::new("/work"));
        let root = typst_root(None, Path::new("/work"));
        assert_eq!(root, Path::new("/work"));
    }

    #[cfg(unix)]
    #[test]
    fn test_typst_root_absolute_image() {
        let root = typst_root(Some(Path::new("/data/figures/beam.png")), Path::new("/work"));
        assert_eq!(root, Path::new("/"));
    }

    #[test]
    fn test_prepare_rejects_zero_stride() {
        let config = NoteConfig {
            stride: 0,
            ..NoteConfig::default()
        };
        let err = prepare(&config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_prepare_missing_input() {
        let config = NoteConfig {
            input: PathBuf::from("/definitely/not/here.csv"),
            ..NoteConfig::default()
        };
        let err = prepare(&config).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
