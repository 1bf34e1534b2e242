//! # PDF Compilation
//!
//! Turns rendered markup into a PDF.
//!
//! ## Engines
//!
//! - **Typst** is compiled in-process. [`NoteWorld`] serves the main source,
//!   the bundled `typst-assets` fonts and files (the schematic image) from a
//!   root directory. Output is raw PDF bytes (`Vec<u8>`).
//! - **LaTeX** is handed to an external `pdflatex`, run once in
//!   non-interactive mode. The compiler writes the PDF next to the `.tex`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamnote_core::pdf::compile_typst;
//! use std::path::Path;
//!
//! let pdf_bytes = compile_typst("= Hello".to_string(), Path::new(".")).unwrap();
//! std::fs::write("hello.pdf", pdf_bytes).unwrap();
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use once_cell::sync::Lazy;
use tracing::{debug, warn};
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{NoteError, NoteResult};

/// Lines of pdflatex output kept in a compile error
const LATEX_LOG_TAIL: usize = 20;

/// Bundled fonts, loaded once per process.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    fonts
});

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A Typst world for compiling one note: one main source, bundled fonts and
/// read-only access to files below `root`.
pub struct NoteWorld {
    /// The main source document
    main: Source,
    /// Directory that relative file paths resolve against
    root: PathBuf,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl NoteWorld {
    pub fn new(source: String, root: impl Into<PathBuf>) -> Self {
        let main_id = FileId::new(None, VirtualPath::new("main.typ"));
        NoteWorld {
            main: Source::new(main_id, source),
            root: root.into(),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }

    /// Filesystem path of a file id
    fn resolve(&self, id: FileId) -> FileResult<PathBuf> {
        if id.package().is_some() {
            return Err(FileError::NotFound(id.vpath().as_rootless_path().into()));
        }
        id.vpath()
            .resolve(&self.root)
            .ok_or(FileError::AccessDenied)
    }
}

impl World for NoteWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            let path = self.resolve(id)?;
            let text = fs::read_to_string(&path).map_err(|e| FileError::from_io(e, &path))?;
            Ok(Source::new(id, text))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = self.resolve(id)?;
        let data = fs::read(&path).map_err(|e| FileError::from_io(e, &path))?;
        Ok(Bytes::new(data))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile Typst markup to PDF bytes.
///
/// # Arguments
///
/// * `source` - Complete Typst document
/// * `root` - Directory that relative paths in the document (images) resolve against
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(NoteError::CompileFailed)` - Typst reported errors
pub fn compile_typst(source: String, root: &Path) -> NoteResult<Vec<u8>> {
    let world = NoteWorld::new(source, root);
    let warned = typst::compile(&world);

    for warning in &warned.warnings {
        warn!(message = %warning.message, "typst warning");
    }

    let document = warned
        .output
        .map_err(|errors| NoteError::compile_failed("typst", join_diagnostics(&errors)))?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default())
        .map_err(|errors| NoteError::compile_failed("typst", join_diagnostics(&errors)))?;

    debug!(bytes = pdf_bytes.len(), "typst compilation finished");
    Ok(pdf_bytes)
}

fn join_diagnostics(errors: &[SourceDiagnostic]) -> String {
    errors
        .iter()
        .map(|e| e.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Compile a `.tex` file with the external `pdflatex`.
///
/// The PDF lands in `output_dir` under the source file's stem. The process
/// runs in `workdir` so relative image paths resolve the same way as for
/// the Typst engine.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the produced PDF
/// * `Err(NoteError::CompilerUnavailable)` - `pdflatex` could not be started
/// * `Err(NoteError::CompileFailed)` - `pdflatex` exited with an error
pub fn compile_latex(tex_path: &Path, output_dir: &Path, workdir: &Path) -> NoteResult<PathBuf> {
    let output = Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg("-output-directory")
        .arg(output_dir)
        .arg(tex_path)
        .current_dir(workdir)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NoteError::CompilerUnavailable {
                compiler: "pdflatex".to_string(),
                reason: "not found on PATH".to_string(),
            },
            _ => NoteError::CompilerUnavailable {
                compiler: "pdflatex".to_string(),
                reason: e.to_string(),
            },
        })?;

    if !output.status.success() {
        let log = String::from_utf8_lossy(&output.stdout);
        return Err(NoteError::compile_failed("pdflatex", log_tail(&log, LATEX_LOG_TAIL)));
    }

    let stem = tex_path
        .file_stem()
        .ok_or_else(|| NoteError::invalid_input("source", tex_path.display().to_string(), "No file name"))?;
    let pdf_path = output_dir.join(format!("{}.pdf", stem.to_string_lossy()));
    debug!(path = %pdf_path.display(), "pdflatex compilation finished");
    Ok(pdf_path)
}

/// Last `lines` non-empty lines of compiler output
fn log_tail(log: &str, lines: usize) -> String {
    let kept: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}
