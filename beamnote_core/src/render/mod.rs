//! # Markup Rendering
//!
//! Serializes a [`ReportDocument`] into the source language of a typesetting
//! engine. The tree walk is shared; each engine supplies how a heading,
//! paragraph, figure, table or diagram is written.
//!
//! Rendering is a pure function of the document: the same document always
//! produces byte-identical markup.
//!
//! ## Example
//!
//! ```rust
//! use beamnote_core::config::{Engine, NoteConfig};
//! use beamnote_core::data::{BeamData, Row};
//! use beamnote_core::document::assemble;
//! use beamnote_core::render::render;
//!
//! let data = BeamData::new(vec![Row::new(0.0, 0.0, 0.0), Row::new(2.0, -10.0, 15.0)]);
//! let doc = assemble(&data, &NoteConfig::default(), false);
//! let markup = render(&doc, Engine::Latex);
//! assert!(markup.contains(r"\closedcycle"));
//! ```

pub mod latex;
pub mod typst;

use crate::config::Engine;
use crate::document::{Block, Figure, ReportDocument, ResultsTable, Section, TitleBlock};
use crate::plot::Diagram;

pub use self::latex::LatexRenderer;
pub use self::typst::TypstRenderer;

/// Writes document elements in one markup language.
pub trait Renderer {
    /// Engine this renderer targets
    fn engine(&self) -> Engine;

    /// Preamble, page style and title banner
    fn begin(&self, title: &TitleBlock, out: &mut String);

    /// Section heading; level 1 is a section, 2 a subsection
    fn heading(&self, level: usize, text: &str, out: &mut String);

    fn paragraph(&self, text: &str, out: &mut String);

    /// Vertical space in centimetres
    fn spacing(&self, cm: f64, out: &mut String);

    fn figure(&self, figure: &Figure, out: &mut String);

    fn table(&self, table: &ResultsTable, out: &mut String);

    /// Fixed diagram template with the coordinate list substituted
    fn diagram(&self, diagram: &Diagram) -> String;

    /// Document closing
    fn end(&self, out: &mut String);

    /// Render the whole document.
    fn render(&self, doc: &ReportDocument) -> String {
        let mut out = String::new();
        self.begin(&doc.title, &mut out);
        for section in &doc.sections {
            self.section(section, 1, &mut out);
        }
        self.end(&mut out);
        out
    }

    /// Render one section and its subsections.
    fn section(&self, section: &Section, level: usize, out: &mut String) {
        self.heading(level, &section.heading, out);
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => self.paragraph(text, out),
                Block::Spacing(cm) => self.spacing(*cm, out),
                Block::Figure(figure) => self.figure(figure, out),
                Block::Table(table) => self.table(table, out),
                Block::Diagram(diagram) => out.push_str(&self.diagram(diagram)),
            }
        }
        for sub in &section.subsections {
            self.section(sub, level + 1, out);
        }
    }
}

/// Renderer for an engine
pub fn renderer_for(engine: Engine) -> Box<dyn Renderer> {
    match engine {
        Engine::Typst => Box::new(TypstRenderer),
        Engine::Latex => Box::new(LatexRenderer),
    }
}

/// Render a document for an engine
pub fn render(doc: &ReportDocument, engine: Engine) -> String {
    renderer_for(engine).render(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoteConfig;
    use crate::data::{BeamData, Row};
    use crate::document::assemble;

    fn sample_doc(image_present: bool) -> ReportDocument {
        let data = BeamData::new(vec![
            Row::new(0.0, 0.0, 0.0),
            Row::new(2.0, -10.0, 15.0),
            Row::new(4.0, -10.0, 35.0),
            Row::new(6.0, 0.0, 50.0),
        ]);
        assemble(&data, &NoteConfig::default(), image_present)
    }

    #[test]
    fn test_rendering_is_deterministic() {
        for engine in [Engine::Typst, Engine::Latex] {
            let first = render(&sample_doc(true), engine);
            let second = render(&sample_doc(true), engine);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_renderer_for_engine() {
        assert_eq!(renderer_for(Engine::Typst).engine(), Engine::Typst);
        assert_eq!(renderer_for(Engine::Latex).engine(), Engine::Latex);
    }

    #[test]
    fn test_no_image_reference_without_image() {
        let typst = render(&sample_doc(false), Engine::Typst);
        assert!(!typst.contains("image("));
        assert!(typst.contains("Schematic Load Diagram"));

        let latex = render(&sample_doc(false), Engine::Latex);
        assert!(!latex.contains(r"\includegraphics"));
        assert!(latex.contains(r"\caption{Schematic Load Diagram}"));
    }

    #[test]
    fn test_image_reference_with_image() {
        assert!(render(&sample_doc(true), Engine::Typst).contains(r#"image("beam.png", width: 55%)"#));
        assert!(render(&sample_doc(true), Engine::Latex)
            .contains(r"\includegraphics[width=0.55\textwidth]{beam.png}"));
    }

    #[test]
    fn test_sections_in_order() {
        let latex = render(&sample_doc(false), Engine::Latex);
        let framework = latex.find(r"\section{Analytical Framework}").unwrap();
        let geometry = latex.find(r"\subsection{System Geometry}").unwrap();
        let matrix = latex.find(r"\section{Computation Matrix}").unwrap();
        let shear = latex.find(r"\subsection{Shear Force (V) Diagram}").unwrap();
        let moment = latex.find(r"\subsection{Bending Moment (M) Diagram}").unwrap();
        assert!(framework < geometry && geometry < matrix && matrix < shear && shear < moment);
    }
}
