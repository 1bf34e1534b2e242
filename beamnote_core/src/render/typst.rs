//! Typst markup for the technical note.
//!
//! The preamble defines an `envelope` function that parses the coordinate
//! list, scales it into a fixed 10cm x 4.5cm box and closes it against the
//! position axis as a filled polygon. Each diagram is then a single call.

use std::fmt::Write;

use crate::config::Engine;
use crate::document::{Figure, ResultsTable, TitleBlock};
use crate::plot::{Accent, Diagram};

use super::Renderer;

/// Page setup, palette and the envelope plotting function.
const PREAMBLE: &str = r##"#set page(
  paper: "a4",
  margin: 0.7in,
  header: [
    #set text(size: 8pt)
    #grid(
      columns: (1fr, 1fr),
      align(left, {{HEADER_LEFT}}),
      align(right, emph({{HEADER_RIGHT}})),
    )
  ],
  footer: context align(center, text(size: 9pt, counter(page).display())),
)

#set text(font: "New Computer Modern", size: 11pt)
#set heading(numbering: "1.1")
#show heading: set block(above: 1.2em, below: 0.8em)

#let darkslate = rgb("#{{DARKSLATE}}")
#let emerald = rgb("#{{EMERALD}}")

#let envelope(coords, accent, title) = {
  let pts = coords
    .matches(regex("[(]([^,()]+), ([^,()]+)[)]"))
    .map(m => (float(m.captures.at(0)), float(m.captures.at(1))))
  let w = 10cm
  let h = 4.5cm
  let xs = pts.map(p => p.at(0))
  let ys = pts.map(p => p.at(1)) + (0.0,)
  let x0 = calc.min(0.0, ..xs)
  let x1 = calc.max(0.0, ..xs)
  let y0 = calc.min(..ys)
  let y1 = calc.max(..ys)
  let sx = if x1 > x0 { w / (x1 - x0) } else { 0cm }
  let sy = if y1 > y0 { h / (y1 - y0) } else { 0cm }
  let px(x) = (x - x0) * sx
  let py(y) = h - (y - y0) * sy
  let grid-stroke = (paint: darkslate.transparentize(70%), thickness: 0.4pt, dash: "dotted")
  let region = if pts.len() > 0 {
    ((px(pts.first().at(0)), py(0.0)),) + pts.map(p => (px(p.at(0)), py(p.at(1)))) + ((px(pts.last().at(0)), py(0.0)),)
  } else {
    ()
  }

  align(center, stack(
    spacing: 6pt,
    text(size: 9pt, weight: "bold", fill: accent, title),
    box(width: w, height: h, {
      for i in range(1, 4) {
        place(top + left, line(start: (0pt, h * i / 4), end: (w, h * i / 4), stroke: grid-stroke))
        place(top + left, line(start: (w * i / 4, 0pt), end: (w * i / 4, h), stroke: grid-stroke))
      }
      if region.len() > 0 {
        place(top + left, polygon(fill: accent.transparentize(90%), stroke: 1pt + accent, ..region))
      }
      place(top + left, line(start: (0pt, py(0.0)), end: (w, py(0.0)), stroke: 0.6pt + black))
      place(top + left, line(start: (px(0.0), 0pt), end: (px(0.0), h), stroke: 0.6pt + black))
    }),
  ))
}

#block(width: 100%, fill: darkslate, inset: (x: 12pt, y: 10pt))[
  #set align(center)
  #text(fill: white, size: 14pt, weight: "bold", {{TITLE}}) \
  #text(fill: white, size: 9pt, style: "italic", {{SUBTITLE}})
]
#v(0.4cm)
"##;

/// Renders the note as Typst markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypstRenderer;

impl Renderer for TypstRenderer {
    fn engine(&self) -> Engine {
        Engine::Typst
    }

    fn begin(&self, title: &TitleBlock, out: &mut String) {
        // Only the author is bold; the reference after the separator is not.
        let header_left = match title.header_left.split_once(" | ") {
            Some((author, reference)) => {
                format!("strong({}) + {}", literal(author), literal(&format!(" | {}", reference)))
            }
            None => format!("strong({})", literal(&title.header_left)),
        };
        let preamble = PREAMBLE
            .replace("{{HEADER_LEFT}}", &header_left)
            .replace("{{HEADER_RIGHT}}", &literal(&title.header_right))
            .replace("{{DARKSLATE}}", Accent::DarkSlate.hex())
            .replace("{{EMERALD}}", Accent::Emerald.hex())
            .replace("{{TITLE}}", &literal(&title.title))
            .replace("{{SUBTITLE}}", &literal(&title.subtitle));
        out.push_str(&preamble);
    }

    fn heading(&self, level: usize, text: &str, out: &mut String) {
        let _ = write!(out, "\n{} {}\n\n", "=".repeat(level.max(1)), inline(text));
    }

    fn paragraph(&self, text: &str, out: &mut String) {
        out.push_str(&inline(text));
        out.push_str("\n\n");
    }

    fn spacing(&self, cm: f64, out: &mut String) {
        let _ = writeln!(out, "#v({}cm)", cm);
    }

    fn figure(&self, figure: &Figure, out: &mut String) {
        let body = match &figure.image {
            Some(path) => format!(
                "image(\"{}\", width: {:.0}%)",
                escape_string(&path.to_string_lossy()),
                figure.width * 100.0
            ),
            None => "[]".to_string(),
        };
        let _ = write!(
            out,
            "#figure(\n  {},\n  caption: {},\n)\n\n",
            body,
            literal(&figure.caption)
        );
    }

    fn table(&self, table: &ResultsTable, out: &mut String) {
        out.push_str("#align(center, table(\n");
        out.push_str("  columns: 3,\n");
        out.push_str("  align: center,\n");
        out.push_str("  inset: (x: 12pt, y: 5pt),\n");
        out.push_str("  stroke: (x, y) => (\n");
        out.push_str("    left: if x > 0 { 0.5pt } else { none },\n");
        out.push_str("    bottom: if y == 0 { 0.5pt } else { none },\n");
        out.push_str("  ),\n");
        out.push_str("  table.header(\n");
        for header in &table.headers {
            let _ = writeln!(
                out,
                "    text(fill: emerald, weight: \"bold\", {}),",
                literal(header)
            );
        }
        out.push_str("  ),\n");
        for row in &table.rows {
            let _ = writeln!(
                out,
                "  {}, {}, {},",
                literal(&row.position),
                literal(&row.shear),
                literal(&row.moment)
            );
        }
        out.push_str("))\n\n");
    }

    fn diagram(&self, diagram: &Diagram) -> String {
        format!(
            "#envelope(\"{}\", {}, \"{}\")\n\n",
            escape_string(&diagram.coordinates),
            diagram.style.accent.name(),
            escape_string(&diagram.style.title)
        )
    }

    fn end(&self, _out: &mut String) {}
}

/// User text as a Typst string literal, so no character of it is read as
/// markup (comments, list markers, emphasis).
fn literal(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// User text embedded in markup as a string expression
fn inline(s: &str) -> String {
    format!("#{}", literal(s))
}

/// Escape text for a Typst string literal
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Field, Row};
    use crate::document::TableRow;
    use std::path::PathBuf;

    fn rows() -> Vec<Row> {
        vec![
            Row::new(0.0, 0.0, 0.0),
            Row::new(2.0, -10.0, 15.0),
            Row::new(4.0, -10.0, 35.0),
            Row::new(6.0, 0.0, 50.0),
        ]
    }

    #[test]
    fn test_shear_diagram_call() {
        let diagram = Diagram::from_rows(&rows(), Field::Shear);
        assert_eq!(
            TypstRenderer.diagram(&diagram),
            "#envelope(\"(0, 0) (2, -10) (4, -10) (6, 0) \", emerald, \"V-Distribution\")\n\n"
        );
    }

    #[test]
    fn test_diagrams_differ_only_in_field_and_style() {
        let shear = TypstRenderer.diagram(&Diagram::from_rows(&rows(), Field::Shear));
        let moment = TypstRenderer.diagram(&Diagram::from_rows(&rows(), Field::Moment));
        assert!(moment.contains("(2, 15) (4, 35)"));
        assert!(moment.contains("darkslate, \"M-Distribution\""));
        assert_ne!(shear, moment);
    }

    #[test]
    fn test_user_text_is_a_string_literal() {
        assert_eq!(inline("L=12.0m"), "#\"L=12.0m\"");
        assert_eq!(inline("Spans: 6m // 6m"), "#\"Spans: 6m // 6m\"");
        assert_eq!(literal("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_paragraph_starting_with_list_marker() {
        let mut out = String::new();
        TypstRenderer.paragraph("+ Parameters: L=12.0m", &mut out);
        assert_eq!(out, "#\"+ Parameters: L=12.0m\"\n\n");
    }

    fn title_block(header_left: &str) -> TitleBlock {
        TitleBlock {
            title: "TECHNICAL NOTE".to_string(),
            subtitle: "Lab /* 2026".to_string(),
            header_left: header_left.to_string(),
            header_right: "Beam Analysis Tech Note".to_string(),
        }
    }

    #[test]
    fn test_header_bolds_only_author() {
        let mut out = String::new();
        TypstRenderer.begin(&title_block("R&D // Lab | BN-001"), &mut out);
        assert!(out.contains("align(left, strong(\"R&D // Lab\") + \" | BN-001\"),"));
        assert!(out.contains("align(right, emph(\"Beam Analysis Tech Note\")),"));
        assert!(out.contains("style: \"italic\", \"Lab /* 2026\")"));
    }

    #[test]
    fn test_header_without_reference() {
        let mut out = String::new();
        TypstRenderer.begin(&title_block("Jo Doe"), &mut out);
        assert!(out.contains("align(left, strong(\"Jo Doe\")),"));
    }

    #[test]
    fn test_table_rows() {
        let table = ResultsTable {
            headers: ["x (m)".to_string(), "V (kN)".to_string(), "M (kNm)".to_string()],
            rows: vec![TableRow::from_row(&Row::new(4.0, -10.0, 35.0))],
        };
        let mut out = String::new();
        TypstRenderer.table(&table, &mut out);
        assert!(out.contains("  \"4.00\", \"-10.0\", \"35.0\",\n"));
        assert!(out.contains("text(fill: emerald, weight: \"bold\", \"M (kNm)\"),"));
    }

    #[test]
    fn test_figure_path_is_string_escaped() {
        let figure = Figure {
            image: Some(PathBuf::from("my \"beam\".png")),
            caption: "Schematic Load Diagram".to_string(),
            width: 0.55,
        };
        let mut out = String::new();
        TypstRenderer.figure(&figure, &mut out);
        assert!(out.contains(r#"image("my \"beam\".png", width: 55%)"#));
    }
}
