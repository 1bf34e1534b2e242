//! LaTeX markup for the technical note, compiled with `pdflatex`.
//!
//! Diagrams use pgfplots: the coordinate list goes straight into an
//! `\addplot ... coordinates {...} \closedcycle;` inside a fixed axis.

use std::fmt::Write;

use crate::config::Engine;
use crate::document::{Figure, ResultsTable, TitleBlock};
use crate::plot::{Accent, Diagram};

use super::Renderer;

const PREAMBLE: &str = r"\documentclass[a4paper,11pt]{article}%
\usepackage[T1]{fontenc}%
\usepackage[utf8]{inputenc}%
\usepackage{lmodern}%
\usepackage{graphicx}%
\usepackage{fancyhdr}%
\usepackage{xcolor}%
\usepackage{tcolorbox}%
\usepackage{tikz}%
\usepackage{pgfplots}%
\usepackage[margin=0.7in,headheight=14pt]{geometry}%
%
\definecolor{darkslate}{HTML}{{{DARKSLATE}}}%
\definecolor{emerald}{HTML}{{{EMERALD}}}%
\pgfplotsset{compat=1.18}%
\pagestyle{fancy}%
\fancyhf{}%
\lhead{\footnotesize {{HEADER_LEFT}}}%
\rhead{\footnotesize \textit{{{HEADER_RIGHT}}}}%
\cfoot{\thepage}%
%
\begin{document}%
\normalsize%

\begin{tcolorbox}[colback=darkslate, colframe=darkslate, arc=0pt, outer arc=0pt, top=10pt, bottom=10pt]
    \centering \color{white} \Large \textbf{{{TITLE}}} \\
    \small \textit{{{SUBTITLE}}}
\end{tcolorbox}
\vspace{0.4cm}%
";

const DIAGRAM_TEMPLATE: &str = r"
\begin{center}
\begin{tikzpicture}
\begin{axis}[width=10cm, height=4.5cm, axis lines=middle,
    grid=major, grid style={dotted, darkslate!30},
    title=\textbf{\small {{TITLE}}}, title style={color={{ACCENT}}}]
\addplot[thick, {{ACCENT}}, fill={{ACCENT}}, fill opacity=0.1] coordinates {{{COORDS}}} \closedcycle;
\end{axis}
\end{tikzpicture}
\end{center}
";

/// Renders the note as a pdflatex document.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexRenderer;

impl Renderer for LatexRenderer {
    fn engine(&self) -> Engine {
        Engine::Latex
    }

    fn begin(&self, title: &TitleBlock, out: &mut String) {
        let header_left = match title.header_left.split_once(" | ") {
            Some((author, reference)) => {
                format!(r"\textbf{{{}}} | {}", escape_latex(author), escape_latex(reference))
            }
            None => format!(r"\textbf{{{}}}", escape_latex(&title.header_left)),
        };
        let preamble = PREAMBLE
            .replace("{{DARKSLATE}}", Accent::DarkSlate.hex())
            .replace("{{EMERALD}}", Accent::Emerald.hex())
            .replace("{{HEADER_LEFT}}", &header_left)
            .replace("{{HEADER_RIGHT}}", &escape_latex(&title.header_right))
            .replace("{{TITLE}}", &escape_latex(&title.title))
            .replace("{{SUBTITLE}}", &escape_latex(&title.subtitle));
        out.push_str(&preamble);
    }

    fn heading(&self, level: usize, text: &str, out: &mut String) {
        let command = match level {
            0 | 1 => "section",
            2 => "subsection",
            _ => "subsubsection",
        };
        let _ = write!(out, "\n\\{}{{{}}}%\n", command, escape_latex(text));
    }

    fn paragraph(&self, text: &str, out: &mut String) {
        out.push_str(&escape_latex(text));
        out.push_str("%\n");
    }

    fn spacing(&self, cm: f64, out: &mut String) {
        let _ = writeln!(out, "\\vspace{{{}cm}}%", cm);
    }

    fn figure(&self, figure: &Figure, out: &mut String) {
        out.push_str("\\begin{figure}[h!]%\n");
        out.push_str("\\centering%\n");
        if let Some(path) = &figure.image {
            let _ = writeln!(
                out,
                "\\includegraphics[width={}\\textwidth]{{{}}}%",
                figure.width,
                path.to_string_lossy()
            );
        }
        let _ = writeln!(out, "\\caption{{{}}}%", escape_latex(&figure.caption));
        out.push_str("\\end{figure}\n");
    }

    fn table(&self, table: &ResultsTable, out: &mut String) {
        out.push_str("{\\renewcommand{\\arraystretch}{1.4}%\n");
        out.push_str("\\begin{tabular}{c | c | c}%\n");
        let headers: Vec<String> = table
            .headers
            .iter()
            .map(|h| format!("\\color{{emerald}}\\textbf{{{}}}", escape_latex(h)))
            .collect();
        let _ = writeln!(out, "{}\\\\%", headers.join("&"));
        out.push_str("\\hline%\n");
        for row in &table.rows {
            let _ = writeln!(
                out,
                "{}&{}&{}\\\\%",
                escape_latex(&row.position),
                escape_latex(&row.shear),
                escape_latex(&row.moment)
            );
        }
        out.push_str("\\end{tabular}%\n");
        out.push_str("}%\n");
    }

    fn diagram(&self, diagram: &Diagram) -> String {
        DIAGRAM_TEMPLATE
            .replace("{{TITLE}}", &escape_latex(&diagram.style.title))
            .replace("{{ACCENT}}", diagram.style.accent.name())
            .replace("{{COORDS}}", &diagram.coordinates)
    }

    fn end(&self, out: &mut String) {
        out.push_str("\n\\end{document}\n");
    }
}

/// Escape LaTeX special characters in user-provided text
pub(crate) fn escape_latex(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => format!("\\{}", c),
            '~' => "\\textasciitilde{}".to_string(),
            '^' => "\\textasciicircum{}".to_string(),
            '\\' => "\\textbackslash{}".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Field, Row};

    fn rows() -> Vec<Row> {
        vec![
            Row::new(0.0, 0.0, 0.0),
            Row::new(2.0, -10.0, 15.0),
            Row::new(4.0, -10.0, 35.0),
            Row::new(6.0, 0.0, 50.0),
        ]
    }

    #[test]
    fn test_shear_plot() {
        let markup = LatexRenderer.diagram(&Diagram::from_rows(&rows(), Field::Shear));
        assert!(markup.contains(
            r"\addplot[thick, emerald, fill=emerald, fill opacity=0.1] coordinates {(0, 0) (2, -10) (4, -10) (6, 0) } \closedcycle;"
        ));
        assert!(markup.contains(r"title=\textbf{\small V-Distribution}, title style={color=emerald}"));
    }

    #[test]
    fn test_moment_plot() {
        let markup = LatexRenderer.diagram(&Diagram::from_rows(&rows(), Field::Moment));
        assert!(markup.contains(r"coordinates {(0, 0) (2, 15) (4, 35) (6, 50) } \closedcycle;"));
        assert!(markup.contains(r"\addplot[thick, darkslate, fill=darkslate"));
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("BENDING & SHEAR"), r"BENDING \& SHEAR");
        assert_eq!(escape_latex("50% of M_max"), r"50\% of M\_max");
        assert_eq!(escape_latex("a~b"), r"a\textasciitilde{}b");
    }

    #[test]
    fn test_preamble_header() {
        let title = TitleBlock {
            title: "T".to_string(),
            subtitle: "S".to_string(),
            header_left: "Jo Doe | 23BCE10136".to_string(),
            header_right: "Beam Analysis Tech Note".to_string(),
        };
        let mut out = String::new();
        LatexRenderer.begin(&title, &mut out);
        assert!(out.contains(r"\lhead{\footnotesize \textbf{Jo Doe} | 23BCE10136}"));
        assert!(out.contains(r"\rhead{\footnotesize \textit{Beam Analysis Tech Note}}"));
        assert!(out.contains(r"\definecolor{emerald}{HTML}{27AE60}"));
    }

    #[test]
    fn test_table_layout() {
        let table = ResultsTable::sampled(&rows(), 2);
        let mut out = String::new();
        LatexRenderer.table(&table, &mut out);
        assert!(out.contains(r"\color{emerald}\textbf{x (m)}&\color{emerald}\textbf{V (kN)}&\color{emerald}\textbf{M (kNm)}\\"));
        assert!(out.contains("0.00&0.0&0.0\\\\%\n4.00&-10.0&35.0\\\\%\n"));
        assert!(!out.contains("2.00&"));
    }
}
