//! # Envelope Plot Coordinates
//!
//! Turns the full row sequence into the coordinate list of one stress
//! envelope. Values are substituted as-is: no scaling, smoothing or
//! interpolation. Each renderer wraps the coordinate list in its own
//! diagram template.
//!
//! ## Example
//!
//! ```rust
//! use beamnote_core::data::{BeamData, Field, Row};
//! use beamnote_core::plot::coordinates;
//!
//! let data = BeamData::new(vec![Row::new(0.0, 0.0, 0.0), Row::new(2.0, -10.0, 15.0)]);
//! assert_eq!(coordinates(data.rows(), Field::Shear), "(0, 0) (2, -10) ");
//! ```

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::data::{Field, Row};

/// Accent colours of the note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accent {
    /// Banner and moment diagram colour
    DarkSlate,
    /// Table header and shear diagram colour
    Emerald,
}

impl Accent {
    /// Colour name as defined in the document preamble
    pub fn name(&self) -> &'static str {
        match self {
            Accent::DarkSlate => "darkslate",
            Accent::Emerald => "emerald",
        }
    }

    /// RGB hex code without the leading `#`
    pub fn hex(&self) -> &'static str {
        match self {
            Accent::DarkSlate => "2C3E50",
            Accent::Emerald => "27AE60",
        }
    }
}

/// Cosmetic parameters of one diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramStyle {
    pub accent: Accent,
    pub title: String,
}

impl DiagramStyle {
    /// Standard style for a field
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Shear => DiagramStyle {
                accent: Accent::Emerald,
                title: "V-Distribution".to_string(),
            },
            Field::Moment => DiagramStyle {
                accent: Accent::DarkSlate,
                title: "M-Distribution".to_string(),
            },
        }
    }
}

/// One stress-envelope diagram, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub field: Field,
    /// Space-separated `(position, value)` pairs, see [`coordinates`]
    pub coordinates: String,
    pub style: DiagramStyle,
}

impl Diagram {
    /// Build the diagram of `field` over every row, in row order.
    pub fn from_rows(rows: &[Row], field: Field) -> Self {
        Diagram {
            field,
            coordinates: coordinates(rows, field),
            style: DiagramStyle::for_field(field),
        }
    }
}

/// Format every row as `"(position, value) "` and concatenate them.
///
/// Numbers use the shortest round-trip `Display` form, so `2.0` becomes `2`
/// and `-10.5` stays `-10.5`. N rows give exactly N pairs, each followed by
/// a single space.
pub fn coordinates(rows: &[Row], field: Field) -> String {
    let mut out = String::with_capacity(rows.len() * 16);
    for row in rows {
        // Writing to a String cannot fail
        let _ = write!(out, "({}, {}) ", row.position, row.value(field));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::new(0.0, 0.0, 0.0),
            Row::new(2.0, -10.0, 15.0),
            Row::new(4.0, -10.0, 35.0),
            Row::new(6.0, 0.0, 50.0),
        ]
    }

    #[test]
    fn test_shear_coordinates() {
        assert_eq!(
            coordinates(&sample_rows(), Field::Shear),
            "(0, 0) (2, -10) (4, -10) (6, 0) "
        );
    }

    #[test]
    fn test_moment_coordinates() {
        assert_eq!(
            coordinates(&sample_rows(), Field::Moment),
            "(0, 0) (2, 15) (4, 35) (6, 50) "
        );
    }

    #[test]
    fn test_fractional_values_untouched() {
        let rows = vec![Row::new(0.25, -12.125, 3.5)];
        assert_eq!(coordinates(&rows, Field::Shear), "(0.25, -12.125) ");
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(coordinates(&[], Field::Moment), "");
    }

    #[test]
    fn test_diagram_styles() {
        let shear = Diagram::from_rows(&sample_rows(), Field::Shear);
        assert_eq!(shear.style.accent, Accent::Emerald);
        assert_eq!(shear.style.title, "V-Distribution");

        let moment = DiagramStyle::for_field(Field::Moment);
        assert_eq!(moment.accent.name(), "darkslate");
        assert_eq!(moment.accent.hex(), "2C3E50");
    }
}
