//! Named color schemes for alignment residues.
//!
//! Each scheme maps uppercase residue characters to a display color; lookups
//! uppercase their input, and characters absent from the table fall back to
//! the scheme's default color.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Selectable scheme names. `maeditor` is the default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SchemeName {
    #[default]
    Maeditor,
    Lesk,
    Clustal,
}

impl SchemeName {
    pub fn scheme(self) -> &'static ColorScheme {
        match self {
            SchemeName::Maeditor => &MAEDITOR,
            SchemeName::Lesk => &LESK,
            SchemeName::Clustal => &CLUSTAL,
        }
    }
}

/// A character-to-color table with a fallback for everything else.
#[derive(Debug)]
pub struct ColorScheme {
    entries: &'static [(char, Color)],
    fallback: Color,
}

impl ColorScheme {
    /// Color for a residue character. Case-insensitive; unknown characters
    /// (gaps, ambiguity codes) get the fallback color.
    pub fn color_for(&self, ch: char) -> Color {
        let upper = ch.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }
}

const FALLBACK: Color = Color::Gray;

/// MAEditor-style residue colors.
const MAEDITOR_COLORS: [(char, Color); 20] = [
    ('A', Color::Rgb(144, 238, 144)), // lightgreen
    ('G', Color::Rgb(144, 238, 144)),
    ('C', Color::Rgb(0, 128, 0)), // green
    ('D', Color::Rgb(0, 100, 0)), // darkgreen
    ('E', Color::Rgb(0, 100, 0)),
    ('N', Color::Rgb(0, 100, 0)),
    ('Q', Color::Rgb(0, 100, 0)),
    ('I', Color::Rgb(65, 105, 225)), // royal blue
    ('L', Color::Rgb(65, 105, 225)),
    ('M', Color::Rgb(65, 105, 225)),
    ('V', Color::Rgb(65, 105, 225)),
    ('F', Color::Rgb(95, 158, 160)), // cadet blue
    ('W', Color::Rgb(95, 158, 160)),
    ('Y', Color::Rgb(95, 158, 160)),
    ('H', Color::Rgb(0, 0, 139)),     // darkblue
    ('K', Color::Rgb(255, 165, 0)),   // orange
    ('R', Color::Rgb(255, 165, 0)),
    ('P', Color::Rgb(255, 192, 203)), // pink
    ('S', Color::Rgb(255, 0, 0)),     // red
    ('T', Color::Rgb(255, 0, 0)),
];

/// Lesk's five-group scheme by chemical class.
const LESK_COLORS: [(char, Color); 20] = [
    // Small nonpolar
    ('A', Color::Rgb(255, 165, 0)), // orange
    ('G', Color::Rgb(255, 165, 0)),
    ('S', Color::Rgb(255, 165, 0)),
    ('T', Color::Rgb(255, 165, 0)),
    // Hydrophobic
    ('C', Color::Rgb(0, 128, 0)), // green
    ('V', Color::Rgb(0, 128, 0)),
    ('I', Color::Rgb(0, 128, 0)),
    ('L', Color::Rgb(0, 128, 0)),
    ('P', Color::Rgb(0, 128, 0)),
    ('F', Color::Rgb(0, 128, 0)),
    ('Y', Color::Rgb(0, 128, 0)),
    ('M', Color::Rgb(0, 128, 0)),
    ('W', Color::Rgb(0, 128, 0)),
    // Polar
    ('N', Color::Rgb(255, 0, 255)), // magenta
    ('Q', Color::Rgb(255, 0, 255)),
    ('H', Color::Rgb(255, 0, 255)),
    // Charged negative
    ('D', Color::Rgb(255, 0, 0)), // red
    ('E', Color::Rgb(255, 0, 0)),
    // Charged positive
    ('K', Color::Rgb(0, 0, 255)), // blue
    ('R', Color::Rgb(0, 0, 255)),
];

/// ClustalX-style coloring.
const CLUSTAL_COLORS: [(char, Color); 20] = [
    // Hydrophobic
    ('A', Color::Rgb(128, 160, 240)), // blue
    ('I', Color::Rgb(128, 160, 240)),
    ('L', Color::Rgb(128, 160, 240)),
    ('M', Color::Rgb(128, 160, 240)),
    ('F', Color::Rgb(128, 160, 240)),
    ('W', Color::Rgb(128, 160, 240)),
    ('V', Color::Rgb(128, 160, 240)),
    // Positive
    ('K', Color::Rgb(240, 21, 5)), // red
    ('R', Color::Rgb(240, 21, 5)),
    // Negative
    ('E', Color::Rgb(192, 72, 192)), // magenta
    ('D', Color::Rgb(192, 72, 192)),
    // Polar
    ('N', Color::Rgb(21, 192, 21)), // green
    ('Q', Color::Rgb(21, 192, 21)),
    ('S', Color::Rgb(21, 192, 21)),
    ('T', Color::Rgb(21, 192, 21)),
    // Special residues
    ('C', Color::Rgb(240, 128, 128)), // pink
    ('G', Color::Rgb(240, 144, 72)),  // orange
    ('P', Color::Rgb(192, 192, 0)),   // yellow
    ('H', Color::Rgb(21, 164, 164)),  // cyan
    ('Y', Color::Rgb(21, 164, 164)),
];

pub static MAEDITOR: ColorScheme = ColorScheme {
    entries: &MAEDITOR_COLORS,
    fallback: FALLBACK,
};

pub static LESK: ColorScheme = ColorScheme {
    entries: &LESK_COLORS,
    fallback: FALLBACK,
};

pub static CLUSTAL: ColorScheme = ColorScheme {
    entries: &CLUSTAL_COLORS,
    fallback: FALLBACK,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let scheme = SchemeName::Maeditor.scheme();
        assert_eq!(scheme.color_for('m'), scheme.color_for('M'));
        assert_ne!(scheme.color_for('M'), scheme.fallback());
    }

    #[test]
    fn test_unknown_characters_fall_back() {
        let scheme = SchemeName::Lesk.scheme();
        assert_eq!(scheme.color_for('-'), scheme.fallback());
        assert_eq!(scheme.color_for('.'), scheme.fallback());
        assert_eq!(scheme.color_for('X'), scheme.fallback());
    }

    #[test]
    fn test_every_scheme_covers_all_amino_acids() {
        for name in SchemeName::iter() {
            let scheme = name.scheme();
            for aa in "ACDEFGHIKLMNPQRSTVWY".chars() {
                assert_ne!(
                    scheme.color_for(aa),
                    scheme.fallback(),
                    "{name} missing entry for {aa}"
                );
            }
        }
    }

    #[test]
    fn test_scheme_names_round_trip() {
        assert_eq!(SchemeName::from_str("maeditor"), Ok(SchemeName::Maeditor));
        assert_eq!(SchemeName::from_str("CLUSTAL"), Ok(SchemeName::Clustal));
        assert!(SchemeName::from_str("nope").is_err());
        assert_eq!(SchemeName::Lesk.to_string(), "lesk");
        assert_eq!(SchemeName::default(), SchemeName::Maeditor);
    }
}
