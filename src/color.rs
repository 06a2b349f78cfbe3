//! Residue color schemes and config color parsing.

pub mod rgb;
pub mod schemes;

pub use rgb::Rgb;
pub use schemes::{ColorScheme, SchemeName};
