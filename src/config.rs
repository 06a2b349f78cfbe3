//! Configuration file handling for treealign.
//!
//! Loads settings from `~/.config/treealign/treealign.toml` or
//! `./treealign.toml`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, SchemeName};
use crate::tree::{LayoutParams, TreeStyle};

/// Application configuration loaded from treealign.toml. All fields have
/// defaults, so a partial file only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vertical pixel span of one visible row.
    pub row_height: f64,
    /// Tree panel width in pixels.
    pub tree_width: f64,
    /// Species-name column width in pixels.
    pub name_width: f64,
    /// Radius of clickable node handles.
    pub node_handle_radius: f64,
    /// Branch stroke width.
    pub stroke_width: f64,
    /// Dash pattern (on, off) for collapsed-row connectors, in pixels.
    pub row_connector_dash: (f64, f64),
    /// Branch color override; unset picks black or white from the terminal
    /// theme.
    pub branch_color: Option<Rgb>,
    /// Handle fill for expanded internal nodes.
    pub node_handle_fill: Rgb,
    /// Handle fill for collapsed nodes.
    pub collapsed_node_handle_fill: Rgb,
    /// Initial color scheme.
    pub color_scheme: SchemeName,
    /// Initial zoom: terminal cells per alignment column.
    pub zoom: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            tree_width: 200.0,
            name_width: 200.0,
            node_handle_radius: 4.0,
            stroke_width: 1.0,
            row_connector_dash: (2.0, 2.0),
            branch_color: None,
            node_handle_fill: Rgb::new(255, 255, 255),
            collapsed_node_handle_fill: Rgb::new(100, 100, 100),
            color_scheme: SchemeName::Maeditor,
            zoom: 1,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found.
    ///
    /// Search order:
    /// 1. `./treealign.toml` (current directory)
    /// 2. `~/.config/treealign/treealign.toml` (XDG config)
    ///
    /// Returns `(config, was_file_loaded)` tuple.
    pub fn load() -> (Self, bool) {
        if let Some(config) = Self::load_from_path(&PathBuf::from("treealign.toml")) {
            return (config, true);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("treealign").join("treealign.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return (config, true);
            }
        }

        (Self::default(), false)
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Geometry inputs for a layout pass.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            generic_row_height: self.row_height,
            tree_width: self.tree_width,
            node_handle_radius: self.node_handle_radius,
            stroke_width: self.stroke_width,
        }
    }

    /// Style inputs for the tree drawing program.
    pub fn tree_style(&self) -> TreeStyle {
        TreeStyle {
            node_handle_radius: self.node_handle_radius,
            tree_width: self.tree_width,
        }
    }
}
