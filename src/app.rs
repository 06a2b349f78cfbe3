//! Application state and command handling.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use crate::color::SchemeName;
use crate::config::Config;
use crate::dataset::{self, RowData};
use crate::tree::{self, CollapseState, Layout, Tree};

/// Input mode (vim-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
        }
    }
}

/// Terminal background theme, detected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalTheme {
    Light,
    #[default]
    Dark,
}

/// Maximum terminal cells per alignment column.
pub const MAX_ZOOM: u16 = 8;

/// Main application state.
pub struct App {
    /// Loaded tree, if any.
    pub tree: Option<Tree>,
    /// Alignment rows keyed by node name.
    pub row_data: RowData,
    /// Names that have alignment data (presence set for the layout pass).
    pub presence: HashSet<String>,
    /// Current layout, recomputed on every collapse change.
    pub layout: Option<Layout>,
    /// Per-node collapse flags.
    pub collapsed: CollapseState,
    /// Path of the loaded dataset.
    pub file_path: Option<PathBuf>,
    /// Active color scheme.
    pub scheme: SchemeName,
    /// Terminal cells per alignment column.
    pub zoom: u16,
    /// First visible layout row in the viewport.
    pub scroll_row: usize,
    /// First visible alignment column in the viewport.
    pub scroll_col: usize,
    pub mode: Mode,
    pub command_buffer: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub show_help: bool,
    pub terminal_theme: TerminalTheme,
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            tree: None,
            row_data: RowData::new(),
            presence: HashSet::new(),
            layout: None,
            collapsed: CollapseState::new(),
            file_path: None,
            scheme: config.color_scheme,
            zoom: config.zoom.clamp(1, MAX_ZOOM),
            scroll_row: 0,
            scroll_col: 0,
            mode: Mode::Normal,
            command_buffer: String::new(),
            status_message: None,
            should_quit: false,
            show_help: false,
            terminal_theme: TerminalTheme::default(),
            config,
        }
    }

    /// Load a dataset from file. On any error the previous state is kept
    /// and the error reported in the status line.
    pub fn load_file(&mut self, path: PathBuf) {
        let dataset = match dataset::load_file(&path) {
            Ok(dataset) => dataset,
            Err(e) => {
                self.set_status(format!("Error loading {}: {}", path.display(), e));
                return;
            }
        };

        let tree = match Tree::from_branches(dataset.root.clone(), &dataset.branches) {
            Ok(tree) => tree,
            Err(e) => {
                self.set_status(format!("Invalid tree in {}: {}", path.display(), e));
                return;
            }
        };

        let row_data = dataset.row_chars();
        let presence: HashSet<String> = row_data.keys().cloned().collect();
        let collapsed = CollapseState::new();

        let layout = match Layout::compute(
            &tree,
            &collapsed,
            &presence,
            &self.config.layout_params(),
        ) {
            Ok(layout) => layout,
            Err(e) => {
                self.set_status(format!("Layout failed for {}: {}", path.display(), e));
                return;
            }
        };

        self.tree = Some(tree);
        self.row_data = row_data;
        self.presence = presence;
        self.collapsed = collapsed;
        self.layout = Some(layout);
        self.scroll_row = 0;
        self.scroll_col = 0;
        self.set_status(format!("Loaded {}", path.display()));
        self.file_path = Some(path);
    }

    /// Recompute the layout from the current tree and collapse state.
    /// On failure the previous layout is kept.
    pub fn relayout(&mut self) {
        let Some(tree) = &self.tree else {
            return;
        };
        match Layout::compute(
            tree,
            &self.collapsed,
            &self.presence,
            &self.config.layout_params(),
        ) {
            Ok(layout) => {
                self.layout = Some(layout);
                self.clamp_scroll();
            }
            Err(e) => self.set_status(format!("Layout failed: {}", e)),
        }
    }

    /// Flip the collapse flag on an internal node and relayout.
    pub fn toggle_collapse(&mut self, node: &str) {
        let flag = !tree::is_collapsed(&self.collapsed, node);
        self.collapsed.insert(node.to_string(), flag);
        self.relayout();
        let verb = if flag { "Collapsed" } else { "Expanded" };
        self.set_status(format!("{} {}", verb, node));
    }

    /// Clear every collapse flag.
    pub fn expand_all(&mut self) {
        if self.collapsed.values().any(|&c| c) {
            self.collapsed.clear();
            self.relayout();
            self.set_status("Expanded all nodes".to_string());
        } else {
            self.set_status("Nothing collapsed".to_string());
        }
    }

    pub fn zoom_in(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom += 1;
            self.set_status(format!("Zoom: {} cells/column", self.zoom));
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom > 1 {
            self.zoom -= 1;
            self.set_status(format!("Zoom: {} cells/column", self.zoom));
        }
    }

    /// Number of visible rows in the current layout.
    pub fn num_rows(&self) -> usize {
        self.layout
            .as_ref()
            .map(|l| l.visible_row_count())
            .unwrap_or(0)
    }

    /// Widest alignment row, in columns.
    pub fn num_cols(&self) -> usize {
        self.row_data.values().map(|s| s.len()).max().unwrap_or(0)
    }

    pub fn scroll_rows(&mut self, delta: isize) {
        self.scroll_row = add_clamped(self.scroll_row, delta, self.num_rows());
    }

    pub fn scroll_cols(&mut self, delta: isize) {
        self.scroll_col = add_clamped(self.scroll_col, delta, self.num_cols());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_row = 0;
    }

    pub fn scroll_to_bottom(&mut self, viewport_rows: usize) {
        self.scroll_row = self.num_rows().saturating_sub(viewport_rows);
    }

    fn clamp_scroll(&mut self) {
        let max_row = self.num_rows().saturating_sub(1);
        if self.scroll_row > max_row {
            self.scroll_row = max_row;
        }
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
        self.clear_status();
    }

    pub fn exit_command_mode(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
    }

    /// Execute a `:` command from the command buffer.
    pub fn execute_command(&mut self) {
        let command = self.command_buffer.clone();
        self.exit_command_mode();

        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["q"] | ["q!"] | ["quit"] => {
                self.should_quit = true;
            }
            ["color"] | ["colour"] => {
                use strum::IntoEnumIterator;
                let names: Vec<String> = SchemeName::iter().map(|s| s.to_string()).collect();
                self.set_status(format!("Schemes: {}", names.join(", ")));
            }
            ["color", name] | ["colour", name] => match SchemeName::from_str(name) {
                Ok(scheme) => {
                    self.scheme = scheme;
                    self.set_status(format!("Color scheme: {}", scheme));
                }
                Err(_) => self.set_status(format!("Unknown color scheme: {}", name)),
            },
            ["zoom", n] => match n.parse::<u16>() {
                Ok(z) if (1..=MAX_ZOOM).contains(&z) => {
                    self.zoom = z;
                    self.set_status(format!("Zoom: {} cells/column", z));
                }
                _ => self.set_status(format!("Zoom must be 1-{}", MAX_ZOOM)),
            },
            ["expand"] => self.expand_all(),
            ["help"] => {
                self.show_help = true;
            }
            _ => self.set_status(format!("Unknown command: {}", command)),
        }
    }
}

fn add_clamped(value: usize, delta: isize, limit: usize) -> usize {
    let max = limit.saturating_sub(1);
    if delta >= 0 {
        (value + delta as usize).min(max)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}
