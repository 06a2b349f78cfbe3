//! Virtualized alignment grid.
//!
//! The grid never materializes cells: the windowing widget asks for exactly
//! the `(row, column)` cells inside its viewport via [`AlignmentGrid::cell_at`].
//! Rows follow the layout's visible-row order so the alignment stays pixel-
//! aligned with the tree panel.

use ratatui::style::Color;

use crate::color::ColorScheme;
use crate::dataset::RowData;
use crate::tree::Layout;

/// One rendered grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

struct GridRow<'a> {
    id: &'a str,
    seq: Option<&'a [char]>,
}

/// Read-only view over the alignment for one render pass.
pub struct AlignmentGrid<'a> {
    rows: Vec<GridRow<'a>>,
    scheme: &'a ColorScheme,
    /// Horizontal zoom: terminal cells per alignment column. Affects the
    /// widget's column placement only, never cell content or row order.
    col_width: u16,
}

impl<'a> AlignmentGrid<'a> {
    pub fn new(
        layout: &'a Layout,
        row_data: &'a RowData,
        scheme: &'a ColorScheme,
        col_width: u16,
    ) -> Self {
        let rows = layout
            .visible_rows()
            .map(|n| GridRow {
                id: n.id.as_str(),
                seq: row_data.get(n.id.as_str()).map(Vec::as_slice),
            })
            .collect();
        Self {
            rows,
            scheme,
            col_width: col_width.max(1),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Widest sequence across all rows. Rows of different lengths are
    /// expected during incremental loading; short rows read as blanks.
    pub fn num_cols(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| r.seq.map(<[char]>::len))
            .max()
            .unwrap_or(0)
    }

    pub fn col_width(&self) -> u16 {
        self.col_width
    }

    /// Node id labeling a row, or `None` for out-of-range rows.
    pub fn row_id(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r.id)
    }

    /// Whether a row carries alignment data (collapsed-summary rows do not).
    pub fn row_has_data(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.seq.is_some())
    }

    /// Character and color for a cell. Total: rows without data and columns
    /// past the end of a sequence yield a blank cell in the fallback color.
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        match self.rows.get(row).and_then(|r| r.seq).and_then(|s| s.get(col)) {
            Some(&ch) => Cell {
                ch,
                color: self.scheme.color_for(ch),
            },
            None => Cell {
                ch: ' ',
                color: self.scheme.fallback(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SchemeName;
    use crate::tree::{Branch, CollapseState, LayoutParams, Tree};
    use std::collections::HashSet;

    fn branch(parent: &str, child: &str, len: f64) -> Branch {
        Branch(parent.to_string(), child.to_string(), len)
    }

    fn fixture(collapsed: &CollapseState, row_data: &RowData) -> Layout {
        let tree =
            Tree::from_branches("R", &[branch("R", "A", 1.0), branch("R", "B", 2.0)]).unwrap();
        let presence: HashSet<String> = row_data.keys().cloned().collect();
        Layout::compute(&tree, collapsed, &presence, &LayoutParams::default()).unwrap()
    }

    fn row_data(rows: &[(&str, &str)]) -> RowData {
        rows.iter()
            .map(|(id, seq)| (id.to_string(), seq.chars().collect()))
            .collect()
    }

    #[test]
    fn test_cell_lookup_and_colors() {
        let data = row_data(&[("A", "MSTV"), ("B", "M-TV")]);
        let collapsed = CollapseState::new();
        let layout = fixture(&collapsed, &data);
        let scheme = SchemeName::Maeditor.scheme();
        let grid = AlignmentGrid::new(&layout, &data, scheme, 1);

        assert_eq!(grid.num_rows(), 2);
        assert_eq!(grid.num_cols(), 4);
        assert_eq!(grid.row_id(0), Some("A"));
        assert_eq!(grid.row_id(1), Some("B"));

        let cell = grid.cell_at(0, 0);
        assert_eq!(cell.ch, 'M');
        assert_eq!(cell.color, scheme.color_for('M'));

        // Gap characters keep their glyph but get the fallback color.
        let gap = grid.cell_at(1, 1);
        assert_eq!(gap.ch, '-');
        assert_eq!(gap.color, scheme.fallback());
    }

    #[test]
    fn test_rows_follow_visible_layout_order() {
        let data = row_data(&[("B", "KKKK"), ("A", "MMMM")]);
        let collapsed = CollapseState::new();
        let layout = fixture(&collapsed, &data);
        let grid = AlignmentGrid::new(&layout, &data, SchemeName::Maeditor.scheme(), 1);

        // Rank order places A before B regardless of map iteration order.
        assert_eq!(grid.row_id(0), Some("A"));
        assert_eq!(grid.cell_at(0, 0).ch, 'M');
        assert_eq!(grid.cell_at(1, 0).ch, 'K');
    }

    #[test]
    fn test_ragged_rows_read_as_blank() {
        let data = row_data(&[("A", "MSTV"), ("B", "MS")]);
        let collapsed = CollapseState::new();
        let layout = fixture(&collapsed, &data);
        let scheme = SchemeName::Maeditor.scheme();
        let grid = AlignmentGrid::new(&layout, &data, scheme, 1);

        assert_eq!(grid.num_cols(), 4);
        let cell = grid.cell_at(1, 3);
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.color, scheme.fallback());
        // Fully out of range is blank too, never a panic.
        assert_eq!(grid.cell_at(99, 99).ch, ' ');
    }

    #[test]
    fn test_collapsed_summary_row_is_blank() {
        let data = row_data(&[("A", "MSTV"), ("B", "M-TV")]);
        let mut collapsed = CollapseState::new();
        collapsed.insert("R".to_string(), true);
        let layout = fixture(&collapsed, &data);
        let grid = AlignmentGrid::new(&layout, &data, SchemeName::Maeditor.scheme(), 1);

        assert_eq!(grid.num_rows(), 1);
        assert_eq!(grid.row_id(0), Some("R"));
        assert!(!grid.row_has_data(0));
        assert_eq!(grid.cell_at(0, 0).ch, ' ');
    }

    #[test]
    fn test_zoom_does_not_change_cells() {
        let data = row_data(&[("A", "MSTV"), ("B", "M-TV")]);
        let collapsed = CollapseState::new();
        let layout = fixture(&collapsed, &data);
        let scheme = SchemeName::Maeditor.scheme();

        let narrow = AlignmentGrid::new(&layout, &data, scheme, 1);
        let wide = AlignmentGrid::new(&layout, &data, scheme, 4);
        for row in 0..2 {
            for col in 0..4 {
                assert_eq!(narrow.cell_at(row, col), wide.cell_at(row, col));
            }
        }
        assert_eq!(wide.col_width(), 4);
        // Zero zoom is clamped rather than producing an invisible column.
        assert_eq!(AlignmentGrid::new(&layout, &data, scheme, 0).col_width(), 1);
    }
}
