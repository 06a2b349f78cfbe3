//! Vim-style input handling, plus mouse clicks on the tree panel.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Mode};
use crate::tree;
use crate::ui::Panes;

/// Handle a key event.
pub fn handle_key(app: &mut App, key: KeyEvent, page_size: usize) {
    // Close help overlay on any keypress
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key, page_size),
        Mode::Command => handle_command_mode(app, key),
    }
}

/// Handle keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent, page_size: usize) {
    app.clear_status();

    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }

        // Movement
        (KeyModifiers::NONE, KeyCode::Char('h') | KeyCode::Left) => {
            app.scroll_cols(-1);
        }
        (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
            app.scroll_rows(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
            app.scroll_rows(-1);
        }
        (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => {
            app.scroll_cols(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('0') | KeyCode::Home) => {
            app.scroll_col = 0;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('$')) | (_, KeyCode::End) => {
            app.scroll_cols(isize::MAX / 2);
        }
        (KeyModifiers::NONE, KeyCode::Char('g')) => {
            app.scroll_to_top();
        }
        (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
            app.scroll_to_bottom(page_size);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('f')) | (_, KeyCode::PageDown) => {
            app.scroll_rows(page_size as isize);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('b')) | (_, KeyCode::PageUp) => {
            app.scroll_rows(-(page_size as isize));
        }

        // Zoom
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('+' | '=')) => {
            app.zoom_in();
        }
        (KeyModifiers::NONE, KeyCode::Char('-')) => {
            app.zoom_out();
        }

        // Expand everything
        (KeyModifiers::SHIFT, KeyCode::Char('E')) => {
            app.expand_all();
        }

        // Command mode
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(':')) => {
            app.enter_command_mode();
        }

        // Help (some terminals send ? without SHIFT modifier)
        (KeyModifiers::SHIFT | KeyModifiers::NONE, KeyCode::Char('?')) => {
            app.show_help = true;
        }

        _ => {}
    }
}

/// Handle keys in command mode.
fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.exit_command_mode();
        }
        KeyCode::Enter => {
            app.execute_command();
        }
        KeyCode::Backspace => {
            app.command_buffer.pop();
            if app.command_buffer.is_empty() {
                app.exit_command_mode();
            }
        }
        KeyCode::Char(c) => {
            app.command_buffer.push(c);
        }
        _ => {}
    }
}

/// Handle a mouse event. Left clicks inside the tree panel are mapped back
/// into layout pixel space and hit-tested against node handles; the wheel
/// scrolls rows anywhere.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, panes: &Panes) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let tree = panes.tree;
            if mouse.column >= tree.x
                && mouse.column < tree.x + tree.width
                && mouse.row >= tree.y
                && mouse.row < tree.y + tree.height
            {
                handle_tree_click(
                    app,
                    mouse.column - tree.x,
                    mouse.row - tree.y,
                    tree.width,
                );
            }
        }
        MouseEventKind::ScrollUp => app.scroll_rows(-1),
        MouseEventKind::ScrollDown => app.scroll_rows(1),
        _ => {}
    }
}

fn handle_tree_click(app: &mut App, local_col: u16, local_row: u16, pane_width: u16) {
    let (Some(t), Some(layout)) = (&app.tree, &app.layout) else {
        return;
    };
    if pane_width == 0 {
        return;
    }

    // Map the cell back to the center of the pixel span it represents.
    let x_px = (local_col as f64 + 0.5) * app.config.tree_width / pane_width as f64;
    let y_px = (app.scroll_row + local_row as usize) as f64 * app.config.row_height
        + app.config.row_height / 2.0;

    // Terminal cells are chunky, so accept any click within the row band
    // around the handle even when the configured radius is smaller.
    let radius = app.config.node_handle_radius.max(app.config.row_height / 2.0);

    if let Some(node) = tree::hit_test(t, layout, radius, x_px, y_px) {
        let node = node.to_string();
        app.toggle_collapse(&node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_q_quits() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Char('q')), 10);
        assert!(app.should_quit);
    }

    #[test]
    fn test_colon_enters_command_mode() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Char(':')), 10);
        assert_eq!(app.mode, Mode::Command);

        handle_key(&mut app, key(KeyCode::Char('q')), 10);
        assert_eq!(app.command_buffer, "q");

        handle_key(&mut app, key(KeyCode::Enter), 10);
        assert!(app.should_quit);
    }

    #[test]
    fn test_backspace_on_empty_buffer_exits_command_mode() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Char(':')), 10);
        handle_key(&mut app, key(KeyCode::Char('x')), 10);
        handle_key(&mut app, key(KeyCode::Backspace), 10);
        handle_key(&mut app, key(KeyCode::Backspace), 10);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_help_toggles_and_any_key_closes() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Char('?')), 10);
        assert!(app.show_help);
        handle_key(&mut app, key(KeyCode::Char('j')), 10);
        assert!(!app.show_help);
        assert_eq!(app.scroll_row, 0, "closing help swallows the key");
    }

    #[test]
    fn test_zoom_keys() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Char('+')), 10);
        assert_eq!(app.zoom, 2);
        handle_key(&mut app, key(KeyCode::Char('-')), 10);
        assert_eq!(app.zoom, 1);
        handle_key(&mut app, key(KeyCode::Char('-')), 10);
        assert_eq!(app.zoom, 1, "zoom never drops below one cell");
    }
}
