//! TUI rendering with ratatui.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as TuiLayout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Mode, TerminalTheme};
use crate::grid::AlignmentGrid;
use crate::tree::{self, Shape};

/// Horizontal pixels represented by one terminal cell. Rows map 1:1 to
/// visible layout rows, so the vertical scale is the configured row height.
const X_PX_PER_CELL: f64 = 8.0;

/// Screen regions of the three content panels. Shared with the input layer
/// so mouse coordinates map back into layout pixel space.
#[derive(Debug, Clone, Copy)]
pub struct Panes {
    pub tree: Rect,
    pub names: Rect,
    pub grid: Rect,
}

fn px_to_cells(px: f64) -> u16 {
    (px / X_PX_PER_CELL).round().max(1.0) as u16
}

/// Split the frame into tree, name, and alignment panels plus the two
/// bottom lines.
pub fn compute_panes(area: Rect, app: &App) -> Panes {
    let chunks = TuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Content panels
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command/message line
        ])
        .split(area);

    let columns = TuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(px_to_cells(app.config.tree_width)),
            Constraint::Length(px_to_cells(app.config.name_width)),
            Constraint::Min(1),
        ])
        .split(chunks[0]);

    Panes {
        tree: columns[0],
        names: columns[1],
        grid: columns[2],
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = TuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if app.tree.is_some() && app.layout.is_some() {
        let panes = compute_panes(frame.area(), app);
        render_tree_panel(frame, app, panes.tree);
        render_name_panel(frame, app, panes.names);
        render_grid_panel(frame, app, panes.grid);
    } else {
        render_splash(frame, chunks[0]);
    }

    render_status_bar(frame, app, chunks[1]);
    render_command_line(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn branch_color(app: &App) -> Color {
    match &app.config.branch_color {
        Some(rgb) => rgb.to_color(),
        None => match app.terminal_theme {
            TerminalTheme::Light => Color::Black,
            TerminalTheme::Dark => Color::White,
        },
    }
}

/// Draw a horizontal dashed line by segmenting it with the configured
/// on/off pattern.
fn draw_dashed(ctx: &mut Context, x0: f64, x1: f64, y: f64, dash: (f64, f64), color: Color) {
    let (on, off) = dash;
    if on <= 0.0 {
        ctx.draw(&CanvasLine {
            x1: x0,
            y1: y,
            x2: x1,
            y2: y,
            color,
        });
        return;
    }
    let mut x = x0;
    while x < x1 {
        let end = (x + on).min(x1);
        ctx.draw(&CanvasLine {
            x1: x,
            y1: y,
            x2: end,
            y2: y,
            color,
        });
        x = end + off.max(0.1);
    }
}

fn render_tree_panel(frame: &mut Frame, app: &App, area: Rect) {
    let (Some(t), Some(layout)) = (&app.tree, &app.layout) else {
        return;
    };
    if area.width == 0 || area.height == 0 {
        return;
    }

    let shapes = tree::draw_commands(t, layout, &app.collapsed, &app.config.tree_style());
    let stroke = branch_color(app);
    let handle_fill = app.config.node_handle_fill.to_color();
    let collapsed_fill = app.config.collapsed_node_handle_fill.to_color();
    let dash = app.config.row_connector_dash;

    // Vertical pixel window covered by the viewport. Canvas y grows upward,
    // layout y grows downward, so y is flipped at paint time.
    let top_px = app.scroll_row as f64 * app.config.row_height;
    let view_h = area.height as f64 * app.config.row_height;
    let flip = move |y: f64| view_h - (y - top_px);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, app.config.tree_width])
        .y_bounds([0.0, view_h])
        .paint(move |ctx| {
            for shape in &shapes {
                match *shape {
                    Shape::LeafTick { x, y, len } => {
                        ctx.draw(&CanvasLine {
                            x1: x,
                            y1: flip(y),
                            x2: x + len,
                            y2: flip(y),
                            color: stroke,
                        });
                    }
                    Shape::Elbow {
                        x,
                        y,
                        child_x,
                        child_y,
                    } => {
                        ctx.draw(&CanvasLine {
                            x1: x,
                            y1: flip(y),
                            x2: x,
                            y2: flip(child_y),
                            color: stroke,
                        });
                        ctx.draw(&CanvasLine {
                            x1: x,
                            y1: flip(child_y),
                            x2: child_x,
                            y2: flip(child_y),
                            color: stroke,
                        });
                    }
                    Shape::CollapsedRow { x, y, x_end } => {
                        draw_dashed(ctx, x, x_end, flip(y), dash, stroke);
                    }
                    Shape::Handle {
                        x,
                        y,
                        radius,
                        collapsed,
                    } => {
                        ctx.draw(&Circle {
                            x,
                            y: flip(y),
                            radius,
                            color: if collapsed { collapsed_fill } else { handle_fill },
                        });
                    }
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_name_panel(frame: &mut Frame, app: &App, area: Rect) {
    let Some(layout) = &app.layout else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for node in layout
        .visible_rows()
        .skip(app.scroll_row)
        .take(area.height as usize)
    {
        if app.row_data.contains_key(&node.id) {
            lines.push(Line::from(Span::styled(
                truncate_to_width(&node.id, area.width as usize),
                Style::default().fg(Color::Cyan),
            )));
        } else {
            // Collapsed summary rows carry no name.
            lines.push(Line::from(""));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn truncate_to_width(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

fn render_grid_panel(frame: &mut Frame, app: &App, area: Rect) {
    let Some(layout) = &app.layout else {
        return;
    };
    if area.width == 0 {
        return;
    }

    let grid = AlignmentGrid::new(layout, &app.row_data, app.scheme.scheme(), app.zoom);
    let cell_w = grid.col_width() as usize;
    let mut lines: Vec<Line> = Vec::new();

    for row in app.scroll_row..(app.scroll_row + area.height as usize).min(grid.num_rows()) {
        let mut spans: Vec<Span> = Vec::new();
        let mut used = 0usize;
        let mut col = app.scroll_col;
        while used < area.width as usize && col < grid.num_cols() {
            let cell = grid.cell_at(row, col);
            let take = cell_w.min(area.width as usize - used);
            let mut text = String::with_capacity(take);
            text.push(cell.ch);
            for _ in 1..take {
                text.push(' ');
            }
            spans.push(Span::styled(text, Style::default().fg(cell.color)));
            used += take;
            col += 1;
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_style = match app.mode {
        Mode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        Mode::Command => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_span = Span::styled(format!(" {} ", app.mode.as_str()), mode_style);

    let file_info = match &app.file_path {
        Some(path) => format!(
            " {} ",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        ),
        None => " [no dataset] ".to_string(),
    };

    let dims_info = format!(" {}x{} ", app.num_rows(), app.num_cols());
    let color_info = format!(" [{}] ", app.scheme);
    let zoom_info = format!(" z{} ", app.zoom);

    let collapsed_count = app.collapsed.values().filter(|&&c| c).count();
    let collapse_info = if collapsed_count > 0 {
        format!(" {} collapsed ", collapsed_count)
    } else {
        String::new()
    };

    let line = Line::from(vec![
        mode_span,
        Span::raw(file_info),
        Span::styled(dims_info, Style::default().fg(Color::DarkGray)),
        Span::styled(color_info, Style::default().fg(Color::DarkGray)),
        Span::styled(zoom_info, Style::default().fg(Color::DarkGray)),
        Span::styled(collapse_info, Style::default().fg(Color::Yellow)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn render_command_line(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.mode {
        Mode::Command => Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Yellow)),
            Span::raw(&app.command_buffer),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        _ => {
            if let Some(msg) = &app.status_message {
                Line::from(Span::raw(msg.as_str()))
            } else {
                Line::from(Span::styled(
                    "Press : for commands, ? for help, click a node to collapse",
                    Style::default().fg(Color::DarkGray),
                ))
            }
        }
    };

    let paragraph = Paragraph::new(content);
    frame.render_widget(paragraph, area);
}

fn render_splash(frame: &mut Frame, area: Rect) {
    let version = env!("CARGO_PKG_VERSION");
    let description = "Terminal phylogeny and alignment viewer";

    let mut lines: Vec<Line> = Vec::new();

    let vertical_padding = area.height.saturating_sub(14) / 2;
    for _ in 0..vertical_padding {
        lines.push(Line::from(""));
    }

    let logo_width = 42;
    let h_pad = (area.width as usize).saturating_sub(logo_width) / 2;
    let pad = " ".repeat(h_pad);

    let logo_lines = [
        ("  ┌──●  ", "  _                 _ _          "),
        ("──┤     ", " | |_ _ _ ___ ___  | (_)__ _ _ _ "),
        ("  │ ┌──●", " |  _| '_/ -_) -_) | | / _` | ' \\"),
        ("  └─┤   ", "  \\__|_| \\___\\___| |_|_\\__, |_||_|"),
        ("    └╌╌●", "                       |___/     "),
    ];

    let tree_color = Color::Green;
    for (helix, text) in logo_lines.iter() {
        lines.push(Line::from(vec![
            Span::raw(pad.clone()),
            Span::styled(*helix, Style::default().fg(tree_color)),
            Span::styled(*text, Style::default().add_modifier(Modifier::BOLD)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{:^width$}", format!("treealign v{}", version), width = area.width as usize),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(Span::styled(
        format!("{:^width$}", description, width = area.width as usize),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "{:^width$}",
            "treealign <file.json[.gz]> to load a dataset",
            width = area.width as usize
        ),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help(frame: &mut Frame) {
    let help_text = vec![
        Line::from(Span::styled(
            "treealign Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )),
        Line::from("  h/j/k/l     Scroll columns/rows"),
        Line::from("  0 / $       First/last column"),
        Line::from("  g / G       First/last row"),
        Line::from("  Ctrl-f/b    Page down/up"),
        Line::from("  wheel       Scroll rows"),
        Line::from(""),
        Line::from(Span::styled(
            "Tree",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )),
        Line::from("  click       Collapse/expand a node"),
        Line::from("  E           Expand everything"),
        Line::from(""),
        Line::from(Span::styled(
            "View",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )),
        Line::from("  + / -       Zoom columns in/out"),
        Line::from(""),
        Line::from(Span::styled(
            "Commands",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )),
        Line::from("  :q          Quit"),
        Line::from("  :color X    Set scheme (maeditor/lesk/clustal)"),
        Line::from("  :zoom N     Cells per column (1-8)"),
        Line::from("  :expand     Expand everything"),
        Line::from("  :help       Show this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let area = frame.area();
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let help_paragraph = Paragraph::new(help_text)
        .block(help_block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_paragraph, popup_area);
}
