//! treealign: Terminal phylogeny and alignment viewer.
//!
//! Shows a phylogenetic tree next to its multiple sequence alignment, with
//! click-to-collapse subtrees and a virtualized, color-coded residue grid.

mod app;
mod color;
mod config;
mod dataset;
mod grid;
mod input;
mod tree;
mod ui;

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

use app::{App, MAX_ZOOM, TerminalTheme};
use color::SchemeName;
use config::Config;

/// Terminal phylogeny and alignment viewer.
#[derive(Parser, Debug)]
#[command(name = "treealign")]
#[command(author, version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// Dataset file to open (JSON, optionally gzipped).
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial color scheme (maeditor, lesk, clustal).
    #[arg(short, long)]
    color: Option<String>,

    /// Terminal cells per alignment column (1-8).
    #[arg(long)]
    zoom: Option<u16>,

    /// Comma-separated node names to collapse at startup.
    #[arg(long, value_name = "NODES")]
    collapse: Option<String>,
}

const AFTER_HELP: &str = "\
INTERACTIVE COMMANDS:
  Press ':' to enter command mode, then type a command and press Enter.
  Press '?' for interactive help overlay.
  Click a node handle in the tree panel to collapse or expand its subtree.

VIEW:
  :zoom N         Terminal cells per alignment column (1-8)
  :expand         Expand every collapsed subtree

COLOR SCHEMES:
  :color maeditor Residue coloring after the maeditor palette (default)
  :color lesk     Lesk chemistry-group coloring
  :color clustal  ClustalX-like coloring

  :color with no argument lists the available schemes.
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (config, _config_loaded) = Config::load();

    // Detect terminal theme before entering raw mode
    let terminal_theme = detect_terminal_theme();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(config);
    app.terminal_theme = terminal_theme;

    if let Some(name) = &args.color {
        match SchemeName::from_str(name) {
            Ok(scheme) => app.scheme = scheme,
            Err(_) => app.set_status(format!("Unknown color scheme: {}", name)),
        }
    }
    if let Some(zoom) = args.zoom {
        app.zoom = zoom.clamp(1, MAX_ZOOM);
    }

    // Load file if provided
    if let Some(path) = args.file {
        app.load_file(path);
        if let Some(names) = &args.collapse {
            for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                app.collapsed.insert(name.to_string(), true);
            }
            app.relayout();
        }
    }

    // Run main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        let area = ratatui::layout::Rect::new(0, 0, size.width, size.height);
        let panes = ui::compute_panes(area, app);
        let page_size = panes.tree.height as usize;

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key, page_size),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, &panes),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Detect terminal background theme using termbg.
fn detect_terminal_theme() -> TerminalTheme {
    // termbg needs a timeout for terminals that don't respond
    let timeout = std::time::Duration::from_millis(100);

    match termbg::theme(timeout) {
        Ok(termbg::Theme::Light) => TerminalTheme::Light,
        Ok(termbg::Theme::Dark) => TerminalTheme::Dark,
        Err(_) => TerminalTheme::Dark, // Default to dark on detection failure
    }
}
