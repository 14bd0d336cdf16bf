mod app;
mod braille;
mod color;
mod config;
mod error;
mod frame_loop;
mod logging;
mod pointer;
mod presets;
mod settings;
mod simulation;
mod surface;
mod ui;
mod viewport;

use app::App;
use clap::Parser;
use color::{ColorScheme, Rgba};
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logging::LogLevel;
use presets::{Preset, PresetManager};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use viewport::Viewport;

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Constellation particle background in the terminal")]
struct Args {
    // === Field Parameters ===
    /// Number of particles, at most 500 (halved on viewports narrower than the breakpoint)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Distance in logical px below which particles are linked
    #[arg(short = 'd', long)]
    distance: Option<f32>,

    /// Particle speed in logical px per frame
    #[arg(short = 's', long)]
    speed: Option<f32>,

    /// Pointer interaction radius (kept for config compatibility, currently no effect)
    #[arg(long = "mouse-radius")]
    mouse_radius: Option<f32>,

    /// Particle color, e.g. "rgba(56, 189, 248, 0.5)" or "#38bdf8"
    #[arg(long = "base-color")]
    base_color: Option<Rgba>,

    /// Link color; its alpha is the opacity of the shortest links
    #[arg(long = "line-color")]
    line_color: Option<Rgba>,

    /// Color scheme (sky, ember, mint, mono); explicit colors take precedence
    #[arg(long)]
    scheme: Option<String>,

    /// Viewport width in logical px below which the animation is disabled
    #[arg(long)]
    breakpoint: Option<f32>,

    /// Fixed random seed for a reproducible particle layout
    #[arg(long)]
    seed: Option<u64>,

    // === Viewport ===
    /// Logical px width of one terminal cell
    #[arg(long = "cell-width")]
    cell_width: Option<f32>,

    /// Logical px height of one terminal cell
    #[arg(long = "cell-height")]
    cell_height: Option<f32>,

    /// Don't animate at all (accessibility)
    #[arg(long = "reduced-motion", env = "REDUCED_MOTION")]
    reduced_motion: bool,

    // === Config Files ===
    /// Start from a named preset (constellation, dense, calm, sparse or a saved one)
    #[arg(long)]
    preset: Option<String>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file before starting
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,

    /// Save the effective settings as a user preset before starting
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Delete a saved user preset and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,

    /// List available presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    // === Logging ===
    /// Log file path
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level (overridden by PARTICLE_FIELD_LOG filters)
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Off)]
    log_level: LogLevel,
}

fn parse_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "ember" | "orange" => ColorScheme::Ember,
        "mint" | "green" => ColorScheme::Mint,
        "mono" | "white" => ColorScheme::Mono,
        _ => ColorScheme::Sky,
    }
}

/// Config file, then preset, then individual CLI flags
fn resolve_config(args: &Args, presets: &PresetManager) -> Result<AppConfig, error::FieldError> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(name) = &args.preset {
        let preset = presets.find(name)?;
        config.field = preset.field.clone();
        config.color_scheme = preset.color_scheme;
    }

    if let Some(scheme) = &args.scheme {
        config.color_scheme = parse_scheme(scheme);
        config.field.apply_scheme(config.color_scheme);
    }

    let field = &mut config.field;
    if let Some(particles) = args.particles {
        field.particle_count = particles;
    }
    if let Some(distance) = args.distance {
        field.connection_distance = distance;
    }
    if let Some(speed) = args.speed {
        field.particle_speed = speed;
    }
    if let Some(radius) = args.mouse_radius {
        field.mouse_radius = radius;
    }
    if let Some(color) = args.base_color {
        field.base_color = color;
    }
    if let Some(color) = args.line_color {
        field.line_color = color;
    }
    if let Some(breakpoint) = args.breakpoint {
        field.mobile_breakpoint = breakpoint;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(width) = args.cell_width {
        config.cell_size.width = width;
    }
    if let Some(height) = args.cell_height {
        config.cell_size.height = height;
    }

    config.field = config.field.clone().sanitized();
    config.cell_size = config.cell_size.sanitized();
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::setup_logging(&log_path, args.log_level)?;

    let mut presets = PresetManager::new();
    if args.list_presets {
        for preset in presets.all_presets() {
            println!("{:<16} {}", preset.name, preset.description);
        }
        return Ok(());
    }
    if let Some(name) = &args.delete_preset {
        presets.delete_preset(name)?;
        println!("Deleted preset '{}'", name);
        return Ok(());
    }

    let config = resolve_config(&args, &presets)?;

    if let Some(path) = &args.export_config {
        config.save_to_file(path)?;
    }
    if let Some(name) = &args.save_preset {
        let preset = Preset::new(
            name.clone(),
            "Saved from the command line",
            config.field.clone(),
            config.color_scheme,
        );
        let path = presets.save_preset(preset)?;
        println!("Saved preset '{}' to {}", name, path.display());
    }

    // Gate before touching the terminal so a disabled run leaves no trace
    let (term_width, term_height) = crossterm::terminal::size()?;
    let canvas = ui::canvas_area(ratatui::layout::Rect::new(0, 0, term_width, term_height), false);
    let viewport = Viewport::new(canvas.width, canvas.height, config.cell_size);
    if let Err(reason) = viewport::check_startup(&viewport, args.reduced_motion, config.field.mobile_breakpoint) {
        tracing::info!(%reason, "particles disabled for performance/accessibility");
        println!("Particles disabled for performance/accessibility: {}", reason);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, config);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "frame loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    app.frame_loop.start();
    app.render_frame();

    while app.frame_loop.is_running() {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle input until the next frame is due
        loop {
            let timeout = app.frame_loop.time_until_next_frame(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            handle_event(app, event::read()?);

            if !app.frame_loop.is_running() {
                return Ok(());
            }
            if app.frame_loop.time_until_next_frame(Instant::now()).is_zero() {
                break;
            }
        }

        // Run one animation frame
        app.tick(Instant::now());
    }

    Ok(())
}

fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => {
            // Only process Press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Handle Ctrl+C
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.quit();
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
                KeyCode::Char('r') | KeyCode::Char('R') => app.reinitialize(),
                KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                KeyCode::Char('j') | KeyCode::Char('J') => {
                    if app.show_help {
                        let max_scroll = ui::help_max_scroll(app.terminal_area, app.fullscreen_mode);
                        app.scroll_help_down(max_scroll);
                    }
                }
                KeyCode::Char('k') | KeyCode::Char('K') => {
                    if app.show_help {
                        app.scroll_help_up();
                    }
                }
                KeyCode::Esc => {
                    if app.show_help {
                        app.toggle_help();
                    } else {
                        app.quit();
                    }
                }
                _ => {}
            }
        }
        Event::Mouse(mouse) => {
            if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                app.pointer_moved(mouse.column, mouse.row);
            }
        }
        // Closest thing a terminal has to the pointer leaving the page
        Event::FocusLost => app.pointer_left(),
        Event::Resize(width, height) => app.resize(width, height),
        _ => {}
    }
}
