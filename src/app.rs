use crate::braille::{BrailleCanvas, BrailleCell};
use crate::color::ColorScheme;
use crate::config::AppConfig;
use crate::frame_loop::FrameLoop;
use crate::pointer::SharedPointer;
use crate::simulation::ParticleField;
use crate::surface::Surface;
use crate::ui;
use crate::viewport::{CellSize, Viewport};
use ratatui::layout::Rect;
use std::time::Instant;

/// Main application state
pub struct App {
    pub field: ParticleField,
    pub frame_loop: FrameLoop,
    pub pointer: SharedPointer,
    pub color_scheme: ColorScheme,
    pub cell_size: CellSize,
    /// Full terminal area
    pub terminal_area: Rect,
    /// Drawable area inside the canvas border
    pub canvas_area: Rect,
    pub viewport: Viewport,
    canvas: BrailleCanvas,
    cells: Vec<BrailleCell>,
    pub connection_count: usize,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
}

impl App {
    pub fn new(terminal_width: u16, terminal_height: u16, config: AppConfig) -> Self {
        let pointer = SharedPointer::new();
        let cell_size = config.cell_size.sanitized();
        let terminal_area = Rect::new(0, 0, terminal_width, terminal_height);
        let canvas_area = ui::canvas_area(terminal_area, false);
        let viewport = Viewport::new(canvas_area.width, canvas_area.height, cell_size);

        Self {
            field: ParticleField::new(
                viewport.width_px(),
                viewport.height_px(),
                config.field,
                pointer.clone(),
                config.seed,
            ),
            frame_loop: FrameLoop::default(),
            pointer,
            color_scheme: config.color_scheme,
            cell_size,
            terminal_area,
            canvas_area,
            viewport,
            canvas: BrailleCanvas::new(viewport.cols, viewport.rows, cell_size.width, cell_size.height),
            cells: Vec::new(),
            connection_count: 0,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
        }
    }

    /// Advance and redraw one frame if the frame loop says one is due.
    /// Returns whether a frame was produced.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.frame_loop.frame_due(now) {
            return false;
        }
        self.field.step();
        self.render_frame();
        true
    }

    /// Redraw the canvas from the current particle state
    pub fn render_frame(&mut self) {
        self.connection_count = self.field.render(&mut self.canvas);
        self.cells = self.canvas.cells();
    }

    /// Cells of the last rendered frame, relative to the canvas area
    pub fn cells(&self) -> &[BrailleCell] {
        &self.cells
    }

    /// Stop the animation; the main loop exits once it notices
    pub fn quit(&mut self) {
        self.frame_loop.stop();
    }

    /// The terminal was resized: rebuild the surface and the whole particle set
    pub fn resize(&mut self, terminal_width: u16, terminal_height: u16) {
        self.terminal_area = Rect::new(0, 0, terminal_width, terminal_height);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.canvas_area = ui::canvas_area(self.terminal_area, self.fullscreen_mode);
        self.viewport = Viewport::new(self.canvas_area.width, self.canvas_area.height, self.cell_size);
        self.canvas = BrailleCanvas::new(
            self.viewport.cols,
            self.viewport.rows,
            self.cell_size.width,
            self.cell_size.height,
        );
        let (width, height) = self.canvas.size();
        self.field.initialize(width, height);
        tracing::info!(
            cols = self.viewport.cols,
            rows = self.viewport.rows,
            particles = self.field.particle_count(),
            "surface resized"
        );
        self.render_frame();
    }

    /// Throw the particle set away and start a fresh one
    pub fn reinitialize(&mut self) {
        self.field
            .initialize(self.viewport.width_px(), self.viewport.height_px());
        tracing::info!(particles = self.field.particle_count(), "particles reinitialized");
        self.render_frame();
    }

    /// Toggle fullscreen mode. The canvas changes size, so this counts as a resize.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
        self.relayout();
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Mouse moved to a terminal cell. Positions outside the canvas clear the pointer.
    pub fn pointer_moved(&self, column: u16, row: u16) {
        let area = self.canvas_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if inside {
            let (x, y) = self.viewport.cell_to_px(column - area.x, row - area.y);
            self.pointer.store(x, y);
        } else {
            self.pointer.clear();
        }
    }

    /// Mouse left the window
    pub fn pointer_left(&self) {
        self.pointer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_loop::LoopState;
    use crate::settings::FieldConfig;
    use std::time::Duration;

    fn app(width: u16, height: u16) -> App {
        App::new(width, height, AppConfig::default())
    }

    #[test]
    fn test_canvas_excludes_sidebar_and_border() {
        let app = app(124, 32);
        assert_eq!(app.canvas_area, Rect::new(ui::SIDEBAR_WIDTH + 1, 1, 100, 30));
        assert_eq!(app.field.width, 1000.0);
        assert_eq!(app.field.height, 600.0);
        assert_eq!(app.field.particle_count(), 60);
    }

    #[test]
    fn test_tick_requires_running_loop() {
        let mut app = app(124, 32);
        let now = Instant::now();
        assert!(!app.tick(now));

        app.frame_loop.start();
        assert!(app.tick(now));
        assert_eq!(app.field.frame, 1);
        assert!(!app.cells().is_empty());
        assert_eq!(app.connection_count, app.field.connections().len());
        assert!(!app.tick(now + Duration::from_millis(1)));

        app.quit();
        assert_eq!(app.frame_loop.state(), LoopState::Stopped);
        assert!(!app.tick(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_resize_reinitializes() {
        let mut app = app(124, 32);
        let before: Vec<u64> = app.field.particles().iter().map(|p| p.id).collect();

        // 50 cols * 10px = 500px, below the breakpoint
        app.resize(74, 32);
        assert_eq!(app.viewport.cols, 50);
        assert_eq!(app.field.particle_count(), 30);
        assert!(app.field.particles().iter().all(|p| !before.contains(&p.id)));
        for p in app.field.particles() {
            assert!(p.x <= app.field.width && p.y <= app.field.height);
        }
    }

    #[test]
    fn test_fullscreen_grows_canvas() {
        let mut app = app(124, 32);
        app.toggle_fullscreen();
        assert_eq!(app.canvas_area, Rect::new(1, 1, 122, 30));
        assert_eq!(app.field.width, 1220.0);
    }

    #[test]
    fn test_pointer_mapping() {
        let app = app(124, 32);
        let area = app.canvas_area;

        app.pointer_moved(area.x, area.y);
        assert_eq!(app.pointer.load(), Some((5.0, 10.0)));

        app.pointer_moved(0, 0);
        assert_eq!(app.pointer.load(), None);

        app.pointer_moved(area.x + 3, area.y + 1);
        app.pointer_left();
        assert_eq!(app.pointer.load(), None);
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = App::new(
            3,
            2,
            AppConfig {
                field: FieldConfig {
                    particle_count: 10,
                    ..FieldConfig::default()
                },
                ..AppConfig::default()
            },
        );
        app.frame_loop.start();
        assert!(app.tick(Instant::now()));
        assert!(app.cells().is_empty());
    }

    #[test]
    fn test_help_scroll() {
        let mut app = app(124, 32);
        app.toggle_help();
        app.scroll_help_down(1);
        app.scroll_help_down(1);
        assert_eq!(app.help_scroll, 1);
        app.scroll_help_up();
        app.scroll_help_up();
        assert_eq!(app.help_scroll, 0);
    }
}
