use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

pub const SIDEBAR_WIDTH: u16 = 22;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// The drawable canvas area (inside its border) for a given terminal area
pub fn canvas_area(frame_area: Rect, fullscreen: bool) -> Rect {
    let left = if fullscreen { 0 } else { SIDEBAR_WIDTH };
    let outer_width = frame_area.width.saturating_sub(left);
    Rect {
        x: frame_area.x + left + 1,
        y: frame_area.y + 1,
        width: outer_width.saturating_sub(2),
        height: frame_area.height.saturating_sub(2),
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status
            Constraint::Length(9), // Parameters
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Field ");
    let value_style = Style::default().fg(TEXT_COLOR);
    let dim_style = Style::default().fg(DIM_TEXT_COLOR);

    let pointer = match app.field.last_pointer() {
        Some((x, y)) => format!("{:.0},{:.0}", x, y),
        None => "-".to_string(),
    };

    let content = vec![
        Line::from(Span::styled("RUNNING", Style::default().fg(Color::Green))),
        Line::from(vec![
            Span::styled("Particles ", dim_style),
            Span::styled(app.field.particle_count().to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Links     ", dim_style),
            Span::styled(app.connection_count.to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Size ", dim_style),
            Span::styled(
                format!("{:.0}x{:.0}", app.field.width, app.field.height),
                value_style,
            ),
        ]),
        Line::from(vec![
            Span::styled("Pointer ", dim_style),
            Span::styled(pointer, value_style),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");
    let config = &app.field.config;

    let make_line = |label: &str, value: String| {
        Line::from(Span::styled(format!("  {}: {}", label, value), Style::default().fg(TEXT_COLOR)))
    };

    let content = vec![
        make_line("Count", config.particle_count.to_string()),
        make_line("Distance", format!("{:.0}", config.connection_distance)),
        make_line("Speed", format!("{:.2}", config.particle_speed)),
        make_line("Pointer r", format!("{:.0}", config.mouse_radius)),
        make_line("Color", app.color_scheme.name().to_string()),
        Line::from(Span::styled(
            format!("  Breakpoint: {:.0}", config.mobile_breakpoint),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("  Frame: {}", app.field.frame),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("R", "reinitialize"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

/// Canvas widget: blits the braille cells of the last frame
struct FieldCanvas<'a> {
    app: &'a App,
}

impl Widget for FieldCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for cell in self.app.cells() {
            let x = area.x + cell.x;
            let y = area.y + cell.y;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)]
                    .set_char(cell.char)
                    .set_style(Style::default().fg(cell.color));
            }
        }
    }
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(FieldCanvas { app }, inner);
}

/// Help dialog rectangle, centered within the canvas
fn help_area(area: Rect, fullscreen: bool) -> Rect {
    let canvas_x = if fullscreen { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if fullscreen {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(24);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    }
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Slow particles drift and bounce off the edges. Particles closer than the link distance are joined by a line that fades as they move apart."),
        Line::from(""),
        Line::from(Span::styled("RESIZING:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Resizing the terminal or toggling fullscreen starts a fresh set of particles. Below the breakpoint width only half as many are created."),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("R=Reinitialize, V=Fullscreen, H=Help, J/K=Scroll help, Q/Esc=Quit"),
        Line::from(""),
    ]
}

/// Rows a line of text takes when word-wrapped to `width` columns
fn wrapped_rows(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let mut rows = 1;
    let mut column = 0;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if column == 0 {
            column = len;
        } else if column + 1 + len <= width {
            column += 1 + len;
        } else {
            rows += 1;
            column = len;
        }
        // Words longer than the line are broken
        while column > width {
            rows += 1;
            column -= width;
        }
    }
    rows
}

/// How far the help overlay can scroll before its last line reaches the top
/// of the visible area, for a terminal of the given size
pub fn help_max_scroll(area: Rect, fullscreen: bool) -> u16 {
    let help = help_area(area, fullscreen);
    let inner_width = help.width.saturating_sub(2) as usize;
    let visible_height = help.height.saturating_sub(2) as usize; // minus borders

    let content_height: usize = help_lines()
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            wrapped_rows(&text, inner_width)
        })
        .sum();
    content_height.saturating_sub(visible_height).min(u16::MAX as usize) as u16
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_area = help_area(area, app.fullscreen_mode);

    // Clear the background
    frame.render_widget(Clear, help_area);

    let is_scrollable = help_max_scroll(area, app.fullscreen_mode) > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    #[test]
    fn test_canvas_area() {
        let area = Rect::new(0, 0, 124, 32);
        assert_eq!(canvas_area(area, false), Rect::new(23, 1, 100, 30));
        assert_eq!(canvas_area(area, true), Rect::new(1, 1, 122, 30));
        assert_eq!(canvas_area(Rect::new(0, 0, 10, 1), false).width, 0);
    }

    #[test]
    fn test_render_draws_frame() {
        let mut app = App::new(124, 32, AppConfig::default());
        app.frame_loop.start();
        app.tick(Instant::now());

        let mut terminal = Terminal::new(TestBackend::new(124, 32)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let area = app.canvas_area;
        let braille_cells = (area.y..area.y + area.height)
            .flat_map(|y| (area.x..area.x + area.width).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                let symbol = buffer[(x, y)].symbol();
                symbol
                    .chars()
                    .next()
                    .is_some_and(|c| ('\u{2801}'..='\u{28FF}').contains(&c))
            })
            .count();
        assert_eq!(braille_cells, app.cells().len());
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("one two", 10), 1);
        assert_eq!(wrapped_rows("one two three", 10), 2);
        assert_eq!(wrapped_rows("abcdefghijkl", 5), 3);
        assert_eq!(wrapped_rows("anything", 0), 0);
    }

    #[test]
    fn test_help_scroll_limit_follows_content() {
        // The whole help text fits in a large terminal
        assert_eq!(help_max_scroll(Rect::new(0, 0, 124, 40), false), 0);

        // A short terminal can scroll, but never past the content
        let small = Rect::new(0, 0, 60, 10);
        let max = help_max_scroll(small, true);
        assert!(max > 0);
        let total: usize = help_lines()
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                wrapped_rows(&text, 54)
            })
            .sum();
        assert!((max as usize) < total);
    }

    #[test]
    fn test_render_with_help_on_small_terminal() {
        let mut app = App::new(30, 8, AppConfig::default());
        app.toggle_help();
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
