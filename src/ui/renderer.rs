use crate::core::app::App;
use crate::ui::view::{resolve_scroll, wrap_lines, ViewModel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SPINNER_FRAMES: [&str; 3] = ["○", "◐", "●"];

fn spinner_frame(app: &App) -> &'static str {
    let elapsed = app.pulse_start.elapsed().as_millis() / 250;
    SPINNER_FRAMES[(elapsed % SPINNER_FRAMES.len() as u128) as usize]
}

fn input_height(app: &App) -> u16 {
    let lines = app.textarea.lines().len().clamp(1, 4);
    lines as u16 + 2
}

/// Draws the widget and returns the scroll offset that was applied to the
/// message pane.
pub fn ui(f: &mut Frame, app: &App, view: &ViewModel) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(input_height(app)),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_status(f, chunks[1], view);
    let offset = render_messages(f, chunks[2], app, view);
    render_input(f, chunks[3], app, view);
    render_footer(f, chunks[4], app);
    offset
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "NEXUS AI",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Experience the future of conversation",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn render_status(f: &mut Frame, area: Rect, view: &ViewModel) {
    let (marker_color, text_color) = if view.ready {
        (Color::Green, Color::LightGreen)
    } else {
        (Color::Yellow, Color::LightYellow)
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(marker_color)),
        Span::styled(view.status, Style::default().fg(text_color)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(status, area);
}

fn render_messages(f: &mut Frame, area: Rect, app: &App, view: &ViewModel) -> u16 {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let lines = wrap_lines(view.message_lines(spinner_frame(app)), inner.width);
    let content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let offset = resolve_scroll(app.auto_scroll, app.scroll_offset, content_height, inner.height);

    let messages = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(messages, area);
    offset
}

fn render_input(f: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
    let border_color = if view.input_enabled {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let title = if view.pending {
        "Sending..."
    } else if view.send_enabled {
        "Enter to send • Shift+Enter for new line"
    } else {
        "Message"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);

    let input_lines = app.textarea.lines();
    let is_empty = input_lines.iter().all(|line| line.is_empty());
    let (cursor_row, cursor_col) = app.textarea.cursor();
    let input_scroll = (cursor_row as u16).saturating_sub(inner.height.saturating_sub(1));

    let input = if is_empty {
        Paragraph::new(Span::styled(
            view.placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let text_style = if view.input_enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Paragraph::new(
            input_lines
                .iter()
                .map(|line| Line::from(line.clone()))
                .collect::<Vec<_>>(),
        )
        .style(text_style)
        .scroll((input_scroll, 0))
    };
    f.render_widget(input.block(block), area);

    if view.input_enabled {
        let line = input_lines.get(cursor_row).map(String::as_str).unwrap_or("");
        let prefix: String = line.chars().take(cursor_col).collect();
        let column = UnicodeWidthStr::width(prefix.as_str()) as u16;
        let x = inner.x + column.min(inner.width.saturating_sub(1));
        let y = inner.y + (cursor_row as u16).saturating_sub(input_scroll);
        f.set_cursor_position((x, y));
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(
            "Model: {} • Logging: {} • Ctrl+C to quit",
            app.model,
            app.get_logging_status()
        ),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(footer, area);
}
