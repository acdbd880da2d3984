use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::tui::app::{App, Focus};
use crate::upload::{Preview, PreviewSlot, UploadMode};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Form
            Constraint::Length(4), // Status and link
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.controller.mode() {
        UploadMode::File => render_file_tab(frame, chunks[2], app),
        UploadMode::Text => render_text_tab(frame, chunks[2], app),
    }
    render_feedback(frame, chunks[3], app);
    render_key_hints(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "tempfiles",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Server: "),
        Span::styled(&app.server, Style::default().fg(Color::Green)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mode = app.controller.mode();
    let titles: Vec<Line> = UploadMode::ALL
        .iter()
        .map(|m| Line::from(format!(" {} ", m.display_name())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(mode.index())
        .block(Block::default().borders(Borders::ALL).title(" Upload "))
        .highlight_style(
            Style::default()
                .bg(mode.color())
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_file_tab(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    render_line_input(
        frame,
        chunks[0],
        " File path (Enter to select, or drop files here) ",
        &app.path_input,
        app.focus == Focus::Path,
    );

    let files = app.controller.files();
    let selection = match files {
        [] => Line::from(Span::styled(
            "No file selected",
            Style::default().fg(Color::DarkGray),
        )),
        [file] => Line::from(vec![
            Span::styled(&file.name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", file.content_type),
                Style::default().fg(Color::Gray),
            ),
        ]),
        [file, rest @ ..] => Line::from(vec![
            Span::styled(&file.name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  (+{} more, only the first is uploaded)", rest.len()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    };
    frame.render_widget(
        Paragraph::new(selection)
            .block(Block::default().borders(Borders::ALL).title(" Selected ")),
        chunks[1],
    );

    render_preview(frame, chunks[2], app.controller.file_preview());
}

fn render_text_tab(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Percentage(35),
        ])
        .split(area);

    frame.render_widget(&app.body, chunks[0]);

    let name_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(chunks[1]);

    render_line_input(
        frame,
        name_row[0],
        " File name (Shift+Tab to edit) ",
        app.controller.custom_name(),
        app.focus == Focus::Name,
    );

    let extension = Paragraph::new(Line::from(vec![
        Span::raw("."),
        Span::styled(
            app.controller.extension(),
            Style::default()
                .fg(UploadMode::Text.color())
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ext (PgUp/PgDn) "),
    );
    frame.render_widget(extension, name_row[1]);

    render_preview(frame, chunks[2], app.controller.text_preview());
}

/// Single-line input box with the cursor parked after the text when focused
fn render_line_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let input = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title.to_string()),
    );
    frame.render_widget(input, area);

    if focused {
        let cursor_x = area.x + 1 + value.chars().count() as u16;
        let cursor_x = cursor_x.min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_preview(frame: &mut Frame, area: Rect, slot: &PreviewSlot) {
    let (title, body, style) = match slot.get() {
        Some(preview) => {
            let style = match preview {
                Preview::Image { .. } => Style::default().fg(Color::Green),
                Preview::Unavailable { .. } => Style::default().fg(Color::DarkGray),
                Preview::Unreadable { .. } => Style::default().fg(Color::Red),
                Preview::Text { .. } => Style::default(),
            };
            (format!(" {} ", preview.header()), preview.body(), style)
        }
        None => (" Preview ".to_string(), String::new(), Style::default()),
    };

    let preview = Paragraph::new(body)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        );
    frame.render_widget(preview, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    if let Some(status) = app.controller.status() {
        let color = if app.controller.is_submitting() {
            Color::Yellow
        } else if app.controller.link().is_some() {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(Span::styled(status, Style::default().fg(color))));
    }
    if let Some(link) = app.controller.link() {
        lines.push(Line::from(vec![
            Span::raw("Link: "),
            Span::styled(
                link,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    let feedback = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(feedback, area);
}

fn render_key_hints(frame: &mut Frame, area: Rect, app: &App) {
    let submit = if app.controller.is_submitting() {
        "Esc: cancel upload"
    } else {
        "Ctrl+S: upload"
    };
    let hints = [submit, "Tab: switch tab", "Ctrl+C: quit"];

    let mut spans = vec![Span::styled(
        format!(" {} ", app.controller.mode().display_name().to_uppercase()),
        Style::default()
            .bg(app.controller.mode().color())
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )];
    for hint in hints {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black))
        .block(Block::default());
    frame.render_widget(bar, area);
}
