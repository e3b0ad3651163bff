// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;
pub mod terminal;

pub use colors::*;
pub use helpers::{calculate_progress, format_file_size, short_dir_name};
pub use input::{map_key_event, CrosstermInput};
pub use terminal::{setup_terminal, TerminalGuard, TuiSink};

use crate::engine::{EngineState, NoticeLevel, Snapshot};
use crate::preview::{PreviewCache, PreviewContent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 32;
const FOOTER_HEIGHT: u16 = 4;

/// Renders one snapshot: key sidebar, preview pane and status footer
pub fn render(frame: &mut Frame, snapshot: &Snapshot<'_>, previews: &mut PreviewCache) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    render_sidebar(frame, columns[0], snapshot);
    render_content(frame, columns[1], snapshot, previews);
    render_footer(frame, rows[1], snapshot);
}

fn key_line(key: char, label: &str, highlighted: bool) -> Line<'static> {
    let style = if highlighted {
        Style::default()
            .fg(BG_DARK)
            .bg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_PRIMARY)
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{}: {}", key, label), style),
    ])
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(TEXT_SECONDARY)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_sidebar(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![section_title("Key: Action")];
    for (key, label) in snapshot.reserved.actions() {
        lines.push(key_line(key, label, snapshot.last_key == Some(key)));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Key: Directory"));
    for (key, destination) in snapshot.keymap.iter() {
        lines.push(key_line(
            key,
            &short_dir_name(destination),
            snapshot.last_key == Some(key),
        ));
    }

    let keys = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR))
            .title(" Keys "),
    );
    frame.render_widget(keys, chunks[0]);

    let (cursor, total) = snapshot.progress;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(calculate_progress(cursor, total))
        .label(format!("{}/{}", cursor, total));
    frame.render_widget(gauge, chunks[1]);
}

fn render_content(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot<'_>,
    previews: &mut PreviewCache,
) {
    let file = match snapshot.current_file {
        Some(file) if !snapshot.state.is_terminal() => file,
        _ => {
            frame.render_widget(render_finished_widget(snapshot.state), area);
            return;
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Span::styled(
            format!(" {} ", file.current_path().display()),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = match previews.get(file, inner.width, inner.height) {
        PreviewContent::Image { lines, .. } => {
            Paragraph::new(lines.clone()).alignment(Alignment::Center)
        }
        PreviewContent::Info(lines) => Paragraph::new(
            lines
                .iter()
                .map(|l| Line::from(l.clone()))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false }),
    };
    frame.render_widget(paragraph, inner);
}

fn render_finished_widget(state: EngineState) -> Paragraph<'static> {
    let (title, detail) = match state {
        EngineState::Cancelled => ("Cancelled", "Remaining files were left in place."),
        _ => ("All done!", "Every file has been sorted."),
    };

    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(TEXT_SECONDARY))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    )
    .alignment(Alignment::Center)
}

fn notice_style(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => Style::default().fg(ACCENT_SECONDARY),
        NoticeLevel::Warning => Style::default().fg(ACCENT_WARNING),
        NoticeLevel::Error => Style::default()
            .fg(ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (cursor, total) = snapshot.progress;
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20)])
        .split(inner);

    let message = snapshot
        .message
        .map(|notice| Span::styled(notice.text.clone(), notice_style(notice.level)))
        .unwrap_or_else(|| Span::raw(""));

    let status = Line::from(Span::styled(
        format!(
            "Sorting {} - {} files - {} remaining.",
            snapshot.working_dir.display(),
            total,
            total.saturating_sub(cursor)
        ),
        Style::default().fg(TEXT_SECONDARY),
    ));
    frame.render_widget(Paragraph::new(vec![Line::from(message), status]), halves[0]);

    let position = Line::from(Span::styled(
        format!("File {}/{}", (cursor + 1).min(total), total),
        Style::default().fg(TEXT_PRIMARY),
    ));
    let version = Line::from(Span::styled(
        format!("imgsort {}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(TEXT_SECONDARY),
    ));
    frame.render_widget(
        Paragraph::new(vec![position, version]).alignment(Alignment::Right),
        halves[1],
    );
}
