use std::ops::Range;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;
use zikey::{
    composer::Composer,
    language::Language,
    session::{CharState, Session, Status},
};

use crate::{App, VocabularyState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(1).max(1)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        header(self.session.language()).render(chunks[0], buf);

        let stats = &self.stats;
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{}s", stats.remaining_secs), bold().fg(Color::Yellow)),
            Span::raw("   "),
            Span::styled(format!("{} wpm", stats.wpm), bold()),
            Span::raw("   "),
            Span::styled(format!("{}% acc", stats.accuracy), bold()),
            Span::raw("   "),
            Span::styled(format!("{} errors", stats.errors), bold().fg(Color::Red)),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let body = chunks[3];
        match (&self.vocabulary, self.session.status()) {
            (VocabularyState::Failed(message), Status::Idle) => {
                Paragraph::new(Span::styled(
                    format!("Error loading word lists: {message}"),
                    bold().fg(Color::Red),
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(body, buf);
            }
            (VocabularyState::Loading, Status::Idle) => {
                Paragraph::new(Span::styled(
                    "Loading word lists...",
                    Style::default().add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(body, buf);
            }
            (VocabularyState::Ready, Status::Idle) => {
                Paragraph::new(Span::styled(
                    "Press Enter to begin the test",
                    bold().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(body, buf);
            }
            (_, Status::Running) => {
                let width = body.width as usize;
                let (lines, cursor_line) = passage_lines(&self.session, &self.composer, width);
                let scroll = cursor_line.saturating_sub(1).min(u16::MAX as usize) as u16;
                Paragraph::new(lines).scroll((scroll, 0)).render(body, buf);
            }
            (_, Status::Finished) => results(self).render(body, buf),
        }

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        legend(self).render(chunks[5], buf);
    }
}

fn header(active: Language) -> Paragraph<'static> {
    let mut spans = vec![Span::styled("zikey", bold().fg(Color::Magenta)), Span::raw("  ")];
    for language in [Language::Alphabetic, Language::Ideographic] {
        let style = if language == active {
            bold().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!(" {language} "), style));
    }
    Paragraph::new(Line::from(spans))
}

fn results(app: &App) -> Paragraph<'static> {
    let stats = &app.stats;
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let lines = vec![
        Line::from(Span::styled("Time's up!", bold().fg(Color::Yellow))),
        Line::default(),
        Line::from(vec![
            Span::styled(format!("{} wpm", stats.wpm), bold().fg(Color::Green)),
            Span::raw("   "),
            Span::styled(format!("{}% accuracy", stats.accuracy), bold()),
            Span::raw("   "),
            Span::styled(format!("{} errors", stats.errors), bold().fg(Color::Red)),
        ]),
        Line::from(Span::styled(
            format!(
                "{} characters typed over {} passages in {}s",
                stats.typed,
                app.session.passages_completed() + 1,
                stats.elapsed_secs
            ),
            italic,
        )),
        Line::default(),
        Line::from(Span::styled("Press Enter to try again", italic)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn legend(app: &App) -> Paragraph<'static> {
    let key_style = |enabled: bool| {
        if enabled {
            bold().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let commands = [
        ("enter", "start", app.can_start()),
        ("ctrl+r", "reset", app.can_reset()),
        ("tab", "language", true),
        ("esc", "quit", true),
    ];

    let mut spans = Vec::new();
    for (idx, (key, action, enabled)) in commands.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" / "));
        }
        spans.push(Span::styled(key, key_style(enabled)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// Split the passage into rows no wider than `width` columns. English breaks
/// after spaces, Chinese between any two characters.
pub fn wrap_rows(chars: &[char], language: Language, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let units: Vec<Range<usize>> = match language {
        Language::Alphabetic => {
            let mut start = 0;
            let mut units: Vec<Range<usize>> = chars
                .iter()
                .positions(|c| *c == ' ')
                .map(|end| {
                    let unit = start..end + 1;
                    start = end + 1;
                    unit
                })
                .collect();
            if start < chars.len() {
                units.push(start..chars.len());
            }
            units
        }
        Language::Ideographic => (0..chars.len()).map(|idx| idx..idx + 1).collect(),
    };

    let mut rows = Vec::new();
    let mut row = 0..0;
    let mut row_width = 0;
    for unit in units {
        let unit_width: usize = chars[unit.clone()].iter().map(|c| char_width(*c)).sum();
        if row_width > 0 && row_width + unit_width > width {
            rows.push(row.clone());
            row = unit.start..unit.start;
            row_width = 0;
        }
        row.end = unit.end;
        row_width += unit_width;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

fn char_span(c: char, state: CharState, is_cursor: bool) -> Span<'static> {
    let style = match state {
        _ if is_cursor => dim_bold().add_modifier(Modifier::UNDERLINED),
        CharState::Untyped => dim_bold(),
        CharState::Correct => bold().fg(Color::Green),
        CharState::Incorrect => bold().fg(Color::Red),
        CharState::Corrected => bold().fg(Color::Rgb(255, 165, 0)),
    };
    let symbol = match (state, c) {
        (CharState::Incorrect, ' ') => '·',
        _ => c,
    };
    Span::styled(symbol.to_string(), style)
}

/// Project ledger and cursor onto styled rows. In Chinese mode the
/// composition field sits on the row below the cursor, under its column.
/// Returns the rows and the index of the row holding the cursor.
fn passage_lines(
    session: &Session,
    composer: &Composer,
    width: usize,
) -> (Vec<Line<'static>>, usize) {
    let chars = session.passage().chars();
    let cursor = session.cursor();
    let ledger = session.ledger();

    let mut lines = Vec::new();
    let mut cursor_line = 0;
    for row in wrap_rows(chars, session.language(), width) {
        let holds_cursor = row.contains(&cursor);
        let spans = row
            .clone()
            .map(|idx| {
                let state = ledger.state(idx).unwrap_or_default();
                char_span(chars[idx], state, idx == cursor)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));

        if holds_cursor {
            cursor_line = lines.len() - 1;
            if session.language() == Language::Ideographic {
                let column: usize = chars[row.start..cursor].iter().map(|c| char_width(*c)).sum();
                lines.push(composition_line(composer, column));
            }
        }
    }
    (lines, cursor_line)
}

fn composition_line(composer: &Composer, column: usize) -> Line<'static> {
    let field = match composer.preedit() {
        Some(text) => Span::styled(
            text.to_string(),
            bold().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
        ),
        None => Span::styled("_", Style::default().add_modifier(Modifier::DIM)),
    };
    Line::from(vec![Span::raw(" ".repeat(column)), field])
}
