use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};

pub struct SearchBarWidget;

impl SearchBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let editing = app.is_input_mode();

        let border_color = if editing { theme.accent } else { theme.grey0 };
        let block = Block::default()
            .title(" Search Open Library ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);

        let line = match &app.mode {
            Mode::Search(buffer) => Line::from(vec![
                Span::styled("/", Style::default().fg(theme.accent)),
                Span::styled(buffer.as_str(), Style::default().fg(theme.fg1)),
            ]),
            _ => match &app.last_term {
                Some(term) => Line::from(vec![
                    Span::styled(term.to_string(), Style::default().fg(theme.fg0)),
                    Span::styled(
                        if app.searching { "  searching..." } else { "" },
                        Style::default().fg(theme.yellow),
                    ),
                ]),
                None => Line::from(Span::styled(
                    "Press / and type a title, author or subject",
                    Style::default()
                        .fg(theme.grey1)
                        .add_modifier(Modifier::ITALIC),
                )),
            },
        };

        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(line), inner);

        if let Mode::Search(buffer) = &app.mode {
            let x = inner.x + (1 + buffer.width() as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}
