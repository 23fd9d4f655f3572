use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::carousel::AnimationState;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            Self::summary(app)
        };

        let help_hint = match app.mode {
            Mode::Search(_) => " Enter:search Esc:cancel ",
            _ => " q:quit /:search space:play/pause +/-:size o:open ?:help ",
        };

        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn summary(app: &App) -> String {
        let state = match app.carousel.state() {
            AnimationState::Playing => "PLAYING",
            AnimationState::Paused => "PAUSED",
            AnimationState::Stopped => "STOPPED",
        };

        let mut text = format!(
            " {} | Books: {} | Showing: {}",
            state,
            app.carousel.items().len(),
            app.carousel.visible_count()
        );
        if app.config.ui.show_elapsed {
            if let Some(label) = app.elapsed_label() {
                text.push_str(&format!(" | Searched {}", label));
            }
        }
        text
    }
}
