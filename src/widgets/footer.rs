use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, View};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Command => &[("Esc", "cancel"), ("Tab", "complete"), ("Enter", "run")],
        InputMode::Search => &[("Esc", "cancel"), ("Enter", "apply")],
        InputMode::PendingG => &[("g", "top")],
        InputMode::Normal => match app.view {
            View::List => &[
                ("j/k", "nav"),
                ("Enter", "detail"),
                ("Tab", "type"),
                ("/", "search"),
                (":", "cmd"),
                ("y", "copy"),
                ("d", "delete"),
                ("C", "clear"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::Detail => &[
                ("j/k", "scroll"),
                ("Esc", "back"),
                ("y", "copy"),
                ("d", "delete"),
                ("?", "help"),
            ],
        },
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(*key, Style::default().fg(palette.accent)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(palette.text_muted),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_surface));
    frame.render_widget(widget, area);
}
