use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::domain::TypeFilter;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for tab in TypeFilter::tabs() {
        let count = app.records.iter().filter(|r| tab.matches(r)).count();
        let label = format!(" {} {} ", tab.label(), count);
        let style = if tab == app.filter {
            Style::default()
                .fg(palette.bg_dark)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else if count == 0 {
            Style::default().fg(palette.text_muted)
        } else {
            Style::default().fg(palette.text_dim)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_surface));
    frame.render_widget(widget, area);
}
