use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " qrkeep ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(palette.text_muted)),
        Span::styled(
            "History",
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if app.view == View::Detail {
        if let Some(record) = app.detail_record() {
            left_spans.push(Span::styled(" > ", Style::default().fg(palette.text_muted)));
            left_spans.push(Span::styled(
                record.category(),
                Style::default().fg(palette.text_dim),
            ));
        }
    }

    // Active search indicator
    if let Some(ref query) = app.search_query {
        left_spans.push(Span::styled("  /", Style::default().fg(palette.green)));
        left_spans.push(Span::styled(query.as_str(), Style::default().fg(palette.text)));
    }

    let mut right_spans: Vec<Span> = vec![
        Span::styled("fg ", Style::default().fg(palette.text_muted)),
        Span::styled("██", Style::default().fg(theme::argb(app.colors.foreground))),
        Span::styled(" bg ", Style::default().fg(palette.text_muted)),
        Span::styled("██", Style::default().fg(theme::argb(app.colors.background))),
    ];
    if app.colors.has_low_contrast() {
        right_spans.push(Span::styled(" ⚠", Style::default().fg(palette.yellow)));
    }

    let visible = app.visible().len();
    let total = app.records.len();
    let count = if visible == total {
        format!("  [{} items]", total)
    } else {
        format!("  [{}/{} items]", visible, total)
    };
    right_spans.push(Span::styled(count, Style::default().fg(palette.text_muted)));
    right_spans.push(Span::raw(" "));

    // Calculate widths and fill gap with spaces
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_bar));
    frame.render_widget(widget, area);
}
