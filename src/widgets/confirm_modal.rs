use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{centered_rect, preview};
use crate::app::ConfirmAction;
use crate::theme::Palette;

pub fn render(action: &ConfirmAction, palette: &Palette, frame: &mut Frame, area: Rect) {
    let (message, detail) = match action {
        ConfirmAction::Delete { payload, .. } => {
            ("Delete this item?".to_string(), preview(payload, 60))
        }
        ConfirmAction::ClearAll { count } => (
            format!("Delete all {} history items?", count),
            "This cannot be undone.".to_string(),
        ),
    };

    let modal_area = centered_rect(50, 8, area);
    frame.render_widget(Clear, modal_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(palette.yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", detail),
            Style::default().fg(palette.text_dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y/Enter", Style::default().fg(palette.green)),
            Span::raw(" confirm  "),
            Span::styled("n/Esc", Style::default().fg(palette.red)),
            Span::raw(" cancel"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.yellow))
        .style(Style::default().bg(palette.bg_surface))
        .title(" Confirm ");

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal_area);
}
