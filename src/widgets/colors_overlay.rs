use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::app::App;
use crate::domain::{Argb, PRESET_COLORS, RECENT_COLOR_PICKS};
use crate::theme::{self, Palette};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let mut lines = vec![Line::from(""), heading(palette, "Recent (:fg 1-6, :bg 1-6)")];

    if app.recent_colors.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No custom colors yet",
            Style::default().fg(palette.text_muted),
        )));
    }
    for (i, entry) in app
        .recent_colors
        .entries()
        .iter()
        .take(RECENT_COLOR_PICKS)
        .enumerate()
    {
        let uses = if entry.uses == 1 {
            "1 use".to_string()
        } else {
            format!("{} uses", entry.uses)
        };
        lines.push(swatch_line(palette, &format!("{}", i + 1), entry.color, &uses));
    }

    lines.push(Line::from(""));
    lines.push(heading(palette, "Presets (:fg <name>)"));
    for (name, color) in PRESET_COLORS {
        lines.push(swatch_line(palette, name, *color, ""));
    }

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(50, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg_surface))
        .title(" Colors (Esc to close) ");
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

fn heading<'a>(palette: &Palette, title: &'a str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn swatch_line(palette: &Palette, label: &str, color: Argb, note: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), Style::default().fg(palette.text_dim)),
        Span::styled("██ ", Style::default().fg(theme::argb(color))),
        Span::styled(color.to_string(), Style::default().fg(palette.text)),
        Span::styled(format!("  {}", note), Style::default().fg(palette.text_muted)),
    ])
}
