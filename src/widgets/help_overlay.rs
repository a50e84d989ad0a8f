use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::app::View;
use crate::input::commands::COMMANDS;
use crate::theme::Palette;

pub fn render(view: View, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section(palette, "Navigation"));
    lines.push(binding(palette, "j / k / Up / Down", "Move (scroll in detail)"));
    lines.push(binding(palette, "gg / G", "Go to top / bottom"));
    lines.push(binding(palette, "Ctrl+D / Ctrl+U", "Page down / up"));
    match view {
        View::List => {
            lines.push(binding(palette, "Enter", "Open detail"));
            lines.push(binding(palette, "Tab / Shift+Tab", "Next / previous type"));
            lines.push(binding(palette, "/ (slash)", "Search payload and category"));
        }
        View::Detail => lines.push(binding(palette, "Esc", "Back to list")),
    }

    lines.push(Line::from(""));
    lines.push(section(palette, "Items"));
    lines.push(binding(palette, "y", "Copy payload to clipboard"));
    lines.push(binding(palette, "d", "Delete item"));
    lines.push(binding(palette, "C (shift+c)", "Clear all history"));

    lines.push(Line::from(""));
    lines.push(section(palette, "Commands (fields separated by |)"));
    for cmd in COMMANDS {
        lines.push(binding(palette, cmd.usage, cmd.description));
    }

    lines.push(Line::from(""));
    lines.push(section(palette, "General"));
    lines.push(binding(palette, "?", "Toggle this help"));
    lines.push(binding(palette, "q / Ctrl+C", "Quit"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(80, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg_surface))
        .title(" Help (? to close) ");

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, modal_area);
}

fn section<'a>(palette: &Palette, title: &'a str) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(palette: &Palette, key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<52}", key), Style::default().fg(palette.yellow)),
        Span::styled(desc, Style::default().fg(palette.text)),
    ])
}
