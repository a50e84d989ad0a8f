use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::domain::{classify, Argb};
use crate::theme::{self, Palette};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let Some(record) = app.detail_record() else {
        let gone = Paragraph::new("Item no longer exists").style(Style::default().fg(palette.text_muted));
        frame.render_widget(gone, area);
        return;
    };
    let rule = classify(record.category());
    let accent = theme::argb(rule.accent);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", theme::glyph(rule.key)), Style::default().fg(accent)),
            Span::styled(
                record.category(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        field(palette, "Created", record.created_at()),
        field(palette, "Id", record.id()),
        Line::from(""),
        section(palette, "Payload"),
    ];
    for payload_line in record.payload().lines() {
        lines.push(Line::from(Span::styled(
            format!("  {}", payload_line),
            Style::default().fg(palette.text),
        )));
    }

    lines.push(Line::from(""));
    lines.push(section(palette, "Colors"));
    lines.push(color_line(palette, "Foreground", record.foreground_color()));
    lines.push(color_line(palette, "Background", record.background_color()));

    if record.colors().has_low_contrast() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  ⚠ Low contrast: scanners may not read this code",
            Style::default().fg(palette.yellow),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent_dim))
        .title(" Detail ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    let max_scroll = max_scroll(&paragraph, area);
    let paragraph = paragraph.scroll((app.detail_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

/// Furthest the bordered paragraph can scroll once long lines wrap.
fn max_scroll(paragraph: &Paragraph, area: Rect) -> u16 {
    // line_count includes the block's top and bottom border rows
    let rendered = paragraph.line_count(area.width.saturating_sub(2));
    u16::try_from(rendered.saturating_sub(usize::from(area.height))).unwrap_or(u16::MAX)
}

fn section<'a>(palette: &Palette, title: &'a str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field<'a>(palette: &Palette, label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), Style::default().fg(palette.text_dim)),
        Span::styled(value, Style::default().fg(palette.text)),
    ])
}

fn color_line(palette: &Palette, label: &str, color: Argb) -> Line<'static> {
    let hsv = color.to_hsv();
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), Style::default().fg(palette.text_dim)),
        Span::styled("██ ", Style::default().fg(theme::argb(color))),
        Span::styled(color.to_string(), Style::default().fg(palette.text)),
        Span::styled(
            format!(
                "  H {:>3.0}°  S {:>3.0}%  V {:>3.0}%",
                hsv.hue,
                hsv.saturation * 100.0,
                hsv.value * 100.0
            ),
            Style::default().fg(palette.text_muted),
        ),
    ])
}
