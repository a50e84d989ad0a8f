use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::input::commands::{find_command, matching_commands};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let (prefix, style) = match app.input_mode {
        InputMode::Command => (":", Style::default().fg(palette.yellow)),
        InputMode::Search => ("/", Style::default().fg(palette.green)),
        _ => return,
    };

    let mut spans = vec![
        Span::styled(prefix, style),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(palette.text)),
    ];

    // Ghost completion while the command word is still being typed
    if app.input_mode == InputMode::Command
        && !app.input_buffer.is_empty()
        && !app.input_buffer.contains(' ')
    {
        let typed = app.input_buffer.as_str();
        if let Some(cmd) = matching_commands(typed).first() {
            if let Some(ghost) = cmd.name.strip_prefix(typed) {
                if !ghost.is_empty() {
                    spans.push(Span::styled(ghost, Style::default().fg(palette.text_muted)));
                }
            }
        }
    }

    spans.push(Span::styled("_", Style::default().fg(palette.text_muted)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_bar));
    frame.render_widget(widget, area);
}

pub fn render_suggestions(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    if app.input_mode != InputMode::Command {
        return;
    }

    let bar = Style::default().bg(palette.bg_surface);
    let typed = app.input_buffer.split_whitespace().next().unwrap_or("");

    // Past the command word: show its usage
    if app.input_buffer.contains(' ') {
        let line = match find_command(typed) {
            Some(cmd) => Line::from(vec![
                Span::raw(" "),
                Span::styled(cmd.usage, Style::default().fg(palette.accent)),
                Span::styled(
                    format!("  {}", cmd.description),
                    Style::default().fg(palette.text_muted),
                ),
            ]),
            None => Line::from(Span::styled(
                format!(" unknown command: {}", typed),
                Style::default().fg(palette.red),
            )),
        };
        frame.render_widget(Paragraph::new(line).style(bar), area);
        return;
    }

    let matches = matching_commands(typed);
    if matches.is_empty() {
        let widget = Paragraph::new(Line::from(Span::styled(
            " No matching commands",
            Style::default().fg(palette.text_muted),
        )))
        .style(bar);
        frame.render_widget(widget, area);
        return;
    }

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, cmd) in matches.iter().enumerate() {
        let cmd_style = if i == 0 {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.text_dim)
        };
        spans.push(Span::styled(format!(":{}", cmd.name), cmd_style));
        for alias in cmd.aliases {
            spans.push(Span::styled(
                format!("|{}", alias),
                Style::default().fg(palette.text_muted),
            ));
        }
        if i < matches.len() - 1 {
            spans.push(Span::raw("  "));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
}
