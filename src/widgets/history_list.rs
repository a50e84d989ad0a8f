use chrono::Local;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;
use crate::domain::{classify, date_label};
use crate::theme;

const PAYLOAD_PREVIEW: usize = 80;

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let today = Local::now().date_naive();
    let mut rows: Vec<Row<'static>> = Vec::new();
    let mut selected_row = None;

    let groups = app.grouped();
    if groups.is_empty() {
        let label = if app.records.is_empty() {
            "No history yet. Press : and try :text hello"
        } else {
            "Nothing matches the current filter"
        };
        let empty = Paragraph::new(label).style(Style::default().fg(palette.text_muted));
        frame.render_widget(empty, area);
        return;
    }

    let mut index = 0;
    for (date, records) in groups {
        rows.push(
            Row::new(vec![
                Cell::from(""),
                Cell::from(date_label(&date, today)),
                Cell::from(Span::styled(
                    format!("{} items", records.len()),
                    Style::default().fg(palette.text_muted),
                )),
            ])
            .style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        );
        for record in records {
            if app.selected == Some(index) {
                selected_row = Some(rows.len());
            }
            let rule = classify(record.category());
            rows.push(Row::new(vec![
                Cell::from(Span::styled(
                    theme::glyph(rule.key),
                    Style::default().fg(theme::argb(rule.accent)),
                )),
                Cell::from(Span::styled(
                    record.category().to_string(),
                    Style::default().fg(palette.text),
                )),
                Cell::from(Span::styled(
                    super::preview(record.payload(), PAYLOAD_PREVIEW),
                    Style::default().fg(palette.text_dim),
                )),
                Cell::from(Span::styled(
                    record.time().to_string(),
                    Style::default().fg(palette.text_muted),
                )),
            ]));
            index += 1;
        }
    }

    let widths = [
        Constraint::Length(2),
        Constraint::Length(20),
        Constraint::Fill(1),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    app.list_state.select(selected_row);
    frame.render_stateful_widget(table, area, &mut app.list_state);
}
