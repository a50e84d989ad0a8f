use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, ToastKind};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette();
    let Some(toast) = &app.toast else {
        return;
    };

    let toast_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(2),
        width: area.width,
        height: 1,
    };

    let (label, color) = match toast.kind {
        ToastKind::Info => (" OK ", palette.green),
        ToastKind::Error => (" ERROR ", palette.red),
    };
    let line = Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(palette.bg_dark)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", toast.message), Style::default().fg(color)),
    ]);

    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(palette.bg_dark)),
        toast_area,
    );
}
