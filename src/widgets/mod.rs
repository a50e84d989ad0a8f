pub mod colors_overlay;
pub mod command_input;
pub mod confirm_modal;
pub mod footer;
pub mod help_overlay;
pub mod history_detail;
pub mod history_list;
pub mod status_bar;
pub mod tab_bar;
pub mod toast;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}

/// First line of `text`, cut to `max` characters with an ellipsis.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let more_lines = text.lines().nth(1).is_some();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else if more_lines {
        format!("{} …", line)
    } else {
        line.to_string()
    }
}
