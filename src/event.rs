use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{InputMode, Overlay, View};
use crate::input::commands::matching_commands;

/// Terminal key presses merged with a fixed-rate tick.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                                if tx.send(AppEvent::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::error!("terminal event stream failed: {}", e);
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    view: View,
    input_mode: &InputMode,
    overlay: &Overlay,
    input_buffer: &str,
) -> Option<Action> {
    match overlay {
        Overlay::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    Some(Action::ToggleHelp)
                }
                _ => None,
            };
        }
        Overlay::Colors => {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseOverlay),
                _ => None,
            };
        }
        Overlay::Confirm(_) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::Confirm),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::CloseOverlay),
                _ => None,
            };
        }
        Overlay::None => {}
    }

    match input_mode {
        InputMode::Command => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitCommandInput(input_buffer.to_string())),
                KeyCode::Tab => {
                    // Complete the command word only once
                    if input_buffer.contains(' ') {
                        return None;
                    }
                    matching_commands(input_buffer)
                        .first()
                        .map(|cmd| Action::UpdateInputBuffer(format!("{} ", cmd.name)))
                }
                KeyCode::Backspace => Some(Action::UpdateInputBuffer(pop_char(input_buffer))),
                KeyCode::Char(c) => Some(Action::UpdateInputBuffer(push_char(input_buffer, c))),
                _ => None,
            };
        }
        InputMode::Search => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitSearch(input_buffer.to_string())),
                KeyCode::Backspace => Some(Action::UpdateInputBuffer(pop_char(input_buffer))),
                KeyCode::Char(c) => Some(Action::UpdateInputBuffer(push_char(input_buffer, c))),
                _ => None,
            };
        }
        InputMode::PendingG => {
            return match key.code {
                KeyCode::Char('g') => Some(Action::NavigateTop),
                _ => Some(Action::Back), // Cancel the pending chord
            };
        }
        InputMode::Normal => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    match key.code {
        // Global
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::OpenCommandInput),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::Char('g') => Some(Action::EnterPendingG),
        KeyCode::Char('G') => Some(Action::NavigateBottom),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('y') => Some(Action::CopySelected),
        KeyCode::Char('d') => Some(Action::DeleteSelected),
        KeyCode::Char('C') => Some(Action::ClearHistory),

        // List only
        KeyCode::Enter if view == View::List => Some(Action::Select),
        KeyCode::Char('/') if view == View::List => Some(Action::OpenSearch),
        KeyCode::Tab if view == View::List => Some(Action::NextFilter),
        KeyCode::BackTab if view == View::List => Some(Action::PrevFilter),

        _ => None,
    }
}

fn push_char(buffer: &str, c: char) -> String {
    let mut buf = buffer.to_string();
    buf.push(c);
    buf
}

fn pop_char(buffer: &str) -> String {
    let mut buf = buffer.to_string();
    buf.pop();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ConfirmAction;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn normal(code: KeyCode, view: View) -> Option<Action> {
        key_to_action(press(code), view, &InputMode::Normal, &Overlay::None, "")
    }

    #[test]
    fn list_keys() {
        assert!(matches!(normal(KeyCode::Enter, View::List), Some(Action::Select)));
        assert!(matches!(normal(KeyCode::Tab, View::List), Some(Action::NextFilter)));
        assert!(matches!(normal(KeyCode::Char('/'), View::List), Some(Action::OpenSearch)));
        assert!(matches!(normal(KeyCode::Char('C'), View::List), Some(Action::ClearHistory)));
        assert!(normal(KeyCode::Tab, View::Detail).is_none());
        assert!(matches!(normal(KeyCode::Esc, View::Detail), Some(Action::Back)));
    }

    #[test]
    fn confirm_overlay_captures_keys() {
        let overlay = Overlay::Confirm(ConfirmAction::ClearAll { count: 2 });
        let action = |code| key_to_action(press(code), View::List, &InputMode::Normal, &overlay, "");
        assert!(matches!(action(KeyCode::Char('y')), Some(Action::Confirm)));
        assert!(matches!(action(KeyCode::Esc), Some(Action::CloseOverlay)));
        assert!(action(KeyCode::Char('q')).is_none());
    }

    #[test]
    fn colors_overlay_closes_on_esc_or_q() {
        let action = |code| key_to_action(press(code), View::List, &InputMode::Normal, &Overlay::Colors, "");
        assert!(matches!(action(KeyCode::Esc), Some(Action::CloseOverlay)));
        assert!(matches!(action(KeyCode::Char('q')), Some(Action::CloseOverlay)));
        assert!(action(KeyCode::Char('j')).is_none());
    }

    #[test]
    fn command_mode_edits_and_completes() {
        let mode = InputMode::Command;
        let action = |code, buf| key_to_action(press(code), View::List, &mode, &Overlay::None, buf);

        match action(KeyCode::Char('l'), "ur") {
            Some(Action::UpdateInputBuffer(buf)) => assert_eq!(buf, "url"),
            other => panic!("unexpected action: {:?}", other),
        }
        match action(KeyCode::Tab, "wi") {
            Some(Action::UpdateInputBuffer(buf)) => assert_eq!(buf, "wifi "),
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(action(KeyCode::Tab, "wifi Home").is_none());
        match action(KeyCode::Enter, "text hi") {
            Some(Action::SubmitCommandInput(cmd)) => assert_eq!(cmd, "text hi"),
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
