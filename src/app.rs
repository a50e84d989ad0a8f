use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::widgets::TableState;

use crate::action::Action;
use crate::domain::*;
use crate::input::commands::{parse_command, ColorChoice, Command};
use crate::manager::ClearOutcome;
use crate::store::Snapshot;
use crate::theme::{Palette, ThemeMode};

const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Search,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Colors,
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { id: String, payload: String },
    ClearAll { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AddRecord {
        category: &'static str,
        payload: String,
        colors: RenderColors,
    },
    RemoveRecord(String),
    ClearHistory,
    CopyPayload(String),
    Export {
        path: PathBuf,
        records: Vec<HistoryRecord>,
    },
    Quit,
}

pub struct App {
    // View state
    pub view: View,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // History data
    pub records: Snapshot,
    pub filter: TypeFilter,
    pub search_query: Option<String>,
    /// Index into [`App::visible`].
    pub selected: Option<usize>,
    pub list_state: TableState,
    pub detail_id: Option<String>,
    pub detail_scroll: u16,

    // Generation
    pub colors: RenderColors,
    pub recent_colors: RecentColors,
    pub theme: ThemeMode,

    // Input
    pub input_buffer: String,

    // App
    pub should_quit: bool,
    pub toast: Option<Toast>,
}

impl App {
    pub fn new(records: Snapshot, colors: RenderColors) -> Self {
        let mut app = Self {
            view: View::List,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            records: Arc::new(Vec::new()),
            filter: TypeFilter::ALL,
            search_query: None,
            selected: None,
            list_state: TableState::default(),
            detail_id: None,
            detail_scroll: 0,

            colors,
            recent_colors: RecentColors::default(),
            theme: ThemeMode::default(),

            input_buffer: String::new(),

            should_quit: false,
            toast: None,
        };
        app.set_records(records);
        app
    }

    pub fn palette(&self) -> &'static Palette {
        self.theme.palette()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        // Clear stale toasts
        if let Some(toast) = &self.toast {
            if toast.at.elapsed() > TOAST_TTL {
                self.toast = None;
            }
        }

        match action {
            // Navigation
            Action::NavigateUp => {
                if self.view == View::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else {
                    self.select_offset(-1);
                }
                vec![]
            }
            Action::NavigateDown => {
                if self.view == View::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else {
                    self.select_offset(1);
                }
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                if self.view == View::Detail {
                    self.detail_scroll = 0;
                } else {
                    self.selected = (!self.visible().is_empty()).then_some(0);
                }
                vec![]
            }
            Action::NavigateBottom => {
                if self.view == View::Detail {
                    self.detail_scroll = u16::MAX;
                } else {
                    self.selected = self.visible().len().checked_sub(1);
                }
                vec![]
            }
            Action::PageUp => {
                if self.view == View::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(self.page_height() as u16);
                } else {
                    self.select_offset(-(self.page_height() as isize));
                }
                vec![]
            }
            Action::PageDown => {
                if self.view == View::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(self.page_height() as u16);
                } else {
                    self.select_offset(self.page_height() as isize);
                }
                vec![]
            }
            Action::Select => {
                if self.view == View::List {
                    if let Some(id) = self.selected_record().map(|r| r.id().to_string()) {
                        self.detail_id = Some(id);
                        self.detail_scroll = 0;
                        self.view = View::Detail;
                    }
                }
                vec![]
            }
            Action::Back => {
                self.input_mode = InputMode::Normal;
                if self.view == View::Detail {
                    self.view = View::List;
                    self.detail_id = None;
                }
                vec![]
            }

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // Type filter tabs
            Action::NextFilter => {
                self.set_filter(self.filter.next());
                vec![]
            }
            Action::PrevFilter => {
                self.set_filter(self.filter.prev());
                vec![]
            }

            // Record actions
            Action::DeleteSelected => {
                let confirm = self.selected_record().map(|record| ConfirmAction::Delete {
                    id: record.id().to_string(),
                    payload: record.payload().to_string(),
                });
                match confirm {
                    Some(confirm) => self.overlay = Overlay::Confirm(confirm),
                    None => self.show_error("no item selected"),
                }
                vec![]
            }
            Action::ClearHistory => {
                self.request_clear();
                vec![]
            }
            Action::CopySelected => match self.selected_record().map(|r| r.payload().to_string()) {
                Some(payload) => vec![Effect::CopyPayload(payload)],
                None => {
                    self.show_error("no item selected");
                    vec![]
                }
            },
            Action::Confirm => {
                let Overlay::Confirm(confirm) = self.overlay.clone() else {
                    return vec![];
                };
                self.overlay = Overlay::None;
                match confirm {
                    ConfirmAction::Delete { id, .. } => {
                        if self.detail_id.as_deref() == Some(id.as_str()) {
                            self.view = View::List;
                            self.detail_id = None;
                        }
                        vec![Effect::RemoveRecord(id)]
                    }
                    ConfirmAction::ClearAll { .. } => vec![Effect::ClearHistory],
                }
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::OpenSearch => {
                self.input_mode = InputMode::Search;
                self.input_buffer = self.search_query.clone().unwrap_or_default();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                vec![]
            }
            Action::SubmitSearch(query) => {
                self.input_mode = InputMode::Normal;
                let query = query.trim();
                self.search_query = (!query.is_empty()).then(|| query.to_string());
                self.input_buffer.clear();
                self.reset_selection();
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Data responses
            Action::HistoryChanged(records) => {
                self.set_records(records);
                vec![]
            }
            Action::HistoryCleared(outcome) => {
                match outcome {
                    ClearOutcome::Cleared(count) => {
                        self.show_notice(format!("Cleared {} history items", count))
                    }
                    ClearOutcome::AlreadyEmpty => self.show_notice("History is already empty"),
                }
                vec![]
            }

            // App control
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => vec![],
            Action::Notice(msg) => {
                self.show_notice(msg);
                vec![]
            }
            Action::Error(msg) => {
                self.show_error(msg);
                vec![]
            }
            Action::ClearToast => {
                self.toast = None;
                vec![]
            }
        }
    }

    /// Filtered records grouped under their dates, newest date first.
    pub fn grouped(&self) -> Vec<(String, Vec<&HistoryRecord>)> {
        let query = self.search_query.as_deref().unwrap_or("");
        let filtered = filter_records(&self.records, self.filter, query);
        group_by_date(&filtered)
    }

    /// Filtered records in display order.
    pub fn visible(&self) -> Vec<&HistoryRecord> {
        self.grouped()
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect()
    }

    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        match self.view {
            View::Detail => self.detail_record(),
            View::List => {
                let idx = self.selected?;
                self.visible().get(idx).copied()
            }
        }
    }

    pub fn detail_record(&self) -> Option<&HistoryRecord> {
        let id = self.detail_id.as_deref()?;
        self.records.iter().find(|r| r.id() == id)
    }

    fn set_records(&mut self, records: Snapshot) {
        self.records = records;
        if self.view == View::Detail && self.detail_record().is_none() {
            self.view = View::List;
            self.detail_id = None;
        }
        let len = self.visible().len();
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(idx), len) => Some(idx.min(len - 1)),
        };
    }

    fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selected = (!self.visible().is_empty()).then_some(0);
        self.list_state = TableState::default();
    }

    fn select_offset(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected = Some(next as usize);
    }

    fn request_clear(&mut self) {
        if self.records.is_empty() {
            self.show_notice("History is already empty");
        } else {
            self.overlay = Overlay::Confirm(ConfirmAction::ClearAll {
                count: self.records.len(),
            });
        }
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        if cmd.trim().is_empty() {
            return vec![];
        }
        let command = match parse_command(cmd) {
            Ok(command) => command,
            Err(e) => {
                self.show_error(e.to_string());
                return vec![];
            }
        };

        match command {
            Command::Generate(request) => match request.build() {
                Ok(generated) => {
                    self.show_notice(format!("Saved {}", generated.category));
                    vec![Effect::AddRecord {
                        category: generated.category,
                        payload: generated.payload,
                        colors: self.colors,
                    }]
                }
                Err(e) => {
                    self.show_error(e.to_string());
                    vec![]
                }
            },
            Command::Foreground(choice) => {
                if let Some(color) = self.resolve_color(choice) {
                    self.colors.foreground = color;
                    self.recent_colors.record(color);
                    self.announce_colors();
                }
                vec![]
            }
            Command::Background(choice) => {
                if let Some(color) = self.resolve_color(choice) {
                    self.colors.background = color;
                    self.recent_colors.record(color);
                    self.announce_colors();
                }
                vec![]
            }
            Command::Colors => {
                self.overlay = Overlay::Colors;
                vec![]
            }
            Command::ClearColors => {
                self.recent_colors.clear();
                self.show_notice("Recent colors cleared");
                vec![]
            }
            Command::Theme(mode) => {
                self.theme = mode.unwrap_or_else(|| self.theme.toggled());
                self.show_notice(format!("Theme: {}", self.theme.label()));
                vec![]
            }
            Command::Filter(filter) => {
                self.set_filter(filter);
                vec![]
            }
            Command::Export(path) => {
                let records: Vec<HistoryRecord> = self.visible().into_iter().cloned().collect();
                if records.is_empty() {
                    self.show_error("nothing to export");
                    return vec![];
                }
                vec![Effect::Export { path, records }]
            }
            Command::Clear => {
                self.request_clear();
                vec![]
            }
            Command::Help => {
                self.overlay = Overlay::Help;
                vec![]
            }
            Command::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
        }
    }

    fn resolve_color(&mut self, choice: ColorChoice) -> Option<Argb> {
        match choice {
            ColorChoice::Exact(color) => Some(color),
            ColorChoice::Recent(n) => {
                let color = self.recent_colors.pick(n);
                if color.is_none() {
                    self.show_error(format!("no recent color #{}", n));
                }
                color
            }
        }
    }

    fn announce_colors(&mut self) {
        let msg = format!(
            "Colors: {} on {}",
            self.colors.foreground, self.colors.background
        );
        if self.colors.has_low_contrast() {
            self.show_error(format!("{} (low contrast, may not scan)", msg));
        } else {
            self.show_notice(msg);
        }
    }

    fn show_notice(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind: ToastKind::Info,
            at: Instant::now(),
        });
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind: ToastKind::Error,
            at: Instant::now(),
        });
    }

    fn page_height(&self) -> usize {
        10
    }
}
