use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use qrkeep::action::Action;
use qrkeep::app::{App, Effect, InputMode, Overlay, View};
use qrkeep::clipboard::{self, SystemClipboard};
use qrkeep::config::{Cli, ConfigFile, Settings};
use qrkeep::event::{key_to_action, AppEvent, EventHandler};
use qrkeep::export;
use qrkeep::manager::HistoryManager;
use qrkeep::store::{HistoryStore, SqliteHistoryStore};
use qrkeep::widgets;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let file = ConfigFile::load()?.unwrap_or_default();
    let settings = Settings::resolve(cli, file)?;

    let _log_guard = init_logging(settings.log_file.as_deref())?;

    run_tui(settings).await
}

/// File logging only; the terminal belongs to the UI.
fn init_logging(path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(Some(guard))
}

async fn run_tui(settings: Settings) -> Result<()> {
    let store = SqliteHistoryStore::open(&settings.db_path).wrap_err_with(|| {
        format!(
            "failed to open history database at {}",
            settings.db_path.display()
        )
    })?;
    let store: Arc<dyn HistoryStore> = Arc::new(store);

    // Set up channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let (manager, worker) = HistoryManager::new(store, settings.colors, action_tx.clone());
    let worker_task = tokio::spawn(worker.run());

    let mut history_rx = manager.subscribe();
    let initial = history_rx.borrow_and_update().clone();
    let mut app = App::new(initial, manager.default_colors());
    app.theme = settings.theme;
    let mut clipboard_slot: Option<SystemClipboard> = None;

    let mut terminal = qrkeep::tui::init()?;
    let mut events = EventHandler::new(settings.tick_rate);

    // Main loop
    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(
                        key,
                        app.view,
                        &app.input_mode,
                        &app.overlay,
                        &app.input_buffer,
                    ),
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &manager, &action_tx, &mut clipboard_slot);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &manager, &action_tx, &mut clipboard_slot);
            }
            Ok(()) = history_rx.changed() => {
                let records = history_rx.borrow_and_update().clone();
                app.update(Action::HistoryChanged(records));
            }
        }

        if app.should_quit {
            break;
        }
    }

    qrkeep::tui::restore()?;

    // Let queued writes land before exiting
    drop(manager);
    if let Err(e) = worker_task.await {
        tracing::error!("history worker panicked: {}", e);
    }

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(app.palette().bg_dark)),
        area,
    );

    let suggestions_height = if app.input_mode == InputMode::Command { 1 } else { 0 };
    let layout = Layout::vertical([
        Constraint::Length(1),                  // Status bar
        Constraint::Length(1),                  // Type tabs
        Constraint::Fill(1),                    // Content
        Constraint::Length(suggestions_height), // Command suggestions
        Constraint::Length(1),                  // Footer / input line
    ])
    .split(area);

    widgets::status_bar::render(app, frame, layout[0]);
    widgets::tab_bar::render(app, frame, layout[1]);

    match app.view {
        View::List => widgets::history_list::render(app, frame, layout[2]),
        View::Detail => widgets::history_detail::render(app, frame, layout[2]),
    }

    match app.input_mode {
        InputMode::Command | InputMode::Search => {
            widgets::command_input::render_suggestions(app, frame, layout[3]);
            widgets::command_input::render(app, frame, layout[4]);
        }
        _ => widgets::footer::render(app, frame, layout[4]),
    }

    // Overlays
    match &app.overlay {
        Overlay::Help => widgets::help_overlay::render(app.view, app.palette(), frame, area),
        Overlay::Colors => widgets::colors_overlay::render(app, frame, area),
        Overlay::Confirm(action) => {
            widgets::confirm_modal::render(action, app.palette(), frame, area)
        }
        Overlay::None => {}
    }

    widgets::toast::render(app, frame, area);
}

fn handle_effects(
    effects: Vec<Effect>,
    manager: &HistoryManager,
    action_tx: &mpsc::UnboundedSender<Action>,
    clipboard_slot: &mut Option<SystemClipboard>,
) {
    for effect in effects {
        match effect {
            Effect::AddRecord {
                category,
                payload,
                colors,
            } => {
                let record = manager.add_with_colors(category, &payload, colors);
                tracing::debug!("queued {} record {}", record.category(), record.id());
            }
            Effect::RemoveRecord(id) => manager.remove(&id),
            Effect::ClearHistory => manager.request_clear(),
            Effect::CopyPayload(text) => {
                let action = match clipboard::copy_cached(clipboard_slot, &text) {
                    Ok(()) => Action::Notice("Copied to clipboard".to_string()),
                    Err(e) => {
                        tracing::warn!("clipboard copy failed: {}", e);
                        Action::Error(format!("Copy failed: {}", e))
                    }
                };
                let _ = action_tx.send(action);
            }
            Effect::Export { path, records } => {
                let tx = action_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let action = match export::write_json(&path, &records) {
                        Ok(count) => {
                            Action::Notice(format!("Exported {} items to {}", count, path.display()))
                        }
                        Err(e) => {
                            tracing::error!("export failed: {}", e);
                            Action::Error(e.to_string())
                        }
                    };
                    let _ = tx.send(action);
                });
            }
            Effect::Quit => {}
        }
    }
}
