//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Everything runs on one thread. Network calls are spawned as tokio tasks
//! and report back as `Action`s over an mpsc channel, which the loop drains
//! every iteration. Component callbacks (`Navigator`, `TripCardCallbacks`)
//! are thin adapters that post to the same channel, so all state changes
//! funnel through `update()`.
//!
//! ## Redraw Strategy
//!
//! The loop redraws only after an input event, a drained action, or a
//! session change. While idle it sleeps in `poll` for up to 250ms.

mod component;
pub mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::api::TripsApi;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::route::{Navigator, Route};
use crate::core::session::SessionState;
use crate::core::state::App;
use crate::core::trip::TripId;
use crate::tui::component::EventHandler;
use crate::tui::components::trip_card::DeleteTask;
use crate::tui::components::{Header, TripCardCallbacks, TripCardContext, TripList, TripListEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub header: Header,
    pub trip_list: TripList,
    pub detail_scroll: u16,
}

impl TuiState {
    pub fn new(header: Header, trip_list: TripList) -> Self {
        Self {
            header,
            trip_list,
            detail_scroll: 0,
        }
    }
}

/// Navigation service backed by the action channel.
pub struct ChannelNavigator {
    tx: mpsc::Sender<Action>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        let Some(route) = Route::from_path(path) else {
            warn!("Ignoring navigation to unknown path {}", path);
            return;
        };
        if self.tx.send(Action::Navigate(route)).is_err() {
            warn!("Failed to send navigation to {}: receiver dropped", path);
        }
    }
}

/// Trip card callbacks backed by the action channel.
pub struct ChannelCallbacks {
    tx: mpsc::Sender<Action>,
}

impl ChannelCallbacks {
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        if self.tx.send(action).is_err() {
            warn!("Failed to send card callback: receiver dropped");
        }
    }
}

impl TripCardCallbacks for ChannelCallbacks {
    fn on_select(&self, id: TripId) {
        self.send(Action::TripSelected(id));
    }

    fn on_delete(&self, id: TripId) {
        self.send(Action::TripDeleted(id));
    }

    fn set_error(&self, error: Option<String>) {
        self.send(Action::SetError(error));
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Everything the loop needs to carry out effects.
struct Runtime {
    session: Arc<SessionState>,
    api: Arc<dyn TripsApi>,
    tx: mpsc::Sender<Action>,
}

impl Runtime {
    /// Perform an effect. Returns true when the app should exit.
    fn apply(&self, effect: Effect, tui: &mut TuiState) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::FetchTrips => self.spawn_fetch(),
            Effect::Logout => self.session.logout(),
            Effect::SettleDelete(id) => tui.trip_list.settle(id),
        }
        false
    }

    fn spawn_fetch(&self) {
        let Some(token) = self.session.token() else {
            warn!("Trip fetch requested without a session");
            let _ = self.tx.send(Action::SessionExpired);
            return;
        };
        let api = self.api.clone();
        let tx = self.tx.clone();
        info!("Spawning trip list fetch");
        tokio::spawn(async move {
            let action = match api.list_trips(&token).await {
                Ok(trips) => Action::TripsLoaded(trips),
                Err(e) if e.is_unauthorized() => {
                    warn!("Trip service rejected the credential: {}", e);
                    Action::SessionExpired
                }
                Err(e) => Action::TripsLoadFailed(e.to_string()),
            };
            if tx.send(action).is_err() {
                warn!("Failed to send trip list result: receiver dropped");
            }
        });
    }

    fn spawn_delete(&self, task: DeleteTask) {
        let id = task.trip_id();
        let tx = self.tx.clone();
        info!("Spawning delete for trip {}", id);
        tokio::spawn(async move {
            let outcome = task.run().await;
            debug!("Delete for trip {} finished: {:?}", id, outcome);
            if tx.send(Action::DeleteSettled(id)).is_err() {
                warn!("Failed to settle delete for trip {}: receiver dropped", id);
            }
        });
    }
}

pub fn run(
    config: ResolvedConfig,
    session: Arc<SessionState>,
    api: Arc<dyn TripsApi>,
) -> std::io::Result<()> {
    // Channel for actions from background tasks and component callbacks
    let (tx, rx) = mpsc::channel();

    let navigator = Arc::new(ChannelNavigator::new(tx.clone()));
    let callbacks = Arc::new(ChannelCallbacks::new(tx.clone()));
    let card_context = TripCardContext::new(api.clone(), session.credentials(), callbacks)
        .with_delete_timeout(config.delete_timeout);

    let mut app = App::new(session.is_logged_in());
    let mut tui = TuiState::new(
        Header::new(session.clone(), navigator),
        TripList::new(card_context),
    );
    let mut session_rx = session.subscribe();
    let runtime = Runtime { session, api, tx };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let effect = update(&mut app, Action::Refresh);
    runtime.apply(effect, &mut tui);

    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.trip_list.sync(&app.trips);
        tui.trip_list.loading = app.loading;

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, &config.web_url))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if matches!(event, TuiEvent::ForceQuit) {
                break 'main;
            }
            if let Some(header_event) = tui.header.handle_event(&event) {
                debug!("Header: {:?}", header_event);
                continue;
            }
            let effect = handle_page_event(&event, &mut app, &mut tui, &runtime);
            if runtime.apply(effect, &mut tui) {
                break 'main;
            }
        }

        // Session changes (sign out from the menu, expiry) re-render everything
        if session_rx.has_changed().unwrap_or(false) {
            let logged_in = session_rx.borrow_and_update().is_logged_in();
            needs_redraw = true;
            let effect = update(&mut app, Action::SessionChanged { logged_in });
            if runtime.apply(effect, &mut tui) {
                break;
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if matches!(action, Action::Navigate(_) | Action::TripSelected(_)) {
                tui.detail_scroll = 0;
            }
            let effect = update(&mut app, action);
            if runtime.apply(effect, &mut tui) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    info!("Roadtrip shutting down");
    Ok(())
}

/// Route an event the header did not consume to the current page.
fn handle_page_event(
    event: &TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    runtime: &Runtime,
) -> Effect {
    match event {
        TuiEvent::InputChar('q') => return update(app, Action::Quit),
        TuiEvent::Escape if app.error.is_some() => {
            return update(app, Action::SetError(None));
        }
        TuiEvent::InputChar('r') => return update(app, Action::Refresh),
        _ => {}
    }

    match app.route {
        Route::Dashboard => match tui.trip_list.handle_event(event) {
            Some(TripListEvent::DeleteStarted(task)) => {
                runtime.spawn_delete(task);
                Effect::None
            }
            Some(TripListEvent::Selected(id)) => {
                debug!("Trip {} selected", id);
                Effect::None
            }
            Some(TripListEvent::Highlighted(_)) | Some(TripListEvent::DeleteRefused(_)) => {
                Effect::None
            }
            None => Effect::None,
        },
        Route::Trip(_) => match event {
            TuiEvent::CursorUp => {
                tui.detail_scroll = tui.detail_scroll.saturating_sub(1);
                Effect::None
            }
            TuiEvent::CursorDown => {
                tui.detail_scroll = tui.detail_scroll.saturating_add(1);
                Effect::None
            }
            TuiEvent::Escape | TuiEvent::Backspace => {
                update(app, Action::Navigate(Route::Dashboard))
            }
            _ => Effect::None,
        },
        Route::Home | Route::Login | Route::SignUp => match event {
            TuiEvent::Escape if app.route != Route::Home => {
                update(app, Action::Navigate(Route::Home))
            }
            _ => Effect::None,
        },
    }
}
