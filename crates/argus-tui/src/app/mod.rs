//! UI state machine.
//!
//! Pure state machine that processes terminal and channel events, producing
//! actions for the runtime to execute. Completely decoupled from I/O, so the
//! whole dashboard behavior is testable without a terminal or a socket.

mod action;
mod event;
mod state;

pub use action::AppAction;
pub use event::AppEvent;
use argus_client::{Session, SessionSnapshot, ViewPhase};
use crossterm::event::KeyCode;
pub use state::ConnectionState;

/// UI state machine.
///
/// Holds the rendered copy of the snapshot plus UI-only state (selection,
/// status line, terminal size). The authoritative snapshot stays in the
/// view model; the App only ever sees it through change events.
#[derive(Debug, Clone)]
pub struct App {
    /// Channel connection state.
    connection: ConnectionState,
    /// Feed endpoint, for the header line.
    endpoint: String,
    /// Last rendered snapshot.
    snapshot: SessionSnapshot,
    /// View phase: distinguishes "no update yet" from "no sessions".
    phase: ViewPhase,
    /// Selected row in the session table.
    selected: usize,
    /// Number of known backend servers, once reported.
    server_count: Option<usize>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create a new App for the given feed endpoint.
    pub fn new(endpoint: String) -> Self {
        Self {
            connection: ConnectionState::Connecting,
            endpoint,
            snapshot: SessionSnapshot::new(),
            phase: ViewPhase::Empty,
            selected: 0,
            server_count: None,
            status_message: None,
            terminal_size: (80, 24),
        }
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SnapshotChanged { snapshot, phase, skipped } => {
                self.snapshot = snapshot;
                self.phase = phase;
                self.clamp_selection();
                if skipped > 0 {
                    self.status_message =
                        Some(format!("Dropped {skipped} malformed session record(s)"));
                }
                vec![AppAction::Render]
            },
            AppEvent::ChannelUp => {
                self.connection = ConnectionState::Connected;
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::ChannelDown { reason } => {
                self.connection = ConnectionState::Reconnecting { reason };
                vec![AppAction::Render]
            },
            AppEvent::ServersUpdated { count } => {
                if count.is_some() {
                    self.server_count = count;
                }
                vec![AppAction::Render]
            },
            AppEvent::Diagnostic { message } => {
                self.status_message = Some(message);
                vec![AppAction::Render]
            },
        }
    }

    /// Handle keyboard input.
    fn handle_key(&mut self, key: KeyCode) -> Vec<AppAction> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => vec![AppAction::Quit],
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = self.selected.saturating_add(1);
                self.clamp_selection();
                vec![AppAction::Render]
            },
            _ => vec![],
        }
    }

    /// Keep the selection inside the snapshot after it shrank.
    fn clamp_selection(&mut self) {
        let last = self.snapshot.len().saturating_sub(1);
        if self.selected > last {
            self.selected = last;
        }
    }

    /// Channel connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    /// Feed endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Last rendered snapshot, in feed order.
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// View phase: `Empty` until the first update arrives.
    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Selected row in the session table.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Session under the cursor. `None` when the snapshot is empty.
    pub fn selected_session(&self) -> Option<&Session> {
        self.snapshot.sessions().get(self.selected)
    }

    /// Number of known backend servers, once reported.
    pub fn server_count(&self) -> Option<usize> {
        self.server_count
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}
