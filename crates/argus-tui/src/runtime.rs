//! Async runtime.
//!
//! Event loop that drives terminal I/O and coordinates between the App
//! state machine, the event channel, and the session view model. Uses
//! `tokio::select!` to handle terminal events and channel activity
//! concurrently; all dispatch and state mutation still happen on this one
//! task.

use std::io::{self, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use argus_client::{
    Activity, ChannelError, ChannelStatus, EventChannel, EventKind, RawEvent, SessionViewModel,
};
use argus_harness::HarnessError;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    App,
    app::{AppAction, AppEvent},
    demo::DemoFeed,
    ui,
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event channel error.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Demo feed error.
    #[error("demo feed error: {0}")]
    Demo(#[from] HarnessError),
}

/// Async runtime for the dashboard.
///
/// Manages terminal setup/teardown and the main event loop, and owns the
/// whole synchronization stack: channel, view model, and the UI state
/// machine.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    channel: EventChannel,
    view_model: SessionViewModel,
    /// Record batches forwarded out of the `session_update` handler.
    updates: mpsc::UnboundedReceiver<Vec<Value>>,
    /// Server-list payloads forwarded out of the `servers_updated` handler.
    servers: mpsc::UnboundedReceiver<Value>,
    /// Set by the view-model listener whenever a snapshot was applied.
    dirty: Arc<AtomicBool>,
    /// Stops the channel arm of the select loop once the channel reports
    /// nothing more will come.
    channel_live: bool,
    /// Keeps the in-process demo feed alive for the runtime's lifetime.
    _demo: Option<DemoFeed>,
}

impl Runtime {
    /// Connect to a real aggregator feed.
    pub async fn with_endpoint(endpoint: String) -> Result<Self, RuntimeError> {
        Self::create(endpoint, None).await
    }

    /// Run against an in-process demo feed with sample sessions.
    pub async fn demo() -> Result<Self, RuntimeError> {
        let demo = DemoFeed::start().await?;
        Self::create(demo.url(), Some(demo)).await
    }

    async fn create(endpoint: String, demo: Option<DemoFeed>) -> Result<Self, RuntimeError> {
        // Wire the synchronization core together before touching the
        // terminal, so connection failures print as plain errors.
        let mut channel = EventChannel::new();
        channel.connect(&endpoint).await?;

        let (update_tx, updates) = mpsc::unbounded_channel();
        channel.on(EventKind::SessionUpdate, move |event| {
            if let RawEvent::SessionUpdate(records) = event {
                let _ = update_tx.send(records.clone());
            }
        });

        let (server_tx, servers) = mpsc::unbounded_channel();
        channel.on(EventKind::ServersUpdated, move |event| {
            if let RawEvent::ServersUpdated(data) = event {
                let _ = server_tx.send(data.clone());
            }
        });

        let mut view_model = SessionViewModel::new();
        let dirty = Arc::new(AtomicBool::new(false));
        {
            let dirty = Arc::clone(&dirty);
            view_model.subscribe(move |_| {
                dirty.store(true, Ordering::Release);
                Ok(())
            });
        }

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        Ok(Self {
            terminal,
            app: App::new(endpoint),
            channel,
            view_model,
            updates,
            servers,
            dirty,
            channel_live: true,
            _demo: demo,
        })
    }

    /// Run the main event loop.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.render()?;

        let mut event_stream = EventStream::new();
        let mut tick_interval = tokio::time::interval(std::time::Duration::from_millis(200));

        loop {
            let should_quit = if self.channel_live {
                tokio::select! {
                    // Terminal events
                    maybe_event = event_stream.next() => {
                        match maybe_event {
                            Some(Ok(event)) => self.handle_terminal_event(event)?,
                            Some(Err(e)) => return Err(RuntimeError::Io(e)),
                            None => true,
                        }
                    }

                    // Channel activity
                    activity = self.channel.poll_activity() => {
                        match activity {
                            Some(activity) => self.handle_activity(activity)?,
                            None => {
                                tracing::warn!("event channel closed, keeping last snapshot");
                                self.channel_live = false;
                                self.process_events(vec![AppEvent::ChannelDown {
                                    reason: "channel closed".to_owned(),
                                }])?
                            },
                        }
                    }

                    // Periodic tick
                    _ = tick_interval.tick() => {
                        self.process_events(vec![AppEvent::Tick])?
                    }
                }
            } else {
                tokio::select! {
                    // Channel gone: terminal events only
                    maybe_event = event_stream.next() => {
                        match maybe_event {
                            Some(Ok(event)) => self.handle_terminal_event(event)?,
                            Some(Err(e)) => return Err(RuntimeError::Io(e)),
                            None => true,
                        }
                    }

                    // Periodic tick
                    _ = tick_interval.tick() => {
                        self.process_events(vec![AppEvent::Tick])?
                    }
                }
            };

            if should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle a terminal event. Returns true if the app should quit.
    fn handle_terminal_event(&mut self, event: Event) -> Result<bool, RuntimeError> {
        let app_event = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key.code),
            Event::Resize(cols, rows) => AppEvent::Resize(cols, rows),
            _ => return Ok(false),
        };

        self.process_events(vec![app_event])
    }

    /// Handle one channel activity. Returns true if the app should quit.
    fn handle_activity(&mut self, activity: Activity) -> Result<bool, RuntimeError> {
        match activity {
            Activity::Event(EventKind::SessionUpdate) => {
                let mut skipped = 0usize;
                while let Ok(records) = self.updates.try_recv() {
                    skipped += self.view_model.apply_update(&records).skipped;
                }

                if self.dirty.swap(false, Ordering::AcqRel) {
                    self.process_events(vec![AppEvent::SnapshotChanged {
                        snapshot: self.view_model.current().clone(),
                        phase: self.view_model.phase(),
                        skipped,
                    }])
                } else {
                    Ok(false)
                }
            },
            Activity::Event(EventKind::ServersUpdated) => {
                let mut count = None;
                while let Ok(data) = self.servers.try_recv() {
                    if let Some(list) = data.as_array() {
                        count = Some(list.len());
                    }
                }
                self.process_events(vec![AppEvent::ServersUpdated { count }])
            },
            Activity::Dropped(error) => self.process_events(vec![AppEvent::Diagnostic {
                message: format!("Dropped malformed event: {error}"),
            }]),
            Activity::Ignored => Ok(false),
            Activity::Status(ChannelStatus::Up) => {
                self.process_events(vec![AppEvent::ChannelUp])
            },
            Activity::Status(ChannelStatus::Down(reason)) => {
                self.process_events(vec![AppEvent::ChannelDown { reason }])
            },
        }
    }

    /// Feed events through the App and execute the resulting actions.
    /// Returns true if the app should quit.
    fn process_events(&mut self, events: Vec<AppEvent>) -> Result<bool, RuntimeError> {
        for event in events {
            for action in self.app.handle(event) {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                }
            }
        }
        Ok(false)
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // Channel teardown is handled by EventChannel's own Drop; here we
        // only restore the terminal, even on error-path teardown.
        self.view_model.dispose();
        self.channel.disconnect();

        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
