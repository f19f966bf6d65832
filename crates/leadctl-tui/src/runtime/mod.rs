//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! The runtime uses an "inbox" pattern for async event collection:
//! - Handlers send `UiEvent`s directly to `inbox_tx`
//! - Runtime drains `inbox_rx` each frame to collect results
//! - This eliminates per-operation receivers and simplifies event collection

use std::future::Future;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event;
use leadctl_core::api::types::{LeadDraft, LoginRequest, RegisterRequest};
use leadctl_core::api::{ApiClient, ApiError, ApiErrorKind};
use leadctl_core::leads::FetchStart;
use leadctl_core::session::{self, LOGIN_FAILED_MESSAGE, REGISTER_FAILED_MESSAGE};
use leadctl_core::store::SessionStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Target frame rate while async work is in flight (60fps = ~16ms per frame).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll duration when idle (nothing in flight, no recent input).
/// Longer timeout reduces CPU usage when nothing is happening.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is guaranteed to be restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state (split: tui + overlay).
    pub state: AppState,
    /// Backend client, shared with spawned handlers.
    client: Arc<ApiClient>,
    /// Where the session token is persisted.
    session_path: PathBuf,
    /// Inbox sender - handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    /// Last time a Tick event was emitted.
    last_tick: std::time::Instant,
    /// Last time a terminal event was received (for fast tick during interaction).
    last_terminal_event: std::time::Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime.
    pub fn new(client: Arc<ApiClient>, session_path: PathBuf) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        // Enter alternate screen and raw mode
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(client.base_url().to_string());

        // Create inbox channel for async event collection
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = std::time::Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            session_path,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        // The boot screen resolves through the same path as every other
        // async result: a spawned handler reporting back via the inbox.
        self.execute_effect(UiEffect::Bootstrap);

        let result = self.event_loop();

        let _ = terminal::disable_input_features();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            // Process each event through the reducer
            for event in events {
                // Track terminal activity for fast tick mode
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = std::time::Instant::now();
                }

                // Only Tick triggers render - this caps frame rate at tick cadence.
                // Other events update state but batch renders to the next Tick.
                let marks_dirty = matches!(&event, UiEvent::Tick);

                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            // Only render if something changed
            if dirty {
                // Render - state is a separate field, no borrow conflict
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from all sources (terminal, inbox, tick timer).
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast polling keeps spinners smooth while requests are in flight or
        // the user is typing; slow polling saves CPU the rest of the time.
        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let needs_fast_poll = self.state.is_busy() || recent_terminal_activity;

        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Drain inbox - all async results arrive here
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Calculate time until next tick for poll duration.
        // This ensures we wake up exactly when Tick is due.
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());

        // Poll terminal events:
        // - If we already have events to process, do non-blocking poll (don't delay rendering)
        // - Otherwise, block until next tick is due (keeps input responsive while hitting tick cadence)
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        // Emit Tick after poll - we've now waited until the tick interval elapsed
        // (or woke early due to terminal input, in which case we check again)
        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    /// Executes effects returned by the reducer.
    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect, sending the result event to the inbox.
    ///
    /// This centralizes the spawn-and-send pattern: handlers become pure async
    /// functions that return `UiEvent`, while the runtime handles spawning.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Executes a single effect by dispatching to the appropriate handler.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            // Simple effects (inline)
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::DiscardSession => {
                // Synchronous cleanup after the backend rejected the token
                self.client.set_token(None);
                if let Err(err) = SessionStore::clear_at(&self.session_path) {
                    tracing::warn!("Failed to clear session file: {:#}", err);
                }
            }

            // Auth effects
            UiEffect::Bootstrap => {
                let client = Arc::clone(&self.client);
                let path = self.session_path.clone();
                self.spawn_effect(move || bootstrap_session(client, path));
            }
            UiEffect::Login(credentials) => {
                let client = Arc::clone(&self.client);
                let path = self.session_path.clone();
                self.spawn_effect(move || login(client, path, credentials));
            }
            UiEffect::Register(request) => {
                let client = Arc::clone(&self.client);
                self.spawn_effect(move || register(client, request));
            }
            UiEffect::Logout => {
                let client = Arc::clone(&self.client);
                let path = self.session_path.clone();
                self.spawn_effect(move || logout(client, path));
            }

            // Lead effects
            UiEffect::FetchLeads(start) => {
                let client = Arc::clone(&self.client);
                self.spawn_effect(move || fetch_leads(client, start));
            }
            UiEffect::FetchStatuses => {
                let client = Arc::clone(&self.client);
                self.spawn_effect(move || fetch_statuses(client));
            }
            UiEffect::SaveLead { id, draft } => {
                let client = Arc::clone(&self.client);
                self.spawn_effect(move || save_lead(client, id, draft));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

// ============================================================================
// Effect Handlers
// ============================================================================
// Pure async functions: they take what they need, do the work, and return
// the UiEvent carrying the outcome. The runtime owns spawning and delivery.

async fn bootstrap_session(client: Arc<ApiClient>, session_path: PathBuf) -> UiEvent {
    let result = session::bootstrap(&client, &session_path)
        .await
        .map_err(|err| format!("{err:#}"));
    UiEvent::BootstrapDone(result)
}

async fn login(
    client: Arc<ApiClient>,
    session_path: PathBuf,
    credentials: LoginRequest,
) -> UiEvent {
    let result = session::login(&client, &session_path, &credentials)
        .await
        .map_err(|err| match err.downcast_ref::<ApiError>() {
            Some(api) if is_rejection(api) => LOGIN_FAILED_MESSAGE.to_string(),
            _ => format!("{err:#}"),
        });
    UiEvent::LoginDone(result)
}

async fn register(client: Arc<ApiClient>, request: RegisterRequest) -> UiEvent {
    let result = client.register(&request).await.map_err(|err| {
        if is_rejection(&err) {
            REGISTER_FAILED_MESSAGE.to_string()
        } else {
            err.to_string()
        }
    });
    UiEvent::RegisterDone(result)
}

/// Credential and validation failures collapse to a fixed message so the
/// auth forms never echo backend internals; other failures (network, server
/// errors) are reported as-is.
fn is_rejection(err: &ApiError) -> bool {
    matches!(err.kind, ApiErrorKind::Auth | ApiErrorKind::Validation)
}

async fn logout(client: Arc<ApiClient>, session_path: PathBuf) -> UiEvent {
    if let Err(err) = session::logout(&client, &session_path).await {
        tracing::warn!("Logout cleanup failed: {:#}", err);
    }
    UiEvent::LogoutDone
}

async fn fetch_leads(client: Arc<ApiClient>, start: FetchStart) -> UiEvent {
    let result = client.list_leads(&start.query).await;
    UiEvent::LeadsPage {
        id: start.id,
        result,
    }
}

async fn fetch_statuses(client: Arc<ApiClient>) -> UiEvent {
    UiEvent::StatusesLoaded(client.list_statuses().await)
}

async fn save_lead(client: Arc<ApiClient>, id: Option<u64>, draft: LeadDraft) -> UiEvent {
    let result = match id {
        Some(id) => client.update_lead(id, &draft).await,
        None => client.create_lead(&draft).await,
    };
    UiEvent::LeadSaved(result)
}
