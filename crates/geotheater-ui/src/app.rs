//! Main application state and TUI event loop for the Geotheater dashboard.
//!
//! [`App`] owns the theme, the latest snapshot and the insight panel state.
//! It consumes [`DashboardEvent`]s from the orchestrator and sends
//! [`DashboardCommand`]s back in response to key presses.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use geotheater_runtime::orchestrator::{DashboardCommand, DashboardEvent};
use geotheater_runtime::session::{DashboardSnapshot, DataOrigin};

use crate::dashboard_view::{self, DashboardViewData, InsightState};
use crate::themes::Theme;

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Send(DashboardCommand),
    Ignore,
}

pub struct App {
    pub theme: Theme,
    /// Description of the log source for the header.
    pub source: String,
    /// Latest snapshot, `None` until the first load completes.
    pub snapshot: Option<Arc<DashboardSnapshot>>,
    pub insight: InsightState,
    /// A reload is in flight.
    pub loading: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            snapshot: None,
            insight: InsightState::Pending,
            loading: true,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard TUI until the user quits or the orchestrator stops.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while orchestrator events arrive on
    /// the async channel via `try_recv`.
    ///
    /// Keys: `q`/`Q`/`Ctrl+C` quit, `r` reloads, `i` refreshes insights.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<DashboardEvent>,
        tx: mpsc::Sender<DashboardCommand>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match self.handle_key(key) {
                        KeyAction::Quit => break Ok(()),
                        KeyAction::Send(command) => {
                            if let Err(e) = tx.try_send(command) {
                                tracing::warn!(?command, error = %e, "dashboard command dropped");
                            }
                        }
                        KeyAction::Ignore => {}
                    },
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain pending orchestrator events (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(event) => self.apply_event(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Fold one orchestrator event into the application state.
    pub fn apply_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Loading => self.loading = true,
            DashboardEvent::SnapshotReady(snapshot) => {
                self.snapshot = Some(snapshot);
                self.loading = false;
            }
            DashboardEvent::InsightsLoading => self.insight = InsightState::Loading,
            DashboardEvent::InsightsReady(report) => self.insight = InsightState::Ready(report),
        }
    }

    /// Map a key press to an action. Release events are ignored.
    pub fn handle_key(&self, key: KeyEvent) -> KeyAction {
        if key.kind == KeyEventKind::Release {
            return KeyAction::Ignore;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') if !self.loading => {
                KeyAction::Send(DashboardCommand::Reload)
            }
            KeyCode::Char('i') | KeyCode::Char('I')
                if self.insight != InsightState::Loading && self.has_records() =>
            {
                KeyAction::Send(DashboardCommand::RefreshInsights)
            }
            _ => KeyAction::Ignore,
        }
    }

    /// Header status text, e.g. `"updated 08:30:12 | sample data"`.
    pub fn status_text(&self) -> String {
        match (&self.snapshot, self.loading) {
            (_, true) => "syncing…".to_string(),
            (None, false) => "no data".to_string(),
            (Some(snapshot), false) => {
                let time = snapshot
                    .loaded_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S");
                match snapshot.origin {
                    DataOrigin::Source => format!("updated {time}"),
                    DataOrigin::Fallback => format!("updated {time} · sample data"),
                }
            }
        }
    }

    fn has_records(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| !s.is_empty())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.snapshot {
            Some(ref snapshot) => {
                let status = self.status_text();
                let data = DashboardViewData {
                    source: &self.source,
                    status: &status,
                    snapshot,
                    insight: &self.insight,
                };
                dashboard_view::render_dashboard_view(frame, area, &data, &self.theme);
            }
            None => dashboard_view::render_loading(frame, area, &self.source, &self.theme),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
