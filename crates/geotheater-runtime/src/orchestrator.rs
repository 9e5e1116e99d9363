//! Async dashboard orchestrator.
//!
//! Owns the [`DashboardSession`] and the [`InsightService`] in a tokio task.
//! The TUI sends [`DashboardCommand`]s and receives [`DashboardEvent`]s over
//! `mpsc` channels, so no mutable state is shared between the two.

use std::sync::Arc;
use std::time::Duration;

use geotheater_core::models::InsightReport;
use tokio::sync::mpsc;

use crate::insights::InsightService;
use crate::session::{DashboardSession, DashboardSnapshot};

// ── Public types ──────────────────────────────────────────────────────────────

/// Requests from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Fetch the log again and publish a new snapshot.
    Reload,
    /// Ask for a fresh insight report from the current statistics.
    RefreshInsights,
}

/// Updates forwarded to the presentation layer.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A reload has started.
    Loading,
    SnapshotReady(Arc<DashboardSnapshot>),
    /// An insight request has started.
    InsightsLoading,
    InsightsReady(InsightReport),
}

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Background coordinator for loading and insight requests.
pub struct DashboardOrchestrator {
    session: DashboardSession,
    insights: InsightService,
    /// Set once any insight report has been produced.
    insights_requested: bool,
}

impl DashboardOrchestrator {
    pub fn new(session: DashboardSession, insights: InsightService) -> Self {
        Self {
            session,
            insights,
            insights_requested: false,
        }
    }

    /// Spawn the orchestrator loop.
    ///
    /// Returns the command sender, the event receiver and a handle that can
    /// abort the task. The loop reloads immediately and exits once every
    /// command sender has been dropped.
    pub fn start(
        self,
    ) -> (
        mpsc::Sender<DashboardCommand>,
        mpsc::Receiver<DashboardEvent>,
        DashboardHandle,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.run(cmd_rx, event_tx).await;
        });

        (cmd_tx, event_rx, DashboardHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<DashboardCommand>,
        events: mpsc::Sender<DashboardEvent>,
    ) {
        tracing::info!(source = %self.session.source_description(), "dashboard orchestrator started");

        if !self.reload(&events).await {
            return;
        }

        while let Some(command) = commands.recv().await {
            tracing::debug!(?command, "dashboard command received");
            let delivered = match command {
                DashboardCommand::Reload => self.reload(&events).await,
                DashboardCommand::RefreshInsights => self.refresh_insights(&events).await,
            };
            if !delivered {
                break;
            }
        }

        tracing::debug!("dashboard orchestrator exiting");
    }

    /// Reload the session and publish the snapshot. Triggers the first
    /// insight request once non-empty data is available.
    ///
    /// Returns `false` when the event receiver is gone.
    async fn reload(&mut self, events: &mpsc::Sender<DashboardEvent>) -> bool {
        if events.send(DashboardEvent::Loading).await.is_err() {
            return false;
        }

        let snapshot = self.session.reload().await;
        let has_records = !snapshot.is_empty();

        if events
            .send(DashboardEvent::SnapshotReady(snapshot))
            .await
            .is_err()
        {
            tracing::warn!("failed to send snapshot; receiver dropped");
            return false;
        }

        if has_records && !self.insights_requested {
            return self.refresh_insights(events).await;
        }
        true
    }

    async fn refresh_insights(&mut self, events: &mpsc::Sender<DashboardEvent>) -> bool {
        if events.send(DashboardEvent::InsightsLoading).await.is_err() {
            return false;
        }

        let snapshot = self.session.snapshot();
        let report = self.insights.insights_or_fallback(&snapshot.stats).await;
        self.insights_requested = true;

        events.send(DashboardEvent::InsightsReady(report)).await.is_ok()
    }
}

// ── DashboardHandle ───────────────────────────────────────────────────────────

/// A handle to the background orchestrator task.
pub struct DashboardHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl DashboardHandle {
    /// Immediately abort the orchestrator loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait up to `grace` for the loop to exit on its own, then abort it.
    ///
    /// The loop stops by itself once the command sender and the event
    /// receiver are dropped. Returns `true` if it finished within `grace`.
    pub async fn shutdown(self, grace: Duration) -> bool {
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(grace, self.handle).await {
            Ok(_) => true,
            Err(_) => {
                tracing::warn!("dashboard orchestrator did not stop in time; aborting");
                abort.abort();
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
