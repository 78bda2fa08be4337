//! Request orchestrator: turns query snapshots into committed results.
//!
//! One task owns the debounce deadline, the in-flight request and the
//! [`RequestTracker`]. It reacts to three things:
//! - a new query snapshot: drop the pending deadline, abort the in-flight
//!   request, arm a fresh deadline
//! - the deadline: raise `loading` and issue the request under a new token
//! - the request finishing: commit through the tracker
//!
//! Query snapshots arrive on a `watch` channel, so bursts collapse into the
//! latest value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, instrument, trace, warn};

use casebrowse_core::{CaseList, CaseSource, Error, QueryState, Result, ResultState};

use crate::event::{Notice, NoticeSource, SessionEvent};
use crate::tracker::{Commit, RequestToken, RequestTracker};

/// A list request currently on the wire.
struct InFlight {
    token: RequestToken,
    query: QueryState,
    started: Instant,
    task: JoinHandle<Result<CaseList>>,
}

/// Handle for stopping a running orchestrator.
pub struct OrchestratorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Cancel pending work and wait for the task to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("Failed to send shutdown signal".into()))?;
        self.task
            .await
            .map_err(|e| Error::Internal(format!("Orchestrator task failed: {}", e)))
    }
}

/// Debounced, cancelling request loop for one session.
pub struct Orchestrator {
    source: Arc<dyn CaseSource>,
    debounce: Duration,
    query_rx: watch::Receiver<QueryState>,
    results_tx: watch::Sender<ResultState>,
    event_tx: broadcast::Sender<SessionEvent>,
    tracker: RequestTracker,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn CaseSource>,
        debounce: Duration,
        query_rx: watch::Receiver<QueryState>,
        results_tx: watch::Sender<ResultState>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            source,
            debounce,
            query_rx,
            results_tx,
            event_tx,
            tracker: RequestTracker::new(),
        }
    }

    /// Spawn the loop and return a handle for teardown.
    pub fn start(self) -> OrchestratorHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));
        OrchestratorHandle { shutdown_tx, task }
    }

    #[instrument(skip_all, fields(debounce_ms = self.debounce.as_millis() as u64))]
    async fn run(mut self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!("Request orchestrator started");

        // The initial snapshot goes through the same debounce as any change.
        let mut last_seen = self.query_rx.borrow_and_update().clone();
        let mut pending = Some(last_seen.clone());
        let mut deadline = Some(Instant::now() + self.debounce);
        let mut in_flight: Option<InFlight> = None;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Request orchestrator received shutdown signal");
                    break;
                }
                changed = self.query_rx.changed() => {
                    if changed.is_err() {
                        info!("Query channel closed");
                        break;
                    }
                    let snapshot = self.query_rx.borrow_and_update().clone();
                    if snapshot == last_seen {
                        trace!("Snapshot unchanged, ignoring");
                        continue;
                    }
                    last_seen = snapshot.clone();

                    if let Some(flight) = in_flight.take() {
                        self.supersede(flight);
                    }
                    debug!(
                        query = %snapshot.text(),
                        center = %snapshot.center(),
                        category = %snapshot.category(),
                        offset = snapshot.offset(),
                        "Debounce armed"
                    );
                    pending = Some(snapshot);
                    deadline = Some(Instant::now() + self.debounce);
                }
                _ = wait_deadline(deadline) => {
                    deadline = None;
                    if let Some(snapshot) = pending.take() {
                        in_flight = Some(self.issue(snapshot));
                    }
                }
                joined = join_in_flight(&mut in_flight) => {
                    if let Some(flight) = in_flight.take() {
                        self.finish(flight, joined);
                    }
                }
            }
        }

        if let Some(flight) = in_flight.take() {
            self.supersede(flight);
        }
        // Nothing is on the wire any more.
        self.results_tx
            .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        let _ = self.event_tx.send(SessionEvent::Stopped);
        info!("Request orchestrator stopped");
    }

    /// Start the list request for `snapshot` under a fresh token.
    fn issue(&mut self, snapshot: QueryState) -> InFlight {
        let token = self.tracker.issue();
        self.results_tx.send_modify(|state| state.loading = true);

        debug!(
            token = token.get(),
            query = %snapshot.text(),
            offset = snapshot.offset(),
            "Fetch issued"
        );
        let _ = self.event_tx.send(SessionEvent::FetchStarted {
            token,
            query: snapshot.clone(),
        });

        let source = self.source.clone();
        let req = snapshot.to_request();
        let task = tokio::spawn(async move { source.list_cases(&req).await });

        InFlight {
            token,
            query: snapshot,
            started: Instant::now(),
            task,
        }
    }

    /// Abort an in-flight request and make its token stale.
    fn supersede(&mut self, flight: InFlight) {
        flight.task.abort();
        if self.tracker.is_current(flight.token) {
            self.tracker.invalidate();
        }
        debug!(token = flight.token.get(), "Fetch superseded");
        let _ = self
            .event_tx
            .send(SessionEvent::Superseded { token: flight.token });
    }

    /// Reduce a finished request into the result state and publish events.
    fn finish(
        &mut self,
        flight: InFlight,
        joined: std::result::Result<Result<CaseList>, JoinError>,
    ) {
        let token = flight.token;
        let duration_ms = flight.started.elapsed().as_millis() as u64;

        let outcome = joined.unwrap_or_else(|e| {
            if e.is_cancelled() {
                Err(Error::Cancelled)
            } else {
                error!(token = token.get(), error = %e, "Fetch task panicked");
                Err(Error::Internal(format!("Fetch task failed: {}", e)))
            }
        });

        let tracker = &mut self.tracker;
        let query = flight.query;
        let mut commit = Commit::Superseded;
        self.results_tx.send_if_modified(|state| {
            commit = tracker.commit(token, query, outcome, state);
            commit.mutated()
        });

        match commit {
            Commit::Resolved { count, total } => {
                debug!(
                    token = token.get(),
                    result_count = count,
                    total,
                    duration_ms,
                    "Fetch resolved"
                );
                let _ = self
                    .event_tx
                    .send(SessionEvent::Resolved { token, count, total });
            }
            Commit::Failed(err) => {
                warn!(
                    token = token.get(),
                    status = err.status(),
                    error = %err,
                    duration_ms,
                    "Fetch failed"
                );
                let notice = Notice::from_error(NoticeSource::Results, &err);
                let _ = self.event_tx.send(SessionEvent::Failed { token, error: err });
                let _ = self.event_tx.send(SessionEvent::Notification(notice));
            }
            Commit::Superseded => {
                debug!(token = token.get(), "Stale result discarded");
                let _ = self.event_tx.send(SessionEvent::Superseded { token });
            }
        }
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn join_in_flight(
    in_flight: &mut Option<InFlight>,
) -> std::result::Result<Result<CaseList>, JoinError> {
    match in_flight {
        Some(flight) => (&mut flight.task).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebrowse_core::mock::MockCaseSource;
    use casebrowse_core::CaseRecord;

    struct Harness {
        source: MockCaseSource,
        query_tx: watch::Sender<QueryState>,
        results_rx: watch::Receiver<ResultState>,
        events: broadcast::Receiver<SessionEvent>,
        handle: OrchestratorHandle,
    }

    fn start(source: MockCaseSource) -> Harness {
        let (query_tx, query_rx) = watch::channel(QueryState::default());
        let (results_tx, results_rx) = watch::channel(ResultState::default());
        let (event_tx, events) = broadcast::channel(64);
        let handle = Orchestrator::new(
            Arc::new(source.clone()),
            Duration::from_millis(400),
            query_rx,
            results_tx,
            event_tx,
        )
        .start();
        Harness {
            source,
            query_tx,
            results_rx,
            events,
            handle,
        }
    }

    fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = events.try_recv() {
            out.push(ev);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_snapshot_is_debounced() {
        let h = start(MockCaseSource::new().with_cases(vec![CaseRecord::new("c-1")]));

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(h.source.list_call_count(), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.source.list_call_count(), 1);
        assert_eq!(h.results_rx.borrow().total, 1);

        h.handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_raised_when_fetch_starts() {
        let h = start(MockCaseSource::new().with_latency_ms(200));

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(h.results_rx.borrow().loading);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!h.results_rx.borrow().loading);

        h.handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_snapshot_does_not_refetch() {
        let mut h = start(MockCaseSource::new());
        tokio::time::sleep(Duration::from_millis(500)).await;

        // Same value, forced notification.
        h.query_tx.send_replace(QueryState::default());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(h.source.list_call_count(), 1);
        let started = drain(&mut h.events)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::FetchStarted { .. }))
            .count();
        assert_eq!(started, 1);

        h.handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_aborts_in_flight_request() {
        let mut h = start(
            MockCaseSource::new()
                .with_cases(vec![CaseRecord::new("c-1")])
                .with_latency_ms(1_000),
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(h.source.list_call_count(), 1);

        h.query_tx.send_modify(|q| {
            q.set_text("x");
        });
        tokio::time::sleep(Duration::from_secs(3)).await;

        let events = drain(&mut h.events);
        let superseded = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Superseded { .. }))
            .count();
        let resolved = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Resolved { .. }))
            .count();
        assert_eq!(superseded, 1);
        assert_eq!(resolved, 1);
        assert_eq!(h.source.list_requests()[1].text, "x");

        h.handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_timer() {
        let mut h = start(MockCaseSource::new());

        tokio::time::sleep(Duration::from_millis(100)).await;
        h.handle.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(h.source.list_call_count(), 0);
        assert_eq!(drain(&mut h.events), vec![SessionEvent::Stopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_clears_loading() {
        let h = start(MockCaseSource::new().with_latency_ms(1_000));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(h.results_rx.borrow().loading);

        h.handle.shutdown().await.unwrap();
        let results = h.results_rx.borrow();
        assert!(!results.loading);
        assert!(!results.errored);
        assert_eq!(results.query, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_result_records_its_query() {
        let h = start(MockCaseSource::new().with_cases(vec![CaseRecord::new("c-1")]));
        tokio::time::sleep(Duration::from_millis(500)).await;

        h.query_tx.send_modify(|q| {
            q.set_text("c");
        });
        assert_eq!(h.results_rx.borrow().query, Some(QueryState::default()));

        tokio::time::sleep(Duration::from_millis(500)).await;
        let committed = h.results_rx.borrow().query.clone();
        assert_eq!(committed.map(|q| q.text().to_string()), Some("c".into()));

        h.handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_query_sender_stops_loop() {
        let mut h = start(MockCaseSource::new());
        drop(h.query_tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(drain(&mut h.events), vec![SessionEvent::Stopped]);
        assert!(h.handle.task.is_finished());
    }
}
