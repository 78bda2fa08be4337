//! Browse session: the surface a presentation layer talks to.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use casebrowse_core::{CaseSource, FacetLists, PageInfo, QueryState, Result, ResultState};

use crate::config::SessionConfig;
use crate::event::SessionEvent;
use crate::facets;
use crate::orchestrator::{Orchestrator, OrchestratorHandle};

/// One browsing session over a case source.
///
/// Intent methods mutate the query state in a single transition and return
/// whether it changed. Unchanged intents trigger no request.
pub struct BrowseSession {
    source: Arc<dyn CaseSource>,
    query_tx: watch::Sender<QueryState>,
    results_rx: watch::Receiver<ResultState>,
    facets_tx: Arc<watch::Sender<FacetLists>>,
    event_tx: broadcast::Sender<SessionEvent>,
    orchestrator: OrchestratorHandle,
    facet_task: JoinHandle<()>,
}

impl BrowseSession {
    /// Start a session: spawns the request orchestrator and the initial
    /// facet load. Must be called inside a tokio runtime.
    pub fn start(source: Arc<dyn CaseSource>, config: SessionConfig) -> Self {
        let (query_tx, query_rx) = watch::channel(QueryState::new(config.page_limit));
        let (results_tx, results_rx) = watch::channel(ResultState::default());
        let (facets_tx, _) = watch::channel(FacetLists::default());
        let facets_tx = Arc::new(facets_tx);
        let (event_tx, _) = broadcast::channel(config.event_capacity);

        let orchestrator = Orchestrator::new(
            source.clone(),
            config.debounce(),
            query_rx,
            results_tx,
            event_tx.clone(),
        )
        .start();

        let facet_task = facets::spawn_load(source.clone(), facets_tx.clone(), event_tx.clone());

        info!(
            debounce_ms = config.debounce_ms,
            page_limit = config.page_limit,
            "Browse session started"
        );

        Self {
            source,
            query_tx,
            results_rx,
            facets_tx,
            event_tx,
            orchestrator,
            facet_task,
        }
    }

    // ---- reads -------------------------------------------------------------

    /// Current query snapshot.
    pub fn query(&self) -> QueryState {
        self.query_tx.borrow().clone()
    }

    /// Current result state.
    pub fn results(&self) -> ResultState {
        self.results_rx.borrow().clone()
    }

    /// Current normalized facet lists.
    pub fn facets(&self) -> FacetLists {
        self.facets_tx.borrow().clone()
    }

    /// Navigation for the current total and offset.
    pub fn page_info(&self) -> PageInfo {
        let query = self.query_tx.borrow();
        PageInfo::compute(self.results_rx.borrow().total, query.limit(), query.offset())
    }

    pub fn subscribe_results(&self) -> watch::Receiver<ResultState> {
        self.results_rx.clone()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<QueryState> {
        self.query_tx.subscribe()
    }

    pub fn subscribe_facets(&self) -> watch::Receiver<FacetLists> {
        self.facets_tx.subscribe()
    }

    /// Receiver for session events.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// The data source this session reads from.
    pub fn source(&self) -> &Arc<dyn CaseSource> {
        &self.source
    }

    // ---- intents -----------------------------------------------------------

    pub fn set_text(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.query_tx.send_if_modified(|q| q.set_text(value))
    }

    pub fn set_center(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.query_tx.send_if_modified(|q| q.set_center(value))
    }

    pub fn set_category(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.query_tx.send_if_modified(|q| q.set_category(value))
    }

    /// Jump to `offset`, clamped to the current result's page range.
    ///
    /// Refused while the committed result belongs to other filters, since its
    /// total says nothing about the range of the query being fetched.
    pub fn set_offset(&self, offset: u64) -> bool {
        if !self.results_rx.borrow().describes(&self.query_tx.borrow()) {
            debug!(offset, "Result not committed for current filters, ignoring page change");
            return false;
        }
        let offset = self.page_info().clamp_offset(offset);
        self.query_tx.send_if_modified(|q| q.set_offset(offset))
    }

    pub fn clear_all(&self) -> bool {
        self.query_tx.send_if_modified(|q| q.clear_all())
    }

    /// Go to the next page, if there is one.
    pub fn next_page(&self) -> bool {
        let info = self.page_info();
        info.can_next && self.set_offset(info.next_offset)
    }

    /// Go to the previous page, if there is one.
    pub fn prev_page(&self) -> bool {
        let info = self.page_info();
        info.can_prev && self.set_offset(info.prev_offset)
    }

    /// Go to a 1-based page number, clamped to the valid range.
    pub fn go_to_page(&self, page: u64) -> bool {
        let offset = self.page_info().offset_of_page(page);
        self.set_offset(offset)
    }

    // ---- lifecycle ---------------------------------------------------------

    /// Load the facet catalog again, cancelling a load still running.
    pub fn reload_facets(&mut self) {
        self.facet_task.abort();
        debug!("Reloading facets");
        self.facet_task = facets::spawn_load(
            self.source.clone(),
            self.facets_tx.clone(),
            self.event_tx.clone(),
        );
    }

    /// Tear the session down: cancels the pending debounce, any in-flight
    /// request and any facet load, then emits `Stopped`.
    pub async fn shutdown(self) -> Result<()> {
        self.facet_task.abort();
        self.orchestrator.shutdown().await?;
        info!("Browse session stopped");
        Ok(())
    }
}
