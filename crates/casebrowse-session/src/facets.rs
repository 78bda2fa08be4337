//! Facet catalog loading.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use casebrowse_core::{CaseSource, FacetLists};

use crate::event::{Notice, NoticeSource, SessionEvent};

/// Spawn one facet catalog load.
///
/// On success the normalized lists replace the published ones; on failure
/// the previous lists stay and one notice is emitted.
pub(crate) fn spawn_load(
    source: Arc<dyn CaseSource>,
    facets_tx: Arc<watch::Sender<FacetLists>>,
    event_tx: broadcast::Sender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(load(source, facets_tx, event_tx))
}

#[instrument(skip_all)]
async fn load(
    source: Arc<dyn CaseSource>,
    facets_tx: Arc<watch::Sender<FacetLists>>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    match source.list_facets().await {
        Ok(catalog) => {
            let lists = FacetLists::from(&catalog);
            let (centers, categories) = (lists.centers.len(), lists.categories.len());
            facets_tx.send_replace(lists);
            debug!(centers, categories, "Facets loaded");
            let _ = event_tx.send(SessionEvent::FacetsLoaded {
                centers,
                categories,
            });
        }
        Err(e) if e.is_cancelled() => {
            debug!("Facet load cancelled");
        }
        Err(e) => {
            warn!(status = e.status(), error = %e, "Facet load failed");
            let _ = event_tx.send(SessionEvent::Notification(Notice::from_error(
                NoticeSource::Facets,
                &e,
            )));
        }
    }
}
