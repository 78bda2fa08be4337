//! Core traits for casebrowse abstractions.
//!
//! The session layer only talks to a [`CaseSource`], so an HTTP client, an
//! in-memory fixture or a test double can be injected interchangeably.

use async_trait::async_trait;

use crate::error::Result;
use crate::facets::FacetCatalog;
use crate::models::{CaseDetail, CaseList, ListCasesRequest};

/// Remote collection of case records.
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// List records matching the request's filters and page window.
    async fn list_cases(&self, req: &ListCasesRequest) -> Result<CaseList>;

    /// List the available facet options, in raw shape.
    async fn list_facets(&self) -> Result<FacetCatalog>;

    /// Fetch one record with all of its columns.
    async fn get_case(&self, case_id: &str) -> Result<CaseDetail>;
}
