//! In-memory case source for deterministic testing.
//!
//! Filters a fixed record set the way the real API does (substring match on
//! behavior/scene text, exact match on center and category) and can be
//! scripted with per-query latency and failures.
//!
//! ```ignore
//! use casebrowse_core::mock::MockCaseSource;
//! use casebrowse_core::{CaseRecord, CaseSource, ListCasesRequest};
//!
//! # async fn demo() {
//! let source = MockCaseSource::new()
//!     .with_cases(vec![CaseRecord::new("c-1")])
//!     .with_latency_ms(50);
//!
//! let req = ListCasesRequest { limit: 20, ..Default::default() };
//! let list = source.list_cases(&req).await.unwrap();
//! assert_eq!(list.total, 1);
//! assert_eq!(source.list_call_count(), 1);
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::facets::FacetCatalog;
use crate::models::{CaseDetail, CaseList, CaseRecord, ListCasesRequest};
use crate::traits::CaseSource;

/// Scripted in-memory data source.
#[derive(Clone, Default)]
pub struct MockCaseSource {
    config: Arc<MockConfig>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    cases: Vec<CaseRecord>,
    facets: FacetCatalog,
    latency_ms: u64,
    text_latency_ms: HashMap<String, u64>,
    facet_error: Option<Error>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<MockCall>,
    list_failures: VecDeque<Error>,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListCases(ListCasesRequest),
    ListFacets,
    GetCase(String),
}

impl MockCaseSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records served by list and detail calls.
    pub fn with_cases(mut self, cases: Vec<CaseRecord>) -> Self {
        Arc::make_mut(&mut self.config).cases = cases;
        self
    }

    /// Facet catalog served by `list_facets`.
    pub fn with_facets(mut self, facets: FacetCatalog) -> Self {
        Arc::make_mut(&mut self.config).facets = facets;
        self
    }

    /// Simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Latency override for list calls whose text filter equals `text`.
    pub fn with_text_latency_ms(mut self, text: impl Into<String>, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config)
            .text_latency_ms
            .insert(text.into(), latency_ms);
        self
    }

    /// Make every `list_facets` call fail with `error`.
    pub fn with_facet_error(mut self, error: Error) -> Self {
        Arc::make_mut(&mut self.config).facet_error = Some(error);
        self
    }

    /// Queue a failure for the next list call that reaches the source.
    pub fn fail_next_list(&self, error: Error) {
        self.state().list_failures.push_back(error);
    }

    /// All calls received, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// List requests received, in order.
    pub fn list_requests(&self) -> Vec<ListCasesRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::ListCases(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_requests().len()
    }

    pub fn facet_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::ListFacets))
            .count()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_call(&self, call: MockCall) {
        self.state().calls.push(call);
    }

    async fn simulate_latency(&self, latency_ms: u64) {
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }
    }

    fn matches(req: &ListCasesRequest, case: &CaseRecord) -> bool {
        if !req.center.is_empty() && case.center_code.as_deref() != Some(req.center.as_str()) {
            return false;
        }
        if !req.category.is_empty() && case.category.as_deref() != Some(req.category.as_str()) {
            return false;
        }
        if !req.text.is_empty() {
            let needle = req.text.to_lowercase();
            let hit = [&case.behavior, &case.scene]
                .iter()
                .filter_map(|field| field.as_deref())
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl CaseSource for MockCaseSource {
    async fn list_cases(&self, req: &ListCasesRequest) -> Result<CaseList> {
        self.log_call(MockCall::ListCases(req.clone()));

        let latency = self
            .config
            .text_latency_ms
            .get(&req.text)
            .copied()
            .unwrap_or(self.config.latency_ms);
        self.simulate_latency(latency).await;

        if let Some(error) = self.state().list_failures.pop_front() {
            return Err(error);
        }

        let matching: Vec<&CaseRecord> = self
            .config
            .cases
            .iter()
            .filter(|case| Self::matches(req, case))
            .collect();

        let items = matching
            .iter()
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .map(|case| (*case).clone())
            .collect();

        Ok(CaseList {
            total: matching.len() as u64,
            items,
        })
    }

    async fn list_facets(&self) -> Result<FacetCatalog> {
        self.log_call(MockCall::ListFacets);
        self.simulate_latency(self.config.latency_ms).await;

        match &self.config.facet_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.config.facets.clone()),
        }
    }

    async fn get_case(&self, case_id: &str) -> Result<CaseDetail> {
        self.log_call(MockCall::GetCase(case_id.to_string()));
        self.simulate_latency(self.config.latency_ms).await;

        self.config
            .cases
            .iter()
            .find(|case| case.case_id.as_str() == case_id)
            .map(|case| CaseDetail {
                record: case.clone(),
                extra: Default::default(),
            })
            .ok_or_else(|| Error::http(404, "Case not found"))
    }
}
