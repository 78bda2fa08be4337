//! Query state: what the user currently wants to see.
//!
//! Every intent is a single transition on one value. Changing the text or a
//! facet restarts pagination in that same transition, so no observer ever
//! sees the new filter paired with the old offset.

use crate::defaults::PAGE_LIMIT;
use crate::models::ListCasesRequest;

/// Current search text, facet selections and page offset.
///
/// Cloning yields a snapshot; snapshots compare by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    text: String,
    center: String,
    category: String,
    limit: u64,
    offset: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PAGE_LIMIT)
    }
}

impl QueryState {
    /// Empty query with a fixed page size. A zero limit is raised to 1.
    pub fn new(limit: u64) -> Self {
        Self {
            text: String::new(),
            center: String::new(),
            category: String::new(),
            limit: limit.max(1),
            offset: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn center(&self) -> &str {
        &self.center
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Set the free-text query and restart pagination.
    ///
    /// Returns whether the state changed.
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = self.text != value || self.offset != 0;
        self.text = value;
        self.offset = 0;
        changed
    }

    /// Select a center ("" for all) and restart pagination.
    pub fn set_center(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = self.center != value || self.offset != 0;
        self.center = value;
        self.offset = 0;
        changed
    }

    /// Select a category ("" for all) and restart pagination.
    pub fn set_category(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = self.category != value || self.offset != 0;
        self.category = value;
        self.offset = 0;
        changed
    }

    /// Move to another page without touching the filters.
    ///
    /// Range clamping is the caller's job (see `pagination`); the value is
    /// only rounded down to a multiple of the page size.
    pub fn set_offset(&mut self, value: u64) -> bool {
        let value = value - value % self.limit;
        let changed = self.offset != value;
        self.offset = value;
        changed
    }

    /// Drop all filters and go back to the first page.
    pub fn clear_all(&mut self) -> bool {
        let cleared = Self::new(self.limit);
        let changed = *self != cleared;
        *self = cleared;
        changed
    }

    /// Same text, facets and page size; the offset may differ.
    pub fn same_filters(&self, other: &QueryState) -> bool {
        self.text == other.text
            && self.center == other.center
            && self.category == other.category
            && self.limit == other.limit
    }

    /// Build the list request for this snapshot.
    pub fn to_request(&self) -> ListCasesRequest {
        ListCasesRequest {
            text: self.text.clone(),
            center: self.center.clone(),
            category: self.category.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}
