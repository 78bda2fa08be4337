//! Record and list payload types exchanged with the case data source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::defaults::MISSING_FIELD_PLACEHOLDER;
use crate::query::QueryState;

/// Unique record identifier, used as render and navigation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the case list.
///
/// Only `case_id` is guaranteed. Every display field may be null or missing
/// upstream; use the `display_*` accessors to get the placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: CaseId,
    /// Organizational unit (center) code.
    #[serde(rename = "CenterCode", default)]
    pub center_code: Option<String>,
    /// Behavior narrative.
    #[serde(rename = "CaseBehavior", default)]
    pub behavior: Option<String>,
    /// Scene/location description.
    #[serde(rename = "SceneDescription", default)]
    pub scene: Option<String>,
    /// Category label.
    #[serde(rename = "CaseCategoryName", default)]
    pub category: Option<String>,
    /// Station label.
    #[serde(rename = "PoliceStationName", default)]
    pub station: Option<String>,
    /// Province label.
    #[serde(rename = "ProvinceName", default)]
    pub province: Option<String>,
}

fn or_placeholder(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => MISSING_FIELD_PLACEHOLDER,
    }
}

impl CaseRecord {
    /// Minimal record with only an identifier.
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: CaseId::new(case_id),
            center_code: None,
            behavior: None,
            scene: None,
            category: None,
            station: None,
            province: None,
        }
    }

    pub fn display_center(&self) -> &str {
        or_placeholder(&self.center_code)
    }

    pub fn display_behavior(&self) -> &str {
        or_placeholder(&self.behavior)
    }

    pub fn display_scene(&self) -> &str {
        or_placeholder(&self.scene)
    }

    pub fn display_category(&self) -> &str {
        or_placeholder(&self.category)
    }

    pub fn display_station(&self) -> &str {
        or_placeholder(&self.station)
    }

    pub fn display_province(&self) -> &str {
        or_placeholder(&self.province)
    }
}

/// Full record returned by the detail endpoint.
///
/// Columns beyond the list fields are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDetail {
    #[serde(flatten)]
    pub record: CaseRecord,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// Filters for one list request.
///
/// Empty strings mean "no filter" and are omitted from the outgoing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCasesRequest {
    pub text: String,
    pub center: String,
    pub category: String,
    pub limit: u64,
    pub offset: u64,
}

impl ListCasesRequest {
    /// Query parameters to send, skipping empty filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if !self.text.is_empty() {
            pairs.push(("q", self.text.clone()));
        }
        if !self.center.is_empty() {
            pairs.push(("center", self.center.clone()));
        }
        if !self.category.is_empty() {
            pairs.push(("category", self.category.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

/// Response of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseList {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<CaseRecord>,
}

/// What the browse view currently shows.
///
/// `items`, `total` and `query` only ever change together, from one
/// successful response. Failures flip `errored` and leave them alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultState {
    pub items: Vec<CaseRecord>,
    pub total: u64,
    pub loading: bool,
    pub errored: bool,
    /// Snapshot that produced `items` and `total`. None until the first
    /// success.
    pub query: Option<QueryState>,
}

impl ResultState {
    /// True once a request finished with nothing to show.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty()
    }

    /// Whether `total` describes `query`'s filters, so its page bounds apply.
    pub fn describes(&self, query: &QueryState) -> bool {
        self.query
            .as_ref()
            .is_some_and(|committed| committed.same_filters(query))
    }
}
