//! # casebrowse-core
//!
//! Core types, traits, and pure state logic for casebrowse.
//!
//! This crate provides the record and facet data model, the query state,
//! the pagination calculator and the [`CaseSource`] trait that the client
//! and session crates build on. Nothing here performs I/O.

pub mod defaults;
pub mod error;
pub mod facets;
pub mod models;
pub mod pagination;
pub mod query;
pub mod traits;

// In-memory case source for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorClass, Result};
pub use facets::{normalize, FacetCatalog, FacetLists, FacetOption, RawFacetEntry, StructuredFacet};
pub use models::*;
pub use pagination::PageInfo;
pub use query::QueryState;
pub use traits::CaseSource;
