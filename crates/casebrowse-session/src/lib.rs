//! # casebrowse-session
//!
//! Keeps a case list in step with what the user is asking for.
//!
//! This crate provides:
//! - A debounced request orchestrator that aborts superseded requests
//! - Stale-response rejection through request tokens
//! - Facet catalog loading and normalization
//! - Session events via broadcast channels
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use casebrowse_client::HttpCaseSource;
//! use casebrowse_session::{BrowseSession, SessionConfig, SessionEvent};
//!
//! let source = Arc::new(HttpCaseSource::from_env()?);
//! let session = BrowseSession::start(source, SessionConfig::from_env());
//!
//! let mut events = session.events();
//! session.set_text("bicycle");
//!
//! while let Ok(event) = events.recv().await {
//!     if let SessionEvent::Resolved { total, .. } = event {
//!         println!("{} matching cases", total);
//!         break;
//!     }
//! }
//!
//! session.shutdown().await?;
//! ```

pub mod config;
pub mod event;
mod facets;
pub mod orchestrator;
pub mod session;
pub mod tracker;

pub use config::SessionConfig;
pub use event::{Notice, NoticeSource, SessionEvent};
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use session::BrowseSession;
pub use tracker::{Commit, RequestToken, RequestTracker};
