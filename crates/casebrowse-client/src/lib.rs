//! # casebrowse-client
//!
//! HTTP implementation of [`casebrowse_core::CaseSource`].
//!
//! ```rust,no_run
//! use casebrowse_client::{ClientConfig, HttpCaseSource};
//! use casebrowse_core::{CaseSource, QueryState};
//!
//! # async fn demo() -> casebrowse_core::Result<()> {
//! let source = HttpCaseSource::new(ClientConfig::new("http://127.0.0.1:8000"))?;
//! let page = source.list_cases(&QueryState::default().to_request()).await?;
//! println!("{} matching cases", page.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;

pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use http::HttpCaseSource;
