//! Events published by a browse session.

use std::fmt;

use casebrowse_core::{Error, QueryState};

use crate::tracker::RequestToken;

/// What a user-visible notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    /// The case list request.
    Results,
    /// The facet catalog request.
    Facets,
}

/// One user-visible failure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub source: NoticeSource,
    pub message: String,
    /// HTTP status, when the failure carried one.
    pub status: Option<u16>,
}

impl Notice {
    pub fn from_error(source: NoticeSource, error: &Error) -> Self {
        Self {
            source,
            message: error.to_string(),
            status: error.status(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.source {
            NoticeSource::Results => "Could not load cases",
            NoticeSource::Facets => "Could not load filters",
        };
        write!(f, "{}: {}", what, self.message)
    }
}

/// Event emitted by a browse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The debounce elapsed and a list request was issued.
    FetchStarted {
        token: RequestToken,
        query: QueryState,
    },
    /// A current request's result was committed.
    Resolved {
        token: RequestToken,
        count: usize,
        total: u64,
    },
    /// A request was cancelled or its result discarded as stale.
    Superseded { token: RequestToken },
    /// A current request failed. Followed by exactly one `Notification`.
    Failed { token: RequestToken, error: Error },
    /// User-visible failure notice.
    Notification(Notice),
    /// Facet lists were (re)loaded.
    FacetsLoaded { centers: usize, categories: usize },
    /// The session was torn down.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_from_http_error() {
        let notice = Notice::from_error(NoticeSource::Results, &Error::http(500, "boom"));
        assert_eq!(notice.status, Some(500));
        assert_eq!(notice.to_string(), "Could not load cases: HTTP 500: boom");
    }

    #[test]
    fn test_notice_from_network_error() {
        let notice = Notice::from_error(
            NoticeSource::Facets,
            &Error::Request("connection refused".into()),
        );
        assert_eq!(notice.status, None);
        assert!(notice.to_string().starts_with("Could not load filters"));
    }
}
