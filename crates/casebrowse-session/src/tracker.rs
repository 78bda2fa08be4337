//! Request tokens and result reduction.
//!
//! Every issued list request gets a fresh [`RequestToken`]. At most one token
//! is current; a response is committed only while its token is still current,
//! so an older request that finishes late can never overwrite a newer one.

use std::fmt;

use casebrowse_core::{CaseList, Error, QueryState, ResultState, Result};

/// Generation number of one issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a finished request was applied to the result state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Items and total replaced.
    Resolved { count: usize, total: u64 },
    /// Error flag raised; items and total untouched.
    Failed(Error),
    /// Stale or cancelled; nothing changed.
    Superseded,
}

impl Commit {
    /// Whether the result state was modified.
    pub fn mutated(&self) -> bool {
        !matches!(self, Commit::Superseded)
    }
}

/// Owner of the current-request slot.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    current: Option<RequestToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token and make it current. Any previous token goes stale.
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        token
    }

    /// Make every issued token stale.
    pub fn invalidate(&mut self) -> Option<RequestToken> {
        self.current.take()
    }

    pub fn current(&self) -> Option<RequestToken> {
        self.current
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Apply a finished request for `query` to `state`.
    ///
    /// A stale token, or a cancellation, changes nothing. Success replaces
    /// items, total and the committed query together; failure keeps them and
    /// raises `errored`.
    pub fn commit(
        &mut self,
        token: RequestToken,
        query: QueryState,
        outcome: Result<CaseList>,
        state: &mut ResultState,
    ) -> Commit {
        if !self.is_current(token) {
            return Commit::Superseded;
        }

        match outcome {
            Err(e) if e.is_cancelled() => Commit::Superseded,
            Ok(list) => {
                self.current = None;
                let count = list.items.len();
                state.items = list.items;
                state.total = list.total;
                state.query = Some(query);
                state.loading = false;
                state.errored = false;
                Commit::Resolved {
                    count,
                    total: list.total,
                }
            }
            Err(e) => {
                self.current = None;
                state.loading = false;
                state.errored = true;
                Commit::Failed(e)
            }
        }
    }
}
