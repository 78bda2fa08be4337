//! Session configuration.

use std::time::Duration;

use casebrowse_core::defaults::{DEBOUNCE_MS, EVENT_BUS_CAPACITY, PAGE_LIMIT};

/// Configuration for a browse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period before a query change turns into a request.
    pub debounce_ms: u64,
    /// Records per page. Fixed for the session's lifetime.
    pub page_limit: u64,
    /// Capacity of the session event channel.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            page_limit: PAGE_LIMIT,
            event_capacity: EVENT_BUS_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `CASEBROWSE_DEBOUNCE_MS` | `400` | Debounce delay |
    /// | `CASEBROWSE_PAGE_LIMIT` | `20` | Records per page |
    pub fn from_env() -> Self {
        let debounce_ms = std::env::var("CASEBROWSE_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEBOUNCE_MS);

        let page_limit = std::env::var("CASEBROWSE_PAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(PAGE_LIMIT)
            .max(1);

        Self {
            debounce_ms,
            page_limit,
            ..Self::default()
        }
    }

    /// Set the debounce delay.
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the page size. Zero is raised to 1.
    pub fn with_page_limit(mut self, limit: u64) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Set the event channel capacity. Zero is raised to 1.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.debounce_ms, 400);
        assert_eq!(config.page_limit, 20);
        assert_eq!(config.event_capacity, EVENT_BUS_CAPACITY);
        assert_eq!(config.debounce(), Duration::from_millis(400));
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::default()
            .with_debounce_ms(50)
            .with_page_limit(10)
            .with_event_capacity(8);
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.page_limit, 10);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_session_config_zero_values_raised() {
        let config = SessionConfig::default()
            .with_page_limit(0)
            .with_event_capacity(0);
        assert_eq!(config.page_limit, 1);
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_session_config_zero_debounce_allowed() {
        let config = SessionConfig::default().with_debounce_ms(0);
        assert_eq!(config.debounce(), Duration::ZERO);
    }
}
