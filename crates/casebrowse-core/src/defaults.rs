//! Centralized default constants for casebrowse.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Page size used by the browse view. Fixed for the lifetime of a session.
pub const PAGE_LIMIT: u64 = 20;

// =============================================================================
// REQUEST ORCHESTRATION
// =============================================================================

/// Quiet period the query must hold before a list request is issued.
pub const DEBOUNCE_MS: u64 = 400;

/// Broadcast channel capacity for session events.
pub const EVENT_BUS_CAPACITY: usize = 256;

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Default API base URL.
pub const API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Timeout applied to every data source request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Maximum characters of a non-JSON error body kept in an error message.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// =============================================================================
// DISPLAY
// =============================================================================

/// Shown in place of absent record fields.
pub const MISSING_FIELD_PLACEHOLDER: &str = "-";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit_positive() {
        assert!(PAGE_LIMIT > 0);
    }

    #[test]
    fn test_timeout_is_bounded() {
        assert!((10..=30).contains(&REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_api_base_url_is_http() {
        assert!(API_BASE_URL.starts_with("http://") || API_BASE_URL.starts_with("https://"));
    }
}
