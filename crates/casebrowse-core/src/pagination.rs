//! Page arithmetic for offset-based list navigation.

use serde::Serialize;

/// Navigation affordances derived from `(total, limit, offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based current page, always within `1..=page_count`.
    pub page: u64,
    /// At least 1, even for an empty result.
    pub page_count: u64,
    pub can_prev: bool,
    pub can_next: bool,
    pub prev_offset: u64,
    pub next_offset: u64,
    pub limit: u64,
}

impl PageInfo {
    /// Compute navigation for a result of `total` records viewed at `offset`.
    ///
    /// A zero `limit` is treated as 1.
    pub fn compute(total: u64, limit: u64, offset: u64) -> Self {
        let limit = limit.max(1);
        let page_count = total.div_ceil(limit).max(1);
        let last_offset = (page_count - 1) * limit;
        let page = (offset / limit + 1).min(page_count);

        Self {
            page,
            page_count,
            can_prev: offset > 0,
            can_next: page < page_count,
            prev_offset: offset.saturating_sub(limit),
            next_offset: offset.saturating_add(limit).min(last_offset),
            limit,
        }
    }

    /// Offset of the first record of the last page.
    pub fn last_offset(&self) -> u64 {
        (self.page_count - 1) * self.limit
    }

    /// Clamp an arbitrary offset into `[0, last_offset]`.
    pub fn clamp_offset(&self, offset: u64) -> u64 {
        offset.min(self.last_offset())
    }

    /// Offset of a 1-based page number, clamped to the valid range.
    pub fn offset_of_page(&self, page: u64) -> u64 {
        self.clamp_offset(page.saturating_sub(1).saturating_mul(self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let info = PageInfo::compute(47, 20, 20);
        assert_eq!(info.page, 2);
        assert_eq!(info.page_count, 3);
        assert!(info.can_prev);
        assert!(info.can_next);
        assert_eq!(info.prev_offset, 0);
        assert_eq!(info.next_offset, 40);
    }

    #[test]
    fn test_empty_result() {
        let info = PageInfo::compute(0, 20, 0);
        assert_eq!(info.page, 1);
        assert_eq!(info.page_count, 1);
        assert!(!info.can_prev);
        assert!(!info.can_next);
        assert_eq!(info.prev_offset, 0);
        assert_eq!(info.next_offset, 0);
    }

    #[test]
    fn test_last_page() {
        let info = PageInfo::compute(47, 20, 40);
        assert_eq!(info.page, 3);
        assert!(!info.can_next);
        assert_eq!(info.next_offset, 40);
        assert_eq!(info.prev_offset, 20);
    }

    #[test]
    fn test_exact_multiple() {
        let info = PageInfo::compute(40, 20, 0);
        assert_eq!(info.page_count, 2);
        assert_eq!(info.next_offset, 20);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let info = PageInfo::compute(47, 20, 400);
        assert_eq!(info.page, 3);
        assert!(!info.can_next);
        assert_eq!(info.next_offset, 40);
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        let info = PageInfo::compute(3, 0, 1);
        assert_eq!(info.limit, 1);
        assert_eq!(info.page_count, 3);
        assert_eq!(info.page, 2);
    }

    #[test]
    fn test_page_always_in_range() {
        for total in [0u64, 1, 19, 20, 21, 47, 100, 1_001] {
            for limit in [1u64, 7, 20, 50] {
                for offset in [0u64, 1, 19, 20, 40, 99, 5_000] {
                    let info = PageInfo::compute(total, limit, offset);
                    assert!(info.page >= 1, "{total}/{limit}/{offset}");
                    assert!(info.page <= info.page_count, "{total}/{limit}/{offset}");
                    assert!(info.next_offset <= info.last_offset());
                }
            }
        }
    }

    #[test]
    fn test_offset_of_page() {
        let info = PageInfo::compute(47, 20, 0);
        assert_eq!(info.offset_of_page(0), 0);
        assert_eq!(info.offset_of_page(1), 0);
        assert_eq!(info.offset_of_page(3), 40);
        assert_eq!(info.offset_of_page(9), 40);
    }
}
