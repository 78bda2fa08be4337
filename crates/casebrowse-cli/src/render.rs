//! Plain-text rendering of cases, pages and facets.

use std::fmt::Write as _;

use casebrowse_core::{CaseDetail, CaseRecord, FacetOption, PageInfo, ResultState};

const BEHAVIOR_WIDTH: usize = 48;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn case_row(record: &CaseRecord) -> String {
    format!(
        "{:<18} {:<6} {:<20} {}",
        record.case_id.as_str(),
        record.display_center(),
        truncate(record.display_category(), 20),
        truncate(record.display_behavior(), BEHAVIOR_WIDTH),
    )
}

pub fn page_footer(info: &PageInfo, total: u64) -> String {
    format!(
        "Page {} of {} ({} case{})",
        info.page,
        info.page_count,
        total,
        if total == 1 { "" } else { "s" }
    )
}

/// Render a committed result page.
pub fn results(state: &ResultState, info: &PageInfo) -> String {
    let mut out = String::new();
    if state.items.is_empty() {
        out.push_str("No cases match.\n");
    } else {
        for record in &state.items {
            let _ = writeln!(out, "{}", case_row(record));
        }
    }
    out.push_str(&page_footer(info, state.total));
    if state.errored {
        out.push_str(" [last request failed]");
    }
    out
}

pub fn facet_list(title: &str, options: &[FacetOption]) -> String {
    let mut out = format!("{}:\n", title);
    if options.is_empty() {
        out.push_str("  (none)\n");
    }
    for option in options {
        let _ = writeln!(out, "  {:<10} {}", option.code, option.label());
    }
    out
}

pub fn detail(detail: &CaseDetail) -> String {
    let r = &detail.record;
    let mut out = String::new();
    let _ = writeln!(out, "Case      {}", r.case_id);
    let _ = writeln!(out, "Center    {}", r.display_center());
    let _ = writeln!(out, "Category  {}", r.display_category());
    let _ = writeln!(out, "Station   {}", r.display_station());
    let _ = writeln!(out, "Province  {}", r.display_province());
    let _ = writeln!(out, "Scene     {}", r.display_scene());
    let _ = writeln!(out, "Behavior  {}", r.display_behavior());
    for (key, value) in &detail.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        let _ = writeln!(out, "{:<9} {}", key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_row_uses_placeholders() {
        let row = case_row(&CaseRecord::new("c-1"));
        assert!(row.starts_with("c-1"));
        assert!(row.contains(" - "));
    }

    #[test]
    fn test_truncate_long_behavior() {
        let mut record = CaseRecord::new("c-1");
        record.behavior = Some("x".repeat(100));
        let row = case_row(&record);
        assert!(row.ends_with('…'));
        assert_eq!(
            row.chars().filter(|c| *c == 'x').count(),
            BEHAVIOR_WIDTH - 1
        );
    }

    #[test]
    fn test_results_empty_and_errored() {
        let state = ResultState {
            errored: true,
            ..Default::default()
        };
        let text = results(&state, &PageInfo::compute(0, 20, 0));
        assert_eq!(
            text,
            "No cases match.\nPage 1 of 1 (0 cases) [last request failed]"
        );
    }

    #[test]
    fn test_page_footer_singular() {
        assert_eq!(
            page_footer(&PageInfo::compute(1, 20, 0), 1),
            "Page 1 of 1 (1 case)"
        );
    }

    #[test]
    fn test_facet_list() {
        let options = vec![FacetOption {
            code: "ASLT".into(),
            name: "Assault".into(),
            count: Some(5),
        }];
        assert_eq!(
            facet_list("Categories", &options),
            "Categories:\n  ASLT       Assault (5)\n"
        );
        assert_eq!(facet_list("Centers", &[]), "Centers:\n  (none)\n");
    }
}
