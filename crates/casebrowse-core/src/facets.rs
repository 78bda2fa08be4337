//! Facet option normalization.
//!
//! The filters endpoint returns facet options in more than one shape: bare
//! strings, or objects carrying some of `code`, `name` and `count`, where
//! `code`/`name` may even be numbers. Shapes are resolved once, here, into
//! [`RawFacetEntry`] at decode time and into [`FacetOption`] by
//! [`normalize`]. Nothing downstream looks at the raw shape again.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

/// One facet entry as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawFacetEntry {
    /// A bare string, used as both code and name.
    Text(String),
    /// An object with optional code, name and count.
    Structured(StructuredFacet),
    /// Anything else (number, array, null). Never yields an option.
    Malformed(JsonValue),
}

/// Object-shaped facet entry. Null fields count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<JsonValue>,
}

fn take_field(map: &mut Map<String, JsonValue>, key: &str) -> Option<JsonValue> {
    map.remove(key).filter(|v| !v.is_null())
}

impl From<JsonValue> for RawFacetEntry {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(s) => RawFacetEntry::Text(s),
            JsonValue::Object(mut map) => RawFacetEntry::Structured(StructuredFacet {
                code: take_field(&mut map, "code"),
                name: take_field(&mut map, "name"),
                count: take_field(&mut map, "count"),
            }),
            other => RawFacetEntry::Malformed(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawFacetEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(RawFacetEntry::from)
    }
}

impl From<&str> for RawFacetEntry {
    fn from(s: &str) -> Self {
        RawFacetEntry::Text(s.to_string())
    }
}

impl From<FacetOption> for RawFacetEntry {
    fn from(option: FacetOption) -> Self {
        RawFacetEntry::Structured(StructuredFacet {
            code: Some(JsonValue::String(option.code)),
            name: Some(JsonValue::String(option.name)),
            count: option.count.map(JsonValue::from),
        })
    }
}

/// A selectable facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Value sent to the data source when selected.
    pub code: String,
    /// Display label. Never empty.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl FacetOption {
    /// Display label including the count when known, e.g. `Assault (5)`.
    pub fn label(&self) -> String {
        match self.count {
            Some(count) => format!("{} ({})", self.name, count),
            None => self.name.clone(),
        }
    }
}

fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_count(value: &JsonValue) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

fn normalize_entry(entry: &RawFacetEntry) -> Option<FacetOption> {
    let option = match entry {
        RawFacetEntry::Text(s) => FacetOption {
            code: s.clone(),
            name: s.clone(),
            count: None,
        },
        RawFacetEntry::Structured(facet) => {
            let code = facet.code.as_ref().or(facet.name.as_ref());
            let name = facet.name.as_ref().or(facet.code.as_ref());
            FacetOption {
                code: code.map(stringify).unwrap_or_default(),
                name: name.map(stringify).unwrap_or_default(),
                count: facet.count.as_ref().and_then(as_count),
            }
        }
        RawFacetEntry::Malformed(value) => {
            trace!(entry = %value, "Dropping malformed facet entry");
            return None;
        }
    };

    if option.name.is_empty() {
        trace!(code = %option.code, "Dropping facet entry with empty name");
        return None;
    }
    Some(option)
}

/// Convert raw facet entries into options, preserving received order.
///
/// Entries whose name ends up empty are dropped. Normalizing the output
/// again (via `RawFacetEntry::from`) yields the same list.
pub fn normalize(raw: &[RawFacetEntry]) -> Vec<FacetOption> {
    raw.iter().filter_map(normalize_entry).collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawFacetEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawFacetEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw response of the filters endpoint.
///
/// Only the two browse facets are kept; other lists the server sends are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacetCatalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub centers: Vec<RawFacetEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<RawFacetEntry>,
}

/// Normalized option lists for both facet dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetLists {
    pub centers: Vec<FacetOption>,
    pub categories: Vec<FacetOption>,
}

impl From<&FacetCatalog> for FacetLists {
    fn from(catalog: &FacetCatalog) -> Self {
        Self {
            centers: normalize(&catalog.centers),
            categories: normalize(&catalog.categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: JsonValue) -> Vec<RawFacetEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mixed_shapes() {
        let raw = entries(json!([
            "Theft",
            { "code": "ASLT", "name": "Assault", "count": 5 },
            { "count": 3 }
        ]));

        assert_eq!(
            normalize(&raw),
            vec![
                FacetOption {
                    code: "Theft".into(),
                    name: "Theft".into(),
                    count: None
                },
                FacetOption {
                    code: "ASLT".into(),
                    name: "Assault".into(),
                    count: Some(5)
                },
            ]
        );
    }

    #[test]
    fn test_string_entry_is_code_and_name() {
        let out = normalize(&["Fraud".into()]);
        assert_eq!(out[0].code, "Fraud");
        assert_eq!(out[0].name, "Fraud");
        assert_eq!(out[0].count, None);
    }

    #[test]
    fn test_code_and_name_fall_back_to_each_other() {
        let raw = entries(json!([{ "name": "North" }, { "code": "S1" }]));
        let out = normalize(&raw);
        assert_eq!(out[0].code, "North");
        assert_eq!(out[0].name, "North");
        assert_eq!(out[1].code, "S1");
        assert_eq!(out[1].name, "S1");
    }

    #[test]
    fn test_numeric_code_is_stringified() {
        let raw = entries(json!([{ "code": 2024, "name": 2024, "count": 12 }]));
        let out = normalize(&raw);
        assert_eq!(out[0].code, "2024");
        assert_eq!(out[0].name, "2024");
        assert_eq!(out[0].count, Some(12));
    }

    #[test]
    fn test_null_fields_are_missing() {
        let raw = entries(json!([{ "code": "X", "name": null, "count": null }]));
        let out = normalize(&raw);
        assert_eq!(out[0].name, "X");
        assert_eq!(out[0].count, None);
    }

    #[test]
    fn test_non_numeric_count_is_absent() {
        let raw = entries(json!([
            { "name": "A", "count": "7" },
            { "name": "B", "count": -1 },
            { "name": "C", "count": 4.0 }
        ]));
        let counts: Vec<_> = normalize(&raw).into_iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![None, None, Some(4)]);
    }

    #[test]
    fn test_malformed_entries_dropped() {
        let raw = entries(json!([42, null, ["a", "b"], "", { "code": "" }, "ok"]));
        let out = normalize(&raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "ok");
    }

    #[test]
    fn test_order_preserved() {
        let raw = entries(json!(["Zulu", "Alpha", "Mike"]));
        let names: Vec<_> = normalize(&raw).into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    }

    #[test]
    fn test_never_yields_empty_name() {
        let raw = entries(json!([
            "",
            {},
            { "code": null },
            { "code": "", "name": "" },
            { "code": "K" },
            true,
            { "name": false }
        ]));
        for option in normalize(&raw) {
            assert!(!option.name.is_empty());
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = entries(json!([
            "Theft",
            { "code": "ASLT", "name": "Assault", "count": 5 },
            { "code": 7 },
            { "count": 3 }
        ]));
        let once = normalize(&raw);
        let reraw: Vec<RawFacetEntry> = once.iter().cloned().map(RawFacetEntry::from).collect();
        assert_eq!(normalize(&reraw), once);
    }

    #[test]
    fn test_label_includes_count() {
        let option = FacetOption {
            code: "ASLT".into(),
            name: "Assault".into(),
            count: Some(5),
        };
        assert_eq!(option.label(), "Assault (5)");
    }

    #[test]
    fn test_catalog_missing_and_null_lists() {
        let catalog: FacetCatalog = serde_json::from_value(json!({
            "centers": null,
            "provinces": [{ "code": "BKK", "name": "Bangkok", "count": 1 }]
        }))
        .unwrap();
        assert!(catalog.centers.is_empty());
        assert!(catalog.categories.is_empty());
    }

    #[test]
    fn test_facet_lists_from_catalog() {
        let catalog: FacetCatalog = serde_json::from_value(json!({
            "centers": [{ "code": "C01", "name": "C01", "count": 10 }],
            "categories": ["Theft", { "name": "" }]
        }))
        .unwrap();
        let lists = FacetLists::from(&catalog);
        assert_eq!(lists.centers.len(), 1);
        assert_eq!(lists.categories.len(), 1);
        assert_eq!(lists.categories[0].code, "Theft");
    }
}
