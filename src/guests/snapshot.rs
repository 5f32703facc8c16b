//! Guest snapshot types and response parsing
//!
//! The endpoint answers with one of two JSON shapes:
//!
//! ```json
//! { "confirmedGuests": 42 }
//! { "totalConfirmed": 50, "categories": [ { "label": "Adult", "value": 40 } ] }
//! ```
//!
//! `confirmedCount` is accepted as an alias of `confirmedGuests`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use super::error::{FetchError, FetchResult};

/// Keys accepted for the count-only shape, in lookup order
const COUNT_KEYS: [&str; 2] = ["confirmedGuests", "confirmedCount"];

/// Last successfully parsed attendance data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GuestSnapshot {
    /// Count-only variant
    Count {
        #[serde(rename = "confirmedGuests")]
        confirmed_count: u64,
    },
    /// Categorized variant
    Chart {
        #[serde(rename = "totalConfirmed")]
        total_confirmed: u64,
        categories: Vec<Category>,
    },
}

impl GuestSnapshot {
    /// Total confirmed guests, whichever variant
    pub fn total(&self) -> u64 {
        match self {
            GuestSnapshot::Count { confirmed_count } => *confirmed_count,
            GuestSnapshot::Chart {
                total_confirmed, ..
            } => *total_confirmed,
        }
    }

    /// Categories to chart; empty for the count variant
    pub fn categories(&self) -> &[Category] {
        match self {
            GuestSnapshot::Count { .. } => &[],
            GuestSnapshot::Chart { categories, .. } => categories,
        }
    }
}

/// One labeled bar of the attendance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// May be empty; the chart substitutes "Group N"
    #[serde(default)]
    pub label: String,
    pub value: f64,
}

impl Category {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Which response shape the dashboard expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestVariant {
    /// `confirmedGuests` / `confirmedCount` only
    Count,
    /// `totalConfirmed` plus `categories`
    Chart,
    /// Chart when the body carries `categories`, count otherwise
    #[default]
    Auto,
}

impl FromStr for GuestVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "count" => Ok(GuestVariant::Count),
            "chart" => Ok(GuestVariant::Chart),
            "auto" => Ok(GuestVariant::Auto),
            other => Err(format!(
                "unknown guest variant '{}' (expected count, chart or auto)",
                other
            )),
        }
    }
}

impl std::fmt::Display for GuestVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GuestVariant::Count => "count",
            GuestVariant::Chart => "chart",
            GuestVariant::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Parse a response body into a snapshot of the expected variant
pub fn parse_snapshot(body: &[u8], variant: GuestVariant) -> FetchResult<GuestSnapshot> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::malformed(format!("invalid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| FetchError::malformed("expected a JSON object"))?;

    match variant {
        GuestVariant::Count => parse_count(object),
        GuestVariant::Chart => parse_chart(object),
        GuestVariant::Auto if object.contains_key("categories") => parse_chart(object),
        GuestVariant::Auto => parse_count(object),
    }
}

fn parse_count(object: &Map<String, Value>) -> FetchResult<GuestSnapshot> {
    let (key, number) = COUNT_KEYS
        .iter()
        .find_map(|key| match object.get(*key) {
            Some(Value::Number(n)) => Some((*key, n)),
            _ => None,
        })
        .ok_or_else(|| FetchError::malformed("missing numeric 'confirmedGuests'"))?;

    let confirmed_count = whole_count(number)
        .ok_or_else(|| FetchError::malformed(format!("'{}' must be a non-negative whole number", key)))?;

    Ok(GuestSnapshot::Count { confirmed_count })
}

fn parse_chart(object: &Map<String, Value>) -> FetchResult<GuestSnapshot> {
    let total_confirmed = match object.get("totalConfirmed") {
        Some(Value::Number(n)) => whole_count(n).ok_or_else(|| {
            FetchError::malformed_categories("'totalConfirmed' must be a non-negative whole number")
        })?,
        _ => return Err(FetchError::malformed_categories("missing numeric 'totalConfirmed'")),
    };

    let entries = match object.get("categories") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(FetchError::malformed_categories("'categories' must be a list")),
        None => return Err(FetchError::malformed_categories("missing 'categories'")),
    };

    let categories = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_category(idx, entry))
        .collect::<FetchResult<Vec<_>>>()?;

    Ok(GuestSnapshot::Chart {
        total_confirmed,
        categories,
    })
}

fn parse_category(idx: usize, entry: &Value) -> FetchResult<Category> {
    let object = entry
        .as_object()
        .ok_or_else(|| FetchError::malformed_categories(format!("category {} is not an object", idx)))?;

    let label = match object.get("label") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => {
            return Err(FetchError::malformed_categories(format!(
                "category {} has a non-text label",
                idx
            )))
        }
    };

    let value = match object.get("value") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite() && *v >= 0.0)
    .ok_or_else(|| {
        FetchError::malformed_categories(format!(
            "category {} needs a non-negative numeric 'value'",
            idx
        ))
    })?;

    Ok(Category { label, value })
}

fn whole_count(number: &Number) -> Option<u64> {
    if let Some(n) = number.as_u64() {
        return Some(n);
    }
    number
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str, variant: GuestVariant) -> FetchResult<GuestSnapshot> {
        parse_snapshot(body.as_bytes(), variant)
    }

    #[test]
    fn test_parse_confirmed_guests() {
        let snapshot = parse(r#"{"confirmedGuests": 42}"#, GuestVariant::Count).unwrap();
        assert_eq!(snapshot, GuestSnapshot::Count { confirmed_count: 42 });
        assert_eq!(snapshot.total(), 42);
        assert!(snapshot.categories().is_empty());
    }

    #[test]
    fn test_parse_confirmed_count_alias() {
        let snapshot = parse(r#"{"confirmedCount": 7.0}"#, GuestVariant::Auto).unwrap();
        assert_eq!(snapshot, GuestSnapshot::Count { confirmed_count: 7 });
    }

    #[test]
    fn test_count_rejects_non_numeric_and_fractions() {
        for body in [
            r#"{"confirmedGuests": "42"}"#,
            r#"{"confirmedGuests": -1}"#,
            r#"{"confirmedGuests": 4.5}"#,
            r#"{"guests": 42}"#,
            r#"[42]"#,
            "not json",
        ] {
            let err = parse(body, GuestVariant::Count).unwrap_err();
            assert!(matches!(err, FetchError::Malformed(_)), "body {}", body);
        }
    }

    #[test]
    fn test_parse_chart() {
        let body = r#"{
            "totalConfirmed": 50,
            "categories": [
                {"label": "Adult", "value": 40},
                {"label": "Kids", "value": "10"},
                {"value": 0}
            ]
        }"#;

        let snapshot = parse(body, GuestVariant::Chart).unwrap();
        assert_eq!(snapshot.total(), 50);
        assert_eq!(
            snapshot.categories(),
            &[
                Category::new("Adult", 40.0),
                Category::new("Kids", 10.0),
                Category::new("", 0.0),
            ]
        );
    }

    #[test]
    fn test_chart_requires_categories() {
        let err = parse(r#"{"totalConfirmed": 50}"#, GuestVariant::Chart).unwrap_err();
        assert!(matches!(err, FetchError::MalformedCategories(ref m) if m.contains("categories")));

        let err = parse(
            r#"{"totalConfirmed": 50, "categories": {"Adult": 40}}"#,
            GuestVariant::Chart,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::MalformedCategories(_)));
    }

    #[test]
    fn test_chart_rejects_bad_entries() {
        for body in [
            r#"{"totalConfirmed": 1, "categories": [5]}"#,
            r#"{"totalConfirmed": 1, "categories": [{"label": "A"}]}"#,
            r#"{"totalConfirmed": 1, "categories": [{"label": "A", "value": -3}]}"#,
            r#"{"totalConfirmed": 1, "categories": [{"label": ["A"], "value": 3}]}"#,
            r#"{"categories": []}"#,
        ] {
            assert!(parse(body, GuestVariant::Chart).is_err(), "body {}", body);
        }
    }

    #[test]
    fn test_auto_reports_chart_errors_as_categories() {
        let err = parse(
            r#"{"totalConfirmed": 3, "categories": [{"label": "A", "value": -1}]}"#,
            GuestVariant::Auto,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::MalformedCategories(_)));

        let err = parse("not json", GuestVariant::Auto).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_auto_detects_shape() {
        let chart = parse(
            r#"{"totalConfirmed": 3, "categories": [{"label": "A", "value": 3}]}"#,
            GuestVariant::Auto,
        )
        .unwrap();
        assert!(matches!(chart, GuestSnapshot::Chart { .. }));

        let count = parse(r#"{"confirmedGuests": 3}"#, GuestVariant::Auto).unwrap();
        assert!(matches!(count, GuestSnapshot::Count { .. }));
    }

    #[test]
    fn test_count_variant_ignores_categories() {
        let snapshot = parse(
            r#"{"confirmedGuests": 9, "categories": []}"#,
            GuestVariant::Count,
        )
        .unwrap();
        assert_eq!(snapshot, GuestSnapshot::Count { confirmed_count: 9 });
    }

    #[test]
    fn test_snapshot_serializes_to_wire_shape() {
        let count = GuestSnapshot::Count { confirmed_count: 12 };
        assert_eq!(
            serde_json::to_value(&count).unwrap(),
            serde_json::json!({"confirmedGuests": 12})
        );

        let chart = GuestSnapshot::Chart {
            total_confirmed: 2,
            categories: vec![Category::new("Adult", 2.0)],
        };
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            serde_json::json!({
                "totalConfirmed": 2,
                "categories": [{"label": "Adult", "value": 2.0}]
            })
        );
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("Chart".parse::<GuestVariant>().unwrap(), GuestVariant::Chart);
        assert_eq!(" count ".parse::<GuestVariant>().unwrap(), GuestVariant::Count);
        assert!("bars".parse::<GuestVariant>().is_err());
        assert_eq!(GuestVariant::default(), GuestVariant::Auto);
    }
}
