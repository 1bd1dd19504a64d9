//! Activity data file loading
//!
//! The data file is a JSON document with an event catalog and a list of
//! dated code batches:
//!
//! ```json
//! {
//!   "events": [{"name": "Math", "code": "m", "color": "#1e88e5"}],
//!   "dates": [{"date": "2024-03-05", "codes": ["m", "m"]}]
//! }
//! ```
//!
//! Everything is validated up front. A file that loads successfully can be
//! encoded for every day without further errors.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::color::Rgb;
use crate::error::{DuplicateCodeError, GraphError};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").unwrap())
}

/// A named, colored kind of activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventType {
    pub name: String,
    pub code: String,
    pub color: Rgb,
}

/// Event types keyed by code, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog {
    events: IndexMap<String, EventType>,
}

impl EventCatalog {
    /// Build a catalog, rejecting duplicate codes
    pub fn new(events: impl IntoIterator<Item = EventType>) -> Result<Self, DuplicateCodeError> {
        let mut map = IndexMap::new();
        for event in events {
            if map.contains_key(&event.code) {
                return Err(DuplicateCodeError { code: event.code });
            }
            map.insert(event.code.clone(), event);
        }
        Ok(EventCatalog { events: map })
    }

    pub fn get(&self, code: &str) -> Option<&EventType> {
        self.events.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventType> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Validated contents of a data file
#[derive(Debug, Clone)]
pub struct ActivityData {
    pub catalog: EventCatalog,
    /// Occurrence codes per date, in file order
    pub days: BTreeMap<NaiveDate, Vec<String>>,
}

impl ActivityData {
    /// Occurrences recorded for a date (empty when the date has no entry)
    pub fn occurrences(&self, date: NaiveDate) -> &[String] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DataFile {
    events: Vec<RawEvent>,
    dates: Vec<RawDateEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    name: String,
    code: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawDateEntry {
    date: String,
    codes: Vec<String>,
}

/// Read and validate a data file for the given year
pub fn load_data(path: &Path, year: i32) -> Result<ActivityData, GraphError> {
    let content = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
    parse_data(&content, &path.display().to_string(), year)
}

/// Parse and validate data file contents
///
/// `source_name` only labels error messages.
pub fn parse_data(json: &str, source_name: &str, year: i32) -> Result<ActivityData, GraphError> {
    let err = |message: String| GraphError::data(source_name, message);

    let file: DataFile =
        serde_json::from_str(json).map_err(|e| err(format!("invalid JSON: {}", e)))?;

    let mut events = Vec::with_capacity(file.events.len());
    for raw in file.events {
        if raw.name.trim().is_empty() {
            return Err(err(format!("event '{}' has an empty name", raw.code)));
        }
        if !code_pattern().is_match(&raw.code) {
            return Err(err(format!(
                "event '{}' has invalid code '{}' (expected 1-32 of A-Z, a-z, 0-9, '_', '-')",
                raw.name, raw.code
            )));
        }
        let color: Rgb = raw
            .color
            .parse()
            .map_err(|e| err(format!("event '{}': {}", raw.code, e)))?;
        events.push(EventType {
            name: raw.name,
            code: raw.code,
            color,
        });
    }
    let catalog = EventCatalog::new(events).map_err(|e| err(e.to_string()))?;

    let mut days: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for entry in file.dates {
        let date = NaiveDate::parse_from_str(&entry.date, DATE_FORMAT)
            .map_err(|_| err(format!("'{}' is not a YYYY-MM-DD date", entry.date)))?;
        if date.year() != year {
            return Err(err(format!(
                "date {} is outside the configured year {}",
                entry.date, year
            )));
        }
        if let Some(code) = entry.codes.iter().find(|c| catalog.get(c).is_none()) {
            return Err(err(format!(
                "unknown event code '{}' on {}",
                code, entry.date
            )));
        }
        let batch = days.entry(date).or_default();
        if !batch.is_empty() {
            debug!(date = %entry.date, "merging repeated date entry");
        }
        batch.extend(entry.codes);
    }

    Ok(ActivityData { catalog, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "events": [
            {"name": "Math", "code": "m", "color": "#1e88e5"},
            {"name": "Programming", "code": "c", "color": "#43a047"}
        ],
        "dates": [
            {"date": "2024-01-02", "codes": ["m", "c"]},
            {"date": "2024-03-05", "codes": ["m"]}
        ]
    }"##;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data_error(json: &str) -> String {
        match parse_data(json, "test.json", 2024) {
            Err(GraphError::DataFormat { message, .. }) => message,
            other => panic!("expected data format error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sample() {
        let data = parse_data(SAMPLE, "test.json", 2024).unwrap();
        assert_eq!(data.catalog.len(), 2);
        assert_eq!(data.catalog.get("m").unwrap().name, "Math");
        let codes: Vec<&str> = data.catalog.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["m", "c"]);
        assert_eq!(data.occurrences(ymd(2024, 1, 2)), ["m", "c"]);
        assert!(data.occurrences(ymd(2024, 1, 3)).is_empty());
    }

    #[test]
    fn test_repeated_dates_are_merged_in_order() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"},
                       {"name": "B", "code": "b", "color": "#ffffff"}],
            "dates": [
                {"date": "2024-06-01", "codes": ["a"]},
                {"date": "2024-06-02", "codes": ["b"]},
                {"date": "2024-06-01", "codes": ["b", "a"]}
            ]
        }"##;
        let data = parse_data(json, "test.json", 2024).unwrap();
        assert_eq!(data.occurrences(ymd(2024, 6, 1)), ["a", "b", "a"]);
    }

    #[test]
    fn test_reject_unknown_code() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"}],
            "dates": [{"date": "2024-06-01", "codes": ["a", "z"]}]
        }"##;
        let message = data_error(json);
        assert!(message.contains("'z'"), "{}", message);
        assert!(message.contains("2024-06-01"), "{}", message);
    }

    #[test]
    fn test_reject_date_outside_year() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"}],
            "dates": [{"date": "2023-12-31", "codes": ["a"]}]
        }"##;
        assert!(data_error(json).contains("outside the configured year 2024"));
    }

    #[test]
    fn test_reject_bad_date() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"}],
            "dates": [{"date": "2024-02-30", "codes": ["a"]}]
        }"##;
        assert!(data_error(json).contains("2024-02-30"));
    }

    #[test]
    fn test_catalog_rejects_duplicate_code() {
        let event = |name: &str| EventType {
            name: name.to_string(),
            code: "m".to_string(),
            color: "#000000".parse().unwrap(),
        };
        let err = EventCatalog::new([event("Math"), event("Music")]).unwrap_err();
        assert_eq!(
            err,
            DuplicateCodeError {
                code: "m".to_string()
            }
        );
    }

    #[test]
    fn test_reject_duplicate_code() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"},
                       {"name": "A2", "code": "a", "color": "#111111"}],
            "dates": []
        }"##;
        assert!(data_error(json).contains("duplicate event code 'a'"));
    }

    #[test]
    fn test_reject_bad_color() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "red"}],
            "dates": []
        }"##;
        assert!(data_error(json).contains("#RRGGBB"));
    }

    #[test]
    fn test_reject_invalid_code_and_name() {
        let bad_code = r##"{"events": [{"name": "A", "code": "a b", "color": "#000000"}], "dates": []}"##;
        assert!(data_error(bad_code).contains("invalid code"));
        let empty_name = r##"{"events": [{"name": " ", "code": "a", "color": "#000000"}], "dates": []}"##;
        assert!(data_error(empty_name).contains("empty name"));
    }

    #[test]
    fn test_reject_malformed_json_and_missing_fields() {
        assert!(data_error("{not json").contains("invalid JSON"));
        assert!(data_error(r#"{"events": []}"#).contains("invalid JSON"));
        assert!(data_error(r#"{"events": [], "dates": [], "extra": 1}"#).contains("invalid JSON"));
    }

    #[test]
    fn test_empty_codes_list_is_allowed() {
        let json = r##"{
            "events": [{"name": "A", "code": "a", "color": "#000000"}],
            "dates": [{"date": "2024-06-01", "codes": []}]
        }"##;
        let data = parse_data(json, "test.json", 2024).unwrap();
        assert!(data.occurrences(ymd(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_data(&dir.path().join("missing.json"), 2024);
        assert!(matches!(result, Err(GraphError::Io { .. })));
    }
}
