//! Generator configuration
//!
//! Values come from environment-style keys (usually a `.env` file loaded by
//! the CLI), with command-line flags overriding individual keys:
//!
//! | Key              | Default              |
//! |------------------|----------------------|
//! | `TITLE`          | `Contribution Graph` |
//! | `DESCRIPTION`    | empty                |
//! | `JSON_FILE_PATH` | `data.json`          |
//! | `YEAR`           | current local year   |
//! | `START_DAY`      | `monday`             |
//! | `OUTPUT_PATH`    | `index.html`         |
//!
//! Resolution validates everything; the resolved [`GraphConfig`] is passed
//! explicitly to the generator.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::GraphError;

pub const DEFAULT_TITLE: &str = "Contribution Graph";
pub const DEFAULT_DATA_PATH: &str = "data.json";
pub const DEFAULT_OUTPUT_PATH: &str = "index.html";

const KEY_TITLE: &str = "TITLE";
const KEY_DESCRIPTION: &str = "DESCRIPTION";
const KEY_DATA_PATH: &str = "JSON_FILE_PATH";
const KEY_YEAR: &str = "YEAR";
const KEY_START_DAY: &str = "START_DAY";
const KEY_OUTPUT_PATH: &str = "OUTPUT_PATH";

/// First day of each grid column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStart {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(WeekStart::Monday),
            "sunday" => Ok(WeekStart::Sunday),
            _ => Err(GraphError::config(format!(
                "{} must be 'monday' or 'sunday' (got '{}')",
                KEY_START_DAY, s
            ))),
        }
    }
}

/// Unvalidated configuration values, one per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub data_path: Option<String>,
    pub year: Option<String>,
    pub start_day: Option<String>,
    pub output_path: Option<String>,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub title: String,
    pub description: String,
    pub data_path: PathBuf,
    pub year: i32,
    pub week_start: WeekStart,
    pub output_path: PathBuf,
}

impl RawConfig {
    /// Read keys through an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        RawConfig {
            title: lookup(KEY_TITLE),
            description: lookup(KEY_DESCRIPTION),
            data_path: lookup(KEY_DATA_PATH),
            year: lookup(KEY_YEAR),
            start_day: lookup(KEY_START_DAY),
            output_path: lookup(KEY_OUTPUT_PATH),
        }
    }

    /// Read keys from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay `overrides`: every value it sets wins
    pub fn merge(self, overrides: RawConfig) -> Self {
        RawConfig {
            title: overrides.title.or(self.title),
            description: overrides.description.or(self.description),
            data_path: overrides.data_path.or(self.data_path),
            year: overrides.year.or(self.year),
            start_day: overrides.start_day.or(self.start_day),
            output_path: overrides.output_path.or(self.output_path),
        }
    }

    /// Validate and fill defaults, taking a missing year from the local clock
    pub fn resolve(&self) -> Result<GraphConfig, GraphError> {
        self.resolve_with_default_year(chrono::Local::now().year())
    }

    /// Validate and fill defaults with an explicit fallback year
    pub fn resolve_with_default_year(&self, default_year: i32) -> Result<GraphConfig, GraphError> {
        let year = match self.year.as_deref() {
            Some(raw) => parse_year(raw)?,
            None => default_year,
        };
        let week_start = match self.start_day.as_deref() {
            Some(raw) => raw.parse()?,
            None => WeekStart::default(),
        };
        let data_path = self.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH);
        if data_path.trim().is_empty() {
            return Err(GraphError::config(format!("{} must not be empty", KEY_DATA_PATH)));
        }
        let output_path = self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH);
        if output_path.trim().is_empty() {
            return Err(GraphError::config(format!("{} must not be empty", KEY_OUTPUT_PATH)));
        }

        Ok(GraphConfig {
            title: self.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self.description.clone().unwrap_or_default(),
            data_path: PathBuf::from(data_path),
            year,
            week_start,
            output_path: PathBuf::from(output_path),
        })
    }
}

/// Exactly four digits, 1000-9999
fn parse_year(raw: &str) -> Result<i32, GraphError> {
    let trimmed = raw.trim();
    let valid = trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit());
    match trimmed.parse::<i32>() {
        Ok(year) if valid && year >= 1000 => Ok(year),
        _ => Err(GraphError::config(format!(
            "{} must be a 4-digit year (got '{}')",
            KEY_YEAR, raw
        ))),
    }
}
