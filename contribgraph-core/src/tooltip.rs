//! Day tooltip: the payload embedded in each day cell and its interpretation
//!
//! Every day cell carries two attributes:
//!
//! - `data-date`: the calendar date as `YYYY-MM-DD`
//! - `data-events`: a JSON array of `[name, count]` pairs, one per event
//!   display name, in the order the events first occurred that day, `[]`
//!   when the day is empty
//!
//! The order has to survive `JSON.parse` in the page script, which moves
//! integer-like object keys such as `"10"` to the front, hence pairs.
//! A count is a non-negative integer no larger than `u32::MAX`; integral
//! floats such as `2.0` are accepted, as they are by the page script.
//!
//! The page script reads these back on hover. The functions here are the
//! reference behavior for that script: date label, one line per event, and
//! an empty state for days with nothing (or nothing readable) in them.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Number;
use tracing::debug;

use crate::data::EventCatalog;
use crate::encode::EventCount;
use crate::error::TooltipParseError;
use crate::html::html_escape;

/// Shown when a day has no events or its payload can't be read
pub const EMPTY_LABEL: &str = "No events";

/// Gap between the cursor and the tooltip
pub const TOOLTIP_OFFSET_PX: f64 = 10.0;

/// Closest the tooltip may sit to the top/left viewport edges
pub const TOOLTIP_MARGIN_PX: f64 = 10.0;

/// Serialize a day's counts under event display names
///
/// Codes sharing a display name are summed at the first one's position.
pub fn serialize_event_counts(counts: &EventCount, catalog: &EventCatalog) -> String {
    let mut by_name: IndexMap<&str, u32> = IndexMap::new();
    for (code, n) in counts.iter() {
        let name = catalog.get(code).map(|e| e.name.as_str()).unwrap_or(code);
        *by_name.entry(name).or_insert(0) += n;
    }
    let pairs: Vec<(&str, u32)> = by_name.into_iter().collect();
    serde_json::to_string(&pairs).unwrap_or_else(|_| String::from("[]"))
}

/// One event line of a tooltip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
    pub name: String,
    pub count: u32,
}

impl TooltipLine {
    /// `Name × n` when repeated, plain `Name` otherwise
    pub fn label(&self) -> String {
        if self.count > 1 {
            format!("{} × {}", self.name, self.count)
        } else {
            self.name.clone()
        }
    }
}

/// Parse a `data-events` payload, preserving pair order
///
/// One bad pair makes the whole payload unreadable.
pub fn parse_event_counts(raw: &str) -> Result<Vec<TooltipLine>, TooltipParseError> {
    let pairs: Vec<(String, Number)> = serde_json::from_str(raw).map_err(|e| TooltipParseError {
        reason: e.to_string(),
    })?;
    let mut lines = Vec::with_capacity(pairs.len());
    for (name, number) in pairs {
        let count = count_from(&number).ok_or_else(|| TooltipParseError {
            reason: format!("invalid count {} for '{}'", number, name),
        })?;
        if count > 0 {
            lines.push(TooltipLine { name, count });
        }
    }
    Ok(lines)
}

fn count_from(number: &Number) -> Option<u32> {
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = number.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) {
        Some(f as u32)
    } else {
        None
    }
}

/// `2024-03-05` → `5 March 2024`
///
/// The date is treated as a plain calendar date, so no timezone can move it
/// across midnight.
pub fn format_date_label(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%-d %B %Y").to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipBody {
    Events(Vec<String>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub date_label: String,
    pub body: TooltipBody,
}

impl Tooltip {
    pub fn to_html(&self) -> String {
        let body = match &self.body {
            TooltipBody::Events(lines) => lines
                .iter()
                .map(|line| format!(r#"<div class="tooltip-event">{}</div>"#, html_escape(line)))
                .collect::<Vec<_>>()
                .join(""),
            TooltipBody::Empty => format!(r#"<div class="tooltip-empty">{}</div>"#, EMPTY_LABEL),
        };
        format!(
            r#"<div class="tooltip-date">{}</div>{}"#,
            html_escape(&self.date_label),
            body
        )
    }
}

/// Build the tooltip for a hovered day
///
/// Never fails: an unreadable payload falls back to the empty state and an
/// unparsable date is shown as given.
pub fn render_tooltip(date: &str, raw_events: &str) -> Tooltip {
    let date_label = format_date_label(date).unwrap_or_else(|| date.to_string());
    let lines = match parse_event_counts(raw_events) {
        Ok(lines) => lines,
        Err(e) => {
            debug!(date, error = %e, "falling back to empty tooltip");
            Vec::new()
        }
    };
    let body = if lines.is_empty() {
        TooltipBody::Empty
    } else {
        TooltipBody::Events(lines.iter().map(TooltipLine::label).collect())
    };
    Tooltip { date_label, body }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner for a tooltip shown next to the cursor
///
/// Sits below-right of the cursor, flips to the other side on an axis where
/// it would overflow the right or bottom edge, and never comes closer than
/// [`TOOLTIP_MARGIN_PX`] to the top or left edge.
pub fn place_tooltip(cursor: Point, size: Size, viewport: Size) -> Point {
    let axis = |pos: f64, extent: f64, limit: f64| {
        let mut start = pos + TOOLTIP_OFFSET_PX;
        if start + extent > limit - TOOLTIP_MARGIN_PX {
            start = pos - TOOLTIP_OFFSET_PX - extent;
        }
        start.max(TOOLTIP_MARGIN_PX)
    };
    Point {
        x: axis(cursor.x, size.width, viewport.width),
        y: axis(cursor.y, size.height, viewport.height),
    }
}
