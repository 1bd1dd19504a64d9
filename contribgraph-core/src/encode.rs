//! Day-cell visual encoding
//!
//! Turns one day's occurrence list into a single CSS-renderable visual:
//!
//! - no occurrences: flat neutral gray
//! - one distinct code: the event color, opacity rising with repetition
//!   (0.4, 0.6, 0.8, then saturating at 1.0)
//! - two or more distinct codes: diagonal stripes, one per code in first-seen
//!   order, each as wide as its share of the day's occurrences
//!
//! Encoding is pure and deterministic.

use indexmap::IndexMap;

use crate::color::{Rgb, EMPTY_DAY_COLOR};
use crate::data::EventCatalog;
use crate::error::{GraphError, INLINE_SOURCE};

/// Length of one full stripe cycle
pub const STRIPE_PERIOD_PX: f64 = 10.0;

/// Occurrences past this count no longer raise opacity
const OPACITY_SATURATION_COUNT: u32 = 4;

/// Occurrence count per distinct code, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCount {
    counts: IndexMap<String, u32>,
}

impl EventCount {
    /// Tally occurrences, keeping the order codes first appear in
    pub fn tally<S: AsRef<str>>(occurrences: &[S]) -> Self {
        let mut counts: IndexMap<String, u32> = IndexMap::new();
        for code in occurrences {
            *counts.entry(code.as_ref().to_string()).or_insert(0) += 1;
        }
        EventCount { counts }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(code, &n)| (code.as_str(), n))
    }

    pub fn get(&self, code: &str) -> u32 {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// Number of distinct codes
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total occurrences across all codes
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// One stripe of a multi-event day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub color: Rgb,
    /// Share of the stripe period, in (0, 1]
    pub width_fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayVisual {
    Empty,
    Solid { color: Rgb, opacity: f64 },
    Striped { segments: Vec<Segment> },
}

impl DayVisual {
    /// Inline style declaration for the day cell
    pub fn css(&self) -> String {
        match self {
            DayVisual::Empty => format!("background-color: {};", EMPTY_DAY_COLOR),
            DayVisual::Solid { color, opacity } => {
                format!("background-color: {};", color.to_rgba(*opacity))
            }
            DayVisual::Striped { segments } => {
                let mut stops = Vec::with_capacity(segments.len() * 2);
                let mut start = 0.0;
                for (i, segment) in segments.iter().enumerate() {
                    let end = if i + 1 == segments.len() {
                        STRIPE_PERIOD_PX
                    } else {
                        start + segment.width_fraction * STRIPE_PERIOD_PX
                    };
                    stops.push(format!("{} {}px", segment.color, format_px(start)));
                    stops.push(format!("{} {}px", segment.color, format_px(end)));
                    start = end;
                }
                format!(
                    "background: repeating-linear-gradient(45deg, {});",
                    stops.join(", ")
                )
            }
        }
    }
}

/// Two decimals, trailing zeros trimmed
fn format_px(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Opacity of a single-code day seen `count` times
///
/// Equal to `min(1.0, 0.2 + 0.2 * count)`, computed as fifths so the
/// listed steps are exact.
pub fn solid_opacity(count: u32) -> f64 {
    f64::from(count.min(OPACITY_SATURATION_COUNT) + 1) / 5.0
}

/// Encode one day's occurrences
///
/// Fails only if an occurrence names a code missing from the catalog, which
/// loading already rules out for data read through [`crate::data`].
pub fn encode<S: AsRef<str>>(
    occurrences: &[S],
    catalog: &EventCatalog,
) -> Result<(DayVisual, EventCount), GraphError> {
    let counts = EventCount::tally(occurrences);
    let color_of = |code: &str| {
        catalog
            .get(code)
            .map(|event| event.color)
            .ok_or_else(|| {
                GraphError::data(INLINE_SOURCE, format!("unknown event code '{}'", code))
            })
    };

    let visual = match counts.distinct() {
        0 => DayVisual::Empty,
        1 => {
            let (code, n) = counts.iter().next().unwrap_or_default();
            DayVisual::Solid {
                color: color_of(code)?,
                opacity: solid_opacity(n),
            }
        }
        _ => {
            let total = f64::from(counts.total());
            let segments = counts
                .iter()
                .filter(|&(_, n)| n > 0)
                .map(|(code, n)| {
                    Ok(Segment {
                        color: color_of(code)?,
                        width_fraction: f64::from(n) / total,
                    })
                })
                .collect::<Result<Vec<_>, GraphError>>()?;
            DayVisual::Striped { segments }
        }
    };

    Ok((visual, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EventType;

    fn catalog() -> EventCatalog {
        EventCatalog::new([
            event("Math", "m", "#1e88e5"),
            event("Programming", "c", "#43a047"),
            event("Physics", "p", "#e53935"),
            event("Sport", "s", "#fb8c00"),
        ])
        .unwrap()
    }

    fn event(name: &str, code: &str, color: &str) -> EventType {
        EventType {
            name: name.to_string(),
            code: code.to_string(),
            color: color.parse().unwrap(),
        }
    }

    fn rgb(hex: &str) -> Rgb {
        hex.parse().unwrap()
    }

    #[test]
    fn test_empty_day() {
        let (visual, counts) = encode::<&str>(&[], &catalog()).unwrap();
        assert_eq!(visual, DayVisual::Empty);
        assert!(counts.is_empty());
        assert_eq!(visual.css(), "background-color: #ebedf0;");
    }

    #[test]
    fn test_single_occurrence_is_solid() {
        let (visual, counts) = encode(&["p"], &catalog()).unwrap();
        assert_eq!(
            visual,
            DayVisual::Solid {
                color: rgb("#e53935"),
                opacity: 0.4
            }
        );
        assert_eq!(counts.get("p"), 1);
        assert_eq!(visual.css(), "background-color: rgba(229, 57, 53, 0.4);");
    }

    #[test]
    fn test_opacity_steps_and_saturation() {
        assert_eq!(solid_opacity(1), 0.4);
        assert_eq!(solid_opacity(2), 0.6);
        assert_eq!(solid_opacity(3), 0.8);
        assert_eq!(solid_opacity(4), 1.0);
        assert_eq!(solid_opacity(5), 1.0);
        assert_eq!(solid_opacity(u32::MAX), 1.0);
    }

    #[test]
    fn test_repeated_single_code_never_stripes() {
        let (visual, counts) = encode(&["s", "s", "s", "s", "s"], &catalog()).unwrap();
        assert_eq!(
            visual,
            DayVisual::Solid {
                color: rgb("#fb8c00"),
                opacity: 1.0
            }
        );
        assert_eq!(counts.get("s"), 5);
    }

    #[test]
    fn test_two_codes_stripe_by_count() {
        let (visual, counts) = encode(&["m", "m", "c"], &catalog()).unwrap();
        let DayVisual::Striped { segments } = &visual else {
            panic!("expected stripes, got {:?}", visual);
        };
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].color, rgb("#1e88e5"));
        assert!((segments[0].width_fraction - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(segments[1].color, rgb("#43a047"));
        assert!((segments[1].width_fraction - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(counts.iter().collect::<Vec<_>>(), [("m", 2), ("c", 1)]);
    }

    #[test]
    fn test_widths_come_from_counts_not_distinct_codes() {
        let (visual, _) = encode(&["p", "c", "p", "p"], &catalog()).unwrap();
        let DayVisual::Striped { segments } = visual else {
            panic!("expected stripes");
        };
        assert_eq!(segments[0].width_fraction, 0.75);
        assert_eq!(segments[1].width_fraction, 0.25);
    }

    #[test]
    fn test_stripe_order_is_first_seen_not_catalog_order() {
        let (visual, _) = encode(&["s", "m", "s"], &catalog()).unwrap();
        let DayVisual::Striped { segments } = visual else {
            panic!("expected stripes");
        };
        assert_eq!(segments[0].color, rgb("#fb8c00"));
        assert_eq!(segments[1].color, rgb("#1e88e5"));
    }

    #[test]
    fn test_striped_css() {
        let (visual, _) = encode(&["m", "m", "c"], &catalog()).unwrap();
        assert_eq!(
            visual.css(),
            "background: repeating-linear-gradient(45deg, \
             #1e88e5 0px, #1e88e5 6.67px, #43a047 6.67px, #43a047 10px);"
        );
    }

    #[test]
    fn test_striped_segments_use_full_intensity() {
        let (visual, _) = encode(&["m", "m", "m", "c"], &catalog()).unwrap();
        assert!(!visual.css().contains("rgba"));
    }

    #[test]
    fn test_unknown_code_is_error() {
        let result = encode(&["m", "zz"], &catalog());
        match result {
            Err(GraphError::DataFormat {
                source_name,
                message,
            }) => {
                assert_eq!(source_name, INLINE_SOURCE);
                assert!(message.contains("'zz'"), "{}", message);
            }
            other => panic!("expected a data format error, got {:?}", other),
        }
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(0.0), "0");
        assert_eq!(format_px(2.5), "2.5");
        assert_eq!(format_px(3.333333), "3.33");
        assert_eq!(format_px(10.0), "10");
    }
}
