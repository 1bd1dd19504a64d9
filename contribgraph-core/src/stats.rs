//! Year statistics shown under the graph

use indexmap::IndexMap;

use crate::calendar::CalendarGrid;
use crate::color::Rgb;
use crate::data::EventCatalog;

/// Total occurrences of one event display name over the year
///
/// Codes sharing a name are counted together, as in the tooltip, under the
/// color of the first one declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTotal {
    pub name: String,
    pub color: Rgb,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearStats {
    /// Most frequent first, ties in catalog order, zero totals omitted
    pub totals: Vec<EventTotal>,
    /// Days with at least one occurrence
    pub active_days: usize,
    pub total_occurrences: u32,
    /// Longest run of consecutive active days
    pub longest_streak: usize,
}

impl YearStats {
    pub fn compute(grid: &CalendarGrid, catalog: &EventCatalog) -> Self {
        // Catalog order by first declaration of each name
        let mut per_name: IndexMap<&str, (Rgb, u32)> = IndexMap::new();
        for event in catalog.iter() {
            per_name.entry(event.name.as_str()).or_insert((event.color, 0));
        }
        let mut stats = YearStats::default();
        let mut streak = 0usize;

        for day in grid.days() {
            if day.counts.is_empty() {
                streak = 0;
                continue;
            }
            stats.active_days += 1;
            streak += 1;
            stats.longest_streak = stats.longest_streak.max(streak);
            for (code, n) in day.counts.iter() {
                if let Some(entry) = catalog
                    .get(code)
                    .and_then(|event| per_name.get_mut(event.name.as_str()))
                {
                    entry.1 += n;
                }
                stats.total_occurrences += n;
            }
        }

        // Stable sort keeps catalog order among equal counts
        let mut totals: Vec<EventTotal> = per_name
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(name, (color, count))| EventTotal {
                name: name.to_string(),
                color,
                count,
            })
            .collect();
        totals.sort_by(|a, b| b.count.cmp(&a.count));
        stats.totals = totals;
        stats
    }
}
