//! contribgraph core library - GitHub-style contribution graphs from JSON activity data

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Day encoding is pure: occurrences and catalog in, visual and counts out
// - Configuration is passed explicitly, never read from ambient state
// - Data is fully validated before any day is encoded
// - Nothing is written until the whole page exists in memory
// - Identical input yields byte-for-byte identical output

pub mod calendar;
pub mod color;
pub mod config;
pub mod data;
pub mod encode;
pub mod error;
pub mod html;
pub mod stats;
pub mod tooltip;

pub use calendar::CalendarGrid;
pub use config::{GraphConfig, RawConfig, WeekStart};
pub use data::{load_data, ActivityData, EventCatalog, EventType};
pub use encode::{encode, DayVisual, EventCount};
pub use error::{DuplicateCodeError, GraphError, TooltipParseError};
pub use stats::YearStats;
pub use tooltip::{render_tooltip, Tooltip};

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

/// Outcome of a successful generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub output_path: PathBuf,
    pub days: usize,
    pub active_days: usize,
    pub total_occurrences: u32,
    pub events: usize,
}

/// Render the page for already-loaded data
pub fn generate_page(config: &GraphConfig, data: &ActivityData) -> Result<String, GraphError> {
    let grid = CalendarGrid::build(config.year, config.week_start, data)?;
    let stats = YearStats::compute(&grid, &data.catalog);
    Ok(html::render_html_page(config, &grid, &stats, &data.catalog))
}

/// Write the page atomically, creating parent directories as needed
///
/// The content goes to a uniquely named temporary file in the same directory
/// and is renamed into place, so a failed run never leaves a partial file at
/// `path`. The temporary file is removed on any failure.
pub fn write_page(path: &Path, html: &str) -> Result<(), GraphError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| GraphError::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| GraphError::io(dir, e))?;
    temp.write_all(html.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| GraphError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| GraphError::io(path, e.error))?;
    Ok(())
}

/// Load data, render the page and write it to the configured output path
pub fn run(config: &GraphConfig) -> Result<GenerationSummary, GraphError> {
    let data = load_data(&config.data_path, config.year)?;
    info!(
        events = data.catalog.len(),
        dates = data.days.len(),
        path = %config.data_path.display(),
        "data loaded"
    );

    let grid = CalendarGrid::build(config.year, config.week_start, &data)?;
    let stats = YearStats::compute(&grid, &data.catalog);
    info!(
        cells = grid.cells().len(),
        weeks = grid.weeks(),
        "calendar grid generated"
    );
    let html = html::render_html_page(config, &grid, &stats, &data.catalog);

    write_page(&config.output_path, &html)?;
    info!(path = %config.output_path.display(), "page written");

    Ok(GenerationSummary {
        output_path: config.output_path.clone(),
        days: grid.days().count(),
        active_days: stats.active_days,
        total_occurrences: stats.total_occurrences,
        events: data.catalog.len(),
    })
}
