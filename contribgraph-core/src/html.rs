//! HTML page generation
//!
//! Generates a single self-contained page with embedded CSS and JavaScript.
//! The page works offline and is byte-for-byte reproducible.

use crate::calendar::{weekday_labels, CalendarGrid, Cell};
use crate::config::GraphConfig;
use crate::data::EventCatalog;
use crate::stats::YearStats;
use crate::tooltip::{EMPTY_LABEL, TOOLTIP_MARGIN_PX, TOOLTIP_OFFSET_PX};

/// Render the complete contribution graph page
pub fn render_html_page(
    config: &GraphConfig,
    grid: &CalendarGrid,
    stats: &YearStats,
    catalog: &EventCatalog,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {graph}
        {legend}
        {statistics}
        {footer}
    </div>
    <div id="tooltip" class="tooltip" role="tooltip"></div>
    <script>{js_config}
{js}</script>
</body>
</html>"#,
        title = html_escape(&config.title),
        css = inline_css(),
        header = render_header(config),
        graph = render_graph(grid),
        legend = render_legend(catalog),
        statistics = render_statistics(stats),
        footer = render_footer(config.year),
        js_config = tooltip_script_config(),
        js = inline_javascript(),
    )
}

/// Render header section
fn render_header(config: &GraphConfig) -> String {
    let description = if config.description.trim().is_empty() {
        String::new()
    } else {
        format!(
            r#"
    <p class="description">{}</p>"#,
            html_escape(&config.description)
        )
    };
    format!(
        r#"<header>
    <h1>{title}</h1>{description}
</header>"#,
        title = html_escape(&config.title),
        description = description,
    )
}

/// Render month labels, weekday labels and the day cells
fn render_graph(grid: &CalendarGrid) -> String {
    let months: String = grid
        .month_labels()
        .iter()
        .map(|label| {
            format!(
                r#"<span class="month-label" style="grid-column: {};">{}</span>"#,
                label.column + 1,
                label.name
            )
        })
        .collect();

    let weekdays: String = weekday_labels(grid.week_start)
        .iter()
        .map(|label| format!(r#"<span class="weekday-label">{}</span>"#, label))
        .collect();

    let cells: Vec<String> = grid
        .cells()
        .iter()
        .map(|cell| match cell {
            Cell::Padding => r#"<div class="day day-empty"></div>"#.to_string(),
            Cell::Day(day) => format!(
                r#"<div class="day" data-date="{date}" data-events="{events}" style="{style}"></div>"#,
                date = day.date_key(),
                events = html_escape(&day.events_json),
                style = day.visual.css(),
            ),
        })
        .collect();

    format!(
        r#"<section class="graph-wrapper">
    <div class="graph-frame" style="--weeks: {weeks};">
        <div class="months">{months}</div>
        <div class="weekdays">{weekdays}</div>
        <div class="graph">
            {cells}
        </div>
    </div>
</section>"#,
        weeks = grid.weeks(),
        months = months,
        weekdays = weekdays,
        cells = cells.join("\n            "),
    )
}

/// Render event color legend
fn render_legend(catalog: &EventCatalog) -> String {
    if catalog.is_empty() {
        return String::new();
    }
    let items: String = catalog
        .iter()
        .map(|event| {
            format!(
                r#"<span class="legend-item"><span class="legend-swatch" style="background-color: {color};"></span>{name}</span>"#,
                color = event.color,
                name = html_escape(&event.name),
            )
        })
        .collect();
    format!(r#"<div class="legend">{}</div>"#, items)
}

/// Render summary cards and per-event totals
fn render_statistics(stats: &YearStats) -> String {
    let items = if stats.totals.is_empty() {
        r#"<p class="no-stats">No activity</p>"#.to_string()
    } else {
        stats
            .totals
            .iter()
            .map(|total| {
                format!(
                    r#"<div class="stat-item"><span class="stat-color" style="background-color: {color};"></span><span class="stat-name">{name}</span><span class="stat-count">{count}</span></div>"#,
                    color = total.color,
                    name = html_escape(&total.name),
                    count = total.count,
                )
            })
            .collect::<Vec<_>>()
            .join("\n                ")
    };

    format!(
        r#"<section class="statistics">
    <div class="summary">
        <div class="summary-card"><h3>Active days</h3><div class="value">{active_days}</div></div>
        <div class="summary-card"><h3>Total events</h3><div class="value">{total}</div></div>
        <div class="summary-card"><h3>Longest streak</h3><div class="value">{streak}</div></div>
    </div>
    <h2 class="stats-title">Event Statistics</h2>
    <div class="stats-list">
                {items}
    </div>
</section>"#,
        active_days = stats.active_days,
        total = stats.total_occurrences,
        streak = stats.longest_streak,
        items = items,
    )
}

/// Render footer
fn render_footer(year: i32) -> String {
    format!(
        r#"<footer>
    <p class="year-label">{}</p>
    <p class="credit">Generated by contribgraph</p>
</footer>"#,
        year
    )
}

/// Tooltip constants shared with the page script
fn tooltip_script_config() -> String {
    let empty_label = serde_json::to_string(EMPTY_LABEL).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"window.__cgTooltip = {{"offset": {}, "margin": {}, "maxCount": {}, "emptyLabel": {}}};"#,
        TOOLTIP_OFFSET_PX,
        TOOLTIP_MARGIN_PX,
        u32::MAX,
        empty_label
    )
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
/* Reset & Base */
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #24292f;
    background: #ffffff;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 1.5rem;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
}

header .description {
    color: #57606a;
}

/* Graph */
.graph-wrapper {
    overflow-x: auto;
    padding-bottom: 0.5rem;
    --cell: 12px;
    --gap: 3px;
}

.graph-frame {
    display: grid;
    grid-template-columns: auto max-content;
    grid-template-areas: ". months" "weekdays graph";
    column-gap: 6px;
    row-gap: 4px;
    width: max-content;
}

.months {
    grid-area: months;
    display: grid;
    grid-template-columns: repeat(var(--weeks), var(--cell));
    column-gap: var(--gap);
    font-size: 0.75rem;
    color: #57606a;
}

.month-label {
    white-space: nowrap;
}

.weekdays {
    grid-area: weekdays;
    display: grid;
    grid-template-rows: repeat(7, var(--cell));
    row-gap: var(--gap);
    font-size: 0.7rem;
    line-height: var(--cell);
    color: #57606a;
}

.graph {
    grid-area: graph;
    display: grid;
    grid-template-rows: repeat(7, var(--cell));
    grid-auto-flow: column;
    grid-auto-columns: var(--cell);
    gap: var(--gap);
}

.day {
    width: var(--cell);
    height: var(--cell);
    border-radius: 2px;
    outline: 1px solid rgba(27, 31, 36, 0.06);
    outline-offset: -1px;
}

.day-empty {
    background: transparent;
    outline: none;
}

.day[data-date]:hover {
    outline: 1px solid rgba(27, 31, 36, 0.5);
}

/* Legend */
.legend {
    display: flex;
    flex-wrap: wrap;
    gap: 1rem;
    margin: 1rem 0 2rem;
    font-size: 0.8rem;
    color: #57606a;
}

.legend-item {
    display: inline-flex;
    align-items: center;
    gap: 0.35rem;
}

.legend-swatch {
    width: 12px;
    height: 12px;
    border-radius: 2px;
}

/* Statistics */
.summary {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    gap: 1rem;
    margin-bottom: 2rem;
}

.summary-card {
    background: #f6f8fa;
    padding: 1rem;
    border-radius: 0.5rem;
    border-left: 4px solid #2da44e;
}

.summary-card h3 {
    font-size: 0.875rem;
    font-weight: 600;
    color: #57606a;
    margin-bottom: 0.5rem;
}

.summary-card .value {
    font-size: 1.5rem;
    font-weight: 700;
}

.stats-title {
    font-size: 1.25rem;
    margin-bottom: 0.75rem;
}

.stats-list {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
    gap: 0.5rem;
}

.stat-item {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.5rem 0.75rem;
    border: 1px solid #d0d7de;
    border-radius: 0.375rem;
}

.stat-color {
    width: 14px;
    height: 14px;
    border-radius: 3px;
    flex-shrink: 0;
}

.stat-name {
    flex: 1;
}

.stat-count {
    font-weight: 600;
    font-variant-numeric: tabular-nums;
}

.no-stats {
    color: #57606a;
}

footer {
    margin-top: 2rem;
    padding-top: 1rem;
    border-top: 1px solid #d0d7de;
    color: #57606a;
    font-size: 0.875rem;
    text-align: center;
}

.year-label {
    font-size: 1.25rem;
    font-weight: 700;
    color: #24292f;
}

/* Tooltip */
.tooltip {
    position: fixed;
    display: none;
    z-index: 10;
    pointer-events: none;
    padding: 0.5rem 0.75rem;
    border-radius: 0.375rem;
    background: #24292f;
    color: #ffffff;
    font-size: 0.8rem;
    line-height: 1.4;
    white-space: nowrap;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.2);
}

.tooltip.visible {
    display: block;
}

.tooltip-date {
    font-weight: 600;
    margin-bottom: 0.2rem;
}

.tooltip-empty {
    color: #afb8c1;
}

@media (prefers-color-scheme: dark) {
    body {
        background: #0d1117;
        color: #c9d1d9;
    }
    .summary-card {
        background: #161b22;
    }
    .stat-item,
    footer {
        border-color: #30363d;
    }
    .year-label {
        color: #c9d1d9;
    }
}
"#
}

/// Inline JavaScript for the day tooltip
fn inline_javascript() -> &'static str {
    r#"
(function() {
    const config = window.__cgTooltip;
    const MONTHS = ['January', 'February', 'March', 'April', 'May', 'June',
        'July', 'August', 'September', 'October', 'November', 'December'];

    function escapeHtml(s) {
        return String(s)
            .replace(/&/g, '&amp;')
            .replace(/</g, '&lt;')
            .replace(/>/g, '&gt;')
            .replace(/"/g, '&quot;')
            .replace(/'/g, '&#39;');
    }

    // Calendar date only; never goes through a timestamp
    function formatDateLabel(date) {
        const m = /^(\d{4})-(\d{2})-(\d{2})$/.exec(date || '');
        if (!m) return date || '';
        const year = +m[1], month = +m[2] - 1, day = +m[3];
        const d = new Date(year, month, day);
        if (d.getFullYear() !== year || d.getMonth() !== month || d.getDate() !== day) return date;
        return day + ' ' + MONTHS[month] + ' ' + year;
    }

    // Ordered [name, count] pairs; one bad pair makes the payload read as no events
    function parseEventCounts(raw) {
        let parsed;
        try {
            parsed = JSON.parse(raw);
        } catch (e) {
            return [];
        }
        if (!Array.isArray(parsed)) return [];
        const lines = [];
        for (const entry of parsed) {
            if (!Array.isArray(entry) || entry.length !== 2) return [];
            const [name, count] = entry;
            if (typeof name !== 'string') return [];
            if (!Number.isInteger(count) || count < 0 || count > config.maxCount) return [];
            if (count > 0) lines.push(count > 1 ? name + ' × ' + count : name);
        }
        return lines;
    }

    function tooltipHtml(date, raw) {
        const lines = parseEventCounts(raw);
        const body = lines.length
            ? lines.map(l => '<div class="tooltip-event">' + escapeHtml(l) + '</div>').join('')
            : '<div class="tooltip-empty">' + escapeHtml(config.emptyLabel) + '</div>';
        return '<div class="tooltip-date">' + escapeHtml(formatDateLabel(date)) + '</div>' + body;
    }

    function placeAxis(pos, extent, limit) {
        let start = pos + config.offset;
        if (start + extent > limit - config.margin) start = pos - config.offset - extent;
        return Math.max(start, config.margin);
    }

    document.addEventListener('DOMContentLoaded', function() {
        const tooltip = document.getElementById('tooltip');
        if (!tooltip) return;

        function position(e) {
            const rect = tooltip.getBoundingClientRect();
            tooltip.style.left = placeAxis(e.clientX, rect.width, window.innerWidth) + 'px';
            tooltip.style.top = placeAxis(e.clientY, rect.height, window.innerHeight) + 'px';
        }

        function hide() {
            tooltip.classList.remove('visible');
        }

        document.querySelectorAll('.day[data-date]').forEach(cell => {
            cell.addEventListener('mouseenter', function(e) {
                tooltip.innerHTML = tooltipHtml(this.dataset.date, this.dataset.events);
                tooltip.classList.add('visible');
                position(e);
            });
            cell.addEventListener('mousemove', position);
            cell.addEventListener('mouseleave', hide);
        });

        window.addEventListener('scroll', hide, { passive: true });
    });
})();
"#
}

/// Escape HTML special characters
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
