//! Year calendar grid
//!
//! Lays a year out as week columns of seven rows. Cells run down each
//! column, so cell `i` sits in row `i % 7` of column `i / 7`. Padding cells
//! before January 1 put it on its weekday row; padding after December 31
//! completes the final week.

use chrono::{Datelike, NaiveDate};

use crate::config::WeekStart;
use crate::data::ActivityData;
use crate::encode::{encode, DayVisual, EventCount};
use crate::error::GraphError;
use crate::tooltip::serialize_event_counts;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub visual: DayVisual,
    pub counts: EventCount,
    /// `data-events` tooltip payload
    pub events_json: String,
}

impl DayCell {
    /// `YYYY-MM-DD`
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Padding,
    Day(DayCell),
}

/// Month name shown above the column holding the month's first day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    pub column: usize,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CalendarGrid {
    pub year: i32,
    pub week_start: WeekStart,
    cells: Vec<Cell>,
    leading: usize,
}

impl CalendarGrid {
    /// Encode every day of `year` and arrange the cells into weeks
    pub fn build(
        year: i32,
        week_start: WeekStart,
        data: &ActivityData,
    ) -> Result<Self, GraphError> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| GraphError::config(format!("year {} is out of range", year)))?;
        let leading = row_of(first, week_start);

        let mut cells = vec![Cell::Padding; leading];
        for date in first.iter_days().take_while(|d| d.year() == year) {
            let (visual, counts) = encode(data.occurrences(date), &data.catalog)?;
            let events_json = serialize_event_counts(&counts, &data.catalog);
            cells.push(Cell::Day(DayCell {
                date,
                visual,
                counts,
                events_json,
            }));
        }
        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat(Cell::Padding).take(trailing));

        Ok(CalendarGrid {
            year,
            week_start,
            cells,
            leading,
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Day(day) => Some(day),
            Cell::Padding => None,
        })
    }

    /// Number of week columns
    pub fn weeks(&self) -> usize {
        self.cells.len() / DAYS_PER_WEEK
    }

    /// Padding cells before January 1
    pub fn leading_padding(&self) -> usize {
        self.leading
    }

    /// Column holding a date of this grid's year
    pub fn column_of(&self, date: NaiveDate) -> usize {
        (self.leading + date.ordinal0() as usize) / DAYS_PER_WEEK
    }

    pub fn month_labels(&self) -> Vec<MonthLabel> {
        (1..=12)
            .filter_map(|month| NaiveDate::from_ymd_opt(self.year, month, 1))
            .map(|date| MonthLabel {
                column: self.column_of(date),
                name: date.format("%b").to_string(),
            })
            .collect()
    }
}

/// Row of a date within its week column
pub fn row_of(date: NaiveDate, week_start: WeekStart) -> usize {
    let weekday = date.weekday();
    let row = match week_start {
        WeekStart::Monday => weekday.num_days_from_monday(),
        WeekStart::Sunday => weekday.num_days_from_sunday(),
    };
    row as usize
}

/// Row labels, blank except Monday, Wednesday and Friday
pub fn weekday_labels(week_start: WeekStart) -> [&'static str; DAYS_PER_WEEK] {
    match week_start {
        WeekStart::Monday => ["Mon", "", "Wed", "", "Fri", "", ""],
        WeekStart::Sunday => ["", "Mon", "", "Wed", "", "Fri", ""],
    }
}
