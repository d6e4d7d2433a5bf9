//! Calendar month grids for the booking calendar view
//!
//! A [`MonthGrid`] covers whole weeks only: it starts on the week-start day
//! on or before the 1st of the month and ends on the last day of the week
//! containing the last day of the month. Each cell knows whether it lies in
//! the target month, whether it is today, and which bookings fall on it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ReserviliError, Result};
use crate::metrics::MetricsCollector;
use crate::models::Booking;

/// Smallest year accepted for a grid
pub const MIN_YEAR: i32 = 1;
/// Largest year accepted for a grid
pub const MAX_YEAR: i32 = 9999;

/// First day of the displayed week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Sunday-first weeks
    #[default]
    Sunday,
    /// Monday-first weeks
    Monday,
}

impl WeekStart {
    /// The weekday that opens each row
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Column of `date` in a row, 0 to 6
    #[must_use]
    pub fn index_of(self, date: NaiveDate) -> u32 {
        match self {
            Self::Sunday => date.weekday().num_days_from_sunday(),
            Self::Monday => date.weekday().num_days_from_monday(),
        }
    }

    /// Short weekday names in column order
    #[must_use]
    pub const fn day_names(self) -> [&'static str; 7] {
        match self {
            Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
        })
    }
}

impl FromStr for WeekStart {
    type Err = ReserviliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            _ => Err(ReserviliError::UnknownVariant { kind: "week start", value: s.to_string() }),
        }
    }
}

/// A validated calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    /// Month `month` (1-12) of `year`
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ReserviliError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ReserviliError::InvalidDate(format!(
                "year {year} outside {MIN_YEAR}-{MAX_YEAR}"
            )));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ReserviliError::InvalidDate(format!("{year}-{month:02}-01")))?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| ReserviliError::InvalidDate(format!("end of {year}-{month:02}")))?;

        Ok(Self { first, last })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), date.month())
    }

    /// Year number
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1 to 12
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// The 1st of the month
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The last day of the month
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the month
    #[must_use]
    pub fn days(&self) -> u32 {
        self.last.day()
    }

    /// The following month, rolling over into the next year
    pub fn next(&self) -> Result<Self> {
        match self.month() {
            12 => Self::new(self.year() + 1, 1),
            m => Self::new(self.year(), m + 1),
        }
    }

    /// The preceding month, rolling back into the previous year
    pub fn previous(&self) -> Result<Self> {
        match self.month() {
            1 => Self::new(self.year() - 1, 12),
            m => Self::new(self.year(), m - 1),
        }
    }

    /// English month name
    #[must_use]
    pub fn name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August", "September",
            "October", "November", "December",
        ];
        NAMES[self.first.month0() as usize]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One day in the grid
#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell<'a> {
    /// Calendar date of the cell
    pub date: NaiveDate,
    /// True if the date belongs to the displayed month
    pub in_month: bool,
    /// True if the date is the current date
    pub is_today: bool,
    /// Column in the row, 0 to 6
    pub weekday_index: u32,
    /// Bookings on this date, in input order
    pub bookings: Vec<&'a Booking>,
}

impl CalendarCell<'_> {
    /// True if at least one booking falls on this day
    #[must_use]
    pub fn has_bookings(&self) -> bool {
        !self.bookings.is_empty()
    }
}

/// Full-week grid for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid<'a> {
    /// Displayed year
    pub year: i32,
    /// Displayed month, 1 to 12
    pub month: u32,
    /// First day of each row
    pub week_start: WeekStart,
    /// Cells in display order, a multiple of seven
    pub cells: Vec<CalendarCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Build the grid for `month`/`year`, validating both
    pub fn generate(
        year: i32,
        month: u32,
        bookings: &'a [Booking],
        today: NaiveDate,
        week_start: WeekStart,
    ) -> Result<Self> {
        let target = YearMonth::new(year, month)?;
        Ok(Self::for_month(target, bookings, today, week_start))
    }

    /// Build the grid for an already validated month
    #[must_use]
    pub fn for_month(target: YearMonth, bookings: &'a [Booking], today: NaiveDate, week_start: WeekStart) -> Self {
        let first = target.first_day();
        let last = target.last_day();
        let grid_start = first - Duration::days(i64::from(week_start.index_of(first)));
        let grid_end = last + Duration::days(i64::from(6 - week_start.index_of(last)));

        let mut by_date: BTreeMap<NaiveDate, Vec<&'a Booking>> = BTreeMap::new();
        for booking in bookings.iter().filter(|b| (grid_start..=grid_end).contains(&b.date)) {
            by_date.entry(booking.date).or_default().push(booking);
        }

        let cells: Vec<CalendarCell<'a>> = grid_start
            .iter_days()
            .take_while(|date| *date <= grid_end)
            .map(|date| CalendarCell {
                date,
                in_month: date.year() == target.year() && date.month() == target.month(),
                is_today: date == today,
                weekday_index: week_start.index_of(date),
                bookings: by_date.remove(&date).unwrap_or_default(),
            })
            .collect();

        let grid = Self { year: target.year(), month: target.month(), week_start, cells };
        tracing::debug!(
            month = %target,
            week_start = %week_start,
            cells = grid.cells.len(),
            bookings = grid.booking_count(),
            "Generated month grid"
        );
        MetricsCollector::default().record_calendar(grid.cells.len(), grid.booking_count());
        grid
    }

    /// The displayed month
    pub fn year_month(&self) -> Result<YearMonth> {
        YearMonth::new(self.year, self.month)
    }

    /// Rows of seven cells
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell<'a>]> {
        self.cells.chunks(7)
    }

    /// The cell for `date`, if the grid shows it
    #[must_use]
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell<'a>> {
        let first = self.cells.first()?.date;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.cells.get(offset)
    }

    /// Total bookings placed on the grid, adjacent-month days included
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.cells.iter().map(|c| c.bookings.len()).sum()
    }

    /// Cells of the target month that carry bookings
    pub fn busy_days(&self) -> impl Iterator<Item = &CalendarCell<'a>> {
        self.cells.iter().filter(|c| c.in_month && c.has_bookings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sunday_grid_pads_both_ends() {
        let grid = MonthGrid::generate(2024, 3, &[], date(2024, 3, 15), WeekStart::Sunday).unwrap();
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.cells[0].date, date(2024, 2, 25));
        assert_eq!(grid.cells[41].date, date(2024, 4, 6));
        assert!(!grid.cells[0].in_month);
        assert!(grid.cell(date(2024, 3, 15)).unwrap().is_today);
    }

    #[test]
    fn test_monday_grid_without_trailing_days() {
        let grid = MonthGrid::generate(2024, 3, &[], date(2024, 1, 1), WeekStart::Monday).unwrap();
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.cells[0].date, date(2024, 2, 26));
        assert_eq!(grid.cells.last().unwrap().date, date(2024, 3, 31));
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_exact_four_week_month() {
        let grid = MonthGrid::generate(2015, 2, &[], date(2015, 2, 1), WeekStart::Sunday).unwrap();
        assert_eq!(grid.cells.len(), 28);
        assert!(grid.cells.iter().all(|c| c.in_month));
        assert_eq!(grid.weeks().count(), 4);
    }

    #[test]
    fn test_invalid_month() {
        let err = MonthGrid::generate(2024, 13, &[], date(2024, 1, 1), WeekStart::Sunday).unwrap_err();
        assert!(matches!(err, ReserviliError::InvalidMonth(13)));
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(0, 5).is_err());
    }

    #[test]
    fn test_month_navigation_rolls_over_years() {
        let december = YearMonth::new(2023, 12).unwrap();
        assert_eq!(december.next().unwrap(), YearMonth::new(2024, 1).unwrap());
        assert_eq!(YearMonth::new(2024, 1).unwrap().previous().unwrap(), december);
        assert_eq!(YearMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(december.name(), "December");
        assert_eq!(december.to_string(), "2023-12");
    }

    #[test]
    fn test_cell_outside_grid() {
        let grid = MonthGrid::generate(2024, 3, &[], date(2024, 3, 1), WeekStart::Sunday).unwrap();
        assert!(grid.cell(date(2024, 2, 1)).is_none());
        assert!(grid.cell(date(2024, 5, 1)).is_none());
    }
}
