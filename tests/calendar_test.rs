//! Integration and property tests for calendar.rs

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use reservili::calendar::{MonthGrid, WeekStart, YearMonth};
use reservili::catalog::Catalog;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week_start_strategy() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

#[test]
fn test_sample_bookings_land_on_their_days() {
    let catalog = Catalog::sample();
    let grid = MonthGrid::generate(2024, 3, &catalog.bookings, date(2024, 3, 15), WeekStart::Sunday).unwrap();

    let fifteenth = grid.cell(date(2024, 3, 15)).unwrap();
    assert!(fifteenth.is_today);
    assert!(fifteenth.in_month);
    let ids: Vec<&str> = fifteenth.bookings.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["B001", "B002"]);

    assert_eq!(grid.booking_count(), catalog.bookings.len());
    assert_eq!(grid.busy_days().count(), 6);
    assert!(!grid.cell(date(2024, 3, 16)).unwrap().has_bookings());
}

#[test]
fn test_bookings_outside_grid_are_dropped() {
    let catalog = Catalog::sample();
    let grid = MonthGrid::generate(2024, 5, &catalog.bookings, date(2024, 5, 1), WeekStart::Sunday).unwrap();
    assert_eq!(grid.booking_count(), 0);
    assert_eq!(grid.busy_days().count(), 0);
}

#[test]
fn test_adjacent_month_days_carry_bookings() {
    let catalog = Catalog::sample();
    // April 2024 starts on a Monday, so the Sunday grid opens on 31 March
    let grid = MonthGrid::generate(2024, 4, &catalog.bookings, date(2024, 4, 1), WeekStart::Sunday).unwrap();
    assert_eq!(grid.cells[0].date, date(2024, 3, 31));
    assert!(!grid.cells[0].in_month);

    let mut bookings = catalog.bookings.clone();
    bookings[0].date = date(2024, 3, 31);
    let grid = MonthGrid::generate(2024, 4, &bookings, date(2024, 4, 1), WeekStart::Sunday).unwrap();
    assert_eq!(grid.cells[0].bookings.len(), 1);
    assert_eq!(grid.busy_days().count(), 0);
}

#[test]
fn test_weekday_headers_follow_week_start() {
    assert_eq!(WeekStart::Sunday.day_names()[0], "Sun");
    assert_eq!(WeekStart::Monday.day_names()[6], "Sun");
    assert_eq!(WeekStart::Monday.weekday(), Weekday::Mon);
    assert_eq!("Monday".parse::<WeekStart>().unwrap(), WeekStart::Monday);
    assert!("friday".parse::<WeekStart>().is_err());
}

#[test]
fn test_leap_february() {
    let grid = MonthGrid::generate(2024, 2, &[], date(2024, 2, 29), WeekStart::Monday).unwrap();
    let february: Vec<_> = grid.cells.iter().filter(|c| c.in_month).collect();
    assert_eq!(february.len(), 29);
    assert!(grid.cell(date(2024, 2, 29)).unwrap().is_today);
}

#[test]
fn test_six_week_month() {
    // 1 September 2024 is a Sunday, so a Monday grid needs six rows
    let grid = MonthGrid::generate(2024, 9, &[], date(2024, 9, 1), WeekStart::Monday).unwrap();
    assert_eq!(grid.weeks().count(), 6);
    assert_eq!(grid.cells[0].date, date(2024, 8, 26));
    assert_eq!(grid.cells[6].date, date(2024, 9, 1));
}

#[test]
fn test_year_month_walk() {
    let mut month = YearMonth::new(2023, 11).unwrap();
    for _ in 0..3 {
        month = month.next().unwrap();
    }
    assert_eq!((month.year(), month.month()), (2024, 2));
    assert_eq!(month.last_day(), date(2024, 2, 29));
    assert_eq!(YearMonth::containing(date(2024, 7, 19)).unwrap().first_day(), date(2024, 7, 1));
    assert!(YearMonth::new(9999, 12).unwrap().next().is_err());
}

proptest! {
    #[test]
    fn prop_grid_covers_whole_weeks_and_month(
        year in 1900i32..2200,
        month in 1u32..=12,
        week_start in week_start_strategy(),
    ) {
        let today = date(year, month, 1);
        let grid = MonthGrid::generate(year, month, &[], today, week_start).unwrap();

        prop_assert_eq!(grid.cells.len() % 7, 0);
        prop_assert!(grid.cells.len() >= 28 && grid.cells.len() <= 42);

        let mut seen: HashMap<u32, usize> = HashMap::new();
        for cell in grid.cells.iter().filter(|c| c.in_month) {
            prop_assert_eq!(cell.date.year(), year);
            prop_assert_eq!(cell.date.month(), month);
            *seen.entry(cell.date.day()).or_default() += 1;
        }
        let days = YearMonth::new(year, month).unwrap().days();
        prop_assert_eq!(seen.len(), days as usize);
        prop_assert!(seen.values().all(|count| *count == 1));
    }

    #[test]
    fn prop_grid_starts_and_ends_on_week_boundaries(
        year in 1900i32..2200,
        month in 1u32..=12,
        week_start in week_start_strategy(),
    ) {
        let grid = MonthGrid::generate(year, month, &[], date(2000, 1, 1), week_start).unwrap();
        let first = grid.cells.first().unwrap();
        let last = grid.cells.last().unwrap();

        prop_assert_eq!(first.weekday_index, 0);
        prop_assert_eq!(last.weekday_index, 6);
        prop_assert_eq!(first.date.weekday(), week_start.weekday());
        prop_assert!(first.date <= date(year, month, 1));
        prop_assert!(grid.cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
        prop_assert!(grid.cells.iter().enumerate().all(|(i, c)| c.weekday_index as usize == i % 7));
    }

    #[test]
    fn prop_exactly_one_today_when_in_grid(
        year in 1900i32..2200,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let today = date(year, month, day);
        let grid = MonthGrid::generate(year, month, &[], today, WeekStart::Sunday).unwrap();
        prop_assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 1);
    }
}
