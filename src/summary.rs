//! Dashboard aggregates over bookings

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{Booking, BookingStatus, DateRange};

/// Booking figures shown on the business dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingSummary {
    /// Range the figures cover
    pub range: DateRange,
    /// Bookings inside the range
    pub total: usize,
    /// Count per status; statuses with no bookings are present with zero
    pub by_status: BTreeMap<BookingStatus, usize>,
    /// Sum of prices of completed bookings
    pub revenue: f64,
    /// Sum of prices of bookings still expected to be honoured
    pub expected_revenue: f64,
    /// Bookings under dispute
    pub disputed: usize,
    /// Distinct customer names
    pub unique_customers: usize,
}

impl BookingSummary {
    /// Summarize the bookings whose date falls within `range`
    #[must_use]
    pub fn from_bookings(bookings: &[Booking], range: DateRange) -> Self {
        let mut summary = Self {
            range,
            by_status: BookingStatus::ALL.into_iter().map(|s| (s, 0)).collect(),
            ..Self::default()
        };
        let mut customers = HashSet::new();

        for booking in bookings.iter().filter(|b| range.contains(b.date)) {
            summary.total += 1;
            *summary.by_status.entry(booking.status).or_default() += 1;
            match booking.status {
                BookingStatus::Completed => summary.revenue += booking.price,
                status if status.is_upcoming() => summary.expected_revenue += booking.price,
                _ => {}
            }
            if booking.disputed {
                summary.disputed += 1;
            }
            customers.insert(booking.customer_name.trim().to_lowercase());
        }

        summary.unique_customers = customers.len();
        summary
    }

    /// Number of bookings with `status`
    #[must_use]
    pub fn count(&self, status: BookingStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    /// Share of finished bookings where the customer did not show up
    #[must_use]
    pub fn no_show_rate(&self) -> f64 {
        let no_shows = self.count(BookingStatus::NoShow);
        let finished = self.count(BookingStatus::Completed) + no_shows;
        if finished == 0 {
            0.0
        } else {
            no_shows as f64 / finished as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::NaiveDate;

    #[test]
    fn test_sample_summary() {
        let catalog = Catalog::sample();
        let summary = BookingSummary::from_bookings(&catalog.bookings, DateRange::all());

        assert_eq!(summary.total, 7);
        assert_eq!(summary.count(BookingStatus::Confirmed), 2);
        assert_eq!(summary.count(BookingStatus::Cancelled), 1);
        assert!((summary.revenue - 35.0).abs() < f64::EPSILON);
        // 20 + 30 + 80 + 50
        assert!((summary.expected_revenue - 180.0).abs() < f64::EPSILON);
        assert_eq!(summary.disputed, 1);
        assert_eq!(summary.unique_customers, 7);
        assert!((summary.no_show_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_limits_summary() {
        let catalog = Catalog::sample();
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let summary = BookingSummary::from_bookings(&catalog.bookings, DateRange { start: Some(day), end: Some(day) });

        assert_eq!(summary.total, 2);
        assert_eq!(summary.unique_customers, 2);
        assert!(summary.revenue.abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BookingSummary::from_bookings(&[], DateRange::all());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.by_status.len(), BookingStatus::ALL.len());
        assert!(summary.no_show_rate().abs() < f64::EPSILON);
    }
}
