//! Reservili - Booking List Filtering and Calendar Grids
//!
//! The data layer behind the Reservili booking marketplace listing and
//! calendar screens, usable as a library or through the `reservili` CLI.
//!
//! # Features
//!
//! - Typed records for bookings, services, customers and businesses
//! - Case-insensitive, order-preserving record filtering
//! - Full-week month grids annotated with today and bookings
//! - Dashboard summaries over bookings
//! - Output as TXT, CSV or JSON

/// Calendar month grids
pub mod calendar;
/// Built-in and file-backed record sets
pub mod catalog;
/// Configuration management
pub mod config;
/// Library error type
pub mod error;
/// Record filtering
pub mod filter;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Output rendering
pub mod render;
/// Booking summaries
pub mod summary;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use calendar::{CalendarCell, MonthGrid, WeekStart, YearMonth};
pub use catalog::Catalog;
pub use error::{ReserviliError, Result};
pub use filter::{FilterBuilder, Filterable, Predicate, RecordFilter};
pub use models::{Booking, BookingStatus, Business, BusinessCategory, Customer, DateRange, OutputFormat, Service};
pub use summary::BookingSummary;
