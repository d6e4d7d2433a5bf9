//! Error types for the reservili library.
//!
//! This module provides custom error types using `thiserror` for the library
//! surface. The binary and configuration layers use `anyhow` on top of these.

use thiserror::Error;

/// Errors that can occur in the reservili library.
#[derive(Error, Debug)]
pub enum ReserviliError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV output errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid date or date component
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Month outside 1..=12
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// A filter predicate names a field the record type does not have
    #[error("Unknown {kind} field '{field}' for {record}")]
    UnknownField {
        /// Record type name
        record: &'static str,
        /// Field kind the predicate expected
        kind: &'static str,
        /// Field name as given
        field: String,
    },

    /// A record failed validation when loading a catalog
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Identifier of the offending record
        id: String,
        /// What was wrong with it
        reason: String,
    },

    /// Unknown status or category value
    #[error("Unknown {kind}: {value}")]
    UnknownVariant {
        /// Enumeration name
        kind: &'static str,
        /// Value as given
        value: String,
    },
}

/// Convenience type alias for Result with `ReserviliError`
pub type Result<T> = std::result::Result<T, ReserviliError>;
