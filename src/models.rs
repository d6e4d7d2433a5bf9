//! Data models for the booking marketplace
//!
//! This module contains the plain records shared by the listing and calendar
//! logic: bookings, services, customers and businesses. Records carry no
//! identity lifecycle; they are created once and only ever filtered.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ReserviliError;

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Booked and confirmed by the business
    Confirmed,
    /// Customer has arrived
    CheckedIn,
    /// Service delivered
    Completed,
    /// Customer never showed up
    NoShow,
    /// Cancelled by either side
    Cancelled,
    /// Moved to another slot
    Rescheduled,
}

impl BookingStatus {
    /// Every status, in display order
    pub const ALL: [Self; 6] = [
        Self::Confirmed,
        Self::CheckedIn,
        Self::Completed,
        Self::NoShow,
        Self::Cancelled,
        Self::Rescheduled,
    ];

    /// Canonical wire name of the status
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::Completed => "completed",
            Self::NoShow => "no-show",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
        }
    }

    /// True for bookings still expected to be honoured
    #[must_use]
    pub const fn is_upcoming(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::Rescheduled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ReserviliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ReserviliError::UnknownVariant {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

/// Kind of business listed on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessCategory {
    /// Coffee shop
    Cafe,
    /// Barber shop
    Barber,
    /// Beauty salon
    Salon,
    /// Restaurant
    Restaurant,
}

impl BusinessCategory {
    /// Every category, in display order
    pub const ALL: [Self; 4] = [Self::Cafe, Self::Barber, Self::Salon, Self::Restaurant];

    /// Canonical wire name of the category
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cafe => "cafe",
            Self::Barber => "barber",
            Self::Salon => "salon",
            Self::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessCategory {
    type Err = ReserviliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let normalized = if normalized == "café" { "cafe".to_string() } else { normalized };
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ReserviliError::UnknownVariant {
                kind: "business category",
                value: s.to_string(),
            })
    }
}

/// A customer's reserved slot with a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: String,
    /// Display name of the customer
    pub customer_name: String,
    /// Name of the booked service
    pub service_name: String,
    /// Day of the appointment
    pub date: NaiveDate,
    /// Start time of the appointment
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Length of the appointment in minutes
    pub duration_minutes: u32,
    /// Current status
    pub status: BookingStatus,
    /// Price in Tunisian dinars
    pub price: f64,
    /// True if the customer or business raised a dispute
    #[serde(default)]
    pub disputed: bool,
    /// Reason given for the dispute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_reason: Option<String>,
}

impl Booking {
    /// Time at which the appointment ends
    #[must_use]
    pub fn end_time(&self) -> NaiveTime {
        self.time + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// A service offered by a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier
    pub id: String,
    /// Service name
    pub name: String,
    /// Short description shown in listings
    #[serde(default)]
    pub description: String,
    /// Price in Tunisian dinars
    pub price: f64,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Whether the service can currently be booked
    pub active: bool,
    /// Free-form category ("hair", "beard", "coffee", ...), stored lowercase
    #[serde(deserialize_with = "lowercase")]
    pub category: String,
}

fn lowercase<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_lowercase())
}

/// A customer known to a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email address (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Number of visits so far
    pub total_visits: u32,
    /// Total amount spent in Tunisian dinars
    pub total_spent: f64,
    /// Date of the most recent visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<NaiveDate>,
}

impl Customer {
    /// Average spend per visit, zero when the customer never visited
    #[must_use]
    pub fn average_spend(&self) -> f64 {
        if self.total_visits == 0 {
            0.0
        } else {
            self.total_spent / f64::from(self.total_visits)
        }
    }
}

/// A business listed on the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    /// Business identifier
    pub id: String,
    /// Business name
    pub name: String,
    /// Kind of business
    pub category: BusinessCategory,
    /// City the business is located in
    pub city: String,
    /// Average rating, 0 to 5
    pub rating: f32,
    /// Promoted placement in listings
    #[serde(default)]
    pub sponsored: bool,
}

/// Date range for filtering bookings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive, optional)
    pub start: Option<NaiveDate>,
    /// End date (inclusive, optional)
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Unbounded range
    #[must_use]
    pub const fn all() -> Self {
        Self { start: None, end: None }
    }

    /// True if `date` falls within the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Output format for rendered records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    #[default]
    Txt,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = ReserviliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReserviliError::UnknownVariant {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Serde adapter for `HH:MM` times
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub(crate) fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
