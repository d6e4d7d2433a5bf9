use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::calendar::{MAX_YEAR, MIN_YEAR};
use crate::models::{Booking, Business, Customer, Service};

/// Longest search query accepted from user input
pub const MAX_QUERY_LENGTH: usize = 100;

#[allow(clippy::expect_used)]
fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time pattern compiles"))
}

#[allow(clippy::expect_used)]
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 ()\-]*$").expect("phone pattern compiles"))
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a search query typed into a listing screen
    pub fn validate_search_query(query: &str, max_length: usize) -> Result<()> {
        if query.chars().count() > max_length {
            return Err(anyhow!("Search query too long (max {max_length} characters)"));
        }

        if query.contains('\0') {
            return Err(anyhow!("Search query contains invalid characters"));
        }

        Ok(())
    }

    /// Validate month number
    pub fn validate_month(month: u32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Month must be between 1 and 12, got {month}"));
        }
        Ok(())
    }

    /// Validate year number
    pub fn validate_year(year: i32) -> Result<()> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(anyhow!("Year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"));
        }
        Ok(())
    }

    /// Parse a `YYYY-MM-DD` date
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{input}', use YYYY-MM-DD"))
    }

    /// Parse an `HH:MM` time
    pub fn parse_time(input: &str) -> Result<NaiveTime> {
        let input = input.trim();
        if !time_pattern().is_match(input) {
            return Err(anyhow!("Invalid time '{input}', use HH:MM"));
        }
        NaiveTime::parse_from_str(input, "%H:%M").with_context(|| format!("Invalid time '{input}'"))
    }

    /// Validate date range
    pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        if let (Some(start_date), Some(end_date)) = (start, end) {
            if start_date > end_date {
                return Err(anyhow!("Start date cannot be after end date"));
            }

            let days = (end_date - start_date).num_days();
            if days > 366 * 5 {
                tracing::warn!(days, "Large date range requested");
            }
        }

        Ok(())
    }

    /// Validate a display name (customer, service, business)
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(anyhow!("Name too long (max 100 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(anyhow!("Name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a record identifier
    pub fn validate_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(anyhow!("Identifier cannot be empty"));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(anyhow!("Identifier contains invalid characters: {id}"));
        }

        Ok(())
    }

    /// Validate phone number format
    pub fn validate_phone(phone: &str) -> Result<()> {
        if phone.trim().is_empty() {
            return Err(anyhow!("Phone number cannot be empty"));
        }

        if !phone_pattern().is_match(phone.trim()) {
            return Err(anyhow!("Phone number must start with + or a digit and contain only digits"));
        }

        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if !(8..=15).contains(&digits) {
            return Err(anyhow!("Phone number must be between 8 and 15 digits"));
        }

        Ok(())
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(anyhow!("Email cannot be empty"));
        }

        if email.len() > 254 {
            return Err(anyhow!("Email too long (max 254 characters)"));
        }

        let Some((local_part, domain_part)) = email.split_once('@') else {
            return Err(anyhow!("Email must contain @ symbol"));
        };

        if domain_part.contains('@') {
            return Err(anyhow!("Email must have exactly one @ symbol"));
        }

        if local_part.is_empty() || local_part.len() > 64 {
            return Err(anyhow!("Email local part invalid"));
        }

        if domain_part.is_empty() || !domain_part.contains('.') {
            return Err(anyhow!("Email domain invalid"));
        }

        Ok(())
    }

    /// Validate file path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("File path contains invalid characters"));
        }

        // Check path length
        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate a price in dinars
    pub fn validate_price(price: f64) -> Result<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(anyhow!("Price must be a non-negative amount, got {price}"));
        }
        Ok(())
    }

    /// Validate a duration in minutes
    pub fn validate_duration(minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(anyhow!("Duration must be greater than 0"));
        }

        if minutes > 24 * 60 {
            return Err(anyhow!("Duration too long (max one day)"));
        }

        Ok(())
    }

    /// Validate a booking record
    pub fn validate_booking(booking: &Booking) -> Result<()> {
        Self::validate_id(&booking.id)?;
        Self::validate_name(&booking.customer_name).context("customer name")?;
        Self::validate_name(&booking.service_name).context("service name")?;
        Self::validate_duration(booking.duration_minutes)?;
        Self::validate_price(booking.price)?;

        if booking.dispute_reason.is_some() && !booking.disputed {
            return Err(anyhow!("Dispute reason given on a booking that is not disputed"));
        }

        Ok(())
    }

    /// Validate a service record
    pub fn validate_service(service: &Service) -> Result<()> {
        Self::validate_id(&service.id)?;
        Self::validate_name(&service.name)?;
        Self::validate_duration(service.duration_minutes)?;
        Self::validate_price(service.price)?;

        if service.category.trim().is_empty() {
            return Err(anyhow!("Service category cannot be empty"));
        }

        if service.category != service.category.trim().to_lowercase() {
            return Err(anyhow!("Service category must be trimmed lowercase, got '{}'", service.category));
        }

        Ok(())
    }

    /// Validate a customer record
    pub fn validate_customer(customer: &Customer) -> Result<()> {
        Self::validate_id(&customer.id)?;
        Self::validate_name(&customer.name)?;
        Self::validate_phone(&customer.phone)?;
        if let Some(email) = &customer.email {
            Self::validate_email(email)?;
        }
        Self::validate_price(customer.total_spent).context("total spent")?;
        Ok(())
    }

    /// Validate a business record
    pub fn validate_business(business: &Business) -> Result<()> {
        Self::validate_id(&business.id)?;
        Self::validate_name(&business.name)?;
        Self::validate_name(&business.city).context("city")?;

        if !(0.0..=5.0).contains(&business.rating) {
            return Err(anyhow!("Rating must be between 0 and 5, got {}", business.rating));
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_pattern_rejects_single_digit_hours() {
        assert!(InputValidator::parse_time("9:30").is_err());
        assert!(InputValidator::parse_time("09:30").is_ok());
    }

    #[test]
    fn test_rating_nan_is_rejected() {
        let mut business = crate::catalog::Catalog::sample().businesses.remove(0);
        business.rating = f32::NAN;
        assert!(InputValidator::validate_business(&business).is_err());
    }
}
