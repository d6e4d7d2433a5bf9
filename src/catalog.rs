//! The static record set behind the listing and calendar views
//!
//! A [`Catalog`] is either the built-in sample (the mock data the mobile
//! client ships with) or a JSON file with the same shape. Loaded catalogs are
//! validated record by record; the sample is assumed valid and covered by
//! tests.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReserviliError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{Booking, BookingStatus, Business, BusinessCategory, Customer, Service};
use crate::validation::InputValidator;

/// All records known to the app
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Bookings, in display order
    #[serde(default)]
    pub bookings: Vec<Booking>,
    /// Services offered
    #[serde(default)]
    pub services: Vec<Service>,
    /// Known customers
    #[serde(default)]
    pub customers: Vec<Customer>,
    /// Listed businesses
    #[serde(default)]
    pub businesses: Vec<Business>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let timer = OperationTimer::new("catalog_load");
        let file = File::open(path)?;
        let catalog: Self = serde_json::from_reader(BufReader::new(file))?;
        catalog.validate()?;

        info!(
            path = %path.display(),
            bookings = catalog.bookings.len(),
            services = catalog.services.len(),
            customers = catalog.customers.len(),
            businesses = catalog.businesses.len(),
            "Loaded catalog"
        );
        MetricsCollector::default().record_catalog_load("file", timer.elapsed());
        timer.finish();
        Ok(catalog)
    }

    /// Write the catalog as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        debug!(path = %path.display(), "Saved catalog");
        Ok(())
    }

    /// Check every record, stopping at the first invalid one
    pub fn validate(&self) -> Result<()> {
        let invalid = |id: &str| {
            let id = id.to_string();
            move |err: anyhow::Error| ReserviliError::InvalidRecord { id, reason: format!("{err:#}") }
        };

        for booking in &self.bookings {
            InputValidator::validate_booking(booking).map_err(invalid(&booking.id))?;
        }
        for service in &self.services {
            InputValidator::validate_service(service).map_err(invalid(&service.id))?;
        }
        for customer in &self.customers {
            InputValidator::validate_customer(customer).map_err(invalid(&customer.id))?;
        }
        for business in &self.businesses {
            InputValidator::validate_business(business).map_err(invalid(&business.id))?;
        }
        Ok(())
    }

    /// True if the catalog holds no records at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty() && self.services.is_empty() && self.customers.is_empty() && self.businesses.is_empty()
    }

    /// The mock data set shipped with the mobile client
    #[must_use]
    pub fn sample() -> Self {
        Self {
            bookings: sample_bookings(),
            services: sample_services(),
            customers: sample_customers(),
            businesses: sample_businesses(),
        }
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn booking(
    id: &str,
    customer: &str,
    service: &str,
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: u32,
    status: BookingStatus,
    price: f64,
) -> Booking {
    Booking {
        id: id.to_string(),
        customer_name: customer.to_string(),
        service_name: service.to_string(),
        date,
        time,
        duration_minutes,
        status,
        price,
        disputed: false,
        dispute_reason: None,
    }
}

fn sample_bookings() -> Vec<Booking> {
    let mut disputed = booking("B007", "Mohamed Gharbi", "Coupe + Barbe", day(12), at(17, 0), 45, BookingStatus::NoShow, 35.0);
    disputed.disputed = true;
    disputed.dispute_reason = Some("Customer says the shop was closed".to_string());

    vec![
        booking("B001", "Ahmed Ben Ali", "Coupe Homme", day(15), at(10, 0), 30, BookingStatus::Confirmed, 20.0),
        booking("B002", "Fatma Trabelsi", "Brushing", day(15), at(11, 30), 45, BookingStatus::CheckedIn, 30.0),
        booking("B003", "Youssef Mansour", "Coupe + Barbe", day(14), at(15, 0), 45, BookingStatus::Completed, 35.0),
        booking("B004", "Amira Jlassi", "Coloration", day(18), at(9, 30), 90, BookingStatus::Confirmed, 80.0),
        booking("B005", "Karim Bouazizi", "Taille de Barbe", day(10), at(16, 0), 20, BookingStatus::Cancelled, 15.0),
        booking("B006", "Salma Hammami", "Soin Visage", day(20), at(14, 0), 60, BookingStatus::Rescheduled, 50.0),
        disputed,
    ]
}

fn sample_services() -> Vec<Service> {
    let service = |id: &str, name: &str, description: &str, price: f64, duration_minutes: u32, active: bool, category: &str| Service {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        duration_minutes,
        active,
        category: category.to_string(),
    };

    vec![
        service("S001", "Coupe Homme", "Classic men's haircut", 20.0, 30, true, "hair"),
        service("S002", "Coupe + Barbe", "Haircut with beard trim", 35.0, 45, true, "hair"),
        service("S003", "Taille de Barbe", "Beard shaping and trim", 15.0, 20, true, "beard"),
        service("S004", "Brushing", "Wash and blow-dry", 30.0, 45, true, "hair"),
        service("S005", "Coloration", "Full colour treatment", 80.0, 90, true, "coloring"),
        service("S006", "Soin Visage", "Facial care", 50.0, 60, false, "skincare"),
    ]
}

fn sample_customers() -> Vec<Customer> {
    let customer = |id: &str, name: &str, phone: &str, email: Option<&str>, total_visits: u32, total_spent: f64, last_visit: Option<NaiveDate>| Customer {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.map(str::to_string),
        total_visits,
        total_spent,
        last_visit,
    };

    vec![
        customer("C001", "Ahmed Ben Ali", "+216 20 123 456", Some("ahmed.benali@email.tn"), 12, 240.0, Some(day(1))),
        customer("C002", "Fatma Trabelsi", "+216 22 234 567", Some("fatma.t@email.tn"), 8, 240.0, Some(day(5))),
        customer("C003", "Youssef Mansour", "+216 98 345 678", None, 5, 175.0, Some(day(14))),
        customer("C004", "Amira Jlassi", "+216 55 456 789", Some("amira.jlassi@email.tn"), 3, 240.0, None),
        customer("C005", "Karim Bouazizi", "+216 29 567 890", None, 0, 0.0, None),
    ]
}

fn sample_businesses() -> Vec<Business> {
    let business = |id: &str, name: &str, category: BusinessCategory, city: &str, rating: f32, sponsored: bool| Business {
        id: id.to_string(),
        name: name.to_string(),
        category,
        city: city.to_string(),
        rating,
        sponsored,
    };

    vec![
        business("BZ001", "Salon Élégance", BusinessCategory::Salon, "Tunis", 4.8, true),
        business("BZ002", "Barber King", BusinessCategory::Barber, "Sousse", 4.6, false),
        business("BZ003", "Café des Délices", BusinessCategory::Cafe, "Sidi Bou Said", 4.7, true),
        business("BZ004", "Dar El Jeld", BusinessCategory::Restaurant, "Tunis", 4.9, false),
        business("BZ005", "Le Gentleman", BusinessCategory::Barber, "Sfax", 4.3, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let catalog = Catalog::sample();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.bookings.len(), 7);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_sample_has_one_disputed_booking() {
        let catalog = Catalog::sample();
        let disputed: Vec<_> = catalog.bookings.iter().filter(|b| b.disputed).collect();
        assert_eq!(disputed.len(), 1);
        assert!(disputed[0].dispute_reason.is_some());
    }

    #[test]
    fn test_validate_reports_record_id() {
        let mut catalog = Catalog::sample();
        catalog.services[1].duration_minutes = 0;
        match catalog.validate() {
            Err(ReserviliError::InvalidRecord { id, .. }) => assert_eq!(id, "S002"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_json_object_is_empty_catalog() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.is_empty());
    }
}
