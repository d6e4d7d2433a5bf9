//! Catalog loading and saving against real files

use std::fs;

use reservili::catalog::Catalog;
use reservili::models::{BookingStatus, BusinessCategory};
use reservili::ReserviliError;
use tempfile::tempdir;

#[test]
fn test_save_then_load_sample() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("nested").join("catalog.json");

    let sample = Catalog::sample();
    sample.save(&path).expect("Failed to save catalog");
    assert!(path.exists());

    let loaded = Catalog::load(&path).expect("Failed to load catalog");
    assert_eq!(loaded, sample);
}

#[test]
fn test_load_hand_written_catalog() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
            "bookings": [
                {
                    "id": "R1", "customer_name": "Nour Ayari", "service_name": "Brunch",
                    "date": "2024-06-02", "time": "11:00", "duration_minutes": 90,
                    "status": "no-show", "price": 42.5,
                    "disputed": true, "dispute_reason": "Table was not ready"
                }
            ],
            "businesses": [
                { "id": "BZ9", "name": "Café Lac", "category": "cafe", "city": "La Marsa", "rating": 4.1 }
            ]
        }"#,
    )
    .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.bookings.len(), 1);
    assert_eq!(catalog.bookings[0].status, BookingStatus::NoShow);
    assert!(catalog.services.is_empty());
    assert_eq!(catalog.businesses[0].category, BusinessCategory::Cafe);
    assert!(!catalog.businesses[0].sponsored);
}

#[test]
fn test_load_rejects_invalid_record() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{ "services": [
            { "id": "S1", "name": "Coupe", "price": -5.0, "duration_minutes": 30, "active": true, "category": "hair" }
        ] }"#,
    )
    .unwrap();

    match Catalog::load(&path) {
        Err(ReserviliError::InvalidRecord { id, reason }) => {
            assert_eq!(id, "S1");
            assert!(reason.contains("Price"));
        }
        other => panic!("expected invalid record, got {other:?}"),
    }
}

#[test]
fn test_service_category_is_lowercased_on_load() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{ "services": [
            { "id": "S1", "name": "Coupe", "price": 20.0, "duration_minutes": 30, "active": true, "category": " Hair" }
        ] }"#,
    )
    .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.services[0].category, "hair");
}

#[test]
fn test_load_rejects_unknown_status() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{ "bookings": [
            { "id": "R1", "customer_name": "Nour", "service_name": "Brunch", "date": "2024-06-02",
              "time": "11:00", "duration_minutes": 90, "status": "pending", "price": 10.0 }
        ] }"#,
    )
    .unwrap();

    assert!(matches!(Catalog::load(&path), Err(ReserviliError::Serialization(_))));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = tempdir().unwrap();
    let result = Catalog::load(&temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(ReserviliError::Io(_))));
}

#[test]
fn test_dispute_reason_requires_flag() {
    let mut catalog = Catalog::sample();
    catalog.bookings[0].dispute_reason = Some("late".to_string());
    assert!(catalog.validate().is_err());
}
