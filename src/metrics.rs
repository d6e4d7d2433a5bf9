use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
///
/// Emits through the `metrics` facade; nothing is recorded unless the
/// embedding application installs a recorder.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    /// Filter invocations, labelled by record type
    pub filter_operations_total: &'static str,
    /// Records fed into filters
    pub filter_input_records: &'static str,
    /// Fraction of records kept by a filter
    pub filter_selectivity: &'static str,

    /// Month grids generated
    pub calendar_grids_total: &'static str,
    /// Cells in the last generated grid
    pub calendar_grid_cells: &'static str,
    /// Bookings placed on generated grids
    pub calendar_bookings_placed: &'static str,

    /// Catalog loads, labelled by source
    pub catalog_loads_total: &'static str,
    /// Time spent loading catalogs
    pub catalog_load_duration: &'static str,

    /// Errors, labelled by type and operation
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            filter_operations_total: "reservili_filter_operations_total",
            filter_input_records: "reservili_filter_input_records",
            filter_selectivity: "reservili_filter_selectivity_ratio",

            calendar_grids_total: "reservili_calendar_grids_total",
            calendar_grid_cells: "reservili_calendar_grid_cells",
            calendar_bookings_placed: "reservili_calendar_bookings_placed_total",

            catalog_loads_total: "reservili_catalog_loads_total",
            catalog_load_duration: "reservili_catalog_load_duration_seconds",

            errors_total: "reservili_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record a filter pass over `input` records keeping `output`
    pub fn record_filter(&self, record: &'static str, input: usize, output: usize) {
        counter!(self.filter_operations_total, "record" => record).increment(1);
        histogram!(self.filter_input_records, "record" => record).record(input as f64);
        if input > 0 {
            histogram!(self.filter_selectivity, "record" => record).record(output as f64 / input as f64);
        }
    }

    /// Record a generated month grid
    pub fn record_calendar(&self, cells: usize, bookings: usize) {
        counter!(self.calendar_grids_total).increment(1);
        gauge!(self.calendar_grid_cells).set(cells as f64);
        counter!(self.calendar_bookings_placed).increment(bookings as u64);
    }

    /// Record a catalog load
    pub fn record_catalog_load(&self, source: &'static str, duration: Duration) {
        counter!(self.catalog_loads_total, "source" => source).increment(1);
        histogram!(self.catalog_load_duration, "source" => source).record(duration.as_secs_f64());
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_names() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.filter_operations_total, "reservili_filter_operations_total");
        assert!(collector.errors_total.starts_with("reservili_"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let collector = MetricsCollector::default();
        collector.record_filter("booking", 0, 0);
        collector.record_filter("booking", 7, 2);
        collector.record_calendar(42, 3);
        collector.record_catalog_load("sample", Duration::from_millis(1));
        collector.record_error("io", "load");
    }
}
