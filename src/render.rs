//! Rendering of records, month grids and summaries.
//!
//! This module writes listing results in the supported output formats
//! (TXT, CSV, JSON) to any `Write` sink, so the CLI can target stdout and
//! tests can target a buffer.

use std::io::Write;

use chrono::Datelike;
use csv::Writer;
use serde::Serialize;

use crate::calendar::MonthGrid;
use crate::error::Result;
use crate::models::{Booking, Business, Customer, OutputFormat, Service};
use crate::summary::BookingSummary;

/// Records that render as a table row
pub trait Tabular: Serialize {
    /// Column headers, in row order
    const HEADERS: &'static [&'static str];

    /// Cell values, one per header
    fn row(&self) -> Vec<String>;
}

impl Tabular for Booking {
    const HEADERS: &'static [&'static str] =
        &["ID", "Customer", "Service", "Date", "Time", "Duration", "Status", "Price", "Dispute"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_name.clone(),
            self.service_name.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            format!("{}-{}", self.time.format("%H:%M"), self.end_time().format("%H:%M")),
            format!("{} min", self.duration_minutes),
            self.status.to_string(),
            format!("{:.2} TND", self.price),
            if self.disputed {
                self.dispute_reason.clone().unwrap_or_else(|| "yes".to_string())
            } else {
                String::new()
            },
        ]
    }
}

impl Tabular for Service {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Category", "Duration", "Price", "Active", "Description"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            format!("{} min", self.duration_minutes),
            format!("{:.2} TND", self.price),
            if self.active { "yes" } else { "no" }.to_string(),
            self.description.clone(),
        ]
    }
}

impl Tabular for Customer {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Phone", "Email", "Visits", "Spent", "Last Visit"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.phone.clone(),
            self.email.clone().unwrap_or_default(),
            self.total_visits.to_string(),
            format!("{:.2} TND", self.total_spent),
            self.last_visit.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        ]
    }
}

impl Tabular for Business {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Category", "City", "Rating", "Sponsored"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.to_string(),
            self.city.clone(),
            format!("{:.1}", self.rating),
            if self.sponsored { "yes" } else { "" }.to_string(),
        ]
    }
}

/// Write records in the requested format.
///
/// An empty slice renders as a "No results" line in TXT, a header-only CSV,
/// or an empty JSON array.
pub fn write_records<T: Tabular, W: Write>(records: &[&T], format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Txt => write_txt_table(records, writer),
        OutputFormat::Csv => write_csv_table(records, writer),
        OutputFormat::Json => write_json(records, writer),
    }
}

/// Aligned columns, one record per line
fn write_txt_table<T: Tabular, W: Write>(records: &[&T], mut writer: W) -> Result<()> {
    if records.is_empty() {
        writeln!(writer, "No results")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records.iter().map(|r| r.row()).collect();
    let widths: Vec<usize> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    let header: Vec<String> = T::HEADERS.iter().map(|h| (*h).to_string()).collect();
    write_txt_row(&mut writer, &header, &widths)?;
    for row in &rows {
        write_txt_row(&mut writer, row, &widths)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_txt_row<W: Write>(writer: &mut W, row: &[String], widths: &[usize]) -> Result<()> {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

/// Header row followed by one row per record
fn write_csv_table<T: Tabular, W: Write>(records: &[&T], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(T::HEADERS)?;
    for record in records {
        writer.write_record(record.row())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<S: Serialize + ?Sized, W: Write>(value: &S, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a month grid.
///
/// TXT draws the month view: out-of-month days in parentheses, today in
/// brackets, and a `*` after days that carry bookings. CSV lists one row per
/// cell. JSON serializes the grid with its bookings.
pub fn write_calendar<W: Write>(grid: &MonthGrid<'_>, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(grid, writer),
        OutputFormat::Csv => {
            let mut csv = Writer::from_writer(writer);
            csv.write_record(["Date", "InMonth", "Today", "Bookings"])?;
            for cell in &grid.cells {
                csv.write_record([
                    cell.date.format("%Y-%m-%d").to_string(),
                    cell.in_month.to_string(),
                    cell.is_today.to_string(),
                    cell.bookings.len().to_string(),
                ])?;
            }
            csv.flush()?;
            Ok(())
        }
        OutputFormat::Txt => {
            let title = grid
                .year_month()
                .map_or_else(|_| format!("{}-{:02}", grid.year, grid.month), |ym| format!("{} {}", ym.name(), grid.year));
            let width = 7 * 5 + 6;
            writeln!(writer, "{title:^width$}")?;

            let header = grid.week_start.day_names().map(|d| format!("{d:<5}")).join(" ");
            writeln!(writer, "{}", header.trim_end())?;

            for week in grid.weeks() {
                let line = week
                    .iter()
                    .map(|cell| {
                        let day = cell.date.day();
                        let label = if cell.is_today {
                            format!("[{day:>2}]")
                        } else if cell.in_month {
                            format!(" {day:>2} ")
                        } else {
                            format!("({day:>2})")
                        };
                        format!("{label}{}", if cell.has_bookings() { '*' } else { ' ' })
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(writer, "{}", line.trim_end())?;
            }

            let busy: Vec<_> = grid.busy_days().collect();
            if !busy.is_empty() {
                writeln!(writer)?;
                for cell in busy {
                    for booking in &cell.bookings {
                        writeln!(
                            writer,
                            "{} {}  {} - {} ({})",
                            cell.date.format("%Y-%m-%d"),
                            booking.time.format("%H:%M"),
                            booking.customer_name,
                            booking.service_name,
                            booking.status
                        )?;
                    }
                }
            }

            writer.flush()?;
            Ok(())
        }
    }
}

/// Write a booking summary
pub fn write_summary<W: Write>(summary: &BookingSummary, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(summary, writer),
        OutputFormat::Csv => {
            let mut csv = Writer::from_writer(writer);
            csv.write_record(["Metric", "Value"])?;
            csv.write_record(["total", summary.total.to_string().as_str()])?;
            for (status, count) in &summary.by_status {
                csv.write_record([status.as_str(), count.to_string().as_str()])?;
            }
            csv.write_record(["revenue", format!("{:.2}", summary.revenue).as_str()])?;
            csv.write_record(["expected_revenue", format!("{:.2}", summary.expected_revenue).as_str()])?;
            csv.write_record(["disputed", summary.disputed.to_string().as_str()])?;
            csv.write_record(["unique_customers", summary.unique_customers.to_string().as_str()])?;
            csv.flush()?;
            Ok(())
        }
        OutputFormat::Txt => {
            let bound = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "…".to_string(), |d| d.format("%Y-%m-%d").to_string());
            writeln!(writer, "Bookings {} to {}", bound(summary.range.start), bound(summary.range.end))?;
            writeln!(writer, "  total             {}", summary.total)?;
            for (status, count) in &summary.by_status {
                writeln!(writer, "  {:<17} {count}", status.as_str())?;
            }
            writeln!(writer, "  revenue           {:.2} TND", summary.revenue)?;
            writeln!(writer, "  expected revenue  {:.2} TND", summary.expected_revenue)?;
            writeln!(writer, "  disputed          {}", summary.disputed)?;
            writeln!(writer, "  customers         {}", summary.unique_customers)?;
            writeln!(writer, "  no-show rate      {:.0}%", summary.no_show_rate() * 100.0)?;
            writer.flush()?;
            Ok(())
        }
    }
}
