use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use reservili::calendar::{MonthGrid, WeekStart};
use reservili::catalog::Catalog;
use reservili::config::AppConfig;
use reservili::filter::RecordFilter;
use reservili::logging::{init_logging, OperationTimer};
use reservili::metrics::MetricsCollector;
use reservili::models::{Booking, BookingStatus, Business, BusinessCategory, Customer, DateRange, OutputFormat, Service};
use reservili::render::{write_calendar, write_records, write_summary};
use reservili::summary::BookingSummary;
use reservili::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON file (defaults to configuration, then the built-in sample)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Output format (txt, csv or json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Configuration file layered over config/default and config/local
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookings
    Bookings {
        /// Text to look for in customer and service names
        #[arg(short, long)]
        search: Option<String>,

        /// Booking status, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// Only bookings on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Only disputed bookings
        #[arg(long)]
        disputed: bool,
    },
    /// List services
    Services {
        /// Text to look for in names and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Service category, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Hide inactive services
        #[arg(long)]
        active_only: bool,
    },
    /// List customers
    Customers {
        /// Text to look for in name, phone and email
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List businesses
    Businesses {
        /// Text to look for in names and cities
        #[arg(short, long)]
        search: Option<String>,

        /// Business category (cafe, barber, salon, restaurant), or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Only sponsored businesses
        #[arg(long)]
        sponsored: bool,
    },
    /// Show the booking calendar for a month
    Calendar {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Date to highlight as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,

        /// First day of the week (sunday or monday)
        #[arg(long)]
        week_start: Option<String>,
    },
    /// Summarize bookings
    Summary {
        /// First date included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last date included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Write the built-in sample catalog as JSON
    ExportSample {
        /// Destination file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.format == "json",
        config.logging.log_dir.as_deref().map(Path::new),
    )?;

    info!("Starting reservili");

    let format = match &cli.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => config.output_format()?,
    };

    let stdout = std::io::stdout();
    let out = stdout.lock();

    let result = run(&cli, &config, format, out);
    if let Err(err) = &result {
        MetricsCollector::default().record_error("command", command_name(&cli.command));
        debug!(error = %err, "Command failed");
    }
    result
}

fn run<W: Write>(cli: &Cli, config: &AppConfig, format: OutputFormat, out: W) -> Result<()> {
    let _timer = OperationTimer::new(command_name(&cli.command));

    match &cli.command {
        Commands::Bookings { search, status, date, disputed } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            list_bookings(&catalog, config, search.as_deref(), status, date.as_deref(), *disputed, format, out)
        }
        Commands::Services { search, category, active_only } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            list_services(&catalog, config, search.as_deref(), category, *active_only, format, out)
        }
        Commands::Customers { search } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            let mut builder = RecordFilter::<Customer>::builder();
            if let Some(query) = search_query(search.as_deref(), config)? {
                builder = builder.search(query);
            }
            let matched = builder.build()?.apply(&catalog.customers);
            info!(matched = matched.len(), total = catalog.customers.len(), "Filtered customers");
            Ok(write_records(&matched, format, out)?)
        }
        Commands::Businesses { search, category, sponsored } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            list_businesses(&catalog, config, search.as_deref(), category, *sponsored, format, out)
        }
        Commands::Calendar { year, month, today, week_start } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            let today = match today {
                Some(date) => InputValidator::parse_date(date)?,
                None => Local::now().date_naive(),
            };
            let week_start = match week_start {
                Some(value) => value.parse::<WeekStart>()?,
                None => config.week_start()?,
            };
            show_calendar(&catalog, year.unwrap_or_else(|| today.year()), month.unwrap_or_else(|| today.month()), today, week_start, format, out)
        }
        Commands::Summary { from, to } => {
            let catalog = load_catalog(cli.data.as_deref(), config)?;
            let range = DateRange {
                start: from.as_deref().map(InputValidator::parse_date).transpose()?,
                end: to.as_deref().map(InputValidator::parse_date).transpose()?,
            };
            InputValidator::validate_date_range(range.start, range.end)?;

            let summary = BookingSummary::from_bookings(&catalog.bookings, range);
            info!(total = summary.total, revenue = summary.revenue, "Summarized bookings");
            Ok(write_summary(&summary, format, out)?)
        }
        Commands::ExportSample { path } => {
            InputValidator::validate_file_path(path)?;
            Catalog::sample()
                .save(path)
                .with_context(|| format!("Failed to write sample catalog to {}", path.display()))?;
            info!(path = %path.display(), "Wrote sample catalog");
            Ok(())
        }
    }
}

const fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Bookings { .. } => "bookings",
        Commands::Services { .. } => "services",
        Commands::Customers { .. } => "customers",
        Commands::Businesses { .. } => "businesses",
        Commands::Calendar { .. } => "calendar",
        Commands::Summary { .. } => "summary",
        Commands::ExportSample { .. } => "export_sample",
    }
}

/// Load the catalog from the command line, the configuration, or the built-in sample
fn load_catalog(data: Option<&Path>, config: &AppConfig) -> Result<Catalog> {
    let path = data.map(Path::to_path_buf).or_else(|| config.get_catalog_path());
    match path {
        Some(path) => {
            InputValidator::validate_file_path(&path)?;
            Catalog::load(&path).with_context(|| format!("Failed to load catalog from {}", path.display()))
        }
        None => {
            debug!("No catalog configured, using built-in sample");
            let timer = OperationTimer::new("catalog_sample");
            let catalog = Catalog::sample();
            MetricsCollector::default().record_catalog_load("sample", timer.elapsed());
            Ok(catalog)
        }
    }
}

/// Sanitize and validate a search query; blank queries mean "no search"
fn search_query(query: Option<&str>, config: &AppConfig) -> Result<Option<String>> {
    let Some(query) = query else {
        return Ok(None);
    };
    let query = InputValidator::sanitize_text(query);
    InputValidator::validate_search_query(&query, config.search.max_query_length)?;
    Ok(Some(query).filter(|q| !q.is_empty()))
}

/// `None` for the "all" tab
fn choice(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && !value.eq_ignore_ascii_case("all")).then_some(value)
}

#[allow(clippy::too_many_arguments)]
fn list_bookings<W: Write>(
    catalog: &Catalog, config: &AppConfig, search: Option<&str>, status: &str, date: Option<&str>, disputed: bool,
    format: OutputFormat, out: W,
) -> Result<()> {
    let mut builder = RecordFilter::<Booking>::builder();
    if let Some(query) = search_query(search, config)? {
        builder = builder.search(query);
    }
    if let Some(status) = choice(status) {
        let status = status.parse::<BookingStatus>()?;
        builder = builder.equals("status", status.as_str());
    }
    if let Some(date) = date {
        let date = InputValidator::parse_date(date)?;
        builder = builder.equals("date", date.format("%Y-%m-%d").to_string());
    }
    if disputed {
        builder = builder.flag("disputed", true);
    }

    let filter = builder.build()?;
    let matched = filter.apply(&catalog.bookings);
    info!(matched = matched.len(), total = catalog.bookings.len(), predicates = filter.len(), "Filtered bookings");
    if matched.is_empty() {
        warn!("No bookings match the given filters");
    }

    Ok(write_records(&matched, format, out)?)
}

fn list_services<W: Write>(
    catalog: &Catalog, config: &AppConfig, search: Option<&str>, category: &str, active_only: bool, format: OutputFormat,
    out: W,
) -> Result<()> {
    let mut builder = RecordFilter::<Service>::builder();
    if let Some(query) = search_query(search, config)? {
        builder = builder.search(query);
    }
    if let Some(category) = choice(category) {
        builder = builder.equals("category", category.to_lowercase());
    }
    if active_only {
        builder = builder.flag("active", true);
    }

    let matched = builder.build()?.apply(&catalog.services);
    info!(matched = matched.len(), total = catalog.services.len(), "Filtered services");
    Ok(write_records(&matched, format, out)?)
}

fn list_businesses<W: Write>(
    catalog: &Catalog, config: &AppConfig, search: Option<&str>, category: &str, sponsored: bool, format: OutputFormat,
    out: W,
) -> Result<()> {
    let mut builder = RecordFilter::<Business>::builder();
    if let Some(query) = search_query(search, config)? {
        builder = builder.search(query);
    }
    if let Some(category) = choice(category) {
        let category = category.parse::<BusinessCategory>()?;
        builder = builder.equals("category", category.as_str());
    }
    if sponsored {
        builder = builder.flag("sponsored", true);
    }

    let matched = builder.build()?.apply(&catalog.businesses);
    info!(matched = matched.len(), total = catalog.businesses.len(), "Filtered businesses");
    Ok(write_records(&matched, format, out)?)
}

fn show_calendar<W: Write>(
    catalog: &Catalog, year: i32, month: u32, today: NaiveDate, week_start: WeekStart, format: OutputFormat, out: W,
) -> Result<()> {
    InputValidator::validate_year(year)?;
    InputValidator::validate_month(month)?;

    let grid = MonthGrid::generate(year, month, &catalog.bookings, today, week_start)?;
    info!(
        year,
        month,
        cells = grid.cells.len(),
        busy_days = grid.busy_days().count(),
        "Generated calendar"
    );
    Ok(write_calendar(&grid, format, out)?)
}
