use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calendar::WeekStart;
use crate::models::OutputFormat;
use crate::validation::MAX_QUERY_LENGTH;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log output settings
    pub logging: LoggingConfig,
    /// Where records come from
    pub data: DataConfig,
    /// Calendar view settings
    pub calendar: CalendarConfig,
    /// Output rendering settings
    pub output: OutputConfig,
    /// Search box limits
    pub search: SearchConfig,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Directory for the rolling JSON log file, if any
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Console format: "json" or "text"
    pub format: String,
}

/// Where records come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Catalog JSON file; the built-in sample is used when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
}

/// Calendar view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First day of the week: "sunday" or "monday"
    pub week_start: String,
}

/// Output rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when none is given on the command line
    pub default_format: String,
}

/// Search box limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Longest accepted query, in characters
    pub max_query_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                log_dir: None,
                format: "text".to_string(),
            },
            data: DataConfig { catalog_path: None },
            calendar: CalendarConfig { week_start: "sunday".to_string() },
            output: OutputConfig { default_format: "txt".to_string() },
            search: SearchConfig { max_query_length: MAX_QUERY_LENGTH },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence, layering
    /// `explicit` above the default files
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(
                Config::try_from(&Self::default())
                    .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?,
            )
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("RESERVILI").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate output and calendar config
        self.output_format()?;
        self.week_start()?;

        if self.search.max_query_length == 0 {
            return Err(anyhow::anyhow!("max_query_length must be greater than 0"));
        }

        Ok(())
    }

    /// Configured default output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        Ok(self.output.default_format.parse::<OutputFormat>()?)
    }

    /// Configured first day of the week
    pub fn week_start(&self) -> Result<WeekStart> {
        Ok(self.calendar.week_start.parse::<WeekStart>()?)
    }

    /// Get catalog path from environment or config
    pub fn get_catalog_path(&self) -> Option<PathBuf> {
        std::env::var("RESERVILI_CATALOG")
            .ok()
            .or_else(|| self.data.catalog_path.clone())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.calendar.week_start, "sunday");
        assert_eq!(config.search.max_query_length, 100);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.calendar.week_start = "friday".to_string();
        assert!(config.validate().is_err());
    }
}
