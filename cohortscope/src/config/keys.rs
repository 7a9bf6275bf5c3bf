//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use super::defaults::MAX_EXPORT_DIMENSION;
use super::settings::ConfigFile;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Gateway settings
    GatewayBaseUrl,
    GatewayTimeout,
    GatewayOutcomeLimit,

    // Selection settings
    SelectionDisease,
    SelectionMeasurement,

    // Refresh settings
    RefreshCycleTimeout,

    // Export settings
    ExportDirectory,
    ExportWidth,
    ExportHeight,

    // Logging settings
    LoggingFile,

    // Session settings
    SessionStore,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "gateway.base_url").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GatewayBaseUrl => "gateway.base_url",
            ConfigKey::GatewayTimeout => "gateway.timeout",
            ConfigKey::GatewayOutcomeLimit => "gateway.outcome_limit",
            ConfigKey::SelectionDisease => "selection.disease",
            ConfigKey::SelectionMeasurement => "selection.measurement",
            ConfigKey::RefreshCycleTimeout => "refresh.cycle_timeout",
            ConfigKey::ExportDirectory => "export.directory",
            ConfigKey::ExportWidth => "export.width",
            ConfigKey::ExportHeight => "export.height",
            ConfigKey::LoggingFile => "logging.file",
            ConfigKey::SessionStore => "session.store",
        }
    }

    /// Get the section name (e.g., "gateway").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "base_url").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GatewayBaseUrl => config.gateway.base_url.clone(),
            ConfigKey::GatewayTimeout => config.gateway.timeout.to_string(),
            ConfigKey::GatewayOutcomeLimit => config
                .gateway
                .outcome_limit
                .map(|n| n.to_string())
                .unwrap_or_default(),
            ConfigKey::SelectionDisease => config.selection.disease.clone(),
            ConfigKey::SelectionMeasurement => config.selection.measurement.to_string(),
            ConfigKey::RefreshCycleTimeout => config.refresh.cycle_timeout.to_string(),
            ConfigKey::ExportDirectory => path_to_display(&config.export.directory),
            ConfigKey::ExportWidth => config.export.width.to_string(),
            ConfigKey::ExportHeight => config.export.height.to_string(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
            ConfigKey::SessionStore => path_to_display(&config.session.store),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;

        let value = value.trim();
        match self {
            ConfigKey::GatewayBaseUrl => {
                config.gateway.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::GatewayTimeout => config.gateway.timeout = self.parse(value)?,
            ConfigKey::GatewayOutcomeLimit => {
                config.gateway.outcome_limit = if value.is_empty() {
                    None
                } else {
                    Some(self.parse(value)?)
                };
            }
            ConfigKey::SelectionDisease => config.selection.disease = value.to_string(),
            ConfigKey::SelectionMeasurement => config.selection.measurement = self.parse(value)?,
            ConfigKey::RefreshCycleTimeout => config.refresh.cycle_timeout = self.parse(value)?,
            ConfigKey::ExportDirectory => config.export.directory = expand_tilde(value),
            ConfigKey::ExportWidth => config.export.width = self.parse(value)?,
            ConfigKey::ExportHeight => config.export.height = self.parse(value)?,
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
            ConfigKey::SessionStore => config.session.store = expand_tilde(value),
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("cannot parse '{}'", value),
        })
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::GatewayBaseUrl => Box::new(UrlSpec),
            ConfigKey::GatewayTimeout => Box::new(PositiveIntegerSpec { max: None }),
            ConfigKey::GatewayOutcomeLimit => Box::new(OptionalPositiveIntegerSpec),
            ConfigKey::SelectionDisease => Box::new(NonEmptySpec),
            ConfigKey::SelectionMeasurement => Box::new(IntegerSpec),
            ConfigKey::RefreshCycleTimeout => Box::new(PositiveIntegerSpec { max: None }),
            ConfigKey::ExportDirectory => Box::new(PathSpec),
            ConfigKey::ExportWidth | ConfigKey::ExportHeight => Box::new(PositiveIntegerSpec {
                max: Some(MAX_EXPORT_DIMENSION as u64),
            }),
            ConfigKey::LoggingFile => Box::new(PathSpec),
            ConfigKey::SessionStore => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GatewayBaseUrl,
            ConfigKey::GatewayTimeout,
            ConfigKey::GatewayOutcomeLimit,
            ConfigKey::SelectionDisease,
            ConfigKey::SelectionMeasurement,
            ConfigKey::RefreshCycleTimeout,
            ConfigKey::ExportDirectory,
            ConfigKey::ExportWidth,
            ConfigKey::ExportHeight,
            ConfigKey::LoggingFile,
            ConfigKey::SessionStore,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification for strictly positive integers, optionally capped.
struct PositiveIntegerSpec {
    max: Option<u64>,
}

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match (value.parse::<u64>(), self.max) {
            (Ok(0), _) | (Err(_), _) => Err("must be a positive integer".to_string()),
            (Ok(n), Some(max)) if n > max => Err(format!("must be at most {}", max)),
            _ => Ok(()),
        }
    }
}

/// Specification for an optional positive integer (empty allowed).
struct OptionalPositiveIntegerSpec;

impl ValueSpecification for OptionalPositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer or empty".to_string()),
        }
    }
}

/// Specification for any signed integer.
struct IntegerSpec;

impl ValueSpecification for IntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| "must be an integer".to_string())
    }
}

/// Specification for non-empty strings.
struct NonEmptySpec;

impl ValueSpecification for NonEmptySpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must not be empty".to_string())
        } else {
            Ok(())
        }
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

/// Specification for HTTP(S) URLs.
struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if super::parser::is_http_url(value) {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn expand_tilde(path: &str) -> PathBuf {
    super::parser::expand_tilde(path)
}

/// Convert path to display string, collapsing home dir to ~.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
