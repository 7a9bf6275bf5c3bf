//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::cohort::Selection;
use crate::export::ExportLayout;
use crate::refresh::RefreshConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Remote data gateway settings
    pub gateway: GatewaySettings,
    /// Initial disease and measurement
    pub selection: SelectionSettings,
    /// Fetch cycle settings
    pub refresh: RefreshSettings,
    /// Chart export settings
    pub export: ExportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Session store settings
    pub session: SessionSettings,
}

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    /// Base URL of the cohort backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout: u64,
    /// Optional cap on returned outcome rows, sent as `limit`.
    pub outcome_limit: Option<u32>,
}

/// Startup selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSettings {
    pub disease: String,
    pub measurement: i64,
}

/// Refresh configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSettings {
    /// Seconds before a whole fetch cycle is abandoned as failed.
    pub cycle_timeout: u64,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Directory for `boxplot.png` / `boxplot.pdf`.
    pub directory: PathBuf,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// JSON file holding users and the current-user marker.
    pub store: PathBuf,
}

impl ConfigFile {
    /// The configured startup selection.
    pub fn selection(&self) -> Selection {
        Selection::new(self.selection.disease.clone(), self.selection.measurement)
    }

    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            cycle_timeout: Duration::from_secs(self.refresh.cycle_timeout),
        }
    }

    pub fn export_layout(&self) -> ExportLayout {
        ExportLayout::default().with_canvas(self.export.width, self.export.height)
    }
}
