//! Default values and the `Default` impl for [`ConfigFile`].

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::catalog::{DEFAULT_DISEASE, GLUCOSE_ID};

/// Default backend URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request HTTP timeout (seconds).
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = crate::gateway::DEFAULT_TIMEOUT_SECS;

/// Default fetch cycle timeout (seconds).
pub const DEFAULT_CYCLE_TIMEOUT_SECS: u64 = 60;

/// Default export canvas width (pixels).
pub const DEFAULT_EXPORT_WIDTH: u32 = 900;

/// Default export canvas height (pixels).
pub const DEFAULT_EXPORT_HEIGHT: u32 = 450;

/// Largest accepted export canvas edge (pixels).
pub const MAX_EXPORT_DIMENSION: u32 = 10_000;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "cohortscope.log";

/// Default session store name inside the config directory.
pub const DEFAULT_SESSION_FILE_NAME: &str = "session.json";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            gateway: GatewaySettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: DEFAULT_GATEWAY_TIMEOUT_SECS,
                outcome_limit: None,
            },
            selection: SelectionSettings {
                disease: DEFAULT_DISEASE.to_string(),
                measurement: GLUCOSE_ID,
            },
            refresh: RefreshSettings {
                cycle_timeout: DEFAULT_CYCLE_TIMEOUT_SECS,
            },
            export: ExportSettings {
                directory: PathBuf::from("."),
                width: DEFAULT_EXPORT_WIDTH,
                height: DEFAULT_EXPORT_HEIGHT,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
            session: SessionSettings {
                store: config_dir.join(DEFAULT_SESSION_FILE_NAME),
            },
        }
    }
}
