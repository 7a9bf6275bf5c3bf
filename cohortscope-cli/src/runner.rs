//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, gateway and orchestrator creation,
//! session access and file output to reduce duplication across command
//! handlers.

use std::future::Future;
use std::path::Path;

use tokio::runtime::{EnterGuard, Runtime};
use tracing::info;

use cohortscope::config::ConfigFile;
use cohortscope::export::{export_to_file, BoxPlotSurface, ExportFormat, StandardExporter};
use cohortscope::gateway::{AsyncReqwestClient, HttpCohortGateway};
use cohortscope::logging::{init_logging_full, split_log_path, LoggingGuard};
use cohortscope::refresh::{DashboardSnapshot, RefreshOrchestrator};
use cohortscope::session::{FileStore, SessionContext};

use crate::error::CliError;

/// Gateway type used by every command that talks to the backend.
pub type CliGateway = HttpCohortGateway<AsyncReqwestClient>;

/// Orchestrator over the production gateway.
pub type CliOrchestrator = RefreshOrchestrator<CliGateway>;

/// Session backed by the configured JSON store file.
pub type CliSession = SessionContext<FileStore>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled to prevent
    /// interference with the TUI dashboard.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);

        // Disable stdout logging when running in a TTY since TUI will take over
        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging_full(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("cohortscope v{}", cohortscope::VERSION);
        info!(backend = %self.config.gateway.base_url, "cohortscope CLI: {} command", command);
    }

    /// Drive a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Enter the runtime so `tokio::spawn` works from synchronous code.
    pub fn enter(&self) -> EnterGuard<'_> {
        self.runtime.enter()
    }

    /// Create the HTTP gateway from the `[gateway]` section.
    pub fn create_gateway(&self) -> Result<CliGateway, CliError> {
        let settings = &self.config.gateway;
        let http = AsyncReqwestClient::with_timeout(settings.timeout)?;
        let gateway = HttpCohortGateway::new(http, &settings.base_url)?
            .with_outcome_limit(settings.outcome_limit);

        info!(base_url = %gateway.base_url(), "Gateway created");
        Ok(gateway)
    }

    /// Create a refresh orchestrator over a fresh gateway.
    pub fn create_orchestrator(&self) -> Result<CliOrchestrator, CliError> {
        Ok(RefreshOrchestrator::new(
            self.create_gateway()?,
            self.config.refresh_config(),
        ))
    }

    /// Open the session stored at `[session] store`.
    pub fn session(&self) -> CliSession {
        SessionContext::new(FileStore::new(self.config.session.store.clone()))
    }

    /// The logged-in user, or [`CliError::NotLoggedIn`].
    pub fn require_login(&self) -> Result<String, CliError> {
        self.session()
            .current_user()?
            .ok_or(CliError::NotLoggedIn)
    }

    /// Export the committed box plot of `snapshot` to `path`.
    ///
    /// Without an explicit path the default file name is placed under
    /// `[export] directory`.
    pub fn export_snapshot(
        &self,
        snapshot: &DashboardSnapshot,
        format: ExportFormat,
        path: Option<&Path>,
    ) -> Result<std::path::PathBuf, CliError> {
        let surface = BoxPlotSurface::from_snapshot(snapshot)?;
        let exporter = StandardExporter::new(self.config.export_layout());
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.config.export.directory.join(format.default_filename()),
        };

        export_to_file(&exporter, &surface, format, &target).map_err(|e| match e {
            cohortscope::export::ExportError::Io(error) => CliError::FileWrite {
                path: target.display().to_string(),
                error,
            },
            other => CliError::Export(other),
        })
    }
}
