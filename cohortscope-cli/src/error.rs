//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use cohortscope::config::ConfigFileError;
use cohortscope::export::ExportError;
use cohortscope::gateway::GatewayError;
use cohortscope::session::SessionError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to reach or read the cohort backend
    Gateway(GatewayError),
    /// A fetch cycle ended in the failed state
    LoadFailed(String),
    /// Session store or credential error
    Session(SessionError),
    /// Command requires a logged-in user
    NotLoggedIn,
    /// Chart export failed
    Export(ExportError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Terminal setup or drawing failed
    Terminal(std::io::Error),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Gateway(GatewayError::Http(_) | GatewayError::Timeout(_))
            | CliError::LoadFailed(_) => {
                eprintln!();
                eprintln!("Make sure the cohort backend is running and reachable:");
                eprintln!("  1. Check the URL: cohortscope config get gateway.base_url");
                eprintln!("  2. Probe the backend: cohortscope health");
            }
            CliError::Gateway(GatewayError::InvalidUrl(_)) => {
                eprintln!();
                eprintln!("Set a valid backend URL, for example:");
                eprintln!("  cohortscope config set gateway.base_url http://localhost:8000");
            }
            CliError::NotLoggedIn => {
                eprintln!();
                eprintln!("Log in first:");
                eprintln!("  cohortscope auth login <email> <password>");
                eprintln!("or create an account with 'cohortscope auth register'.");
            }
            CliError::Session(SessionError::AccountNotFound) => {
                eprintln!();
                eprintln!("Create an account with 'cohortscope auth register'.");
            }
            CliError::Export(ExportError::NothingToExport) => {
                eprintln!();
                eprintln!("The selected measurement has no values to plot.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Gateway(e) => write!(f, "Backend request failed: {}", e),
            CliError::LoadFailed(msg) => write!(f, "Failed to load data: {}", msg),
            CliError::Session(e) => write!(f, "{}", e),
            CliError::NotLoggedIn => write!(f, "Not logged in"),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::Terminal(e) => write!(f, "Terminal error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Gateway(e) => Some(e),
            CliError::Session(e) => Some(e),
            CliError::Export(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Terminal(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GatewayError> for CliError {
    fn from(e: GatewayError) -> Self {
        CliError::Gateway(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn test_gateway_error_display_and_source() {
        let err = CliError::from(GatewayError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.to_string(), "Backend request failed: Timed out after 5s");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_session_error_passes_message_through() {
        let err = CliError::from(SessionError::InvalidPassword);
        assert_eq!(err.to_string(), SessionError::InvalidPassword.to_string());
    }

    #[test]
    fn test_not_logged_in_has_no_source() {
        assert!(CliError::NotLoggedIn.source().is_none());
    }
}
