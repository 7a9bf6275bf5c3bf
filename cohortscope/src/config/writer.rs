//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let outcome_limit = config
        .gateway
        .outcome_limit
        .map(|n| n.to_string())
        .unwrap_or_default();

    format!(
        r#"[gateway]
; Base URL of the cohort backend
base_url = {}
; HTTP timeout per request, in seconds (default: 30)
timeout = {}
; Maximum outcome rows per request. Leave empty for the backend default.
outcome_limit = {}

[selection]
; Disease key used at startup (see `cohortscope diseases`)
disease = {}
; Measurement id used at startup:
;   3004501 - Glucose [Mass/volume] in Serum or Plasma
;   3000963 - Hemoglobin [Mass/volume] in Blood
measurement = {}

[refresh]
; Seconds before a whole fetch cycle is abandoned (default: 60)
cycle_timeout = {}

[export]
; Directory for boxplot.png / boxplot.pdf
directory = {}
; Chart canvas size in pixels (default: 900 x 450)
width = {}
height = {}

[logging]
; Log file, truncated at the start of each session
file = {}

[session]
; Local user store (mock accounts, plain JSON)
store = {}
"#,
        config.gateway.base_url,
        config.gateway.timeout,
        outcome_limit,
        config.selection.disease,
        config.selection.measurement,
        config.refresh.cycle_timeout,
        path_to_string(&config.export.directory),
        config.export.width,
        config.export.height,
        path_to_string(&config.logging.file),
        path_to_string(&config.session.store),
    )
}

/// Convert path to string, collapsing the home directory to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_has_every_section() {
        let content = to_config_string(&ConfigFile::default());
        for section in [
            "[gateway]",
            "[selection]",
            "[refresh]",
            "[export]",
            "[logging]",
            "[session]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
        assert!(content.contains("measurement = 3004501"));
        assert!(content.contains("outcome_limit = \n"));
    }
}
