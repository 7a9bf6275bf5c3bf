//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_EXPORT_DIMENSION;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [gateway] section
    if let Some(section) = ini.section(Some("gateway")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !is_http_url(v) {
                return Err(invalid(
                    "gateway",
                    "base_url",
                    v,
                    "must be a URL starting with 'http://' or 'https://'",
                ));
            }
            config.gateway.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.gateway.timeout = parse_positive("gateway", "timeout", v)?;
        }
        if let Some(v) = section.get("outcome_limit") {
            let v = v.trim();
            config.gateway.outcome_limit = if v.is_empty() {
                None
            } else {
                Some(parse_positive("gateway", "outcome_limit", v)?)
            };
        }
    }

    // [selection] section
    if let Some(section) = ini.section(Some("selection")) {
        if let Some(v) = section.get("disease") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("selection", "disease", v, "must not be empty"));
            }
            config.selection.disease = v.to_string();
        }
        if let Some(v) = section.get("measurement") {
            config.selection.measurement = v.trim().parse().map_err(|_| {
                invalid(
                    "selection",
                    "measurement",
                    v,
                    "must be an integer measurement id",
                )
            })?;
        }
    }

    // [refresh] section
    if let Some(section) = ini.section(Some("refresh")) {
        if let Some(v) = section.get("cycle_timeout") {
            config.refresh.cycle_timeout = parse_positive("refresh", "cycle_timeout", v)?;
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.export.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("width") {
            config.export.width = parse_dimension("width", v)?;
        }
        if let Some(v) = section.get("height") {
            config.export.height = parse_dimension("height", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [session] section
    if let Some(section) = ini.section(Some("session")) {
        if let Some(v) = section.get("store") {
            let v = v.trim();
            if !v.is_empty() {
                config.session.store = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a strictly positive integer.
fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(invalid(section, key, value, "must be a positive integer")),
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32, ConfigFileError> {
    let n: u32 = parse_positive("export", key, value)?;
    if n > MAX_EXPORT_DIMENSION {
        return Err(invalid(
            "export",
            key,
            value,
            &format!("must be at most {} pixels", MAX_EXPORT_DIMENSION),
        ));
    }
    Ok(n)
}

pub(super) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ConfigFile;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, content).unwrap();
        ConfigFile::load_from(&path)
    }

    #[test]
    fn test_partial_config() {
        let config = parse("[gateway]\nbase_url = http://10.0.0.5:9000/\n").unwrap();

        assert_eq!(config.gateway.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.gateway.timeout, ConfigFile::default().gateway.timeout);
        assert_eq!(config.selection, ConfigFile::default().selection);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = parse("[gateway]\nbase_url = ftp://backend\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "gateway");
                assert_eq!(key, "base_url");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse("[gateway]\ntimeout = 0\n").is_err());
        assert!(parse("[refresh]\ncycle_timeout = soon\n").is_err());
    }

    #[test]
    fn test_outcome_limit_optional() {
        let config = parse("[gateway]\noutcome_limit =\n").unwrap();
        assert_eq!(config.gateway.outcome_limit, None);

        let config = parse("[gateway]\noutcome_limit = 5000\n").unwrap();
        assert_eq!(config.gateway.outcome_limit, Some(5000));
    }

    #[test]
    fn test_selection_section() {
        let config = parse("[selection]\ndisease = diabetes\nmeasurement = 3000963\n").unwrap();
        assert_eq!(config.selection.measurement, 3000963);

        assert!(parse("[selection]\ndisease =\n").is_err());
        assert!(parse("[selection]\nmeasurement = glucose\n").is_err());
    }

    #[test]
    fn test_export_dimensions() {
        let config = parse("[export]\nwidth = 1800\nheight = 900\n").unwrap();
        assert_eq!((config.export.width, config.export.height), (1800, 900));

        assert!(parse("[export]\nwidth = 0\n").is_err());
        assert!(parse("[export]\nheight = 20000\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/exports");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("exports"));
        }
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
