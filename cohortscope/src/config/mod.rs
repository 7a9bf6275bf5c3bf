//! User configuration.
//!
//! Settings are read from `~/.cohortscope/config.ini`; a missing file means
//! defaults. [`ConfigKey`] offers validated get/set by dotted key name for
//! the `config` CLI command.
//!
//! # Example
//!
//! ```
//! use cohortscope::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::default();
//! ConfigKey::GatewayOutcomeLimit.set(&mut config, "1000").unwrap();
//! assert_eq!(config.gateway.outcome_limit, Some(1000));
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use defaults::*;
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::*;
