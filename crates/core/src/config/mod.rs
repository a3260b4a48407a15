//! Configuration file handling.
//!
//! The configuration lives in a small dotfile (`~/.cue2tocrc` by default)
//! made of `KEY = value` entries:
//!
//! ```text
//! # Lines starting with '#' are comments
//! QUIET  = no
//! CDTEXT = yes
//! CONVERT = yes
//! CONVERTER = "ape" "wav" "mac \"$C2T_FROM\" \"$C2T_TO\" -d"
//! ```
//!
//! Keys are case-insensitive. `CONVERTER` takes three values and may appear
//! any number of times; every other key takes one value and the last
//! occurrence wins.

mod loader;
mod tokenizer;
mod types;

pub use loader::{
    default_config_path, is_truthy, load_config, load_config_from_reader, load_config_from_str,
    resolve_config_path, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE,
};
pub use tokenizer::{ConfigOption, ConfigTokenizer, MAX_OPTION_LEN};
pub use types::{Config, Options};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or parsing the configuration file.
///
/// `Io` and `HomeNotFound` are system errors; every other variant is a parse
/// error and carries the file name and line where it was detected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HOME not defined")]
    HomeNotFound,

    #[error("{file}:{line}: Premature end of file")]
    PrematureEof { file: String, line: usize },

    #[error("{file}:{line}: Syntax error (expected '=')")]
    ExpectedEquals { file: String, line: usize },

    #[error("{file}:{line}: Unknown option")]
    UnknownOption { file: String, line: usize },

    #[error("{file}:{line}: Option requires argument -- {option}")]
    MissingValue {
        file: String,
        line: usize,
        option: &'static str,
    },

    #[error("{file}:{line}: Option requires three arguments -- {option}")]
    MissingConverterValues {
        file: String,
        line: usize,
        option: &'static str,
    },
}

impl ConfigError {
    /// Whether this error comes from malformed configuration text rather
    /// than from the operating system.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::HomeNotFound)
    }

    /// Line of the configuration file the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::PrematureEof { line, .. }
            | Self::ExpectedEquals { line, .. }
            | Self::UnknownOption { line, .. }
            | Self::MissingValue { line, .. }
            | Self::MissingConverterValues { line, .. } => Some(*line),
            Self::Io { .. } | Self::HomeNotFound => None,
        }
    }
}
