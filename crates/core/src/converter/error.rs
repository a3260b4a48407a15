//! Error types for the converter module.

use thiserror::Error;

/// Errors that can occur while dispatching a conversion.
///
/// A command that runs and exits with a non-zero status is not an error;
/// only failing to start it is.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The command interpreter could not be started.
    #[error("Failed to run conversion command \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConverterError {
    /// Creates a spawn error for the given command.
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }
}
