//! Trait definitions for the converter module.

use super::error::ConverterError;
use super::types::{CommandStatus, Invocation};

/// Runs conversion commands.
///
/// Implementations must block until the command has finished and must make
/// `C2T_FROM` and `C2T_TO` visible to it.
pub trait CommandRunner {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs one command to completion.
    ///
    /// A non-zero exit is reported through [`CommandStatus`], not as an
    /// error.
    fn run(&self, invocation: &Invocation) -> Result<CommandStatus, ConverterError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandStatus, ConverterError> {
        (**self).run(invocation)
    }
}
