//! Shell-based command runner.

use std::process::{Command, Stdio};

use tracing::debug;

use super::error::ConverterError;
use super::traits::CommandRunner;
use super::types::{CommandStatus, Invocation};

/// Runs conversion commands through the platform shell (`/bin/sh -c` on
/// Unix, `cmd /C` on Windows).
///
/// The filenames are set in the child's environment only; the environment
/// of this process is left alone. The child's standard output is sent to
/// standard error so it cannot end up in a TOC written to standard output.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn name(&self) -> &str {
        "shell"
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandStatus, ConverterError> {
        let mut cmd = Self::shell_command(&invocation.command);
        for (key, value) in invocation.env() {
            debug!("Exporting \"{}={}\"", key, value);
            cmd.env(key, value);
        }
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null()).stdout(std::io::stderr());

        let status = cmd
            .status()
            .map_err(|e| ConverterError::spawn(&invocation.command, e))?;

        Ok(CommandStatus {
            code: status.code(),
        })
    }
}
