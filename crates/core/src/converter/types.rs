//! Types for the converter module.

use std::path::PathBuf;

/// Environment variable carrying the file to convert.
pub const ENV_FROM: &str = "C2T_FROM";

/// Environment variable carrying the file the command must produce.
pub const ENV_TO: &str = "C2T_TO";

/// A conversion rule: files ending in `ext_from` become files ending in
/// `ext_to` by running `command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    ext_from: String,
    ext_to: String,
    command: String,
}

impl Converter {
    pub fn new(
        ext_from: impl Into<String>,
        ext_to: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            ext_from: ext_from.into(),
            ext_to: ext_to.into(),
            command: command.into(),
        }
    }

    /// Suffix of the files this converter accepts.
    pub fn ext_from(&self) -> &str {
        &self.ext_from
    }

    /// Suffix of the files this converter produces.
    pub fn ext_to(&self) -> &str {
        &self.ext_to
    }

    /// Shell command doing the conversion.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether `filename` ends in `ext_from`.
    ///
    /// The filename must be strictly longer than the suffix. Its tail is
    /// ASCII-lower-cased before the comparison; `ext_from` is compared as
    /// written. There is no notion of a dot or a path separator here, so
    /// `"pe"` matches `"tape"`.
    pub fn matches(&self, filename: &str) -> bool {
        let name = filename.as_bytes();
        let suffix = self.ext_from.as_bytes();
        if name.len() <= suffix.len() {
            return false;
        }

        let tail = &name[name.len() - suffix.len()..];
        tail.iter()
            .zip(suffix)
            .all(|(a, b)| a.to_ascii_lowercase() == *b)
    }

    /// Name of the converted file: `filename` with its last
    /// `ext_from.len()` bytes replaced by `ext_to`.
    ///
    /// Only meaningful when [`Converter::matches`] holds, in which case the
    /// cut falls on a character boundary.
    pub fn output_name(&self, filename: &str) -> String {
        let stem_len = filename.len().saturating_sub(self.ext_from.len());
        let stem = filename.get(..stem_len).unwrap_or(filename);
        format!("{}{}", stem, self.ext_to)
    }
}

/// One run of a conversion command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command line handed to the shell unchanged.
    pub command: String,
    /// Value of `C2T_FROM`.
    pub from: String,
    /// Value of `C2T_TO`.
    pub to: String,
    /// Directory the command runs in; the current one when `None`.
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Environment entries exported to the command.
    pub fn env(&self) -> [(&'static str, &str); 2] {
        [(ENV_FROM, self.from.as_str()), (ENV_TO, self.to.as_str())]
    }
}

/// How a conversion command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the command was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
