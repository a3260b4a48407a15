use crate::converter::ConverterRegistry;

/// Process-wide switches.
///
/// Built once while loading the configuration file, possibly overridden by
/// command-line flags, then only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Run configured converters over the track files.
    pub convert: bool,
    /// Emit CD-TEXT blocks in the TOC output.
    pub cdtext: bool,
    /// Suppress per-track progress messages.
    pub quiet: bool,
    /// Records the `-d` flag. There is no config file key for it, and
    /// nothing in the library reads it: log verbosity is chosen from the
    /// flag when the subscriber is installed.
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            convert: true,
            cdtext: true,
            quiet: false,
            debug: false,
        }
    }
}

/// Everything the configuration file produces.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub options: Options,
    pub converters: ConverterRegistry,
}
