pub mod config;
pub mod converter;
pub mod cuesheet;
pub mod testing;

pub use config::{
    default_config_path, load_config, load_config_from_str, resolve_config_path, Config,
    ConfigError, Options,
};
pub use converter::{
    CommandRunner, ConversionEngine, ConversionOutcome, ConversionSummary, Converter,
    ConverterError, ConverterRegistry, ShellRunner,
};
pub use cuesheet::{read_cue, write_toc, CueError, CueSheet, TrackSpec};
