//! Converter registry and conversion dispatch.
//!
//! A [`Converter`] maps a filename suffix to another suffix plus a shell
//! command that does the actual transcoding. The [`ConverterRegistry`] keeps
//! converters in declaration order and finds the first one whose suffix
//! matches a file. The [`ConversionEngine`] walks a track list, runs the
//! matching commands through a [`CommandRunner`] and rewrites each track's
//! filename to the converted file.
//!
//! # Example
//!
//! ```ignore
//! use cue2toc_core::converter::{ConversionEngine, ShellRunner};
//!
//! let config = load_config(&path)?;
//! let engine = ConversionEngine::from_config(&config, ShellRunner::new());
//! let summary = engine.convert_all(&mut sheet.tracks)?;
//! println!("{} files converted", summary.converted);
//! ```

mod engine;
mod error;
mod registry;
mod shell;
mod traits;
mod types;

pub use engine::{ConversionEngine, ConversionOutcome, ConversionSummary};
pub use error::ConverterError;
pub use registry::ConverterRegistry;
pub use shell::ShellRunner;
pub use traits::CommandRunner;
pub use types::{CommandStatus, Converter, Invocation, ENV_FROM, ENV_TO};
