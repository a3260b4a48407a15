//! Per-track conversion dispatch.

use std::path::PathBuf;

use tracing::{debug, info};

use super::error::ConverterError;
use super::registry::ConverterRegistry;
use super::traits::CommandRunner;
use super::types::Invocation;
use crate::config::{Config, Options};
use crate::cuesheet::TrackSpec;

/// What happened to a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// No converter accepts the track's file; nothing changed.
    NoConverter,
    /// The converted file was already there; only the filename changed.
    AlreadyConverted { filename: String },
    /// The command ran and the filename now points at its output.
    ///
    /// The exit code is informational only: a failing command still leads
    /// to the rename.
    Converted {
        filename: String,
        exit_code: Option<i32>,
    },
}

/// Totals for a whole track list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: usize,
    pub already_converted: usize,
    pub unmatched: usize,
    /// Commands that exited unsuccessfully. Their tracks are counted in
    /// `converted` as well.
    pub failed_commands: usize,
}

/// Converts track files with the configured converters.
///
/// Conversions run one at a time, in track order. Each command gets the
/// source and target filenames through `C2T_FROM` and `C2T_TO`.
pub struct ConversionEngine<'a, R> {
    registry: &'a ConverterRegistry,
    options: &'a Options,
    runner: R,
    working_dir: Option<PathBuf>,
}

impl<'a, R: CommandRunner> ConversionEngine<'a, R> {
    pub fn new(registry: &'a ConverterRegistry, options: &'a Options, runner: R) -> Self {
        Self {
            registry,
            options,
            runner,
            working_dir: None,
        }
    }

    /// Engine over a loaded configuration.
    pub fn from_config(config: &'a Config, runner: R) -> Self {
        Self::new(&config.converters, &config.options, runner)
    }

    /// Resolves relative track filenames against `dir` and runs commands
    /// there, instead of using the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        match &self.working_dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }

    /// Converts the file of one track if a converter accepts it.
    ///
    /// `track_no` only appears in log messages.
    pub fn convert(
        &self,
        track: &mut TrackSpec,
        track_no: usize,
    ) -> Result<ConversionOutcome, ConverterError> {
        let Some(converter) = self.registry.find(&track.filename) else {
            return Ok(ConversionOutcome::NoConverter);
        };
        debug!(
            "Found a converter for track {}: {}",
            track_no,
            converter.command()
        );

        let target = converter.output_name(&track.filename);

        if self.resolve(&target).exists() {
            debug!("{} already exists", target);
            track.filename = target.clone();
            return Ok(ConversionOutcome::AlreadyConverted { filename: target });
        }

        if !self.options.quiet {
            info!(
                "Track {}: Converting \"{}\" to \"{}\"",
                track_no, track.filename, target
            );
        }

        let invocation = Invocation {
            command: converter.command().to_string(),
            from: track.filename.clone(),
            to: target.clone(),
            working_dir: self.working_dir.clone(),
        };
        let status = self.runner.run(&invocation)?;

        match status.code {
            Some(code) => debug!("Conversion command returned with exit status {}", code),
            None => debug!("Conversion command terminated by a signal"),
        }

        // The exit status never vetoes the rename.
        track.filename = target.clone();
        Ok(ConversionOutcome::Converted {
            filename: target,
            exit_code: status.code,
        })
    }

    /// Converts every track in order. Stops only if a command cannot be
    /// started at all.
    pub fn convert_all(
        &self,
        tracks: &mut [TrackSpec],
    ) -> Result<ConversionSummary, ConverterError> {
        debug!("Converting files with the {} runner", self.runner.name());

        let mut summary = ConversionSummary::default();
        for (index, track) in tracks.iter_mut().enumerate() {
            match self.convert(track, index + 1)? {
                ConversionOutcome::NoConverter => summary.unmatched += 1,
                ConversionOutcome::AlreadyConverted { .. } => summary.already_converted += 1,
                ConversionOutcome::Converted { exit_code, .. } => {
                    summary.converted += 1;
                    if exit_code != Some(0) {
                        summary.failed_commands += 1;
                    }
                }
            }
        }
        Ok(summary)
    }
}
