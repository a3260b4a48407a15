//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use cue2toc_core::testing::MockRunner;
//!
//! let runner = MockRunner::new();
//! runner.set_exit_code(Some(1));
//!
//! let engine = ConversionEngine::new(&registry, &options, &runner);
//! engine.convert_all(&mut tracks)?;
//!
//! assert_eq!(runner.invocation_count(), 2);
//! ```

mod mock_runner;

pub use mock_runner::MockRunner;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::cuesheet::TrackSpec;

    /// Audio tracks numbered from 1, one per filename.
    pub fn audio_tracks(filenames: &[&str]) -> Vec<TrackSpec> {
        filenames
            .iter()
            .zip(1..)
            .map(|(name, number)| TrackSpec::audio(number, *name))
            .collect()
    }

    /// A two-track CUE sheet referencing a single image file.
    pub fn single_file_cue(filename: &str) -> String {
        format!(
            "PERFORMER \"Test Artist\"\n\
             TITLE \"Test Album\"\n\
             FILE \"{filename}\" WAVE\n\
             \x20 TRACK 01 AUDIO\n\
             \x20   TITLE \"First\"\n\
             \x20   INDEX 01 00:00:00\n\
             \x20 TRACK 02 AUDIO\n\
             \x20   TITLE \"Second\"\n\
             \x20   INDEX 00 03:10:00\n\
             \x20   INDEX 01 03:12:00\n"
        )
    }
}
