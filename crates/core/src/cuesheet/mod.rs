//! CUE sheet input and cdrdao TOC output.
//!
//! [`read_cue`] turns a CUE sheet into a [`CueSheet`]; [`write_toc`]
//! serializes one as a TOC file. Between the two the conversion engine may
//! rename track files.

mod reader;
mod toc;
mod types;

pub use reader::{read_cue, read_cue_str};
pub use toc::write_toc;
pub use types::{CdText, CueSheet, Msf, TrackFlags, TrackMode, TrackSpec, FRAMES_PER_SECOND};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("Failed to read CUE sheet: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl CueError {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}
