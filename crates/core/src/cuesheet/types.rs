//! Types describing a disc layout.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// Frames per second on a CD.
pub const FRAMES_PER_SECOND: u32 = 75;

/// A CD position or duration in frames, written `mm:ss:ff`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Msf(u32);

impl Msf {
    pub const ZERO: Msf = Msf(0);

    pub fn from_frames(frames: u32) -> Self {
        Self(frames)
    }

    pub fn frames(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Msf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [m, sec, f] = parts.as_slice() else {
            return Err(format!("invalid time \"{}\" (expected mm:ss:ff)", s));
        };

        let field = |v: &str| {
            v.parse::<u32>()
                .map_err(|_| format!("invalid time \"{}\" (expected mm:ss:ff)", s))
        };
        let (m, sec, f) = (field(*m)?, field(*sec)?, field(*f)?);
        if m > 9999 || sec >= 60 || f >= FRAMES_PER_SECOND {
            return Err(format!("time \"{}\" out of range", s));
        }

        Ok(Self((m * 60 + sec) * FRAMES_PER_SECOND + f))
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames = self.0 % FRAMES_PER_SECOND;
        let seconds = (self.0 / FRAMES_PER_SECOND) % 60;
        let minutes = self.0 / FRAMES_PER_SECOND / 60;
        write!(f, "{:02}:{:02}:{:02}", minutes, seconds, frames)
    }
}

impl Sub for Msf {
    type Output = Msf;

    fn sub(self, rhs: Msf) -> Msf {
        Msf(self.0.saturating_sub(rhs.0))
    }
}

/// Track data mode as named in CUE sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    Audio,
    Mode1_2048,
    Mode1_2352,
    Mode2_2336,
    Mode2_2352,
}

impl TrackMode {
    /// Parses the CUE spelling, e.g. `AUDIO` or `MODE1/2352`.
    pub fn from_cue(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AUDIO" => Some(Self::Audio),
            "MODE1/2048" => Some(Self::Mode1_2048),
            "MODE1/2352" => Some(Self::Mode1_2352),
            "MODE2/2336" => Some(Self::Mode2_2336),
            "MODE2/2352" => Some(Self::Mode2_2352),
            _ => None,
        }
    }

    /// Spelling used by cdrdao TOC files.
    pub fn toc_name(&self) -> &'static str {
        match self {
            Self::Audio => "AUDIO",
            Self::Mode1_2048 => "MODE1",
            Self::Mode1_2352 => "MODE1_RAW",
            Self::Mode2_2336 => "MODE2",
            Self::Mode2_2352 => "MODE2_RAW",
        }
    }

    /// Bytes per sector in the data file.
    pub fn sector_size(&self) -> u64 {
        match self {
            Self::Mode1_2048 => 2048,
            Self::Mode2_2336 => 2336,
            Self::Audio | Self::Mode1_2352 | Self::Mode2_2352 => 2352,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }

    pub fn is_mode2(&self) -> bool {
        matches!(self, Self::Mode2_2336 | Self::Mode2_2352)
    }
}

/// Subcode flags from the CUE `FLAGS` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackFlags {
    /// Digital copy permitted.
    pub copy_permitted: bool,
    pub four_channel: bool,
    pub pre_emphasis: bool,
}

/// CD-TEXT strings of a disc or a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdText {
    pub title: Option<String>,
    pub performer: Option<String>,
    pub songwriter: Option<String>,
}

impl CdText {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.performer.is_none() && self.songwriter.is_none()
    }
}

/// One track of the disc.
///
/// `filename` is the only field the conversion engine touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSpec {
    pub number: u32,
    pub mode: TrackMode,
    pub filename: String,
    /// Position of INDEX 00 in the file, if the track has one.
    pub index0: Option<Msf>,
    /// Position of INDEX 01 in the file.
    pub index1: Msf,
    /// Silence inserted before the track (CUE `PREGAP`).
    pub pregap: Option<Msf>,
    /// Silence appended after the track (CUE `POSTGAP`).
    pub postgap: Option<Msf>,
    pub isrc: Option<String>,
    pub flags: TrackFlags,
    pub cdtext: CdText,
}

impl TrackSpec {
    /// An audio track starting at the beginning of `filename`.
    pub fn audio(number: u32, filename: impl Into<String>) -> Self {
        Self {
            number,
            mode: TrackMode::Audio,
            filename: filename.into(),
            index0: None,
            index1: Msf::ZERO,
            pregap: None,
            postgap: None,
            isrc: None,
            flags: TrackFlags::default(),
            cdtext: CdText::default(),
        }
    }

    /// Where the track's data begins in its file: INDEX 00 when present,
    /// otherwise INDEX 01.
    pub fn file_start(&self) -> Msf {
        self.index0.unwrap_or(self.index1)
    }
}

/// A parsed CUE sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueSheet {
    pub catalog: Option<String>,
    pub cdtext: CdText,
    pub tracks: Vec<TrackSpec>,
}

impl CueSheet {
    /// Whether any disc or track CD-TEXT string is set.
    pub fn has_cdtext(&self) -> bool {
        !self.cdtext.is_empty() || self.tracks.iter().any(|t| !t.cdtext.is_empty())
    }
}
