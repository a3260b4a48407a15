use std::io::BufRead;

use tracing::debug;

use super::types::{CueSheet, Msf, TrackMode, TrackSpec};
use super::CueError;

/// Splits a CUE line into words. A double-quoted word may contain spaces;
/// the quotes are dropped.
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            token.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    tokens
}

/// A track being assembled, plus what is needed to validate it.
struct PendingTrack {
    track: TrackSpec,
    has_index1: bool,
    line: usize,
}

struct Parser {
    sheet: CueSheet,
    file: Option<String>,
    pending: Option<PendingTrack>,
    line: usize,
}

impl Parser {
    fn error(&self, reason: impl Into<String>) -> CueError {
        CueError::parse(self.line, reason)
    }

    fn finish_track(&mut self) -> Result<(), CueError> {
        if let Some(pending) = self.pending.take() {
            if !pending.has_index1 {
                return Err(CueError::parse(
                    pending.line,
                    format!("track {} has no INDEX 01", pending.track.number),
                ));
            }
            self.sheet.tracks.push(pending.track);
        }
        Ok(())
    }

    fn track(&mut self, command: &str) -> Result<&mut TrackSpec, CueError> {
        let line = self.line;
        self.pending
            .as_mut()
            .map(|p| &mut p.track)
            .ok_or_else(|| CueError::parse(line, format!("{} outside of a TRACK", command)))
    }

    fn time(&self, value: &str) -> Result<Msf, CueError> {
        value.parse().map_err(|e: String| self.error(e))
    }

    fn handle(&mut self, words: &[String]) -> Result<(), CueError> {
        let Some((command, args)) = words.split_first() else {
            return Ok(());
        };
        let command = command.to_ascii_uppercase();

        let expect_args = |n: usize| -> Result<(), CueError> {
            if args.len() < n {
                Err(CueError::parse(
                    self.line,
                    format!("{} needs {} argument(s)", command, n),
                ))
            } else {
                Ok(())
            }
        };

        match command.as_str() {
            "REM" | "CDTEXTFILE" => debug!("Ignoring {} on line {}", command, self.line),
            "CATALOG" => {
                expect_args(1)?;
                self.sheet.catalog = Some(args[0].clone());
            }
            "TITLE" | "PERFORMER" | "SONGWRITER" => {
                expect_args(1)?;
                let value = Some(args[0].clone());
                let text = match self.pending.as_mut() {
                    Some(p) => &mut p.track.cdtext,
                    None => &mut self.sheet.cdtext,
                };
                match command.as_str() {
                    "TITLE" => text.title = value,
                    "PERFORMER" => text.performer = value,
                    _ => text.songwriter = value,
                }
            }
            "FILE" => {
                expect_args(1)?;
                self.file = Some(args[0].clone());
            }
            "TRACK" => {
                expect_args(2)?;
                self.finish_track()?;
                let file = self
                    .file
                    .clone()
                    .ok_or_else(|| self.error("TRACK before any FILE"))?;
                let number: u32 = args[0]
                    .parse()
                    .map_err(|_| self.error(format!("invalid track number \"{}\"", args[0])))?;
                let mode = TrackMode::from_cue(&args[1])
                    .ok_or_else(|| self.error(format!("unsupported track mode \"{}\"", args[1])))?;

                let mut track = TrackSpec::audio(number, file);
                track.mode = mode;
                self.pending = Some(PendingTrack {
                    track,
                    has_index1: false,
                    line: self.line,
                });
            }
            "INDEX" => {
                expect_args(2)?;
                let index: u32 = args[0]
                    .parse()
                    .map_err(|_| self.error(format!("invalid index number \"{}\"", args[0])))?;
                let time = self.time(&args[1])?;
                let line = self.line;
                let pending = self
                    .pending
                    .as_mut()
                    .ok_or_else(|| CueError::parse(line, "INDEX outside of a TRACK"))?;
                match index {
                    0 => pending.track.index0 = Some(time),
                    1 => {
                        pending.track.index1 = time;
                        pending.has_index1 = true;
                    }
                    _ => debug!("Ignoring INDEX {:02} on line {}", index, line),
                }
            }
            "PREGAP" | "POSTGAP" => {
                expect_args(1)?;
                let time = self.time(&args[0])?;
                let track = self.track(&command)?;
                if command == "PREGAP" {
                    track.pregap = Some(time);
                } else {
                    track.postgap = Some(time);
                }
            }
            "ISRC" => {
                expect_args(1)?;
                let isrc = args[0].clone();
                self.track("ISRC")?.isrc = Some(isrc);
            }
            "FLAGS" => {
                let flags: Vec<String> = args.iter().map(|f| f.to_ascii_uppercase()).collect();
                let track = self.track("FLAGS")?;
                for flag in &flags {
                    match flag.as_str() {
                        "DCP" => track.flags.copy_permitted = true,
                        "4CH" => track.flags.four_channel = true,
                        "PRE" => track.flags.pre_emphasis = true,
                        _ => debug!("Ignoring flag {}", flag),
                    }
                }
            }
            _ => return Err(self.error(format!("unknown command \"{}\"", command))),
        }

        Ok(())
    }
}

/// Parses a CUE sheet.
///
/// Lines that are not valid UTF-8 (Latin-1 titles, say) are decoded
/// lossily instead of failing the whole sheet.
pub fn read_cue<R: BufRead>(mut reader: R) -> Result<CueSheet, CueError> {
    let mut parser = Parser {
        sheet: CueSheet::default(),
        file: None,
        pending: None,
        line: 0,
    };

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        parser.line += 1;
        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(['\n', '\r']);
        let text = if parser.line == 1 {
            line.trim_start_matches('\u{feff}')
        } else {
            line
        };
        parser.handle(&split_line(text))?;
    }

    parser.finish_track()?;
    if parser.sheet.tracks.is_empty() {
        return Err(CueError::parse(parser.line, "no tracks found"));
    }

    debug!("Read {} tracks", parser.sheet.tracks.len());
    Ok(parser.sheet)
}

/// Parses a CUE sheet held in memory.
pub fn read_cue_str(text: &str) -> Result<CueSheet, CueError> {
    read_cue(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_split_line_handles_quotes() {
        assert_eq!(
            split_line(r#"  FILE "My Album.ape" WAVE"#),
            ["FILE", "My Album.ape", "WAVE"]
        );
        assert_eq!(split_line("INDEX 01 00:00:00\r"), ["INDEX", "01", "00:00:00"]);
        assert!(split_line("   ").is_empty());
        assert_eq!(split_line(r#"TITLE """#), ["TITLE", ""]);
    }

    #[test]
    fn test_single_file_sheet() {
        let sheet = read_cue_str(&fixtures::single_file_cue("image.ape")).unwrap();
        assert_eq!(sheet.cdtext.performer.as_deref(), Some("Test Artist"));
        assert_eq!(sheet.cdtext.title.as_deref(), Some("Test Album"));
        assert_eq!(sheet.tracks.len(), 2);

        let second = &sheet.tracks[1];
        assert_eq!(second.number, 2);
        assert_eq!(second.filename, "image.ape");
        assert_eq!(second.cdtext.title.as_deref(), Some("Second"));
        assert_eq!(second.index0.map(|m| m.to_string()).as_deref(), Some("03:10:00"));
        assert_eq!(second.index1.to_string(), "03:12:00");
    }

    #[test]
    fn test_track_level_fields() {
        let cue = "CATALOG 0123456789012\n\
                   FILE \"data.bin\" BINARY\n\
                   TRACK 1 MODE1/2352\n\
                   INDEX 1 00:00:00\n\
                   FILE \"song.flac\" WAVE\n\
                   TRACK 2 AUDIO\n\
                   FLAGS DCP PRE SCMS\n\
                   ISRC USRC17607839\n\
                   PREGAP 00:02:00\n\
                   SONGWRITER \"Someone\"\n\
                   INDEX 01 00:00:00\n\
                   INDEX 02 01:00:00\n\
                   POSTGAP 00:01:00\n";
        let sheet = read_cue_str(cue).unwrap();
        assert_eq!(sheet.catalog.as_deref(), Some("0123456789012"));
        assert_eq!(sheet.tracks[0].mode, TrackMode::Mode1_2352);

        let audio = &sheet.tracks[1];
        assert!(audio.flags.copy_permitted);
        assert!(audio.flags.pre_emphasis);
        assert!(!audio.flags.four_channel);
        assert_eq!(audio.isrc.as_deref(), Some("USRC17607839"));
        assert_eq!(audio.pregap.map(|m| m.to_string()).as_deref(), Some("00:02:00"));
        assert_eq!(audio.postgap.map(|m| m.to_string()).as_deref(), Some("00:01:00"));
        assert_eq!(audio.cdtext.songwriter.as_deref(), Some("Someone"));
        assert!(sheet.cdtext.is_empty());
    }

    #[test]
    fn test_rem_and_bom_are_ignored() {
        let cue = "\u{feff}REM GENRE Rock\nFILE a.wav WAVE\nTRACK 01 AUDIO\nINDEX 01 00:00:00\n";
        let sheet = read_cue_str(cue).unwrap();
        assert_eq!(sheet.tracks.len(), 1);
    }

    #[test]
    fn test_track_before_file() {
        let err = read_cue_str("TRACK 01 AUDIO\n").unwrap_err();
        assert!(matches!(err, CueError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_index1_reports_track_line() {
        let cue = "FILE a.wav WAVE\nTRACK 01 AUDIO\nINDEX 00 00:00:00\nTRACK 02 AUDIO\nINDEX 01 00:10:00\n";
        let err = read_cue_str(cue).unwrap_err();
        assert!(matches!(err, CueError::Parse { line: 2, .. }));
        assert!(err.to_string().contains("track 1 has no INDEX 01"));
    }

    #[test]
    fn test_unknown_command() {
        let err = read_cue_str("FILE a.wav WAVE\nBOGUS x\n").unwrap_err();
        assert!(matches!(err, CueError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_bad_time_and_mode() {
        let err = read_cue_str("FILE a.wav WAVE\nTRACK 01 AUDIO\nINDEX 01 00:61:00\n").unwrap_err();
        assert!(matches!(err, CueError::Parse { line: 3, .. }));

        let err = read_cue_str("FILE a.wav WAVE\nTRACK 01 CDG\n").unwrap_err();
        assert!(err.to_string().contains("unsupported track mode"));
    }

    #[test]
    fn test_latin1_text_is_decoded_lossily() {
        let cue: &[u8] =
            b"PERFORMER \"Bj\xF6rk\"\nFILE \"a.wav\" WAVE\nTRACK 01 AUDIO\nINDEX 01 00:00:00\n";
        let sheet = read_cue(cue).unwrap();
        assert_eq!(sheet.cdtext.performer.as_deref(), Some("Bj\u{fffd}rk"));
        assert_eq!(sheet.tracks.len(), 1);
    }

    #[test]
    fn test_line_numbers_survive_crlf_and_missing_newline() {
        let cue = "FILE a.wav WAVE\r\nTRACK 01 AUDIO\r\nINDEX 01 00:61:00";
        let err = read_cue_str(cue).unwrap_err();
        assert!(matches!(err, CueError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_empty_sheet() {
        assert!(read_cue_str("REM nothing\n").is_err());
    }
}
