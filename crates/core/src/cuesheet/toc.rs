use std::io::{self, Write};

use super::types::{CdText, CueSheet, TrackSpec};

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn session_type(sheet: &CueSheet) -> &'static str {
    if sheet.tracks.iter().any(|t| t.mode.is_mode2()) {
        "CD_ROM_XA"
    } else if sheet.tracks.iter().any(|t| !t.mode.is_audio()) {
        "CD_ROM"
    } else {
        "CD_DA"
    }
}

fn write_language<W: Write>(out: &mut W, text: &CdText, indent: &str) -> io::Result<()> {
    writeln!(out, "{indent}LANGUAGE 0 {{")?;
    let fields = [
        ("TITLE", &text.title),
        ("PERFORMER", &text.performer),
        ("SONGWRITER", &text.songwriter),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{indent}  {key} \"{}\"", escape(value))?;
        }
    }
    writeln!(out, "{indent}}}")
}

fn write_track<W: Write>(
    out: &mut W,
    track: &TrackSpec,
    next: Option<&TrackSpec>,
    cdtext: bool,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "// Track {}", track.number)?;
    writeln!(out, "TRACK {}", track.mode.toc_name())?;

    if track.mode.is_audio() {
        let flags = track.flags;
        writeln!(out, "{}COPY", if flags.copy_permitted { "" } else { "NO " })?;
        writeln!(
            out,
            "{}PRE_EMPHASIS",
            if flags.pre_emphasis { "" } else { "NO " }
        )?;
        writeln!(
            out,
            "{}_CHANNEL_AUDIO",
            if flags.four_channel { "FOUR" } else { "TWO" }
        )?;
    }

    if let Some(isrc) = &track.isrc {
        writeln!(out, "ISRC \"{}\"", escape(isrc))?;
    }

    if cdtext && !track.cdtext.is_empty() {
        writeln!(out, "CD_TEXT {{")?;
        write_language(out, &track.cdtext, "  ")?;
        writeln!(out, "}}")?;
    }

    if let Some(pregap) = track.pregap {
        writeln!(out, "PREGAP {}", pregap)?;
    }

    // Tracks sharing a file end where the next one starts.
    let start = track.file_start();
    let length = next
        .filter(|n| n.filename == track.filename)
        .map(|n| n.file_start() - start);

    if track.mode.is_audio() {
        write!(out, "FILE \"{}\" {}", escape(&track.filename), start)?;
    } else {
        write!(out, "DATAFILE \"{}\"", escape(&track.filename))?;
        if !start.is_zero() {
            let offset = u64::from(start.frames()) * track.mode.sector_size();
            write!(out, " #{}", offset)?;
        }
    }
    if let Some(length) = length {
        write!(out, " {}", length)?;
    }
    writeln!(out)?;

    if let Some(index0) = track.index0 {
        writeln!(out, "START {}", track.index1 - index0)?;
    }

    if let Some(postgap) = track.postgap {
        writeln!(out, "SILENCE {}", postgap)?;
    }

    Ok(())
}

/// Writes `sheet` in cdrdao TOC syntax.
///
/// CD-TEXT blocks are only written when `cdtext` is set and the sheet
/// actually carries some text.
pub fn write_toc<W: Write>(out: &mut W, sheet: &CueSheet, cdtext: bool) -> io::Result<()> {
    writeln!(out, "{}", session_type(sheet))?;

    if let Some(catalog) = &sheet.catalog {
        writeln!(out, "CATALOG \"{}\"", escape(catalog))?;
    }

    let cdtext = cdtext && sheet.has_cdtext();
    if cdtext {
        writeln!(out)?;
        writeln!(out, "CD_TEXT {{")?;
        writeln!(out, "  LANGUAGE_MAP {{")?;
        writeln!(out, "    0 : EN")?;
        writeln!(out, "  }}")?;
        write_language(out, &sheet.cdtext, "  ")?;
        writeln!(out, "}}")?;
    }

    for (i, track) in sheet.tracks.iter().enumerate() {
        write_track(out, track, sheet.tracks.get(i + 1), cdtext)?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuesheet::read_cue_str;
    use crate::testing::fixtures;

    fn render(sheet: &CueSheet, cdtext: bool) -> String {
        let mut out = Vec::new();
        write_toc(&mut out, sheet, cdtext).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_file_with_cdtext() {
        let sheet = read_cue_str(&fixtures::single_file_cue("image.wav")).unwrap();
        let expected = "\
CD_DA

CD_TEXT {
  LANGUAGE_MAP {
    0 : EN
  }
  LANGUAGE 0 {
    TITLE \"Test Album\"
    PERFORMER \"Test Artist\"
  }
}

// Track 1
TRACK AUDIO
NO COPY
NO PRE_EMPHASIS
TWO_CHANNEL_AUDIO
CD_TEXT {
  LANGUAGE 0 {
    TITLE \"First\"
  }
}
FILE \"image.wav\" 00:00:00 03:10:00

// Track 2
TRACK AUDIO
NO COPY
NO PRE_EMPHASIS
TWO_CHANNEL_AUDIO
CD_TEXT {
  LANGUAGE 0 {
    TITLE \"Second\"
  }
}
FILE \"image.wav\" 03:10:00
START 00:02:00
";
        assert_eq!(render(&sheet, true), expected);
    }

    #[test]
    fn test_cdtext_disabled() {
        let sheet = read_cue_str(&fixtures::single_file_cue("image.wav")).unwrap();
        let toc = render(&sheet, false);
        assert!(!toc.contains("CD_TEXT"));
        assert!(toc.contains("FILE \"image.wav\" 00:00:00 03:10:00"));
    }

    #[test]
    fn test_separate_files_have_no_length() {
        let sheet = CueSheet {
            tracks: fixtures::audio_tracks(&["one.wav", "two.wav"]),
            ..Default::default()
        };
        let toc = render(&sheet, true);
        assert!(toc.contains("FILE \"one.wav\" 00:00:00\n"));
        assert!(toc.contains("FILE \"two.wav\" 00:00:00\n"));
        assert!(!toc.contains("CD_TEXT"));
    }

    #[test]
    fn test_flags_gaps_and_isrc() {
        let mut track = TrackSpec::audio(1, "a \"quoted\".wav");
        track.flags.copy_permitted = true;
        track.flags.four_channel = true;
        track.isrc = Some("USRC17607839".to_string());
        track.pregap = Some("00:02:00".parse().unwrap());
        track.postgap = Some("00:01:00".parse().unwrap());
        let sheet = CueSheet {
            catalog: Some("0123456789012".to_string()),
            tracks: vec![track],
            ..Default::default()
        };

        let toc = render(&sheet, true);
        assert!(toc.starts_with("CD_DA\nCATALOG \"0123456789012\"\n"));
        assert!(toc.contains("\nCOPY\n"));
        assert!(toc.contains("FOUR_CHANNEL_AUDIO"));
        assert!(toc.contains("ISRC \"USRC17607839\""));
        assert!(toc.contains("PREGAP 00:02:00\nFILE \"a \\\"quoted\\\".wav\" 00:00:00\n"));
        assert!(toc.ends_with("SILENCE 00:01:00\n"));
    }

    #[test]
    fn test_data_track() {
        let cue = "FILE \"disc.bin\" BINARY\n\
                   TRACK 01 MODE2/2352\n\
                   INDEX 01 00:00:00\n\
                   TRACK 02 AUDIO\n\
                   INDEX 01 00:00:10\n";
        let sheet = read_cue_str(cue).unwrap();
        let toc = render(&sheet, true);
        assert!(toc.starts_with("CD_ROM_XA\n"));
        assert!(toc.contains("TRACK MODE2_RAW\nDATAFILE \"disc.bin\" 00:00:10\n"));
        assert!(toc.contains("FILE \"disc.bin\" 00:00:10\n"));
    }

    #[test]
    fn test_data_track_offset() {
        let mut track = TrackSpec::audio(1, "disc.bin");
        track.mode = crate::cuesheet::TrackMode::Mode1_2048;
        track.index1 = "00:00:02".parse().unwrap();
        let sheet = CueSheet {
            tracks: vec![track],
            ..Default::default()
        };
        let toc = render(&sheet, false);
        assert!(toc.starts_with("CD_ROM\n"));
        assert!(toc.contains("DATAFILE \"disc.bin\" #4096\n"));
    }
}
