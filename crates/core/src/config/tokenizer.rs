//! Lexer for the configuration file.

use std::io::{BufRead, Bytes, Read};
use std::path::PathBuf;

use super::ConfigError;

/// Longest recognised keyword (`CONVERTER`).
pub const MAX_OPTION_LEN: usize = 9;

const COMMENT_CHAR: u8 = b'#';

/// An option keyword read from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    Quiet,
    CdText,
    Convert,
    Converter,
    Unknown,
    EndOfFile,
}

impl ConfigOption {
    /// Maps an upper-cased keyword onto an option.
    fn from_keyword(keyword: &[u8]) -> Self {
        match keyword {
            b"QUIET" => Self::Quiet,
            b"CDTEXT" => Self::CdText,
            b"CONVERT" => Self::Convert,
            b"CONVERTER" => Self::Converter,
            _ => Self::Unknown,
        }
    }

    /// Canonical spelling used in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Quiet => "QUIET",
            Self::CdText => "CDTEXT",
            Self::Convert => "CONVERT",
            Self::Converter => "CONVERTER",
            Self::Unknown => "UNKNOWN",
            Self::EndOfFile => "EOF",
        }
    }
}

/// Whitespace as the C locale defines it, vertical tab included.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Pulls option keywords and their values out of a byte stream.
///
/// The tokenizer keeps a line counter for diagnostics; every newline it
/// consumes, wherever it is consumed, bumps the counter.
pub struct ConfigTokenizer<R> {
    bytes: Bytes<R>,
    file: String,
    line: usize,
}

impl<R: BufRead> ConfigTokenizer<R> {
    /// Creates a tokenizer. `file` is only used in error messages.
    pub fn new(reader: R, file: impl Into<String>) -> Self {
        Self {
            bytes: reader.bytes(),
            file: file.into(),
            line: 1,
        }
    }

    /// Current line number (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Name of the file being read, as given to [`ConfigTokenizer::new`].
    pub fn file(&self) -> &str {
        &self.file
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ConfigError> {
        match self.bytes.next() {
            None => Ok(None),
            Some(Ok(b)) => {
                if b == b'\n' {
                    self.line += 1;
                }
                Ok(Some(b))
            }
            Some(Err(source)) => Err(ConfigError::Io {
                path: PathBuf::from(&self.file),
                source,
            }),
        }
    }

    fn premature_eof(&self) -> ConfigError {
        ConfigError::PrematureEof {
            file: self.file.clone(),
            line: self.line,
        }
    }

    /// Skips whitespace and comments and reads the next keyword together
    /// with its `=` sign.
    ///
    /// Returns [`ConfigOption::EndOfFile`] once the stream is exhausted and
    /// [`ConfigOption::Unknown`] for keywords that are not recognised.
    pub fn next_option(&mut self) -> Result<ConfigOption, ConfigError> {
        let first = loop {
            match self.read_byte()? {
                None => return Ok(ConfigOption::EndOfFile),
                Some(COMMENT_CHAR) => {
                    while let Some(b) = self.read_byte()? {
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                Some(b) if is_space(b) => {}
                Some(b) => break b,
            }
        };

        let mut keyword = Vec::with_capacity(MAX_OPTION_LEN);
        let mut next = Some(first);
        while let Some(b) = next {
            if is_space(b) || b == b'=' || keyword.len() == MAX_OPTION_LEN {
                break;
            }
            keyword.push(b.to_ascii_uppercase());
            next = self.read_byte()?;
        }

        let Some(mut b) = next else {
            return Err(self.premature_eof());
        };

        // Keyword longer than any known option.
        if !is_space(b) && b != b'=' {
            return Ok(ConfigOption::Unknown);
        }

        while is_space(b) {
            b = match self.read_byte()? {
                Some(b) => b,
                None => return Err(self.premature_eof()),
            };
        }
        if b != b'=' {
            return Err(ConfigError::ExpectedEquals {
                file: self.file.clone(),
                line: self.line,
            });
        }

        Ok(ConfigOption::from_keyword(&keyword))
    }

    /// Reads one value, quoted or bare.
    ///
    /// Inside quotes `\"` stands for a literal quote; the value may span
    /// lines. A bare value ends at the first whitespace. The result may be
    /// empty, e.g. for `""` or when the stream ends before any value.
    pub fn next_value(&mut self) -> Result<String, ConfigError> {
        let mut c = self.read_byte()?;
        while matches!(c, Some(b) if is_space(b)) {
            c = self.read_byte()?;
        }

        let quoted = c == Some(b'"');
        if quoted {
            c = self.read_byte()?;
        }

        let mut value = Vec::new();
        loop {
            match c {
                None if quoted => return Err(self.premature_eof()),
                None => break,
                Some(b'"') if quoted => match value.last_mut() {
                    Some(last) if *last == b'\\' => *last = b'"',
                    _ => break,
                },
                Some(b) if !quoted && is_space(b) => break,
                Some(b) => value.push(b),
            }
            c = self.read_byte()?;
        }

        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(input: &str) -> ConfigTokenizer<&[u8]> {
        ConfigTokenizer::new(input.as_bytes(), "test.rc")
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let mut tok = tokenizer("quiet = a\nCdText=b\nConvert =c\nCONVERTER= d");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Quiet);
        assert_eq!(tok.next_value().unwrap(), "a");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::CdText);
        assert_eq!(tok.next_value().unwrap(), "b");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Convert);
        assert_eq!(tok.next_value().unwrap(), "c");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Converter);
        assert_eq!(tok.next_value().unwrap(), "d");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::EndOfFile);
    }

    #[test]
    fn test_empty_input_is_end_of_file() {
        let mut tok = tokenizer("");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::EndOfFile);
        let mut tok = tokenizer("  \n\t # only a comment");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::EndOfFile);
    }

    #[test]
    fn test_comments_are_skipped_and_lines_counted() {
        let mut tok = tokenizer("# header\n\n  # another\nQUIET = yes\n");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Quiet);
        assert_eq!(tok.line(), 4);
        assert_eq!(tok.next_value().unwrap(), "yes");
        assert_eq!(tok.line(), 5);
    }

    #[test]
    fn test_unknown_keyword() {
        let mut tok = tokenizer("FOOBAR = \"x\"");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Unknown);
    }

    #[test]
    fn test_overlong_keyword_is_unknown() {
        let mut tok = tokenizer("CONVERTERS = x");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Unknown);
    }

    #[test]
    fn test_equals_may_follow_on_next_line() {
        let mut tok = tokenizer("QUIET\n  = yes");
        assert_eq!(tok.next_option().unwrap(), ConfigOption::Quiet);
        assert_eq!(tok.line(), 2);
        assert_eq!(tok.next_value().unwrap(), "yes");
    }

    #[test]
    fn test_eof_before_equals_is_fatal() {
        let err = tokenizer("QUIET").next_option().unwrap_err();
        assert!(matches!(err, ConfigError::PrematureEof { line: 1, .. }));

        let err = tokenizer("QUIET  \n").next_option().unwrap_err();
        assert!(matches!(err, ConfigError::PrematureEof { line: 2, .. }));
    }

    #[test]
    fn test_missing_equals_is_syntax_error() {
        let err = tokenizer("QUIET yes").next_option().unwrap_err();
        assert!(matches!(err, ConfigError::ExpectedEquals { line: 1, .. }));
        assert_eq!(err.to_string(), "test.rc:1: Syntax error (expected '=')");
    }

    #[test]
    fn test_quoted_value_with_escaped_quotes() {
        let mut tok = tokenizer(r#""a \"b\" c""#);
        assert_eq!(tok.next_value().unwrap(), r#"a "b" c"#);
    }

    #[test]
    fn test_backslash_without_quote_is_literal() {
        let mut tok = tokenizer(r#""C:\music\x" next"#);
        assert_eq!(tok.next_value().unwrap(), r"C:\music\x");
        assert_eq!(tok.next_value().unwrap(), "next");
    }

    #[test]
    fn test_quoted_value_spans_whitespace_and_lines() {
        let mut tok = tokenizer("\"sox $C2T_FROM\n  $C2T_TO\"");
        assert_eq!(tok.next_value().unwrap(), "sox $C2T_FROM\n  $C2T_TO");
        assert_eq!(tok.line(), 2);
    }

    #[test]
    fn test_unquoted_value_stops_at_whitespace() {
        let mut tok = tokenizer("   ape\twav   ");
        assert_eq!(tok.next_value().unwrap(), "ape");
        assert_eq!(tok.next_value().unwrap(), "wav");
        assert_eq!(tok.next_value().unwrap(), "");
    }

    #[test]
    fn test_comment_char_inside_value_is_kept() {
        let mut tok = tokenizer("#not-a-comment");
        assert_eq!(tok.next_value().unwrap(), "#not-a-comment");
    }

    #[test]
    fn test_empty_quoted_value() {
        let mut tok = tokenizer("\"\"");
        assert_eq!(tok.next_value().unwrap(), "");
    }

    #[test]
    fn test_unterminated_quote_is_fatal() {
        let err = tokenizer("\"never closed\n").next_value().unwrap_err();
        assert!(matches!(err, ConfigError::PrematureEof { line: 2, .. }));
    }

    #[test]
    fn test_long_value_grows_buffer() {
        let long = "x".repeat(10_000);
        let mut tok = tokenizer(&long);
        assert_eq!(tok.next_value().unwrap().len(), 10_000);
    }

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(ConfigOption::Converter.keyword(), "CONVERTER");
        assert_eq!(ConfigOption::CdText.keyword(), "CDTEXT");
    }
}
