use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::tokenizer::{ConfigOption, ConfigTokenizer};
use super::{types::Config, ConfigError};
use crate::converter::Converter;

/// Configuration file used when no override is given.
pub const DEFAULT_CONFIG_FILE: &str = "~/.cue2tocrc";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CUE2TOC_CONFIG";

/// Returns the configuration file name, unexpanded: the value of
/// `CUE2TOC_CONFIG` if set, otherwise [`DEFAULT_CONFIG_FILE`].
pub fn default_config_path() -> String {
    std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
}

/// Expands a leading `~` to the user's home directory.
///
/// The home directory is only looked up when the path starts with `~`.
/// Whatever follows the `~` is joined below it, so `~/rc` and `~rc` both
/// name `$HOME/rc`; `~user` forms are not supported.
pub fn resolve_config_path(path: &str) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
            Ok(home.join(rest.trim_start_matches('/')))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Case-insensitive test for `yes`, `y`, `true` or `1`.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Load configuration from file.
///
/// A file that does not exist is not an error: the defaults are returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    debug!("Parsing config file {}", path.display());

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config file");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    load_config_from_reader(BufReader::new(file), &path.display().to_string())
}

/// Load configuration from a string (useful for testing).
pub fn load_config_from_str(text: &str) -> Result<Config, ConfigError> {
    load_config_from_reader(text.as_bytes(), "<string>")
}

/// Parses a whole configuration document.
///
/// Nothing is applied unless the entire document parses: the first error is
/// returned and the partially built configuration is dropped.
pub fn load_config_from_reader<R: BufRead>(reader: R, name: &str) -> Result<Config, ConfigError> {
    let mut tokenizer = ConfigTokenizer::new(reader, name);
    let mut config = Config::default();

    loop {
        let option = tokenizer.next_option()?;
        match option {
            ConfigOption::EndOfFile => break,
            ConfigOption::Quiet => config.options.quiet = read_flag(&mut tokenizer, option)?,
            ConfigOption::CdText => config.options.cdtext = read_flag(&mut tokenizer, option)?,
            ConfigOption::Convert => config.options.convert = read_flag(&mut tokenizer, option)?,
            ConfigOption::Converter => {
                let ext_from = read_converter_value(&mut tokenizer)?;
                let ext_to = read_converter_value(&mut tokenizer)?;
                let command = read_converter_value(&mut tokenizer)?;
                debug!(
                    "Option {}: \"{}\" \"{}\" \"{}\"",
                    option.keyword(),
                    ext_from,
                    ext_to,
                    command
                );
                config
                    .converters
                    .add(Converter::new(ext_from, ext_to, command));
            }
            ConfigOption::Unknown => {
                return Err(ConfigError::UnknownOption {
                    file: tokenizer.file().to_string(),
                    line: tokenizer.line(),
                })
            }
        }
    }

    debug!("Done parsing config file");
    Ok(config)
}

fn read_flag<R: BufRead>(
    tokenizer: &mut ConfigTokenizer<R>,
    option: ConfigOption,
) -> Result<bool, ConfigError> {
    let value = tokenizer.next_value()?;
    if value.is_empty() {
        return Err(ConfigError::MissingValue {
            file: tokenizer.file().to_string(),
            line: tokenizer.line(),
            option: option.keyword(),
        });
    }

    let flag = is_truthy(&value);
    debug!("Option {}: {}", option.keyword(), if flag { "yes" } else { "no" });
    Ok(flag)
}

fn read_converter_value<R: BufRead>(
    tokenizer: &mut ConfigTokenizer<R>,
) -> Result<String, ConfigError> {
    let value = tokenizer.next_value()?;
    if value.is_empty() {
        return Err(ConfigError::MissingConverterValues {
            file: tokenizer.file().to_string(),
            line: tokenizer.line(),
            option: ConfigOption::Converter.keyword(),
        });
    }
    Ok(value)
}
