//! Runtime configuration read from an INI-style file.
//!
//! Only the `[DEFAULT]` section is consulted. Keys that appear before any
//! section header are treated as belonging to it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use thiserror::Error;
use wordfreq_core::{ProcessMode, RankRange};
use wordfreq_fetch::FetchSettings;
use wordfreq_log::{LogDestination, LogSettings};

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_LOG_FILE: &str = "word_frequency.log";
pub const DEFAULT_START_IDX: usize = 9;
pub const DEFAULT_END_IDX: usize = 20;

const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected `key = value` or `[section]`, found {text:?}")]
    Syntax { line: usize, text: String },
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("key `{key}` must be a non-negative integer, found {value:?}")]
    InvalidInteger { key: &'static str, value: String },
    #[error("key `{key}` must be true or false, found {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

/// Everything the pipeline needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub url: String,
    pub process_mode: ProcessMode,
    pub range: RankRange,
    pub logging: LogSettings,
    pub fetch: FetchSettings,
    /// Values that were replaced by a fallback, to be logged once the
    /// logger exists.
    pub warnings: Vec<String>,
}

impl AppConfig {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_ini(&text, base_dir)
    }

    /// Build a config from INI text. Relative log paths resolve against `base_dir`.
    pub fn from_ini(text: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let sections = parse_ini(text)?;
        let empty = HashMap::new();
        let values = Values(sections.get(DEFAULT_SECTION).unwrap_or(&empty));

        let url = values
            .get("url")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingKey("url"))?
            .to_string();

        let mut warnings = Vec::new();

        // Anything other than `line` processes the whole document at once.
        let process_mode = match values.get("process_mode").map(ProcessMode::from_str) {
            Some(Ok(mode)) => mode,
            Some(Err(err)) => {
                warnings.push(format!("{err}; using \"{}\"", ProcessMode::All));
                ProcessMode::All
            }
            None => ProcessMode::default(),
        };

        let start = values.integer("start_idx", DEFAULT_START_IDX)?;
        let end = values.integer("end_idx", DEFAULT_END_IDX)?;

        // Unknown level names fall back to INFO rather than failing.
        let level = match values.get("logging_level") {
            Some(name) => wordfreq_log::parse_level(name).unwrap_or_else(|| {
                warnings.push(format!("unknown logging_level {name:?}; using INFO"));
                LevelFilter::Info
            }),
            None => LevelFilter::Info,
        };
        let log_file = base_dir.join(values.get("log_file").unwrap_or(DEFAULT_LOG_FILE));
        let destination = if values.boolean("log_to_terminal", false)? {
            LogDestination::Both(log_file)
        } else {
            LogDestination::File(log_file)
        };

        let defaults = FetchSettings::default();
        let fetch = FetchSettings {
            connect_timeout: Duration::from_secs(
                values.integer("connect_timeout_secs", defaults.connect_timeout.as_secs())?,
            ),
            request_timeout: values
                .optional_integer("request_timeout_secs")?
                .map(Duration::from_secs)
                .or(defaults.request_timeout),
            max_bytes: values.optional_integer("max_bytes")?.or(defaults.max_bytes),
            allowed_content_types: values
                .get("allowed_content_types")
                .map(split_list)
                .unwrap_or(defaults.allowed_content_types),
            ..defaults
        };

        Ok(Self {
            url,
            process_mode,
            range: RankRange::new(start, end),
            logging: LogSettings { level, destination },
            fetch,
            warnings,
        })
    }
}

struct Values<'a>(&'a HashMap<String, String>);

impl Values<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn integer<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        Ok(self.optional_integer(key)?.unwrap_or(default))
    }

    fn optional_integer<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|value| {
                value.parse().map_err(|_| ConfigError::InvalidInteger {
                    key,
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    fn boolean(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                key,
                value: value.to_string(),
            }),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Section name -> (lowercased key -> trimmed value).
fn parse_ini(text: &str) -> Result<HashMap<String, HashMap<String, String>>, ConfigError> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = DEFAULT_SECTION.to_string();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            continue;
        }

        let Some((key, value)) = split_entry(line) else {
            return Err(ConfigError::Syntax {
                line: index + 1,
                text: raw.to_string(),
            });
        };
        sections
            .entry(current.clone())
            .or_default()
            .insert(key.to_ascii_lowercase(), value.to_string());
    }

    Ok(sections)
}

// The earliest of `=` or `:` delimits the key.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_ini_reads_sections_and_skips_comments() {
        let text = "# comment\n; other\n[DEFAULT]\nURL = https://a.example\n\n[extra]\nkey: value\n";
        let sections = parse_ini(text).unwrap();

        assert_eq!(sections["DEFAULT"]["url"], "https://a.example");
        assert_eq!(sections["extra"]["key"], "value");
    }

    #[test]
    fn url_value_keeps_its_colon() {
        assert_eq!(
            split_entry("url = http://host:8080/x"),
            Some(("url", "http://host:8080/x"))
        );
    }

    #[test]
    fn parse_ini_rejects_bare_words() {
        let err = parse_ini("[DEFAULT]\nnot an entry\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn keys_outside_sections_count_as_default() {
        let sections = parse_ini("url = https://x.example\n").unwrap();
        assert_eq!(sections["DEFAULT"]["url"], "https://x.example");
    }
}
