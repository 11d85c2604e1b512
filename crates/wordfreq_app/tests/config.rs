use std::fs;
use std::path::Path;
use std::time::Duration;

use log::LevelFilter;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wordfreq_app::{AppConfig, ConfigError};
use wordfreq_core::{ProcessMode, RankRange};
use wordfreq_fetch::FetchSettings;
use wordfreq_log::LogDestination;

#[test]
fn defaults_apply_when_only_url_is_set() {
    let config =
        AppConfig::from_ini("[DEFAULT]\nurl = https://example.com/a.txt\n", Path::new("/srv"))
            .unwrap();

    assert_eq!(config.url, "https://example.com/a.txt");
    assert_eq!(config.process_mode, ProcessMode::All);
    assert_eq!(config.range, RankRange::new(9, 20));
    assert_eq!(config.logging.level, LevelFilter::Info);
    assert_eq!(
        config.logging.destination,
        LogDestination::File(Path::new("/srv").join("word_frequency.log"))
    );
    assert_eq!(config.fetch, FetchSettings::default());
}

#[test]
fn all_keys_are_read() {
    let text = "\
[DEFAULT]
url = https://example.com/book.txt
process_mode = LINE
start_idx = 0
end_idx = 5
logging_level = debug
log_file = logs/run.log
log_to_terminal = yes
connect_timeout_secs = 3
request_timeout_secs = 7
max_bytes = 1024
";
    let config = AppConfig::from_ini(text, Path::new("/etc/wordfreq")).unwrap();

    assert_eq!(config.process_mode, ProcessMode::Line);
    assert_eq!(config.range, RankRange::new(0, 5));
    assert_eq!(config.logging.level, LevelFilter::Debug);
    assert_eq!(
        config.logging.destination,
        LogDestination::Both(Path::new("/etc/wordfreq/logs/run.log").to_path_buf())
    );
    assert_eq!(config.fetch.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.fetch.request_timeout, Some(Duration::from_secs(7)));
    assert_eq!(config.fetch.max_bytes, Some(1024));
}

#[test]
fn unknown_logging_level_falls_back_to_info() {
    let config = AppConfig::from_ini(
        "url = https://example.com\nlogging_level = chatty\n",
        Path::new(""),
    )
    .unwrap();
    assert_eq!(config.logging.level, LevelFilter::Info);
    assert_eq!(config.warnings.len(), 1);
}

#[test]
fn missing_url_is_rejected() {
    let err = AppConfig::from_ini("[DEFAULT]\nstart_idx = 1\n", Path::new("")).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey("url")));

    let err = AppConfig::from_ini("[DEFAULT]\nurl =\n", Path::new("")).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey("url")));
}

#[test]
fn url_in_other_section_is_ignored() {
    let err = AppConfig::from_ini("[other]\nurl = https://example.com\n", Path::new(""))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey("url")));
}

#[test]
fn malformed_and_negative_indices_are_rejected() {
    let err = AppConfig::from_ini("url = https://example.com\nstart_idx = ten\n", Path::new(""))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidInteger { key: "start_idx", ref value } if value == "ten"
    ));

    let err = AppConfig::from_ini("url = https://example.com\nend_idx = -3\n", Path::new(""))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInteger { key: "end_idx", .. }));
}

#[test]
fn unknown_process_mode_falls_back_to_all() {
    let config = AppConfig::from_ini(
        "url = https://example.com\nprocess_mode = chunk\n",
        Path::new(""),
    )
    .unwrap();
    assert_eq!(config.process_mode, ProcessMode::All);
    assert_eq!(config.warnings.len(), 1);
    assert!(config.warnings[0].contains("chunk"));
}

#[test]
fn fetch_limits_are_opt_in() {
    let config = AppConfig::from_ini("url = https://example.com\n", Path::new("")).unwrap();
    assert_eq!(config.fetch.max_bytes, None);
    assert_eq!(config.fetch.request_timeout, None);
    assert!(config.fetch.allowed_content_types.is_empty());
    assert!(config.warnings.is_empty());
}

#[test]
fn allowed_content_types_are_comma_separated() {
    let config = AppConfig::from_ini(
        "url = https://example.com\nallowed_content_types = text/plain, text/html ,\n",
        Path::new(""),
    )
    .unwrap();
    assert_eq!(
        config.fetch.allowed_content_types,
        vec!["text/plain".to_string(), "text/html".to_string()]
    );
}

#[test]
fn load_resolves_log_file_next_to_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "[DEFAULT]\nurl = https://example.com\n").unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(
        config.logging.destination,
        LogDestination::File(temp.path().join("word_frequency.log"))
    );
}

#[test]
fn load_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = AppConfig::load(&temp.path().join("absent.ini")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
