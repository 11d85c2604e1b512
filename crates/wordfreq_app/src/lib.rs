//! Wordfreq app: configuration and the fetch -> count -> report pipeline.
mod config;

use std::io::Write;

use anyhow::Context;
use wordfreq_core::{count_words, write_report, RankedList};
use wordfreq_fetch::{Fetcher, LogProgressSink};
use wordfreq_log::{wf_error, wf_info};

pub use config::{
    AppConfig, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_END_IDX, DEFAULT_LOG_FILE,
    DEFAULT_START_IDX,
};

/// Fetch the configured document, count its words and print the ranked slice to `out`.
///
/// Returns the entries that were printed. Nothing is written to `out` unless
/// the fetch and the count both succeed.
pub async fn run<W: Write>(
    config: &AppConfig,
    fetcher: &dyn Fetcher,
    out: &mut W,
) -> anyhow::Result<RankedList> {
    wf_info!("Fetching URL content...");
    let document = match fetcher.fetch(&config.url, &LogProgressSink).await {
        Ok(document) => document,
        Err(err) => {
            wf_error!("{}", err);
            wf_error!("Failed to open URL: {}", config.url);
            return Err(err).with_context(|| format!("failed to open URL {}", config.url));
        }
    };
    wf_info!(
        "Successfully opened URL: {} ({} bytes, content type {:?})",
        document.metadata.final_url,
        document.metadata.byte_len,
        document.metadata.content_type
    );

    wf_info!("Counting words ({} mode)...", config.process_mode);
    let counts = count_words(&document, config.process_mode)
        .with_context(|| format!("failed to decode content of {}", config.url))?;
    wf_info!("Word counts computed.");

    wf_info!("Printing word counts...");
    let printed = write_report(out, &counts, config.range).context("failed to print report")?;
    wf_info!("Word counts printed ({} entries).", printed.len());

    Ok(printed)
}
