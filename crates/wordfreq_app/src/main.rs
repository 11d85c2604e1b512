use std::io;
use std::path::PathBuf;

use anyhow::Context;
use wordfreq_app::{run, AppConfig, DEFAULT_CONFIG_FILE};
use wordfreq_fetch::ReqwestFetcher;
use wordfreq_log::{wf_info, wf_warn};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
    wordfreq_log::initialize(&config.logging);
    wf_info!("Config and Logger initialized from {:?}.", config_path);
    for warning in &config.warnings {
        wf_warn!("{}", warning);
    }
    wf_info!(
        "url={} process_mode={} start_idx={} end_idx={}",
        config.url,
        config.process_mode,
        config.range.start,
        config.range.end
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let fetcher = ReqwestFetcher::new(config.fetch.clone());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime.block_on(run(&config, &fetcher, &mut out))?;
    Ok(())
}
