mod analysis;
mod capture;
mod cli;
mod config;
mod pipeline;
mod render;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::AnalyzerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    log::info!("Input: {}", config.input.display());
    log::info!(
        "Rates: in={} Hz, L={}, M={}",
        config.rates.input_hz,
        config.rates.upsample,
        config.rates.downsample
    );
    log::info!("Render target: {:?}", config.render.target);

    let mut target = render::make_target(&config.render)?;
    let report = pipeline::run(&config, target.as_mut())?;

    if report.plotted {
        log::info!("Done");
    }
    Ok(())
}

/// Explicit `--config` must load; an auto-detected file that fails is only
/// a warning. CLI flags win over file values.
fn resolve_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = if let Some(ref path) = cli.config {
        let cfg = config::load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        cfg
    } else if let Some(path) = config::find_config() {
        match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), anyhow::Error::from(err));
                AnalyzerConfig::default()
            }
        }
    } else {
        AnalyzerConfig::default()
    };

    if let Some(ref input) = cli.input {
        config.input = input.clone();
    }
    if let Some(target) = cli.target {
        config.render.target = target;
    }
    if let Some(ref dir) = cli.output_dir {
        config.render.output_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}
