use anyhow::{Context, Result};

use crate::analysis::normalize::normalize_streams;
use crate::analysis::spectrum::analyze_spectra;
use crate::capture::parse::parse_file;
use crate::config::AnalyzerConfig;
use crate::render::figure::{frequency_domain_figure, time_domain_figure};
use crate::render::RenderTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub input_samples: usize,
    pub intermediate_samples: usize,
    pub output_samples: usize,
    pub skipped_lines: usize,
    /// False when the input stream was empty and nothing was rendered.
    pub plotted: bool,
}

/// Parse, normalize, analyze and hand both figures to `target`.
pub fn run(config: &AnalyzerConfig, target: &mut dyn RenderTarget) -> Result<RunReport> {
    let parsed = parse_file(&config.input, config.parse.on_malformed)?;
    let streams = &parsed.streams;

    log::info!(
        "Samples read -> in: {}, mid: {}, out: {}",
        streams.input.len(),
        streams.intermediate.len(),
        streams.output.len()
    );
    if parsed.skipped_lines > 0 {
        log::warn!("Skipped {} malformed line(s)", parsed.skipped_lines);
    }

    let mut report = RunReport {
        input_samples: streams.input.len(),
        intermediate_samples: streams.intermediate.len(),
        output_samples: streams.output.len(),
        skipped_lines: parsed.skipped_lines,
        plotted: false,
    };

    if streams.input.is_empty() {
        log::info!("Input stream is empty; nothing to plot");
        return Ok(report);
    }

    log::info!("Normalizing all signals by fixed factor: {}", config.normalize.divisor);
    let signals = normalize_streams(streams, config.normalize.divisor);

    let time = time_domain_figure(&signals, config);
    let spectra = analyze_spectra(&signals, &config.rates);
    log::info!("Spectrum reference level (input peak): {:.2} dB", spectra.reference_db);
    let frequency = frequency_domain_figure(&spectra);

    target
        .present(&[time, frequency])
        .context("Failed to render figures")?;

    report.plotted = true;
    Ok(report)
}
