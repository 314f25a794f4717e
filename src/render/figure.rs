use super::{Figure, Panel, Rgb, Series, TAB_BLUE, TAB_GREEN, TAB_ORANGE};
use crate::analysis::normalize::NormalizedStreams;
use crate::analysis::spectrum::SpectrumSet;
use crate::capture::StreamRole;
use crate::config::AnalyzerConfig;

pub const TIME_Y_RANGE: (f64, f64) = (-1.2, 1.2);
pub const FREQ_Y_RANGE: (f64, f64) = (-80.0, 5.0);

fn role_color(role: StreamRole) -> Rgb {
    match role {
        StreamRole::Input => TAB_BLUE,
        StreamRole::Intermediate => TAB_ORANGE,
        StreamRole::Output => TAB_GREEN,
    }
}

/// "9.0 MHz", "18.0 MHz", "1.5 MHz".
fn format_mhz(hz: f64) -> String {
    format!("{:?} MHz", hz / 1e6)
}

/// "30k" for 30000, the raw value otherwise.
fn format_scale(divisor: f64) -> String {
    if divisor.abs() >= 1000.0 && divisor % 1000.0 == 0.0 {
        format!("{}k", divisor / 1000.0)
    } else {
        format!("{}", divisor)
    }
}

/// Amplitude against sample index, each stream cut to its configured prefix.
pub fn time_domain_figure(signals: &NormalizedStreams, config: &AnalyzerConfig) -> Figure {
    let scale = format_scale(config.normalize.divisor);
    let rates = &config.rates;

    let panels = StreamRole::ALL
        .into_iter()
        .map(|role| {
            let (title, label) = match role {
                StreamRole::Input => (
                    "Input Signal",
                    format!("Input ({})", format_mhz(rates.input_hz)),
                ),
                StreamRole::Intermediate => (
                    "Intermediate Signal",
                    format!("Upsampled x{} ({})", rates.upsample, format_mhz(rates.intermediate_hz())),
                ),
                StreamRole::Output => (
                    "Final Output",
                    format!("Output /{} ({})", rates.downsample, format_mhz(rates.output_hz())),
                ),
            };

            let samples = signals.get(role);
            let shown = samples.len().min(config.time_window.len_for(role));
            let points = samples[..shown]
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect();

            Panel {
                title: format!("{} (Normalized: {} = 1.0)", title, scale),
                x_label: (role == StreamRole::Output).then(|| "Sample Index".to_string()),
                y_label: "Amplitude".into(),
                y_range: TIME_Y_RANGE,
                grid: true,
                legend: true,
                series: vec![Series {
                    label: Some(label),
                    color: role_color(role),
                    points,
                    markers: true,
                }],
            }
        })
        .collect();

    Figure {
        stem: "time_domain".into(),
        title: "Time Domain Analysis (Absolute Scale)".into(),
        panels,
    }
}

/// Relative magnitude against frequency in MHz, all referenced to the input peak.
pub fn frequency_domain_figure(spectra: &SpectrumSet) -> Figure {
    let panels = StreamRole::ALL
        .into_iter()
        .map(|role| {
            let title = match role {
                StreamRole::Input => "Input Spectrum (0 dB Ref)",
                StreamRole::Intermediate => "Upsampled Spectrum (Relative to Input)",
                StreamRole::Output => "Output Spectrum (Relative to Input)",
            };
            let spectrum = spectra.get(role);
            let points = spectrum
                .freqs_hz
                .iter()
                .zip(&spectrum.magnitude_db)
                .map(|(&f, &m)| (f / 1e6, m))
                .collect();

            Panel {
                title: title.into(),
                x_label: (role == StreamRole::Output).then(|| "Frequency (MHz)".to_string()),
                y_label: "dB".into(),
                y_range: FREQ_Y_RANGE,
                grid: true,
                legend: false,
                series: vec![Series {
                    label: None,
                    color: role_color(role),
                    points,
                    markers: false,
                }],
            }
        })
        .collect();

    Figure {
        stem: "frequency_domain".into(),
        title: "Frequency Domain Analysis".into(),
        panels,
    }
}
