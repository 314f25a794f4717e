use rustfft::{num_complex::Complex, FftPlanner};

use super::normalize::NormalizedStreams;
use crate::capture::StreamRole;
use crate::config::RateConfig;

/// Added to |X| before the log so silent bins stay finite.
const MAGNITUDE_FLOOR: f64 = 1e-12;

/// Non-negative half of a windowed FFT, magnitudes in dB.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    pub freqs_hz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitude_db.len()
    }

    pub fn peak_db(&self) -> Option<f64> {
        self.magnitude_db.iter().copied().reduce(f64::max)
    }

    pub fn relative_to(&self, reference_db: f64) -> Spectrum {
        Spectrum {
            freqs_hz: self.freqs_hz.clone(),
            magnitude_db: self.magnitude_db.iter().map(|m| m - reference_db).collect(),
        }
    }
}

/// The three spectra after shifting by the input's peak, so gain between
/// stages stays visible.
#[derive(Debug, Clone)]
pub struct SpectrumSet {
    pub input: Spectrum,
    pub intermediate: Spectrum,
    pub output: Spectrum,
    pub reference_db: f64,
}

impl SpectrumSet {
    pub fn get(&self, role: StreamRole) -> &Spectrum {
        match role {
            StreamRole::Input => &self.input,
            StreamRole::Intermediate => &self.intermediate,
            StreamRole::Output => &self.output,
        }
    }
}

pub fn analyze_spectra(signals: &NormalizedStreams, rates: &RateConfig) -> SpectrumSet {
    let mut planner = FftPlanner::<f64>::new();

    let mut analyze =
        |role: StreamRole| spectrum_db(&mut planner, signals.get(role), rates.rate_for(role));
    let input = analyze(StreamRole::Input);
    let intermediate = analyze(StreamRole::Intermediate);
    let output = analyze(StreamRole::Output);

    let reference_db = input.peak_db().unwrap_or_else(|| {
        log::warn!(
            "Input spectrum is empty ({} samples); using 0 dB as reference",
            signals.input.len()
        );
        0.0
    });
    log::debug!(
        "Spectrum bins: in={}, mid={}, out={}, reference={:.2} dB",
        input.len(),
        intermediate.len(),
        output.len(),
        reference_db
    );

    SpectrumSet {
        input: input.relative_to(reference_db),
        intermediate: intermediate.relative_to(reference_db),
        output: output.relative_to(reference_db),
        reference_db,
    }
}

/// Hamming-windowed FFT over the whole signal, truncated to the first
/// `len / 2` bins.
pub fn spectrum_db(planner: &mut FftPlanner<f64>, signal: &[f64], sample_rate: f64) -> Spectrum {
    let n = signal.len();
    let half = n / 2;
    if half == 0 {
        return Spectrum::default();
    }

    let window = hamming_window(n);
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .zip(&window)
        .map(|(&s, &w)| Complex::new(s * w, 0.0))
        .collect();

    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let magnitude_db = buffer[..half]
        .iter()
        .map(|c| 20.0 * (c.norm() + MAGNITUDE_FLOOR).log10())
        .collect();

    Spectrum {
        freqs_hz: fft_freqs(n, sample_rate),
        magnitude_db,
    }
}

/// Center frequency of each of the first `n / 2` bins of an `n`-point FFT.
pub fn fft_freqs(n: usize, sample_rate: f64) -> Vec<f64> {
    (0..n / 2).map(|k| k as f64 * sample_rate / n as f64).collect()
}

/// Symmetric Hamming window; a single-point window is `[1.0]`.
pub fn hamming_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| {
            0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos()
        })
        .collect()
}
