use crate::capture::{CaptureStreams, StreamRole};

/// Streams scaled to floating point by a fixed divisor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStreams {
    pub input: Vec<f64>,
    pub intermediate: Vec<f64>,
    pub output: Vec<f64>,
}

impl NormalizedStreams {
    pub fn get(&self, role: StreamRole) -> &[f64] {
        match role {
            StreamRole::Input => &self.input,
            StreamRole::Intermediate => &self.intermediate,
            StreamRole::Output => &self.output,
        }
    }
}

pub fn normalize(samples: &[i64], divisor: f64) -> Vec<f64> {
    samples.iter().map(|&s| s as f64 / divisor).collect()
}

/// The divisor is validated non-zero when the config loads.
pub fn normalize_streams(streams: &CaptureStreams, divisor: f64) -> NormalizedStreams {
    NormalizedStreams {
        input: normalize(&streams.input, divisor),
        intermediate: normalize(&streams.intermediate, divisor),
        output: normalize(&streams.output, divisor),
    }
}
