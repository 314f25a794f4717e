use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::capture::StreamRole;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub time_window: TimeWindowConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Nominal rates of the three capture points. The resampling itself happens
/// in the simulated design; these only label axes and scale FFT bins.
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    #[serde(default = "default_input_hz")]
    pub input_hz: f64,
    #[serde(default = "default_upsample")]
    pub upsample: u32,
    #[serde(default = "default_downsample")]
    pub downsample: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_divisor")]
    pub divisor: f64,
}

/// Prefix lengths for the time-domain figure, picked so each panel spans a
/// comparable stretch of time.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeWindowConfig {
    #[serde(default = "default_window_input")]
    pub input: usize,
    #[serde(default = "default_window_intermediate")]
    pub intermediate: usize,
    #[serde(default = "default_window_output")]
    pub output: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseConfig {
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_target")]
    pub target: TargetKind,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Window,
    Png,
    Svg,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            rates: RateConfig::default(),
            normalize: NormalizeConfig::default(),
            time_window: TimeWindowConfig::default(),
            parse: ParseConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            input_hz: default_input_hz(),
            upsample: default_upsample(),
            downsample: default_downsample(),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            divisor: default_divisor(),
        }
    }
}

impl Default for TimeWindowConfig {
    fn default() -> Self {
        Self {
            input: default_window_input(),
            intermediate: default_window_intermediate(),
            output: default_window_output(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl RateConfig {
    pub fn intermediate_hz(&self) -> f64 {
        self.input_hz * self.upsample as f64
    }

    pub fn output_hz(&self) -> f64 {
        self.intermediate_hz() / self.downsample as f64
    }

    pub fn rate_for(&self, role: StreamRole) -> f64 {
        match role {
            StreamRole::Input => self.input_hz,
            StreamRole::Intermediate => self.intermediate_hz(),
            StreamRole::Output => self.output_hz(),
        }
    }
}

impl TimeWindowConfig {
    pub fn len_for(&self, role: StreamRole) -> usize {
        match role {
            StreamRole::Input => self.input,
            StreamRole::Intermediate => self.intermediate,
            StreamRole::Output => self.output,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.normalize.divisor.is_finite() || self.normalize.divisor == 0.0 {
            return Err(ConfigError::Invalid(format!(
                "normalize.divisor must be finite and non-zero, got {}",
                self.normalize.divisor
            )));
        }
        if !self.rates.input_hz.is_finite() || self.rates.input_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "rates.input_hz must be positive, got {}",
                self.rates.input_hz
            )));
        }
        if self.rates.upsample == 0 || self.rates.downsample == 0 {
            return Err(ConfigError::Invalid(
                "rates.upsample and rates.downsample must be at least 1".into(),
            ));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "render size must be non-zero, got {}x{}",
                self.render.width, self.render.height
            )));
        }
        Ok(())
    }
}

fn default_input() -> PathBuf { "resampler_output.txt".into() }
fn default_input_hz() -> f64 { 9.0e6 }
fn default_upsample() -> u32 { 2 }
fn default_downsample() -> u32 { 3 }
fn default_divisor() -> f64 { 30000.0 }
fn default_window_input() -> usize { 200 }
fn default_window_intermediate() -> usize { 400 }
fn default_window_output() -> usize { 150 }
fn default_output_dir() -> PathBuf { "plots".into() }
fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 800 }

#[cfg(feature = "window")]
fn default_target() -> TargetKind { TargetKind::Window }
#[cfg(not(feature = "window"))]
fn default_target() -> TargetKind { TargetKind::Png }

pub fn parse_config(path: &Path, content: &str) -> Result<AnalyzerConfig, ConfigError> {
    let config: AnalyzerConfig = toml::from_str(content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &content)
}

/// Auto-detected config: `resplot.toml` in the working directory, then the
/// per-user config directory.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("resplot.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("resplot").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<AnalyzerConfig, ConfigError> {
        parse_config(Path::new("test.toml"), content)
    }

    #[test]
    fn defaults_match_reference_testbench() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.input, PathBuf::from("resampler_output.txt"));
        assert_eq!(cfg.rates.input_hz, 9.0e6);
        assert_eq!(cfg.rates.intermediate_hz(), 18.0e6);
        assert_eq!(cfg.rates.output_hz(), 6.0e6);
        assert_eq!(cfg.normalize.divisor, 30000.0);
        assert_eq!(cfg.time_window.input, 200);
        assert_eq!(cfg.time_window.intermediate, 400);
        assert_eq!(cfg.time_window.output, 150);
        assert_eq!(cfg.parse.on_malformed, MalformedPolicy::Abort);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.normalize.divisor, 30000.0);
        assert_eq!(cfg.render.output_dir, PathBuf::from("plots"));
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let cfg = parse(
            r#"
            input = "bench/run1.txt"

            [rates]
            upsample = 4

            [parse]
            on_malformed = "skip"

            [render]
            target = "svg"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.input, PathBuf::from("bench/run1.txt"));
        assert_eq!(cfg.rates.input_hz, 9.0e6);
        assert_eq!(cfg.rates.intermediate_hz(), 36.0e6);
        assert_eq!(cfg.rates.output_hz(), 12.0e6);
        assert_eq!(cfg.parse.on_malformed, MalformedPolicy::Skip);
        assert_eq!(cfg.render.target, TargetKind::Svg);
        assert_eq!(cfg.render.width, 1000);
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = parse("[normalize]\ndivisor = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_downsample() {
        let err = parse("[rates]\ndownsample = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = parse("[rates\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn rate_and_window_lookup_by_role() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.rates.rate_for(StreamRole::Intermediate), 18.0e6);
        assert_eq!(cfg.time_window.len_for(StreamRole::Output), 150);
    }
}
