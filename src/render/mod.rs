pub mod export;
pub mod figure;
#[cfg(feature = "window")]
pub mod window;

use std::path::PathBuf;

use crate::config::{RenderConfig, TargetKind};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render target '{0}' is not available in this build (enable the `window` feature)")]
    UnsupportedTarget(&'static str),
    #[error("failed to create {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to draw {}: {message}", .path.display())]
    Draw { path: PathBuf, message: String },
    #[cfg(feature = "window")]
    #[error("plot window failed: {0}")]
    Window(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const TAB_BLUE: Rgb = Rgb(31, 119, 180);
pub const TAB_ORANGE: Rgb = Rgb(255, 127, 14);
pub const TAB_GREEN: Rgb = Rgb(44, 160, 44);

/// One plotted trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
    /// Draw a dot on every sample in addition to the line.
    pub markers: bool,
}

/// One row of a figure. The y range is fixed; the x range follows the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: String,
    pub y_range: (f64, f64),
    pub grid: bool,
    pub legend: bool,
    pub series: Vec<Series>,
}

impl Panel {
    pub fn x_range(&self) -> (f64, f64) {
        let mut xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let Some(first) = xs.next() else {
            return (0.0, 1.0);
        };
        let (lo, hi) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
        if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }

    /// Points of `series` with y pinned into `y_range`; values past the axis
    /// (the -240 dB floor of silent bins) sit on its edge.
    pub fn plot_points(&self, series: &Series) -> Vec<(f64, f64)> {
        let (lo, hi) = self.y_range;
        series.points.iter().map(|&(x, y)| (x, y.clamp(lo, hi))).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// File name without extension, for exporting targets.
    pub stem: String,
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Where finished figures go. Presenting may block (an interactive window
/// returns only once closed).
pub trait RenderTarget {
    fn present(&mut self, figures: &[Figure]) -> Result<(), RenderError>;
}

pub fn make_target(config: &RenderConfig) -> Result<Box<dyn RenderTarget>, RenderError> {
    let size = (config.width, config.height);
    match config.target {
        TargetKind::Png => Ok(Box::new(export::ImageExport::new(
            &config.output_dir,
            export::ImageFormat::Png,
            size,
        ))),
        TargetKind::Svg => Ok(Box::new(export::ImageExport::new(
            &config.output_dir,
            export::ImageFormat::Svg,
            size,
        ))),
        #[cfg(feature = "window")]
        TargetKind::Window => Ok(Box::new(window::PlotWindow::new(size))),
        #[cfg(not(feature = "window"))]
        TargetKind::Window => Err(RenderError::UnsupportedTarget("window")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(points: Vec<(f64, f64)>) -> Panel {
        Panel {
            title: "t".into(),
            x_label: None,
            y_label: "y".into(),
            y_range: (-1.0, 1.0),
            grid: true,
            legend: false,
            series: vec![Series { label: None, color: TAB_BLUE, points, markers: false }],
        }
    }

    #[test]
    fn x_range_spans_data() {
        assert_eq!(panel(vec![(2.0, 0.0), (-1.0, 0.0), (5.0, 0.0)]).x_range(), (-1.0, 5.0));
    }

    #[test]
    fn x_range_degenerate_cases() {
        assert_eq!(panel(Vec::new()).x_range(), (0.0, 1.0));
        assert_eq!(panel(vec![(3.0, 0.1)]).x_range(), (2.5, 3.5));
    }

    #[test]
    fn plot_points_stay_on_axis() {
        let p = panel(vec![(0.0, -3.0), (1.0, 0.25), (2.0, 7.5)]);
        assert_eq!(p.plot_points(&p.series[0]), vec![(0.0, -1.0), (1.0, 0.25), (2.0, 1.0)]);
    }

    #[cfg(not(feature = "window"))]
    #[test]
    fn window_target_needs_feature() {
        let config = RenderConfig { target: TargetKind::Window, ..RenderConfig::default() };
        assert!(matches!(make_target(&config), Err(RenderError::UnsupportedTarget("window"))));
    }
}
