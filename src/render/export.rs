use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

use super::{Figure, Panel, RenderError, RenderTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Writes each figure to `<dir>/<stem>.<ext>`.
pub struct ImageExport {
    dir: PathBuf,
    format: ImageFormat,
    size: (u32, u32),
}

impl ImageExport {
    pub fn new(dir: &Path, format: ImageFormat, size: (u32, u32)) -> Self {
        Self {
            dir: dir.to_path_buf(),
            format,
            size,
        }
    }

    pub fn path_for(&self, figure: &Figure) -> PathBuf {
        self.dir.join(format!("{}.{}", figure.stem, self.format.extension()))
    }
}

impl RenderTarget for ImageExport {
    fn present(&mut self, figures: &[Figure]) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| RenderError::Io {
            path: self.dir.clone(),
            source,
        })?;

        for figure in figures {
            let path = self.path_for(figure);
            let drawn = match self.format {
                ImageFormat::Png => {
                    draw_figure(BitMapBackend::new(&path, self.size).into_drawing_area(), figure)
                }
                ImageFormat::Svg => {
                    draw_figure(SVGBackend::new(&path, self.size).into_drawing_area(), figure)
                }
            };
            drawn.map_err(|err| RenderError::Draw {
                path: path.clone(),
                message: err.to_string(),
            })?;
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

fn draw_figure<DB>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let body = root.titled(&figure.title, ("sans-serif", 28))?;
    let rows = body.split_evenly((figure.panels.len().max(1), 1));
    for (panel, area) in figure.panels.iter().zip(rows.iter()) {
        draw_panel(area, panel)?;
    }
    root.present()?;
    Ok(())
}

fn draw_panel<DB>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = panel.x_range();
    let (y_min, y_max) = panel.y_range;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(if panel.x_label.is_some() { 40 } else { 25 })
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(panel.y_label.clone())
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.2));
    if let Some(x_label) = &panel.x_label {
        mesh.x_desc(x_label.clone());
    }
    if !panel.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    for series in &panel.series {
        let color = RGBColor(series.color.0, series.color.1, series.color.2);
        let points = panel.plot_points(series);

        let line = chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
        if let Some(label) = &series.label {
            line.label(label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if series.markers {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 2, color.filled())))?;
        }
    }

    if panel.legend && panel.series.iter().any(|s| s.label.is_some()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}
