use eframe::egui;
use egui::plot::{Corner, Legend, Line, Plot, PlotPoints, Points};
use egui::Color32;

use super::{Figure, Panel, RenderError, RenderTarget};

const PANEL_HEIGHT: f32 = 220.0;

/// Native window showing every figure; `present` returns once it is closed.
pub struct PlotWindow {
    size: (u32, u32),
}

impl PlotWindow {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }
}

impl RenderTarget for PlotWindow {
    fn present(&mut self, figures: &[Figure]) -> Result<(), RenderError> {
        let options = eframe::NativeOptions {
            initial_window_size: Some(egui::vec2(self.size.0 as f32, self.size.1 as f32)),
            ..Default::default()
        };
        let figures = figures.to_vec();
        log::info!("Showing {} figure(s); close the window to exit", figures.len());

        eframe::run_native(
            "resplot",
            options,
            Box::new(move |_cc| Box::new(FigureApp { figures })),
        )
        .map_err(|err| RenderError::Window(err.to_string()))
    }
}

struct FigureApp {
    figures: Vec<Figure>,
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for figure in &self.figures {
                    ui.heading(&figure.title);
                    for (idx, panel) in figure.panels.iter().enumerate() {
                        show_panel(ui, &format!("{}-{}", figure.stem, idx), panel);
                    }
                    ui.separator();
                }
            });
        });
    }
}

fn show_panel(ui: &mut egui::Ui, id: &str, panel: &Panel) {
    ui.label(egui::RichText::new(&panel.title).strong());

    let (x_min, x_max) = panel.x_range();
    let (y_min, y_max) = panel.y_range;
    let mut plot = Plot::new(id)
        .height(PANEL_HEIGHT)
        .include_x(x_min)
        .include_x(x_max)
        .include_y(y_min)
        .include_y(y_max);
    if panel.legend {
        plot = plot.legend(Legend::default().position(Corner::RightTop));
    }

    plot.show(ui, |plot_ui| {
        for series in &panel.series {
            let color = Color32::from_rgb(series.color.0, series.color.1, series.color.2);
            let points: Vec<[f64; 2]> =
                panel.plot_points(series).into_iter().map(|(x, y)| [x, y]).collect();

            let mut line = Line::new(PlotPoints::new(points.clone())).color(color);
            if let Some(label) = &series.label {
                line = line.name(label);
            }
            plot_ui.line(line);

            if series.markers {
                plot_ui.points(Points::new(PlotPoints::new(points)).radius(2.0).color(color));
            }
        }
    });

    let axes = match &panel.x_label {
        Some(x_label) => format!("x: {}    y: {}", x_label, panel.y_label),
        None => format!("y: {}", panel.y_label),
    };
    ui.small(axes);
}
