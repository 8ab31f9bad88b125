use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::chart::{self, ChartKind};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart over the filtered rows.
pub fn chart_view(ui: &mut Ui, state: &SessionState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to chart its data  (File → Open…)");
        });
        return;
    };
    let Some(spec) = state.chart_spec() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick X and Y columns to chart");
        });
        return;
    };

    let points = chart::series_points(
        table,
        &spec.x_column,
        &spec.y_column,
        &state.visible_indices,
    );

    // An empty filter result is not an error; the plot just comes up blank.
    if points.is_empty() {
        ui.label("No plottable rows for the current filter and column selection.");
    }

    let name = format!("{} vs {}", spec.y_column, spec.x_column);

    // Leave the lower part of the panel to the data table.
    Plot::new("chart_view")
        .height(ui.available_height() * 0.6)
        .legend(egui_plot::Legend::default())
        .x_axis_label(spec.x_column.clone())
        .y_axis_label(spec.y_column.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match spec.kind {
            ChartKind::Line => {
                let line = Line::new(PlotPoints::from(points)).name(&name).width(1.5);
                plot_ui.line(line);
            }
            ChartKind::Scatter => {
                let dots = Points::new(PlotPoints::from(points)).name(&name).radius(2.5);
                plot_ui.points(dots);
            }
            ChartKind::Bar => {
                let width = bar_width(&points);
                let bars: Vec<Bar> = points
                    .iter()
                    .map(|&[x, y]| Bar::new(x, y).width(width))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&name));
            }
        });
}

/// Bars sized to a fraction of the mean x spacing so dense and sparse data
/// both stay readable.
fn bar_width(points: &[[f64; 2]]) -> f64 {
    if points.len() < 2 {
        return 0.5;
    }
    let min = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p[0])
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span <= 0.0 {
        0.5
    } else {
        span / points.len() as f64 * 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_handles_degenerate_input() {
        assert_eq!(bar_width(&[]), 0.5);
        assert_eq!(bar_width(&[[1.0, 2.0]]), 0.5);
        assert_eq!(bar_width(&[[0.0, 1.0], [0.0, 2.0]]), 0.5);
    }

    #[test]
    fn bar_width_scales_with_spacing() {
        let w = bar_width(&[[0.0, 1.0], [10.0, 1.0]]);
        assert!(w > 0.0 && w <= 8.0);
    }
}
