use eframe::egui::{Stroke, Ui};
use egui_plot::{
    Legend, Line, LineStyle, MarkerShape, Plot, PlotBounds, PlotPoints, Points, Polygon,
};

use crate::data::model::Figure;
use crate::state::ViewerState;
use crate::style;

// ---------------------------------------------------------------------------
// Departure plot (central panel)
// ---------------------------------------------------------------------------

/// Render the O-B departure plot in the central panel.
///
/// The view snaps to the figure's axis ranges on the first frame and whenever
/// `reset_view` is set; pan and zoom are free in between.
pub fn departure_plot(ui: &mut Ui, state: &mut ViewerState) {
    let reset = std::mem::take(&mut state.reset_view);
    let fig = &state.figure;
    let home = home_bounds(fig);

    let band: PlotPoints = fig.band.outline().into_iter().map(|(x, y)| [x, y]).collect();
    let raw: PlotPoints = fig.raw_points().map(|(x, y)| [x, y]).collect();
    let smoothed: PlotPoints = fig.smoothed_points().map(|(x, y)| [x, y]).collect();
    let divider: PlotPoints = fig
        .divider
        .segment_within(fig.y_range)
        .into_iter()
        .map(|(x, y)| [x, y])
        .collect();

    Plot::new("departure_plot")
        .legend(Legend::default())
        .x_axis_label(style::X_LABEL)
        .y_axis_label(style::Y_LABEL)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if reset {
                plot_ui.set_plot_bounds(home);
            }

            plot_ui.polygon(
                Polygon::new(band)
                    .name(style::BAND_LABEL)
                    .fill_color(style::GRAY.to_color32_alpha(style::BAND_ALPHA))
                    .stroke(Stroke::NONE),
            );

            plot_ui.points(
                Points::new(raw)
                    .name(style::RAW_LABEL)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(style::MARKER_RADIUS as f32)
                    .color(style::BLACK.to_color32()),
            );

            plot_ui.line(
                Line::new(smoothed)
                    .name(style::SMOOTHED_LABEL)
                    .color(style::RED.to_color32())
                    .width(1.5),
            );

            plot_ui.line(
                Line::new(divider)
                    .name(style::DIVIDER_LABEL)
                    .color(style::RED.to_color32())
                    .style(LineStyle::dashed_loose())
                    .width(1.5),
            );
        });
}

/// Axis ranges of the figure as plot bounds.
fn home_bounds(fig: &Figure) -> PlotBounds {
    PlotBounds::from_min_max(
        [fig.x_range.min, fig.y_range.min],
        [fig.x_range.max, fig.y_range.max],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DepartureProfile, ObservationSummary, ThresholdBand};

    #[test]
    fn home_view_uses_the_departure_range_not_the_divider_span() {
        let profile = DepartureProfile {
            index: 3,
            ranked: vec![1.0, 2.0, 3.0],
            raw: vec![0.2, -0.1, 0.4],
            smoothed: vec![0.1, 0.1, 0.2],
            divider_rows: 2,
        };
        let band = ThresholdBand {
            x: [1.0, 3.0],
            lower: [-1.0, -1.0],
            upper: [1.0, 1.0],
        };
        let fig = Figure::new(ObservationSummary { jmax: 3.0 }, band, profile);

        let home = home_bounds(&fig);
        assert_eq!(home.min(), [0.5, -10.0]);
        assert_eq!(home.max(), [3.5, 10.0]);
    }
}
