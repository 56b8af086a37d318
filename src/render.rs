use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::data::model::{AxisRange, Figure};
use crate::style;

const FONT: &str = "sans-serif";

// ---------------------------------------------------------------------------
// PNG rendering
// ---------------------------------------------------------------------------

/// Render `figure` to a PNG at `path`.
///
/// Everything is clipped to the axes before drawing.
pub fn render_png(figure: &Figure, path: &Path) -> Result<()> {
    let xr = figure.x_range;
    let yr = figure.y_range;

    let root = BitMapBackend::new(path, style::CANVAS).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(xr.min..xr.max, yr.min..yr.max)?;

    chart
        .configure_mesh()
        .x_desc(style::X_LABEL)
        .y_desc(style::Y_LABEL)
        .label_style((FONT, 12).into_font())
        .axis_desc_style((FONT, 14).into_font())
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    // ---- Threshold shading ----
    let band_style = style::GRAY.to_plotters().mix(style::BAND_ALPHA).filled();
    let outline = clip_polygon(&figure.band.outline(), xr, yr);
    if outline.len() >= 3 {
        chart
            .draw_series(std::iter::once(Polygon::new(outline, band_style)))?
            .label(style::BAND_LABEL)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], band_style));
    }

    // ---- Raw departures ----
    let black = style::BLACK.to_plotters();
    chart
        .draw_series(
            figure
                .raw_points()
                .filter(|&(x, y)| xr.contains(x) && yr.contains(y))
                .map(|p| Circle::new(p, style::MARKER_RADIUS, black.filled())),
        )?
        .label(style::RAW_LABEL)
        .legend(move |(x, y)| Circle::new((x + 10, y), style::MARKER_RADIUS, black.filled()));

    // ---- Smoothed curve ----
    let red = style::RED.to_plotters();
    let line_style = red.stroke_width(style::LINE_WIDTH);
    let runs = clip_polyline(&figure.smoothed_points().collect::<Vec<_>>(), xr, yr);
    chart
        .draw_series(runs.into_iter().map(|run| PathElement::new(run, line_style)))?
        .label(style::SMOOTHED_LABEL)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

    // ---- Cloud divider ----
    let [top, bottom] = figure.divider.segment();
    let (_, height_px) = chart.plotting_area().dim_in_pixel();
    let units_per_px = (yr.max - yr.min) / f64::from(height_px.max(1));
    let dashes = clip_segment(top, bottom, xr, yr)
        .map(|(a, b)| dash_segments(a, b, units_per_px))
        .unwrap_or_default();
    chart
        .draw_series(dashes.into_iter().map(|d| PathElement::new(d.to_vec(), line_style)))?
        .label(style::DIVIDER_LABEL)
        .legend(move |(x, y)| {
            let [first, second] = legend_dashes();
            EmptyElement::at((x, y))
                + PathElement::new(first.to_vec(), line_style)
                + PathElement::new(second.to_vec(), line_style)
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font((FONT, 12).into_font())
        .draw()?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Split a vertical segment into dashes sized in pixels.
fn dash_segments(a: (f64, f64), b: (f64, f64), units_per_px: f64) -> Vec<[(f64, f64); 2]> {
    let dash = f64::from(style::DASH.0) * units_per_px;
    let gap = f64::from(style::DASH.1) * units_per_px;
    let (lo, hi) = if a.1 <= b.1 { (a.1, b.1) } else { (b.1, a.1) };
    if dash <= 0.0 {
        return vec![[a, b]];
    }

    let mut out = Vec::new();
    let mut y = lo;
    while y < hi {
        let end = (y + dash).min(hi);
        out.push([(a.0, y), (a.0, end)]);
        y = end + gap;
    }
    out
}

/// Two horizontal dashes, in pixels relative to the legend anchor.
fn legend_dashes() -> [[(i32, i32); 2]; 2] {
    let dash = style::DASH.0 as i32;
    let gap = style::DASH.1 as i32;
    [[(0, 0), (dash, 0)], [(dash + gap, 0), (2 * dash + gap, 0)]]
}

// ---------------------------------------------------------------------------
// Clipping against the axes rectangle
// ---------------------------------------------------------------------------

/// Liang–Barsky clip of one segment; `None` when it lies fully outside.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    xr: AxisRange,
    yr: AxisRange,
) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.0 - xr.min),
        (dx, xr.max - a.0),
        (-dy, a.1 - yr.min),
        (dy, yr.max - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Clip a polyline, returning the visible runs.
fn clip_polyline(points: &[(f64, f64)], xr: AxisRange, yr: AxisRange) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    for pair in points.windows(2) {
        let Some((s, e)) = clip_segment(pair[0], pair[1], xr, yr) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.last() == Some(&s) => run.push(e),
            _ => runs.push(vec![s, e]),
        }
    }
    runs
}

/// Sutherland–Hodgman clip of a polygon to the axes rectangle.
fn clip_polygon(points: &[(f64, f64)], xr: AxisRange, yr: AxisRange) -> Vec<(f64, f64)> {
    #[derive(Clone, Copy)]
    enum Edge {
        Left(f64),
        Right(f64),
        Bottom(f64),
        Top(f64),
    }

    fn inside(e: Edge, p: (f64, f64)) -> bool {
        match e {
            Edge::Left(v) => p.0 >= v,
            Edge::Right(v) => p.0 <= v,
            Edge::Bottom(v) => p.1 >= v,
            Edge::Top(v) => p.1 <= v,
        }
    }

    fn crossing(e: Edge, a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
        match e {
            Edge::Left(v) | Edge::Right(v) => {
                let t = (v - a.0) / (b.0 - a.0);
                (v, a.1 + t * (b.1 - a.1))
            }
            Edge::Bottom(v) | Edge::Top(v) => {
                let t = (v - a.1) / (b.1 - a.1);
                (a.0 + t * (b.0 - a.0), v)
            }
        }
    }

    let mut out = points.to_vec();
    for edge in [
        Edge::Left(xr.min),
        Edge::Right(xr.max),
        Edge::Bottom(yr.min),
        Edge::Top(yr.max),
    ] {
        let input = std::mem::take(&mut out);
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        for &cur in &input {
            match (inside(edge, prev), inside(edge, cur)) {
                (true, true) => out.push(cur),
                (true, false) => out.push(crossing(edge, prev, cur)),
                (false, true) => {
                    out.push(crossing(edge, prev, cur));
                    out.push(cur);
                }
                (false, false) => {}
            }
            prev = cur;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DepartureProfile, ObservationSummary, ThresholdBand};

    const XR: AxisRange = AxisRange { min: 0.5, max: 10.5 };
    const YR: AxisRange = AxisRange { min: -10.0, max: 10.0 };

    #[test]
    fn divider_legend_is_two_separate_dashes() {
        let [first, second] = legend_dashes();
        assert_eq!(first, [(0, 0), (6, 0)]);
        assert_eq!(second, [(10, 0), (16, 0)]);
        assert!(second[0].0 > first[1].0);
    }

    #[test]
    fn vertical_divider_is_cut_to_the_axes() {
        let (a, b) = clip_segment((5.0, -200.0), (5.0, 200.0), XR, YR).unwrap();
        assert_eq!(a.0, 5.0);
        assert!((a.1 + 10.0).abs() < 1e-9);
        assert!((b.1 - 10.0).abs() < 1e-9);
        assert!(clip_segment((139.0, -200.0), (139.0, 200.0), XR, YR).is_none());
    }

    #[test]
    fn polyline_splits_where_it_leaves_the_axes() {
        let pts = [(1.0, 0.0), (2.0, 20.0), (3.0, 0.0), (4.0, 1.0)];
        let runs = clip_polyline(&pts, XR, YR);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(1.0, 0.0), (1.5, 10.0)]);
        assert_eq!(runs[1], vec![(2.5, 10.0), (3.0, 0.0), (4.0, 1.0)]);
    }

    #[test]
    fn band_polygon_is_trimmed_to_x_range() {
        let band = ThresholdBand {
            x: [0.0, 20.0],
            lower: [-1.0, -1.0],
            upper: [1.0, 1.0],
        };
        let clipped = clip_polygon(&band.outline(), XR, YR);
        assert!(clipped.iter().all(|&(x, y)| XR.contains(x) && YR.contains(y)));
        let xs: Vec<f64> = clipped.iter().map(|p| p.0).collect();
        assert!(xs.contains(&0.5));
        assert!(xs.contains(&10.5));
    }

    #[test]
    fn dashes_cover_the_segment() {
        let d = dash_segments((3.0, -10.0), (3.0, 10.0), 0.5);
        assert_eq!(d.first().unwrap()[0], (3.0, -10.0));
        assert_eq!(d[0][1], (3.0, -7.0));
        assert_eq!(d[1][0], (3.0, -5.0));
        assert!(d.last().unwrap()[1].1 <= 10.0);
    }

    #[test]
    fn png_has_the_fixed_canvas_size() {
        let profile = DepartureProfile {
            index: 1,
            ranked: vec![1.0, 2.0, 3.0, 4.0],
            raw: vec![0.5, -12.0, 2.0, 1.0],
            smoothed: vec![0.4, 0.2, 1.5, 1.1],
            divider_rows: 2,
        };
        let band = ThresholdBand {
            x: [1.0, 4.0],
            lower: [-1.0, -2.0],
            upper: [1.0, 2.0],
        };
        let fig = Figure::new(ObservationSummary { jmax: 1.0 }, band, profile);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clddet.png");
        render_png(&fig, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), style::CANVAS);
    }
}
