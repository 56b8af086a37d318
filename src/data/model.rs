use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::error::DataError;
use crate::style;

// ---------------------------------------------------------------------------
// ObservationSummary – the "observations" line
// ---------------------------------------------------------------------------

/// Header summary of the departures file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationSummary {
    /// Largest profile index present in the file.
    pub jmax: f64,
}

impl ObservationSummary {
    /// Reject a requested profile index above `jmax`.
    pub fn check_index(&self, index: u32) -> Result<(), DataError> {
        if f64::from(index) > self.jmax {
            return Err(DataError::IndexOutOfRange {
                index,
                jmax: self.jmax,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ThresholdBand – the grey shading between O-B thresholds
// ---------------------------------------------------------------------------

/// Lower and upper O-B thresholds given at two ranked-index positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdBand {
    pub x: [f64; 2],
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

impl ThresholdBand {
    /// Band outline as a closed polygon: lower edge left→right, upper edge
    /// right→left.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        vec![
            (self.x[0], self.lower[0]),
            (self.x[1], self.lower[1]),
            (self.x[1], self.upper[1]),
            (self.x[0], self.upper[0]),
        ]
    }
}

// ---------------------------------------------------------------------------
// DepartureProfile – one profile's ranked O-B departures
// ---------------------------------------------------------------------------

/// The columns extracted for a single profile index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartureProfile {
    pub index: u32,
    /// Ranked channel index (column 5).
    pub ranked: Vec<f64>,
    /// Raw O-B departure (column 6).
    pub raw: Vec<f64>,
    /// Smoothed O-B departure (column 8), same length as `raw`.
    pub smoothed: Vec<f64>,
    /// Rows whose trailing marker is `0`.
    pub divider_rows: usize,
}

impl DepartureProfile {
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CloudDivider
// ---------------------------------------------------------------------------

/// Rank separating cloud-affected from clear channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloudDivider {
    pub rank: f64,
}

impl CloudDivider {
    /// Profile 0 has no marker rows of its own and uses a fixed rank.
    pub fn for_profile(profile: &DepartureProfile) -> Self {
        let rank = if profile.index == 0 {
            style::PROFILE_ZERO_DIVIDER
        } else {
            profile.divider_rows as f64
        };
        CloudDivider { rank }
    }

    /// End points of the vertical divider line.
    pub fn segment(&self) -> [(f64, f64); 2] {
        [
            (self.rank, style::DIVIDER_SPAN.0),
            (self.rank, style::DIVIDER_SPAN.1),
        ]
    }

    /// The divider line cut to a y range that lies inside its span.
    pub fn segment_within(&self, y: AxisRange) -> [(f64, f64); 2] {
        let (lo, hi) = style::DIVIDER_SPAN;
        [
            (self.rank, y.min.clamp(lo, hi)),
            (self.rank, y.max.clamp(lo, hi)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Figure – everything one rendering needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// A fully resolved plot, shared by the PNG renderer and the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub summary: ObservationSummary,
    pub band: ThresholdBand,
    pub profile: DepartureProfile,
    pub divider: CloudDivider,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl Figure {
    pub fn new(summary: ObservationSummary, band: ThresholdBand, profile: DepartureProfile) -> Self {
        let divider = CloudDivider::for_profile(&profile);
        // An empty profile still gets a unit-wide axis.
        let x_range = AxisRange {
            min: 0.5,
            max: profile.len().max(1) as f64 + 0.5,
        };
        let y_range = AxisRange {
            min: style::Y_RANGE.0,
            max: style::Y_RANGE.1,
        };
        Figure {
            summary,
            band,
            profile,
            divider,
            x_range,
            y_range,
        }
    }

    /// Dump the figure as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// (ranked, raw) pairs.
    pub fn raw_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.profile
            .ranked
            .iter()
            .copied()
            .zip(self.profile.raw.iter().copied())
    }

    /// (ranked, smoothed) pairs.
    pub fn smoothed_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.profile
            .ranked
            .iter()
            .copied()
            .zip(self.profile.smoothed.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> ThresholdBand {
        ThresholdBand {
            x: [1.0, 201.0],
            lower: [-1.0, -3.0],
            upper: [1.0, 3.0],
        }
    }

    #[test]
    fn index_above_jmax_is_rejected() {
        let summary = ObservationSummary { jmax: 5.0 };
        let err = summary.check_index(6).unwrap_err();
        assert!(matches!(err, DataError::IndexOutOfRange { index: 6, .. }));
        assert_eq!(err.to_string(), "  -j  6 larger than jmax 5");
    }

    #[test]
    fn index_equal_to_jmax_is_accepted() {
        let summary = ObservationSummary { jmax: 5.0 };
        assert!(summary.check_index(5).is_ok());
        assert!(summary.check_index(0).is_ok());
    }

    #[test]
    fn band_outline_walks_lower_then_upper() {
        assert_eq!(
            band().outline(),
            vec![(1.0, -1.0), (201.0, -3.0), (201.0, 3.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn divider_is_fixed_for_profile_zero() {
        let p = DepartureProfile {
            index: 0,
            divider_rows: 17,
            ..Default::default()
        };
        assert_eq!(CloudDivider::for_profile(&p).rank, 139.0);
    }

    #[test]
    fn divider_counts_marker_rows_otherwise() {
        let p = DepartureProfile {
            index: 3,
            divider_rows: 17,
            ..Default::default()
        };
        let d = CloudDivider::for_profile(&p);
        assert_eq!(d.rank, 17.0);
        assert_eq!(d.segment(), [(17.0, -200.0), (17.0, 200.0)]);
        assert_eq!(
            d.segment_within(AxisRange { min: -10.0, max: 10.0 }),
            [(17.0, -10.0), (17.0, 10.0)]
        );
    }

    #[test]
    fn figure_x_range_follows_point_count() {
        let p = DepartureProfile {
            index: 2,
            ranked: vec![1.0, 2.0, 3.0],
            raw: vec![0.1, 0.2, 0.3],
            smoothed: vec![0.1, 0.15, 0.2],
            divider_rows: 1,
        };
        let fig = Figure::new(ObservationSummary { jmax: 4.0 }, band(), p);
        assert_eq!(fig.x_range, AxisRange { min: 0.5, max: 3.5 });
        assert_eq!(fig.y_range, AxisRange { min: -10.0, max: 10.0 });
        assert_eq!(fig.raw_points().count(), 3);
        assert_eq!(fig.smoothed_points().last(), Some((3.0, 0.2)));
    }

    #[test]
    fn empty_profile_keeps_a_usable_x_range() {
        let fig = Figure::new(
            ObservationSummary { jmax: 4.0 },
            band(),
            DepartureProfile {
                index: 4,
                ..Default::default()
            },
        );
        assert_eq!(fig.x_range, AxisRange { min: 0.5, max: 1.5 });
        assert_eq!(fig.divider.rank, 0.0);
    }

    #[test]
    fn figure_dumps_as_json() {
        let p = DepartureProfile {
            index: 1,
            ranked: vec![1.0, 2.0],
            raw: vec![0.3, -0.4],
            smoothed: vec![0.2, -0.1],
            divider_rows: 1,
        };
        let fig = Figure::new(ObservationSummary { jmax: 2.0 }, band(), p);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.json");
        fig.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["profile"]["raw"][1], -0.4);
        assert_eq!(value["divider"]["rank"], 1.0);
        assert_eq!(value["x_range"]["max"], 2.5);
    }
}
