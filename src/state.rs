use std::path::{Path, PathBuf};

use crate::data::model::Figure;
use crate::render;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// The figure being shown.
    pub figure: Figure,

    /// Where the batch PNG was written.
    pub output: PathBuf,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Whether the last status message reports a failure.
    pub status_is_error: bool,

    /// Snap the plot back to the figure's axis ranges on the next frame.
    pub reset_view: bool,
}

impl ViewerState {
    pub fn new(figure: Figure, output: PathBuf) -> Self {
        Self {
            figure,
            output,
            status_message: None,
            status_is_error: false,
            reset_view: true,
        }
    }

    /// Re-render the figure to another PNG and record the outcome.
    pub fn save_png(&mut self, path: &Path) {
        match render::render_png(&self.figure, path) {
            Ok(()) => {
                log::info!("Figure saved in file {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
                self.status_is_error = false;
            }
            Err(e) => {
                log::error!("Failed to save figure: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.status_is_error = true;
            }
        }
    }

    /// One-line description of the profile for the top bar.
    pub fn summary_line(&self) -> String {
        let fig = &self.figure;
        format!(
            "profile {} of {}  ·  {} channels  ·  divider at {}",
            fig.profile.index,
            fig.summary.jmax,
            fig.profile.len(),
            fig.divider.rank
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DepartureProfile, ObservationSummary, ThresholdBand};

    fn state() -> ViewerState {
        let profile = DepartureProfile {
            index: 2,
            ranked: vec![1.0, 2.0],
            raw: vec![0.1, 0.2],
            smoothed: vec![0.1, 0.1],
            divider_rows: 1,
        };
        let band = ThresholdBand {
            x: [1.0, 2.0],
            lower: [-1.0, -1.0],
            upper: [1.0, 1.0],
        };
        let figure = Figure::new(ObservationSummary { jmax: 4.0 }, band, profile);
        ViewerState::new(figure, PathBuf::from("clddet.png"))
    }

    #[test]
    fn summary_line_describes_profile() {
        assert_eq!(
            state().summary_line(),
            "profile 2 of 4  ·  2 channels  ·  divider at 1"
        );
    }

    #[test]
    fn new_state_starts_at_the_home_view() {
        assert!(state().reset_view);
    }

    #[test]
    fn failed_save_sets_error_status() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        s.save_png(&dir.path().join("missing-dir").join("out.png"));
        assert!(s.status_is_error);
        assert!(s.status_message.unwrap().starts_with("Error:"));
    }
}
