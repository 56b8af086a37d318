use eframe::egui::Color32;
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Fixed visual encoding shared by the PNG renderer and the viewer
// ---------------------------------------------------------------------------

/// PNG canvas in pixels (6.4 x 4.8 in at 100 dpi).
pub const CANVAS: (u32, u32) = (640, 480);

/// Departure axis range in kelvin.
pub const Y_RANGE: (f64, f64) = (-10.0, 10.0);

/// Vertical extent of the divider line before clipping.
pub const DIVIDER_SPAN: (f64, f64) = (-200.0, 200.0);

/// Divider rank used for profile 0.
pub const PROFILE_ZERO_DIVIDER: f64 = 139.0;

pub const X_LABEL: &str = "Ranked channel index";
pub const Y_LABEL: &str = "Departure [K]";

pub const BAND_LABEL: &str = "Thresholds";
pub const RAW_LABEL: &str = "Raw data";
pub const SMOOTHED_LABEL: &str = "Smoothed";
pub const DIVIDER_LABEL: &str = "Cloud divider";

pub const BAND_ALPHA: f64 = 0.5;
pub const MARKER_RADIUS: u32 = 2;
pub const LINE_WIDTH: u32 = 1;
/// Dash and gap length of the divider, in pixels.
pub const DASH: (u32, u32) = (6, 4);

/// Plain 8-bit RGB triple convertible into either backend's colour type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const GRAY: Rgb = Rgb(128, 128, 128);

impl Rgb {
    pub fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.0, self.1, self.2)
    }

    /// Premultiplied egui colour at the given opacity.
    pub fn to_color32_alpha(self, alpha: f64) -> Color32 {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.0, self.1, self.2, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_convert_to_both_backends() {
        assert_eq!(RED.to_plotters(), RGBColor(255, 0, 0));
        assert_eq!(GRAY.to_color32(), Color32::from_rgb(128, 128, 128));
        assert_eq!(BLACK.to_color32_alpha(1.0), Color32::BLACK);
        assert_eq!(GRAY.to_color32_alpha(0.5).a(), 128);
    }
}
