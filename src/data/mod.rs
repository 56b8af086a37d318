/// Data layer: error type, core types, and extraction.
///
/// Architecture:
/// ```text
///  clddet_sorted_smoothed.dat
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  summary line, "bt" lines, profile rows → Figure
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Figure   │  band + profile + divider + axis ranges
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///    render (PNG)    viewer (egui)
/// ```

pub mod error;
pub mod loader;
pub mod model;
