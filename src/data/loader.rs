use std::path::Path;

use anyhow::{Context, Result};

use super::error::DataError;
use super::model::{DepartureProfile, Figure, ObservationSummary, ThresholdBand};

/// Default departures file, looked up in the working directory.
pub const DEFAULT_INPUT: &str = "clddet_sorted_smoothed.dat";

/// Number of "bt" lines the threshold block needs.
const THRESHOLD_LINES: usize = 5;
/// 1-based inclusive character columns holding the threshold numbers.
const THRESHOLD_COLUMNS: (usize, usize) = (3, 21);

// 1-based whitespace column numbers of a data row.
const COL_RANKED: usize = 5;
const COL_RAW: usize = 6;
const COL_SMOOTHED: usize = 8;
const COL_PROFILE: usize = 9;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Run the full extraction for one profile.
///
/// Order matters: a missing file or an out-of-range index surface as bare
/// [`DataError`]s so the caller can map them to exit codes.
pub fn load(path: &Path, index: u32) -> Result<Figure> {
    ensure_input(path)?;
    log::info!("{} exists", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let summary = parse_summary(&text).context("reading observation summary")?;
    log::info!("jmax = {}", summary.jmax);

    let band = parse_thresholds(&text).context("reading O-B thresholds")?;
    log::debug!("threshold band: {band:?}");

    summary.check_index(index)?;

    let profile = parse_profile(&text, index)
        .with_context(|| format!("reading profile {index}"))?;
    if profile.is_empty() {
        log::warn!("profile {index} has no rows");
    }
    log::info!(
        "profile {index}: {} channels, {} divider rows",
        profile.len(),
        profile.divider_rows
    );

    Ok(Figure::new(summary, band, profile))
}

/// Fail with [`DataError::MissingInput`] when `path` does not exist.
pub fn ensure_input(path: &Path) -> Result<(), DataError> {
    if !path.exists() {
        return Err(DataError::MissingInput(path.to_path_buf()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Extraction steps
// ---------------------------------------------------------------------------

/// Convert newline-separated numeric output into a float list, skipping
/// blank lines.
pub fn parse_float_list(output: &str) -> Result<Vec<f64>, DataError> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(parse_number)
        .collect()
}

/// Take `jmax` from the fourth word of the first line mentioning
/// "observations".
pub fn parse_summary(text: &str) -> Result<ObservationSummary, DataError> {
    let line = text
        .lines()
        .find(|l| l.contains("observations"))
        .ok_or(DataError::MissingSummary)?;
    log::debug!("summary line: {line:?}");

    let jmax = line
        .split_whitespace()
        .nth(3)
        .and_then(|w| w.parse::<f64>().ok())
        .ok_or_else(|| DataError::MalformedSummary {
            line: line.to_string(),
        })?;

    Ok(ObservationSummary { jmax })
}

/// Build the threshold band from the "bt" lines.
///
/// Lines 0 and 1 hold (x, lower), line 2 is skipped, lines 3 and 4 hold
/// (x, upper). The band's x positions come from lines 0 and 1.
pub fn parse_thresholds(text: &str) -> Result<ThresholdBand, DataError> {
    let lines: Vec<&str> = text.lines().filter(|l| l.contains("bt")).collect();
    if lines.len() < THRESHOLD_LINES {
        return Err(DataError::TooFewThresholdLines {
            expected: THRESHOLD_LINES,
            found: lines.len(),
        });
    }

    let l0 = threshold_pair(lines[0])?;
    let l1 = threshold_pair(lines[1])?;
    let l3 = threshold_pair(lines[3])?;
    let l4 = threshold_pair(lines[4])?;

    Ok(ThresholdBand {
        x: [l0.0, l1.0],
        lower: [l0.1, l1.1],
        upper: [l3.1, l4.1],
    })
}

fn threshold_pair(line: &str) -> Result<(f64, f64), DataError> {
    let (first, last) = THRESHOLD_COLUMNS;
    let slice: String = line.chars().skip(first - 1).take(last - first + 1).collect();

    let malformed = || DataError::MalformedThreshold {
        line: line.to_string(),
    };
    let mut words = slice.split_whitespace();
    let x = words.next().ok_or_else(malformed)?;
    let t = words.next().ok_or_else(malformed)?;
    if words.next().is_some() {
        return Err(malformed());
    }
    let x = x.parse::<f64>().map_err(|_| malformed())?;
    let t = t.parse::<f64>().map_err(|_| malformed())?;
    Ok((x, t))
}

/// Collect columns 5, 6 and 8 of every row whose column 9 equals `index`,
/// and count the rows whose trailing marker is the literal `0`.
pub fn parse_profile(text: &str, index: u32) -> Result<DepartureProfile, DataError> {
    Ok(DepartureProfile {
        index,
        ranked: parse_float_list(&column_listing(text, index, COL_RANKED))?,
        raw: parse_float_list(&column_listing(text, index, COL_RAW))?,
        smoothed: parse_float_list(&column_listing(text, index, COL_SMOOTHED))?,
        divider_rows: profile_rows(text, index)
            .filter(|fields| fields.last() == Some(&"0"))
            .count(),
    })
}

/// One value per line: column `column` (1-based) of each row of profile
/// `index`.
pub fn column_listing(text: &str, index: u32, column: usize) -> String {
    let mut out = String::new();
    for fields in profile_rows(text, index) {
        if let Some(v) = fields.get(column - 1) {
            out.push_str(v);
            out.push('\n');
        }
    }
    out
}

/// Whitespace-split rows with at least 9 columns whose column 9 equals
/// `index` numerically.
fn profile_rows(text: &str, index: u32) -> impl Iterator<Item = Vec<&str>> + '_ {
    let wanted = f64::from(index);
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(move |fields| {
            fields.len() >= COL_PROFILE
                && fields[COL_PROFILE - 1].parse::<f64>().ok() == Some(wanted)
        })
}

fn parse_number(tok: &str) -> Result<f64, DataError> {
    tok.parse::<f64>().map_err(|_| DataError::NotANumber {
        value: tok.to_string(),
    })
}
