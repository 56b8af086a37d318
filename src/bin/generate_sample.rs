//! Writes a synthetic `clddet_sorted_smoothed.dat` for demos and manual checks.
//!
//! Usage: `generate_sample [OUTPUT] [JMAX] [--seed N]`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const CHANNELS: usize = 200;
const SMOOTH_HALF_WIDTH: usize = 3;
const NOISE_STD: f64 = 0.6;

#[derive(Parser, Debug)]
#[command(about = "Write a synthetic cloud-detection departures file", long_about = None)]
struct Args {
    /// File to write
    #[arg(default_value = "clddet_sorted_smoothed.dat")]
    output: PathBuf,

    /// Largest profile index; profiles 0..=JMAX are written
    #[arg(default_value_t = 6)]
    jmax: u32,

    /// Seed for the departure noise
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Clear channels scatter around zero; below the cloud top the departure
/// grows increasingly negative.
fn raw_departures(cloud_top: usize, noise: &Normal<f64>, rng: &mut StdRng) -> Vec<f64> {
    (1..=CHANNELS)
        .map(|rank| {
            let cloud = if rank > cloud_top {
                -0.08 * (rank - cloud_top) as f64
            } else {
                0.0
            };
            cloud + noise.sample(&mut *rng)
        })
        .collect()
}

/// Centred running mean.
fn smooth(values: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(SMOOTH_HALF_WIDTH);
            let hi = (i + SMOOTH_HALF_WIDTH + 1).min(values.len());
            values[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let jmax = args.jmax;
    let output_path = args.output.display();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let noise = Normal::new(0.0, NOISE_STD).map_err(|e| anyhow!("noise model: {e}"))?;
    let file = File::create(&args.output)
        .with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# Cloud detection: O-B departures ranked by channel height, smoothed")?;
    writeln!(out, "number of observations {jmax}")?;

    // Columns 3-21 carry (ranked index, threshold).
    let thresholds = [
        (1.0, -0.75, "lower threshold, first channel"),
        (CHANNELS as f64, -1.50, "lower threshold, last channel"),
        (0.0, 0.0, "----------------"),
        (1.0, 0.75, "upper threshold, first channel"),
        (CHANNELS as f64, 1.50, "upper threshold, last channel"),
    ];
    for (x, t, note) in thresholds {
        writeln!(out, "# {x:>7.2}  {t:>8.3}   bt {note}")?;
    }
    writeln!(
        out,
        "# seq  chan  wavenumber  pos  rank  raw  height  smoothed  profile  flag"
    )?;

    let mut rows = 0usize;
    for j in 0..=jmax {
        let cloud_top = 40 + (j as usize * 23) % 140;
        let raw = raw_departures(cloud_top, &noise, &mut rng);
        let smoothed = smooth(&raw);

        for (i, (r, s)) in raw.iter().zip(&smoothed).enumerate() {
            let rank = i + 1;
            let chan = 100 + (rank * 37) % CHANNELS;
            let wavenumber = 650.0 + chan as f64 * 1.25;
            let height = 1000.0 - 4.5 * rank as f64;
            let flag = u8::from(rank > cloud_top);
            writeln!(
                out,
                "{:>6} {:>5} {:>10.3} {:>4} {:>4} {:>8.3} {:>8.2} {:>8.3} {:>4} {}",
                rows + 1,
                chan,
                wavenumber,
                chan - 99,
                rank,
                r,
                height,
                s,
                j,
                flag
            )?;
            rows += 1;
        }
    }
    out.flush()?;

    println!(
        "Wrote {} profiles ({CHANNELS} channels each) to {output_path}",
        jmax + 1
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments_default() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.output, PathBuf::from("clddet_sorted_smoothed.dat"));
        assert_eq!(args.jmax, 6);

        let args = Args::try_parse_from(["generate_sample", "out.dat", "3"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.dat"));
        assert_eq!(args.jmax, 3);
    }

    #[test]
    fn smoothing_keeps_length_and_constant_series() {
        let s = smooth(&[2.0; 10]);
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn cloudy_channels_drift_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, NOISE_STD).unwrap();
        let raw = raw_departures(50, &noise, &mut rng);
        let tail: f64 = raw[180..].iter().sum::<f64>() / 20.0;
        assert!(tail < -5.0);
    }
}
