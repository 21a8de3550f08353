use std::io::Read;

use anyhow::{Context, Result, bail};

use crate::shake::{MotionSample, ShakeDetector};

/// Summary of a motion-recording replay.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReplaySummary {
    pub samples_parsed: usize,
    pub triggers: Vec<i64>,
    pub duration_ms: i64,
}

/// Parse a motion recording from any reader.
///
/// Expected header: `t_ms,x,y,z` (case-insensitive, any column order).
/// Blank rows are skipped; missing axis cells read as 0.
pub fn parse_motion_csv<R: Read>(reader: R) -> Result<Vec<MotionSample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();

    let col =
        |name: &str| -> Option<usize> { headers.iter().position(|h| h.eq_ignore_ascii_case(name)) };

    let idx_t = col("t_ms").context("Missing 't_ms' column")?;
    let idx_x = col("x").context("Missing 'x' column")?;
    let idx_y = col("y").context("Missing 'y' column")?;
    let idx_z = col("z").context("Missing 'z' column")?;

    let mut samples = Vec::new();

    for (line_num, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to parse CSV row {}", line_num + 2))?;

        let t_raw = record.get(idx_t).unwrap_or("").trim();
        if t_raw.is_empty() {
            continue; // skip blank rows
        }
        let t_ms: i64 = t_raw
            .parse()
            .with_context(|| format!("Invalid t_ms '{t_raw}' on row {}", line_num + 2))?;

        let parse_axis = |idx: usize| -> f64 {
            record
                .get(idx)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        samples.push(MotionSample {
            t_ms,
            x: parse_axis(idx_x),
            y: parse_axis(idx_y),
            z: parse_axis(idx_z),
        });
    }

    if samples.windows(2).any(|w| w[1].t_ms < w[0].t_ms) {
        bail!("Motion recording timestamps must be non-decreasing");
    }

    Ok(samples)
}

/// Replay a parsed recording through a fresh detector.
#[must_use]
pub fn replay_samples(samples: &[MotionSample]) -> ReplaySummary {
    let mut detector = ShakeDetector::default();
    let triggers: Vec<i64> = samples
        .iter()
        .filter(|s| detector.feed(s))
        .map(|s| s.t_ms)
        .collect();
    let duration_ms = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => last.t_ms - first.t_ms,
        _ => 0,
    };
    ReplaySummary {
        samples_parsed: samples.len(),
        triggers,
        duration_ms,
    }
}
