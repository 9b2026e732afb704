//! Prediction reports and output rendering
//!
//! Global invariants enforced:
//! - Deterministic field and line ordering
//! - Byte-for-byte identical output across runs

use crate::advisory::Advisory;
use crate::band::{AqiBand, BandTable};
use crate::readings::PollutantReadings;
use crate::score::AqiScore;
use serde::Serialize;

/// Width of one band segment in the text meter
const METER_SEGMENT_WIDTH: usize = 12;

/// Outcome of scoring one set of readings
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub readings: PollutantReadings,
    /// The AQI score (field name kept for existing HTTP consumers)
    pub prediction: AqiScore,
    pub band: Option<AqiBand>,
    pub advisory: Advisory,
    pub actions: &'static [&'static str],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Render a prediction as text output
pub fn render_text(prediction: &Prediction, table: &BandTable) -> String {
    let mut output = String::new();

    output.push_str("Predicted AQI\n");
    output.push_str(&render_meter(table, Some(prediction.prediction)));
    output.push('\n');

    match &prediction.band {
        Some(band) => {
            output.push_str(&format!("{} - AQI: {}\n", band.level, prediction.prediction));
            output.push_str(&format!("{}\n", band.message));
        }
        None => {
            output.push_str(&format!("AQI: {}\n", prediction.prediction));
        }
    }

    output.push_str("\nRecommended Actions:\n");
    for action in prediction.actions {
        output.push_str(&format!("  - {}\n", action));
    }

    if !prediction.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &prediction.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

/// Render a prediction as JSON output
pub fn render_json(prediction: &Prediction) -> String {
    serde_json::to_string_pretty(prediction).unwrap_or_else(|_| "{}".to_string())
}

/// Render a one-line gauge of the band table with an optional score marker
///
/// Three lines: band labels, a `^` under the segment holding the score, and
/// each band's lower bound followed by the scale maximum.
pub fn render_meter(table: &BandTable, score: Option<AqiScore>) -> String {
    let bands = table.bands();
    let stride = METER_SEGMENT_WIDTH + 1;
    let mut labels = String::from("|");
    let mut marker = String::new();
    let mut bounds = String::new();

    for (index, band) in bands.iter().enumerate() {
        labels.push_str(&format!(
            "{:^width$}|",
            truncate(&band.level, METER_SEGMENT_WIDTH),
            width = METER_SEGMENT_WIDTH
        ));
        bounds.push_str(&format!("{:<width$}", band.min, width = stride));

        if score.is_some_and(|s| band.contains(s)) && marker.is_empty() {
            let column = index * stride + 1 + METER_SEGMENT_WIDTH / 2;
            marker = format!("{}^", " ".repeat(column));
        }
    }

    if let Some(last) = bands.last() {
        bounds.push_str(&last.max.to_string());
    }

    let mut output = String::new();
    output.push_str(&labels);
    output.push('\n');
    if !marker.is_empty() {
        output.push_str(&marker);
        output.push('\n');
    }
    output.push_str(&bounds);
    output.push('\n');
    output
}

/// Truncate string to fixed width with a trailing ellipsis
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
