//! Airindex core library - AQI scoring of pollutant readings

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is pure and total (no I/O, no panics, no failure path)
// - Every score lies in [0, 500]
// - A validated band table tiles [0, 500] with no gaps or overlaps
// - No global mutable state, no randomness, clocks, threads, or async
// - Identical input yields byte-for-byte identical output

pub mod advisory;
pub mod band;
pub mod config;
pub mod pollutant;
pub mod readings;
pub mod report;
pub mod score;

pub use advisory::{advisory_for, Advisory};
pub use band::{AqiBand, BandTable};
pub use config::ResolvedConfig;
pub use pollutant::Pollutant;
pub use readings::PollutantReadings;
pub use report::{render_json, render_meter, render_text, Prediction};
pub use score::{score, AqiScore};

/// Score readings and attach the containing band and advisory set
///
/// This is the whole request path: the caller builds readings (with unset
/// fields already defaulted to zero) and renders the returned prediction.
pub fn predict(readings: PollutantReadings, bands: &BandTable) -> Prediction {
    let aqi = score(&readings);
    let band = bands.band_for(aqi).cloned();
    let warnings = readings
        .out_of_range()
        .into_iter()
        .map(|pollutant| {
            let info = pollutant.info();
            let value = readings.get(pollutant);
            tracing::warn!(
                pollutant = info.key,
                value,
                min = info.min,
                max = info.max,
                "reading outside advisory range"
            );
            format!(
                "{} value {} is outside the advisory range {}-{} {}",
                info.name, value, info.min, info.max, info.unit
            )
        })
        .collect();

    tracing::debug!(score = aqi.value(), band = ?band.as_ref().map(|b| &b.level), "scored readings");

    let advisory = advisory_for(aqi);
    Prediction {
        readings,
        prediction: aqi,
        band,
        advisory,
        actions: advisory.actions(),
        warnings,
    }
}
