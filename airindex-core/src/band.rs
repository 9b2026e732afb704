//! AQI severity bands
//!
//! Global invariants enforced:
//! - A BandTable can only be built from bands that tile [0, 500] exactly
//! - Lookup is a linear scan; the first containing band wins

use crate::score::{AqiScore, MAX_SCORE, MIN_SCORE};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One contiguous range of the AQI scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AqiBand {
    pub level: String,
    /// Inclusive lower bound
    pub min: u16,
    /// Inclusive upper bound
    pub max: u16,
    /// Display color as `#rrggbb`
    pub color: String,
    pub message: String,
}

impl AqiBand {
    pub fn new(level: &str, min: u16, max: u16, color: &str, message: &str) -> Self {
        AqiBand {
            level: level.to_string(),
            min,
            max,
            color: color.to_string(),
            message: message.to_string(),
        }
    }

    pub fn contains(&self, score: AqiScore) -> bool {
        (self.min..=self.max).contains(&score.value())
    }
}

/// Canonical six-level scale: (level, min, max, color, message)
const CANONICAL_BANDS: [(&str, u16, u16, &str, &str); 6] = [
    (
        "Good",
        0,
        50,
        "#00e400",
        "Air quality is satisfactory, and air pollution poses little or no risk.",
    ),
    (
        "Moderate",
        51,
        100,
        "#ffff00",
        "Air quality is acceptable. However, there may be a risk for some people, particularly those who are unusually sensitive to air pollution.",
    ),
    (
        "Unhealthy for Sensitive Groups",
        101,
        150,
        "#ff7e00",
        "Members of sensitive groups may experience health effects. The general public is less likely to be affected.",
    ),
    (
        "Unhealthy",
        151,
        200,
        "#ff0000",
        "Some members of the general public may experience health effects; members of sensitive groups may experience more serious health effects.",
    ),
    (
        "Very Unhealthy",
        201,
        300,
        "#8f3f97",
        "Health alert: The risk of health effects is increased for everyone.",
    ),
    (
        "Hazardous",
        301,
        500,
        "#7e0023",
        "Health warning of emergency conditions: everyone is more likely to be affected.",
    ),
];

/// Ordered, validated set of bands covering [0, 500]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BandTable {
    bands: Vec<AqiBand>,
}

impl BandTable {
    /// The canonical Good..Hazardous table
    pub fn canonical() -> Self {
        BandTable {
            bands: CANONICAL_BANDS
                .iter()
                .map(|&(level, min, max, color, message)| AqiBand::new(level, min, max, color, message))
                .collect(),
        }
    }

    /// Build a table from caller-supplied bands, checking the tiling invariant
    pub fn new(bands: Vec<AqiBand>) -> Result<Self> {
        validate_bands(&bands)?;
        Ok(BandTable { bands })
    }

    pub fn bands(&self) -> &[AqiBand] {
        &self.bands
    }

    /// Most severe band (last in table order)
    pub fn most_severe(&self) -> Option<&AqiBand> {
        self.bands.last()
    }

    /// Find the band containing `score`
    ///
    /// Never None for a validated table; the Option keeps the miss observable.
    pub fn band_for(&self, score: AqiScore) -> Option<&AqiBand> {
        let found = self.bands.iter().find(|band| band.contains(score));
        debug_assert!(found.is_some(), "no band contains AQI score {}", score);
        found
    }

    /// Lookup by raw integer; None outside [0, 500]
    pub fn band_for_value(&self, value: i64) -> Option<&AqiBand> {
        let score = u16::try_from(value).ok().and_then(AqiScore::new)?;
        self.band_for(score)
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Check that bands tile [0, 500] in order with well-formed fields
pub fn validate_bands(bands: &[AqiBand]) -> Result<()> {
    let Some(first) = bands.first() else {
        anyhow::bail!("band table must contain at least one band");
    };
    if first.min != MIN_SCORE {
        anyhow::bail!(
            "first band {:?} must start at {} (got {})",
            first.level,
            MIN_SCORE,
            first.min
        );
    }

    for (index, band) in bands.iter().enumerate() {
        if band.level.trim().is_empty() {
            anyhow::bail!("band {} has an empty level name", index);
        }
        if band.min > band.max {
            anyhow::bail!(
                "band {:?} has min {} greater than max {}",
                band.level,
                band.min,
                band.max
            );
        }
        if !is_hex_color(&band.color) {
            anyhow::bail!(
                "band {:?} color must be #rrggbb (got {:?})",
                band.level,
                band.color
            );
        }
    }

    for pair in bands.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if u32::from(prev.max) + 1 != u32::from(next.min) {
            anyhow::bail!(
                "band {:?} must start at {} directly after {:?} (got {})",
                next.level,
                u32::from(prev.max) + 1,
                prev.level,
                next.min
            );
        }
    }

    // first exists, so last does too
    if let Some(last) = bands.last() {
        if last.max != MAX_SCORE {
            anyhow::bail!(
                "last band {:?} must end at {} (got {})",
                last.level,
                MAX_SCORE,
                last.max
            );
        }
    }

    Ok(())
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// What the AQI is, shown ahead of the band table
pub const AQI_OVERVIEW: &str = "The Air Quality Index (AQI) is a standardized indicator of air quality levels. It helps you understand how clean or polluted your air is, and what associated health effects might be a concern.";

/// Warning about prolonged exposure to high AQI levels
pub const HIGH_AQI_HEALTH_WARNING: &str = "High AQI levels can lead to respiratory issues like asthma and bronchitis, and an increased risk of cardiovascular disorders like heart attacks and strokes, especially in those exposed to contaminated air.";

/// Render the introductory AQI text with its health warning
pub fn render_overview_text() -> String {
    let mut output = String::new();
    output.push_str("What is Air Quality Index (AQI)?\n");
    output.push_str(&format!("{}\n\n", AQI_OVERVIEW));
    output.push_str(&format!("Warning: {}\n", HIGH_AQI_HEALTH_WARNING));
    output
}

/// Render the band table as text, one band per paragraph
pub fn render_bands_text(table: &BandTable) -> String {
    let mut output = String::new();
    for band in table.bands() {
        output.push_str(&format!("{} ({}-{})\n", band.level, band.min, band.max));
        output.push_str(&format!("  {}\n", band.message));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn band_level(value: u16) -> String {
        let table = BandTable::canonical();
        table
            .band_for(AqiScore::new(value).unwrap())
            .unwrap()
            .level
            .clone()
    }

    #[test]
    fn test_canonical_table_is_valid() {
        let table = BandTable::canonical();
        validate_bands(table.bands()).unwrap();
        assert_eq!(table.bands().len(), 6);
    }

    #[test]
    fn test_canonical_cutoffs() {
        let bounds: Vec<(u16, u16)> = BandTable::canonical()
            .bands()
            .iter()
            .map(|b| (b.min, b.max))
            .collect();
        assert_eq!(
            bounds,
            vec![(0, 50), (51, 100), (101, 150), (151, 200), (201, 300), (301, 500)]
        );
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band_level(0), "Good");
        assert_eq!(band_level(50), "Good");
        assert_eq!(band_level(51), "Moderate");
        assert_eq!(band_level(60), "Moderate");
        assert_eq!(band_level(100), "Moderate");
        assert_eq!(band_level(101), "Unhealthy for Sensitive Groups");
        assert_eq!(band_level(151), "Unhealthy");
        assert_eq!(band_level(201), "Very Unhealthy");
        assert_eq!(band_level(300), "Very Unhealthy");
        assert_eq!(band_level(301), "Hazardous");
        assert_eq!(band_level(500), "Hazardous");
    }

    #[test]
    fn test_max_score_is_most_severe() {
        let table = BandTable::canonical();
        let top = table.band_for(AqiScore::new(500).unwrap()).unwrap();
        assert_eq!(Some(top), table.most_severe());
    }

    #[test]
    fn test_band_for_value_outside_scale() {
        let table = BandTable::canonical();
        assert!(table.band_for_value(-1).is_none());
        assert!(table.band_for_value(501).is_none());
        assert_eq!(table.band_for_value(75).unwrap().level, "Moderate");
    }

    #[test]
    fn test_custom_table() {
        let table = BandTable::new(vec![
            AqiBand::new("Clean", 0, 249, "#00ff00", "Fine."),
            AqiBand::new("Dirty", 250, 500, "#ff0000", "Not fine."),
        ])
        .unwrap();
        assert_eq!(table.band_for_value(249).unwrap().level, "Clean");
        assert_eq!(table.band_for_value(250).unwrap().level, "Dirty");
    }

    #[test]
    fn test_reject_empty_table() {
        assert!(BandTable::new(vec![]).is_err());
    }

    #[test]
    fn test_reject_gap() {
        let err = BandTable::new(vec![
            AqiBand::new("A", 0, 100, "#000000", ""),
            AqiBand::new("B", 102, 500, "#000000", ""),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("must start at 101"));
    }

    #[test]
    fn test_reject_overlap() {
        assert!(BandTable::new(vec![
            AqiBand::new("A", 0, 100, "#000000", ""),
            AqiBand::new("B", 100, 500, "#000000", ""),
        ])
        .is_err());
    }

    #[test]
    fn test_reject_short_coverage() {
        assert!(BandTable::new(vec![AqiBand::new("A", 0, 499, "#000000", "")]).is_err());
        assert!(BandTable::new(vec![AqiBand::new("A", 1, 500, "#000000", "")]).is_err());
    }

    #[test]
    fn test_reject_inverted_band() {
        assert!(BandTable::new(vec![
            AqiBand::new("A", 0, 10, "#000000", ""),
            AqiBand::new("B", 11, 5, "#000000", ""),
            AqiBand::new("C", 6, 500, "#000000", ""),
        ])
        .is_err());
    }

    #[test]
    fn test_reject_bad_color_and_level() {
        assert!(BandTable::new(vec![AqiBand::new("A", 0, 500, "green", "")]).is_err());
        assert!(BandTable::new(vec![AqiBand::new("A", 0, 500, "#12345g", "")]).is_err());
        assert!(BandTable::new(vec![AqiBand::new(" ", 0, 500, "#123456", "")]).is_err());
    }

    #[test]
    fn test_render_bands_text() {
        let text = render_bands_text(&BandTable::canonical());
        assert!(text.starts_with("Good (0-50)\n  Air quality is satisfactory"));
        assert!(text.contains("Hazardous (301-500)\n"));
    }

    #[test]
    fn test_render_overview_text() {
        let text = render_overview_text();
        assert!(text.starts_with("What is Air Quality Index (AQI)?\nThe Air Quality Index (AQI) is a standardized indicator"));
        assert!(text.contains("Warning: High AQI levels can lead to respiratory issues like asthma and bronchitis"));
        assert!(text.ends_with("especially in those exposed to contaminated air.\n"));
    }

    proptest! {
        /// Property: every score on the scale is in exactly one canonical band.
        #[test]
        fn every_score_in_exactly_one_band(value in 0u16..=500) {
            let table = BandTable::canonical();
            let score = AqiScore::new(value).unwrap();
            let matches = table.bands().iter().filter(|b| b.contains(score)).count();
            prop_assert_eq!(matches, 1);
        }
    }
}
