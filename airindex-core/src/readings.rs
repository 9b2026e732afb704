//! Pollutant readings supplied by the caller
//!
//! Unset inputs are zero. That default is applied here, at the boundary,
//! through `from_optional` / `from_form`, never inside the scorer.

use crate::pollutant::Pollutant;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Four pollutant concentrations for one prediction request
///
/// Values are not range-checked; see `out_of_range` for advisory warnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollutantReadings {
    /// Particulate matter 2.5 (µg/m³)
    pub pm25: f64,
    /// Nitrogen dioxide (ppb)
    pub no2: f64,
    /// Ozone (ppb)
    pub o3: f64,
    /// Carbon monoxide (ppm)
    pub co: f64,
}

impl PollutantReadings {
    pub fn new(pm25: f64, no2: f64, o3: f64, co: f64) -> Self {
        PollutantReadings { pm25, no2, o3, co }
    }

    /// Build readings where unset values count as zero
    pub fn from_optional(
        pm25: Option<f64>,
        no2: Option<f64>,
        o3: Option<f64>,
        co: Option<f64>,
    ) -> Self {
        PollutantReadings {
            pm25: pm25.unwrap_or(0.0),
            no2: no2.unwrap_or(0.0),
            o3: o3.unwrap_or(0.0),
            co: co.unwrap_or(0.0),
        }
    }

    /// Build readings from raw form text, in pm25/no2/o3/co order
    pub fn from_form(pm25: &str, no2: &str, o3: &str, co: &str) -> Result<Self> {
        Ok(PollutantReadings {
            pm25: parse_field(Pollutant::Pm25, pm25)?,
            no2: parse_field(Pollutant::No2, no2)?,
            o3: parse_field(Pollutant::O3, o3)?,
            co: parse_field(Pollutant::Co, co)?,
        })
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
        }
    }

    /// Pollutants whose reading falls outside the advisory domain
    ///
    /// NaN readings are reported too. Order follows `Pollutant::ALL`.
    pub fn out_of_range(&self) -> Vec<Pollutant> {
        Pollutant::ALL
            .into_iter()
            .filter(|p| {
                let info = p.info();
                let value = self.get(*p);
                !(info.min..=info.max).contains(&value)
            })
            .collect()
    }
}

/// Parse one form field; blank text is zero
pub fn parse_field(pollutant: Pollutant, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    trimmed
        .parse::<f64>()
        .with_context(|| format!("invalid {} value: {:?}", pollutant.key(), input))
}
