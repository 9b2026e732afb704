//! Pollutant reference data
//!
//! Display names, units, advisory input ranges and the educational copy
//! shown next to each input. The text is fixed data.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Pollutant identifier, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    No2,
    O3,
    Co,
}

/// Health impact text at low and high concentrations
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthImpacts {
    pub low: &'static str,
    pub high: &'static str,
}

/// Reference information for one pollutant
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PollutantInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    /// Advisory lower bound (input hint only)
    pub min: f64,
    /// Advisory upper bound (input hint only)
    pub max: f64,
    pub description: &'static str,
    pub sources: [&'static str; 5],
    pub measurement: &'static str,
    pub impacts: HealthImpacts,
}

const PM25: PollutantInfo = PollutantInfo {
    key: "pm25",
    name: "Particulate Matter (PM2.5)",
    unit: "μg/m³",
    min: 0.0,
    max: 500.0,
    description: "Fine particles that can penetrate deep into the lungs.",
    sources: [
        "Vehicle exhaust emissions",
        "Industrial processes and manufacturing",
        "Construction and demolition activities",
        "Agricultural operations",
        "Forest fires and burning of biomass",
    ],
    measurement: "Measured using optical particle counters or beta attenuation monitors installed at air quality monitoring stations.",
    impacts: HealthImpacts {
        low: "At low levels (0-12 μg/m³), air quality is good and poses minimal health risks.",
        high: "High levels can cause respiratory issues, heart problems, and reduced lung function. Particularly dangerous for children and elderly.",
    },
};

const NO2: PollutantInfo = PollutantInfo {
    key: "no2",
    name: "Nitrogen Dioxide (NO2)",
    unit: "ppb",
    min: 0.0,
    max: 2000.0,
    description: "A reddish-brown gas primarily from vehicle emissions and industrial processes.",
    sources: [
        "Vehicle exhaust (especially diesel)",
        "Power plants and industrial facilities",
        "Home heating systems",
        "Gas stoves and heaters",
        "Industrial boilers",
    ],
    measurement: "Monitored using chemiluminescence analyzers at air quality stations, which detect NO2 by measuring light produced from its reaction with other chemicals.",
    impacts: HealthImpacts {
        low: "Low levels indicate good air quality and healthy breathing conditions.",
        high: "Can cause inflammation of airways, reduced lung function, and increased asthma attacks. Long-term exposure may contribute to heart disease.",
    },
};

const O3: PollutantInfo = PollutantInfo {
    key: "o3",
    name: "Ozone (O3)",
    unit: "ppb",
    min: 0.0,
    max: 500.0,
    description: "Ground-level ozone formed by chemical reactions between pollutants.",
    sources: [
        "Chemical reaction between NOx and VOCs in sunlight",
        "Vehicle exhaust",
        "Industrial emissions",
        "Chemical solvents",
        "Natural sources during hot weather",
    ],
    measurement: "Measured using UV absorption photometry at monitoring stations, particularly during peak daylight hours when levels are typically highest.",
    impacts: HealthImpacts {
        low: "Natural low levels help protect Earth from harmful UV radiation.",
        high: "Can trigger chest pain, coughing, throat irritation, and congestion. Worsens bronchitis, emphysema, and asthma.",
    },
};

const CO: PollutantInfo = PollutantInfo {
    key: "co",
    name: "Carbon Monoxide (CO)",
    unit: "ppm",
    min: 0.0,
    max: 50.0,
    description: "An odorless, colorless gas from incomplete combustion.",
    sources: [
        "Vehicle exhaust in high-traffic areas",
        "Indoor sources like gas stoves and heaters",
        "Industrial processes",
        "Wildfires and agricultural burning",
        "Tobacco smoke",
    ],
    measurement: "Detected using infrared absorption spectroscopy at monitoring stations, with particular focus on urban areas and high-traffic locations.",
    impacts: HealthImpacts {
        low: "Natural background levels are not harmful to human health.",
        high: "Reduces oxygen delivery to organs and tissues. Can cause headaches, dizziness, and at very high levels, death.",
    },
};

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [Pollutant::Pm25, Pollutant::No2, Pollutant::O3, Pollutant::Co];

    pub fn info(&self) -> &'static PollutantInfo {
        match self {
            Pollutant::Pm25 => &PM25,
            Pollutant::No2 => &NO2,
            Pollutant::O3 => &O3,
            Pollutant::Co => &CO,
        }
    }

    pub fn key(&self) -> &'static str {
        self.info().key
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Pollutant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['.', '_'], "");
        Pollutant::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown pollutant: {} (expected pm25, no2, o3 or co)", s))
    }
}

/// Render reference text for one pollutant
pub fn render_info_text(pollutant: Pollutant) -> String {
    let info = pollutant.info();
    let mut output = String::new();

    output.push_str(&format!("{} ({})\n", info.name, info.unit));
    output.push_str(&format!("Range: {}-{}\n", info.min, info.max));
    output.push_str(&format!("{}\n", info.description));
    output.push_str("\nCommon Sources:\n");
    for source in info.sources {
        output.push_str(&format!("  - {}\n", source));
    }
    output.push_str("\nHow it's Measured:\n");
    output.push_str(&format!("  {}\n", info.measurement));
    output.push_str("\nHealth Impacts:\n");
    output.push_str(&format!("  Low Levels: {}\n", info.impacts.low));
    output.push_str(&format!("  High Levels: {}\n", info.impacts.high));

    output
}
