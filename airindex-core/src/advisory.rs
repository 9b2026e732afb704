//! Recommended actions for a score

use crate::score::AqiScore;
use serde::{Deserialize, Serialize};

/// Scores strictly above this select the elevated-risk actions
pub const ELEVATED_RISK_THRESHOLD: u16 = 100;

const ELEVATED_RISK_ACTIONS: [&str; 6] = [
    "Stay indoors as much as possible",
    "Use air purifiers in your home",
    "Wear N95 masks when outdoors",
    "Avoid strenuous outdoor activities",
    "Keep pets indoors",
    "Close windows and use air conditioning",
];

const ACCEPTABLE_ACTIONS: [&str; 3] = [
    "Air quality is acceptable for most activities",
    "Sensitive individuals should monitor their health",
    "Regular outdoor activities can be maintained",
];

/// Advisory set selected by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Acceptable,
    ElevatedRisk,
}

impl Advisory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Advisory::Acceptable => "acceptable",
            Advisory::ElevatedRisk => "elevated_risk",
        }
    }

    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            Advisory::Acceptable => &ACCEPTABLE_ACTIONS,
            Advisory::ElevatedRisk => &ELEVATED_RISK_ACTIONS,
        }
    }
}

pub fn advisory_for(score: AqiScore) -> Advisory {
    if score.value() > ELEVATED_RISK_THRESHOLD {
        Advisory::ElevatedRisk
    } else {
        Advisory::Acceptable
    }
}
