use serde::Serialize;
use utoipa::ToSchema;

use crate::Error;

/// US EPA PM2.5 breakpoint table: (concentration low, concentration high,
/// index low, index high). Concentrations in µg/m³.
const BREAKPOINTS: [(f64, f64, f64, f64); 5] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
];

/// Converts a PM2.5 concentration (µg/m³) to the US EPA Air Quality Index.
///
/// Piecewise-linear interpolation over the breakpoint table, rounded half-up
/// to the nearest integer. Concentrations on a segment boundary belong to the
/// lower segment. Beyond 250.4 µg/m³ the index keeps growing linearly from
/// 301 with the last segment's slope.
///
/// The only failure is malformed input: negative or non-finite concentration.
pub fn aqi_from_pm25(pm25: f64) -> Result<u32, Error> {
    if !pm25.is_finite() || pm25 < 0.0 {
        return Err(Error::validation(format!(
            "pm2.5 concentration must be a non-negative number, got {}",
            pm25
        )));
    }

    for (conc_low, conc_high, aqi_low, aqi_high) in BREAKPOINTS {
        if pm25 <= conc_high {
            let aqi = aqi_low + (pm25 - conc_low) / (conc_high - conc_low) * (aqi_high - aqi_low);
            return Ok(aqi.round() as u32);
        }
    }

    // Off the end of the table: extend the 201-300 segment's slope from 301
    let (conc_low, conc_high, aqi_low, aqi_high) = BREAKPOINTS[BREAKPOINTS.len() - 1];
    let slope = (aqi_high - aqi_low) / (conc_high - conc_low);
    let aqi = 301.0 + (pm25 - (conc_high + 0.1)) * slope;
    Ok(aqi.round() as u32)
}

/// EPA health-risk category for an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_index(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
