use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{
    aqi::{aqi_from_pm25, AqiCategory},
    Error,
};

/// A validated geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::validation(format!(
                "latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::validation(format!(
                "longitude must be between -180 and 180, got {}",
                longitude
            )));
        }
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }
}

/// Raw pollutant concentrations for one hour. Missing upstream values are
/// already defaulted to zero by the time this struct is built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pollutants {
    pub pm25: f64,
    pub pm10: f64,
    pub ozone: f64,
    pub nitrogen_dioxide: f64,
    pub sulphur_dioxide: f64,
    pub carbon_monoxide: f64,
    pub uv_index: f64,
}

impl Pollutants {
    /// Clamp every concentration to be non-negative and finite. Providers
    /// occasionally report small negative sensor values; those are noise.
    pub fn sanitized(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() {
                v.max(0.0)
            } else {
                0.0
            }
        }
        Pollutants {
            pm25: clamp(self.pm25),
            pm10: clamp(self.pm10),
            ozone: clamp(self.ozone),
            nitrogen_dioxide: clamp(self.nitrogen_dioxide),
            sulphur_dioxide: clamp(self.sulphur_dioxide),
            carbon_monoxide: clamp(self.carbon_monoxide),
            uv_index: clamp(self.uv_index),
        }
    }
}

/// One hourly observation or prediction.
///
/// `aqi` and `category` are always derived from `pm25`; they are never
/// supplied by a caller or stored independently.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Sample {
    /// Hour timestamp in the provider-resolved local offset
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub time: OffsetDateTime,
    pub pm25: f64,
    pub pm10: f64,
    #[serde(rename = "o3")]
    pub ozone: f64,
    #[serde(rename = "no2")]
    pub nitrogen_dioxide: f64,
    #[serde(rename = "so2")]
    pub sulphur_dioxide: f64,
    #[serde(rename = "co")]
    pub carbon_monoxide: f64,
    pub uv_index: f64,
    pub aqi: u32,
    pub category: AqiCategory,
    pub is_historical: bool,
}

impl Sample {
    pub fn new(
        time: OffsetDateTime,
        pollutants: Pollutants,
        is_historical: bool,
    ) -> Result<Self, Error> {
        let aqi = aqi_from_pm25(pollutants.pm25)?;
        Ok(Sample {
            time,
            pm25: pollutants.pm25,
            pm10: pollutants.pm10,
            ozone: pollutants.ozone,
            nitrogen_dioxide: pollutants.nitrogen_dioxide,
            sulphur_dioxide: pollutants.sulphur_dioxide,
            carbon_monoxide: pollutants.carbon_monoxide,
            uv_index: pollutants.uv_index,
            aqi,
            category: AqiCategory::from_index(aqi),
            is_historical,
        })
    }

    pub fn historical(time: OffsetDateTime, pollutants: Pollutants) -> Result<Self, Error> {
        Sample::new(time, pollutants, true)
    }

    pub fn forecast(time: OffsetDateTime, pollutants: Pollutants) -> Result<Self, Error> {
        Sample::new(time, pollutants, false)
    }
}

/// An hourly time series: strictly ascending timestamps, no duplicates.
///
/// Built fresh per request from upstream responses; never mutated in place.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Series(Vec<Sample>);

impl Series {
    /// Normalize a batch of samples into a series: deduplicate by timestamp
    /// (last write wins when a provider repeats an hour) and sort ascending.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut by_instant: BTreeMap<i64, Sample> = BTreeMap::new();
        for sample in samples {
            by_instant.insert(sample.time.unix_timestamp(), sample);
        }
        Series(by_instant.into_values().collect())
    }

    /// Combine two series, re-normalizing. Samples from `other` win on
    /// timestamp collisions.
    pub fn merge(self, other: Series) -> Series {
        let mut samples = self.0;
        samples.extend(other.0);
        Series::from_samples(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.0.first()
    }

    /// The latest sample at or before `now`
    pub fn latest_at(&self, now: OffsetDateTime) -> Option<&Sample> {
        self.0.iter().rev().find(|sample| sample.time <= now)
    }
}
