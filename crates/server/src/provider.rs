use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::{Coordinate, Error, Pollutants};

/// Pollutant fields requested from the provider, in its naming scheme
const HOURLY_FIELDS: &str =
    "pm2_5,pm10,carbon_monoxide,nitrogen_dioxide,ozone,sulphur_dioxide,uv_index";

/// Hourly pollutant arrays, aligned to the `time` array. The provider emits
/// `null` for hours it has no reading for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pub pm10: Vec<Option<f64>>,
    #[serde(default)]
    pub carbon_monoxide: Vec<Option<f64>>,
    #[serde(default)]
    pub nitrogen_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    pub ozone: Vec<Option<f64>>,
    #[serde(default)]
    pub sulphur_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
}

/// Pollutant readings for a single hour offset, each possibly absent
#[derive(Debug, Clone, Copy, Default)]
pub struct HourValues {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub ozone: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub uv_index: Option<f64>,
}

impl HourValues {
    /// Field-wise fallback: take `self` where present, `other` otherwise
    pub fn or(self, other: HourValues) -> HourValues {
        HourValues {
            pm2_5: self.pm2_5.or(other.pm2_5),
            pm10: self.pm10.or(other.pm10),
            carbon_monoxide: self.carbon_monoxide.or(other.carbon_monoxide),
            nitrogen_dioxide: self.nitrogen_dioxide.or(other.nitrogen_dioxide),
            ozone: self.ozone.or(other.ozone),
            sulphur_dioxide: self.sulphur_dioxide.or(other.sulphur_dioxide),
            uv_index: self.uv_index.or(other.uv_index),
        }
    }
}

impl HourlyBlock {
    fn value(column: &[Option<f64>], index: usize) -> Option<f64> {
        column.get(index).copied().flatten()
    }

    pub fn get(&self, index: usize) -> HourValues {
        HourValues {
            pm2_5: Self::value(&self.pm2_5, index),
            pm10: Self::value(&self.pm10, index),
            carbon_monoxide: Self::value(&self.carbon_monoxide, index),
            nitrogen_dioxide: Self::value(&self.nitrogen_dioxide, index),
            ozone: Self::value(&self.ozone, index),
            sulphur_dioxide: Self::value(&self.sulphur_dioxide, index),
            uv_index: Self::value(&self.uv_index, index),
        }
    }

    /// Readings for one hour with every absent value defaulted to zero
    pub fn pollutants_at(&self, index: usize) -> Pollutants {
        let hour = self.get(index);
        Pollutants {
            pm25: hour.pm2_5.unwrap_or(0.0),
            pm10: hour.pm10.unwrap_or(0.0),
            ozone: hour.ozone.unwrap_or(0.0),
            nitrogen_dioxide: hour.nitrogen_dioxide.unwrap_or(0.0),
            sulphur_dioxide: hour.sulphur_dioxide.unwrap_or(0.0),
            carbon_monoxide: hour.carbon_monoxide.unwrap_or(0.0),
            uv_index: hour.uv_index.unwrap_or(0.0),
        }
        .sanitized()
    }
}

/// The provider's "current conditions" snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub time: Option<String>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub ozone: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub uv_index: Option<f64>,
}

impl From<&CurrentBlock> for HourValues {
    fn from(current: &CurrentBlock) -> Self {
        HourValues {
            pm2_5: current.pm2_5,
            pm10: current.pm10,
            carbon_monoxide: current.carbon_monoxide,
            nitrogen_dioxide: current.nitrogen_dioxide,
            ozone: current.ozone,
            sulphur_dioxide: current.sulphur_dioxide,
            uv_index: current.uv_index,
        }
    }
}

/// One provider response: hourly arrays keyed by pollutant name aligned to a
/// `time` array, plus an optional current snapshot. Any provider exposing
/// this shape is interchangeable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyResponse {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub hourly: HourlyBlock,
    #[serde(default)]
    pub current: Option<CurrentBlock>,
}

/// Parse a provider timestamp into the response's UTC offset.
///
/// The provider emits minute-precision local timestamps ("2025-10-04T15:00")
/// when resolving the timezone itself; RFC 3339 is accepted as well.
pub fn parse_provider_time(raw: &str, utc_offset_seconds: i32) -> Result<OffsetDateTime, Error> {
    let minute_format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(naive) = PrimitiveDateTime::parse(raw, minute_format) {
        let offset = UtcOffset::from_whole_seconds(utc_offset_seconds)
            .map_err(|e| Error::upstream(format!("invalid provider utc offset: {}", e)))?;
        return Ok(naive.assume_offset(offset));
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| Error::upstream(format!("unparsable provider timestamp '{}': {}", raw, e)))
}

/// The upstream hourly air-quality data source.
///
/// Implementations make exactly one network call per invocation and never
/// retry; a failure surfaces immediately as `Error::Upstream`.
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Hourly pollutant series for a coordinate and inclusive date range
    async fn hourly_range(
        &self,
        coord: Coordinate,
        start: Date,
        end: Date,
    ) -> Result<HourlyResponse, Error>;

    /// Current snapshot plus hourly values for the next `hours` hours
    async fn current_and_forecast(
        &self,
        coord: Coordinate,
        hours: u8,
    ) -> Result<HourlyResponse, Error>;
}

/// Open-Meteo air-quality API client
pub struct OpenMeteo {
    client: Client,
    base_url: String,
    forecast_timeout: Duration,
    historical_timeout: Duration,
}

impl OpenMeteo {
    pub fn new(base_url: String, forecast_timeout: Duration, historical_timeout: Duration) -> Self {
        OpenMeteo {
            client: Client::new(),
            base_url,
            forecast_timeout,
            historical_timeout,
        }
    }

    async fn fetch(
        &self,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HourlyResponse, Error> {
        debug!("provider request: {} {:?}", self.base_url, query);
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<HourlyResponse>()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl AirQualityProvider for OpenMeteo {
    async fn hourly_range(
        &self,
        coord: Coordinate,
        start: Date,
        end: Date,
    ) -> Result<HourlyResponse, Error> {
        let date_format = format_description!("[year]-[month]-[day]");
        let start_date = start
            .format(&date_format)
            .map_err(|e| Error::validation(format!("unformattable start_date: {}", e)))?;
        let end_date = end
            .format(&date_format)
            .map_err(|e| Error::validation(format!("unformattable end_date: {}", e)))?;

        let query = [
            ("latitude", coord.latitude.to_string()),
            ("longitude", coord.longitude.to_string()),
            ("start_date", start_date),
            ("end_date", end_date),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.fetch(&query, self.historical_timeout).await
    }

    async fn current_and_forecast(
        &self,
        coord: Coordinate,
        hours: u8,
    ) -> Result<HourlyResponse, Error> {
        let query = [
            ("latitude", coord.latitude.to_string()),
            ("longitude", coord.longitude.to_string()),
            ("current", HOURLY_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("forecast_hours", (hours as u16 + 1).to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.fetch(&query, self.forecast_timeout).await
    }
}
