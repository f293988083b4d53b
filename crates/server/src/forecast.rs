use std::f64::consts::TAU;

use log::warn;
use rand::Rng;
use serde::Serialize;
use time::{Duration, OffsetDateTime, UtcOffset};
use utoipa::ToSchema;

use crate::{
    provider::{parse_provider_time, AirQualityProvider, HourValues, HourlyResponse},
    Coordinate, Error, Pollutants, Sample, Series,
};

/// Diurnal baseline used by the synthetic fallback series (µg/m³)
const FALLBACK_BASELINE: f64 = 25.0;
const FALLBACK_AMPLITUDE: f64 = 15.0;
/// Bound on the uniform noise added to the fallback baseline
const FALLBACK_NOISE: f64 = 5.0;

/// Where a forecast series came from. Callers must never silently trust
/// synthetic data as real, so the fallback is always labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastSource {
    OpenMeteo,
    Fallback,
}

impl std::fmt::Display for ForecastSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastSource::OpenMeteo => write!(f, "open-meteo"),
            ForecastSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A forward-looking series plus the current snapshot it was anchored to
#[derive(Debug, Clone)]
pub struct Forecast {
    pub series: Series,
    pub current: Option<Sample>,
    pub source: ForecastSource,
}

/// Fetch the next `hours_ahead` hours of forecast samples.
///
/// Never fails on upstream problems: connection failures, timeouts and
/// non-2xx responses all degrade to a deterministic-shaped synthetic series
/// labeled `ForecastSource::Fallback`. The only hard failure is malformed
/// input.
pub async fn fetch_forecast(
    provider: &dyn AirQualityProvider,
    coord: Coordinate,
    hours_ahead: u8,
) -> Result<Forecast, Error> {
    if !(1..=24).contains(&hours_ahead) {
        return Err(Error::validation(format!(
            "hours_ahead must be between 1 and 24, got {}",
            hours_ahead
        )));
    }

    let now = OffsetDateTime::now_utc();
    match provider.current_and_forecast(coord, hours_ahead).await {
        Ok(response) => Ok(assemble(&response, hours_ahead, now)),
        Err(err) => {
            warn!(
                "forecast provider unavailable, serving synthetic series: {}",
                err
            );
            Ok(Forecast {
                series: synthetic_series(hours_ahead, now),
                current: None,
                source: ForecastSource::Fallback,
            })
        }
    }
}

/// Shape a provider response into an hours-ahead series. For offset `i` the
/// hourly value at index `i` is used when present; otherwise the current
/// snapshot is carried forward. A missing pm10 defaults to 1.5 x pm25.
pub(crate) fn assemble(response: &HourlyResponse, hours_ahead: u8, now: OffsetDateTime) -> Forecast {
    let offset = UtcOffset::from_whole_seconds(response.utc_offset_seconds)
        .unwrap_or(UtcOffset::UTC);
    let base = truncate_to_hour(now.to_offset(offset));
    let current_values = response
        .current
        .as_ref()
        .map(HourValues::from)
        .unwrap_or_default();

    let mut samples = Vec::with_capacity(hours_ahead as usize);
    for i in 1..=hours_ahead {
        let timestamp = base + Duration::hours(i as i64);
        let hour = response.hourly.get(i as usize).or(current_values);
        let pollutants = pollutants_with_pm10_default(hour);
        match Sample::forecast(timestamp, pollutants) {
            Ok(sample) => samples.push(sample),
            Err(err) => warn!("skipping forecast hour +{}: {}", i, err),
        }
    }

    let current = current_sample(response, base);
    Forecast {
        series: Series::from_samples(samples),
        current,
        source: ForecastSource::OpenMeteo,
    }
}

fn pollutants_with_pm10_default(hour: HourValues) -> Pollutants {
    let pm25 = hour.pm2_5.unwrap_or(0.0);
    Pollutants {
        pm25,
        pm10: hour.pm10.unwrap_or(pm25 * 1.5),
        ozone: hour.ozone.unwrap_or(0.0),
        nitrogen_dioxide: hour.nitrogen_dioxide.unwrap_or(0.0),
        sulphur_dioxide: hour.sulphur_dioxide.unwrap_or(0.0),
        carbon_monoxide: hour.carbon_monoxide.unwrap_or(0.0),
        uv_index: hour.uv_index.unwrap_or(0.0),
    }
    .sanitized()
}

/// The "now" sample from the provider's current snapshot, if it sent one
fn current_sample(response: &HourlyResponse, base: OffsetDateTime) -> Option<Sample> {
    let current = response.current.as_ref()?;
    let timestamp = current
        .time
        .as_deref()
        .and_then(|raw| parse_provider_time(raw, response.utc_offset_seconds).ok())
        .unwrap_or(base);
    let pollutants = pollutants_with_pm10_default(HourValues::from(current));
    Sample::historical(timestamp, pollutants).ok()
}

/// Approximation for availability, not a forecast: a diurnal sine-wave
/// baseline plus bounded noise, clamped non-negative.
fn synthetic_series(hours_ahead: u8, now: OffsetDateTime) -> Series {
    let base = truncate_to_hour(now);
    let mut rng = rand::thread_rng();

    let samples = (1..=hours_ahead)
        .filter_map(|i| {
            let diurnal = FALLBACK_BASELINE + FALLBACK_AMPLITUDE * (TAU * i as f64 / 24.0).sin();
            let noise = rng.gen_range(-FALLBACK_NOISE..=FALLBACK_NOISE);
            let pm25 = (diurnal + noise).max(0.0);
            let pollutants = Pollutants {
                pm25,
                pm10: pm25 * 1.5,
                ..Default::default()
            };
            Sample::forecast(base + Duration::hours(i as i64), pollutants).ok()
        })
        .collect();

    Series::from_samples(samples)
}

fn truncate_to_hour(datetime: OffsetDateTime) -> OffsetDateTime {
    datetime
        .replace_minute(0)
        .and_then(|d| d.replace_second(0))
        .and_then(|d| d.replace_nanosecond(0))
        .unwrap_or(datetime)
}
