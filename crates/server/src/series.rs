use time::OffsetDateTime;

use crate::{
    forecast::{fetch_forecast, Forecast, ForecastSource},
    history::fetch_historical,
    provider::AirQualityProvider,
    Coordinate, Error, Sample, Series,
};

/// A combined today-so-far plus next-24-hours view of one location
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    pub series: Series,
    pub current: Option<Sample>,
    pub source: ForecastSource,
}

/// Fetch history and forecast concurrently and stitch them into one
/// chronological series.
///
/// A history failure is fatal; the forecast leg degrades internally to its
/// synthetic fallback, so it can only fail on invalid input.
pub async fn get_series(
    provider: &dyn AirQualityProvider,
    coord: Coordinate,
    window_start: Option<time::Date>,
) -> Result<SeriesSnapshot, Error> {
    let now = OffsetDateTime::now_utc();
    let today = now.date();
    let start = window_start.unwrap_or(today);

    let (history, forecast) = tokio::join!(
        fetch_historical(provider, coord, start, today),
        fetch_forecast(provider, coord, 24),
    );

    Ok(combine(history?, forecast?, now))
}

/// Stitch history and forecast together. Forecast samples whose hour of day
/// has already been covered by history are dropped, and the current sample
/// is the newest historical reading, falling back to the earliest remaining
/// forecast hour when history is empty.
pub(crate) fn combine(history: Series, forecast: Forecast, now: OffsetDateTime) -> SeriesSnapshot {
    let future: Vec<Sample> = forecast
        .series
        .into_samples()
        .into_iter()
        .filter(|sample| sample.time.hour() > now.to_offset(sample.time.offset()).hour())
        .collect();

    let current = history
        .latest_at(now)
        .cloned()
        .or_else(|| forecast.current.clone())
        .or_else(|| future.first().cloned());

    let series = history.merge(Series::from_samples(future));
    SeriesSnapshot {
        series,
        current,
        source: forecast.source,
    }
}
