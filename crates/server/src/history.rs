use log::warn;
use time::{Date, OffsetDateTime};

use crate::{
    provider::{parse_provider_time, AirQualityProvider, HourlyResponse},
    Coordinate, Error, Sample, Series,
};

/// Fetch the hourly historical series for a coordinate and inclusive date
/// range.
///
/// Exactly one provider call, no retry: provider failure surfaces as
/// `Error::Upstream`. Hours after the current wall-clock time are dropped
/// even when the provider returns them - a historical query never contains
/// the future.
pub async fn fetch_historical(
    provider: &dyn AirQualityProvider,
    coord: Coordinate,
    start: Date,
    end: Date,
) -> Result<Series, Error> {
    if start > end {
        return Err(Error::validation(format!(
            "start_date {} is after end_date {}",
            start, end
        )));
    }

    let response = provider.hourly_range(coord, start, end).await?;
    Ok(build_series(&response, OffsetDateTime::now_utc()))
}

/// Shape a provider response into a historical series: parse each hour,
/// truncate to `now`, compute AQI, deduplicate and sort.
pub(crate) fn build_series(response: &HourlyResponse, now: OffsetDateTime) -> Series {
    let offset_seconds = response.utc_offset_seconds;
    let mut samples = Vec::with_capacity(response.hourly.time.len());

    for (index, raw_time) in response.hourly.time.iter().enumerate() {
        let timestamp = match parse_provider_time(raw_time, offset_seconds) {
            Ok(ts) => ts,
            Err(err) => {
                warn!("skipping hour with bad timestamp: {}", err);
                continue;
            }
        };
        // Date-range rounding upstream can return hours that have not
        // happened yet; those are not history.
        if timestamp > now {
            continue;
        }

        let pollutants = response.hourly.pollutants_at(index);
        match Sample::historical(timestamp, pollutants) {
            Ok(sample) => samples.push(sample),
            Err(err) => warn!("skipping hour {}: {}", raw_time, err),
        }
    }

    Series::from_samples(samples)
}
