pub mod advice;
pub mod aqi;
pub mod error;
pub mod forecast;
pub mod history;
pub mod models;
pub mod provider;
pub mod routes;
pub mod series;
mod startup;
mod utils;

pub use advice::{Advice, AdviceOutcome, HttpTextGeneration, Recommendation, TextGeneration};
pub use aqi::{aqi_from_pm25, AqiCategory};
pub use error::{Error, ErrorBody};
pub use forecast::{fetch_forecast, Forecast, ForecastSource};
pub use history::fetch_historical;
pub use models::{Coordinate, Pollutants, Sample, Series};
pub use provider::{AirQualityProvider, CurrentBlock, HourlyBlock, HourlyResponse, OpenMeteo};
pub use series::{get_series, SeriesSnapshot};
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
