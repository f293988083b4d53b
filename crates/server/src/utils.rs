use aero_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_FORECAST_TIMEOUT,
    DEFAULT_HISTORICAL_TIMEOUT, DEFAULT_PORT, DEFAULT_PROVIDER_URL,
};
use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Aero - air quality history, forecast and advisory service"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $AERO_CONFIG, ./aero.toml,
    /// $XDG_CONFIG_HOME/aero/aero.toml, /etc/aero/aero.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "AERO_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "AERO_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AERO_PORT")]
    pub port: Option<String>,

    /// Base URL of the upstream air-quality API
    #[arg(long, env = "AERO_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// Timeout in seconds for forecast requests to the provider
    #[arg(long, env = "AERO_FORECAST_TIMEOUT")]
    pub forecast_timeout: Option<u64>,

    /// Timeout in seconds for historical requests to the provider
    #[arg(long, env = "AERO_HISTORICAL_TIMEOUT")]
    pub historical_timeout: Option<u64>,

    /// Endpoint of an optional text-generation gateway for /api/advice.
    /// When unset the canned default advice is always served.
    #[arg(long, env = "AERO_ADVICE_URL")]
    pub advice_url: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port.clone().unwrap_or_else(|| DEFAULT_PORT.to_string())
    }

    pub fn provider_url(&self) -> String {
        self.provider_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
    }

    pub fn forecast_timeout_secs(&self) -> u64 {
        self.forecast_timeout.unwrap_or(DEFAULT_FORECAST_TIMEOUT)
    }

    pub fn historical_timeout_secs(&self) -> u64 {
        self.historical_timeout.unwrap_or(DEFAULT_HISTORICAL_TIMEOUT)
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("AERO_CONFIG", "aero.toml")
    };

    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source).unwrap_or_default();

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        domain: cli_args.domain.or(file_config.domain),
        port: cli_args.port.or(file_config.port),
        provider_url: cli_args.provider_url.or(file_config.provider_url),
        forecast_timeout: cli_args.forecast_timeout.or(file_config.forecast_timeout),
        historical_timeout: cli_args
            .historical_timeout
            .or(file_config.historical_timeout),
        advice_url: cli_args.advice_url.or(file_config.advice_url),
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
