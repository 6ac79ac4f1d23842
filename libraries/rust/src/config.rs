use crate::errors::{Error, Result};
use crate::movers::{self, MoversStrategy};
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str =
    "http://kind.krx.co.kr/corpgeneral/corpList.do?method=download&searchType=13";

pub const DEFAULT_KRX_DATA_URL: &str = "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd";

pub const DEFAULT_CHART_URL: &str = "https://api.finance.naver.com/siseJson.naver";

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

const DEFAULT_SERVER_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Display title only; no functional effect.
    pub title: Option<String>,
    pub listing_url: String,
    pub krx_data_url: String,
    pub chart_url: String,
    pub http_timeout: Duration,
    /// `None` keeps the listing for the life of the process.
    pub listing_ttl: Option<Duration>,
    pub movers_strategy: MoversStrategy,
    pub movers_refresh: Duration,
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: None,
            listing_url: DEFAULT_LISTING_URL.to_string(),
            krx_data_url: DEFAULT_KRX_DATA_URL.to_string(),
            chart_url: DEFAULT_CHART_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
            listing_ttl: None,
            movers_strategy: MoversStrategy::default(),
            movers_refresh: movers::MAX_REFRESH_INTERVAL,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; unset or blank variables
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Config::default();

        let http_timeout = match get("HTTP_TIMEOUT_SECONDS") {
            Some(value) => Duration::from_secs(parse_number("HTTP_TIMEOUT_SECONDS", &value)?),
            None => defaults.http_timeout,
        };

        let listing_ttl = match get("LISTING_TTL_SECONDS") {
            Some(value) => Some(Duration::from_secs(parse_number(
                "LISTING_TTL_SECONDS",
                &value,
            )?)),
            None => defaults.listing_ttl,
        };

        let movers_refresh = match get("MOVERS_TTL_SECONDS") {
            Some(value) => movers::clamp_refresh_interval(Duration::from_secs(parse_number(
                "MOVERS_TTL_SECONDS",
                &value,
            )?)),
            None => defaults.movers_refresh,
        };

        let server_port = match get("SERVER_PORT") {
            Some(value) => parse_number("SERVER_PORT", &value)?,
            None => defaults.server_port,
        };

        Ok(Config {
            title: get("DASHBOARD_TITLE"),
            listing_url: get("KRX_LISTING_URL").unwrap_or(defaults.listing_url),
            krx_data_url: get("KRX_DATA_URL").unwrap_or(defaults.krx_data_url),
            chart_url: get("NAVER_CHART_URL").unwrap_or(defaults.chart_url),
            http_timeout,
            listing_ttl,
            movers_strategy: movers_strategy(&get)?,
            movers_refresh,
            server_port,
        })
    }

    #[cfg(feature = "http")]
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()?)
    }
}

fn movers_strategy<G>(get: &G) -> Result<MoversStrategy>
where
    G: Fn(&str) -> Option<String>,
{
    match get("MOVERS_STRATEGY").map(|value| value.to_lowercase()).as_deref() {
        None | Some("ranked") => {
            let limit = match get("MOVERS_LIMIT") {
                Some(value) => parse_number("MOVERS_LIMIT", &value)?,
                None => movers::DEFAULT_RANKED_LIMIT,
            };

            if limit == 0 {
                return Err(Error::Config("MOVERS_LIMIT must be positive".to_string()));
            }

            Ok(MoversStrategy::Ranked { limit })
        }
        Some("fixed") => {
            let lookback_days = match get("MOVERS_LOOKBACK_DAYS") {
                Some(value) => parse_number("MOVERS_LOOKBACK_DAYS", &value)?,
                None => movers::DEFAULT_LOOKBACK_DAYS,
            };

            if !(movers::MIN_LOOKBACK_DAYS..=movers::MAX_LOOKBACK_DAYS).contains(&lookback_days) {
                return Err(Error::Config(format!(
                    "MOVERS_LOOKBACK_DAYS must be between {} and {}",
                    movers::MIN_LOOKBACK_DAYS,
                    movers::MAX_LOOKBACK_DAYS
                )));
            }

            Ok(MoversStrategy::Fixed {
                universe: movers::default_universe(),
                lookback_days,
            })
        }
        Some(other) => Err(Error::Config(format!(
            "MOVERS_STRATEGY must be 'ranked' or 'fixed', got '{other}'"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{name} is not a valid number: '{value}'")))
}
