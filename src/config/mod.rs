/// Application configuration module
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub catalog_path: Option<PathBuf>,
    pub observer: ObserverDefaults,
    pub weather: WeatherConfig,
    /// Cap on ranked objects per response
    pub result_limit: usize,
}

/// Used when a request leaves location or sky quality out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverDefaults {
    pub latitude: f64,
    pub longitude: f64,
    pub bortle: i32,
}

impl Default for ObserverDefaults {
    fn default() -> Self {
        // Sofia, suburban sky
        Self {
            latitude: 42.69,
            longitude: 23.32,
            bortle: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = ObserverDefaults::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid BIND_ADDR {addr:?}: {e}"))?,
            None => DEFAULT_BIND_ADDR.parse()?,
        };

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let observer = ObserverDefaults {
            latitude: parse_or(&lookup, "DEFAULT_LATITUDE", fallback.latitude),
            longitude: parse_or(&lookup, "DEFAULT_LONGITUDE", fallback.longitude),
            bortle: parse_or(&lookup, "DEFAULT_BORTLE", fallback.bortle),
        };
        if !(-90.0..=90.0).contains(&observer.latitude) {
            anyhow::bail!("DEFAULT_LATITUDE {} outside [-90, 90]", observer.latitude);
        }
        if !observer.longitude.is_finite() {
            anyhow::bail!("DEFAULT_LONGITUDE {} is not finite", observer.longitude);
        }
        if !(1..=9).contains(&observer.bortle) {
            anyhow::bail!("DEFAULT_BORTLE {} outside 1..=9", observer.bortle);
        }

        let weather = WeatherConfig {
            enabled: env_bool(&lookup, "WEATHER_ENABLED", true),
            url: lookup("WEATHER_URL").unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            timeout_seconds: parse_or(&lookup, "WEATHER_TIMEOUT_SECONDS", 5),
        };

        Ok(Self {
            bind_addr,
            catalog_path,
            observer,
            weather,
            result_limit: parse_or(&lookup, "RESULT_LIMIT", 50),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
