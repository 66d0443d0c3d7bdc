/// External API clients module
use crate::domain::{Transparency, WeatherReport};
use crate::errors::ApiResult;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dso-ranker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Open-Meteo current conditions client
pub struct WeatherClient {
    http_client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: CurrentConditions,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentConditions {
    cloud_cover: Option<f64>,
    visibility: Option<f64>,
    dew_point_2m: Option<f64>,
    temperature_2m: Option<f64>,
}

impl From<CurrentConditions> for WeatherReport {
    fn from(c: CurrentConditions) -> Self {
        WeatherReport {
            transparency: Transparency::from_visibility(c.visibility.unwrap_or(0.0)),
            cloud_cover: c.cloud_cover,
            visibility: c.visibility,
            dew_point: c.dew_point_2m,
            temperature: c.temperature_2m,
        }
    }
}

impl WeatherClient {
    pub fn new(base_url: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url,
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch current cloud cover, visibility and temperatures for a location
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> ApiResult<WeatherReport> {
        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                (
                    "current",
                    "cloud_cover,visibility,dew_point_2m,temperature_2m".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ForecastResponse = resp.json().await?;
        Ok(body.current.into())
    }
}
