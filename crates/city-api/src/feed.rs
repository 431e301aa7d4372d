//! Open-Meteo weather and air-quality poller feeding the real-time override.

use std::time::Duration;

use contracts::ExternalReading;
use serde::Deserialize;

pub const DEFAULT_LATITUDE: f64 = 51.5074;
pub const DEFAULT_LONGITUDE: f64 = -0.1278;
pub const DEFAULT_FEED_INTERVAL_SECS: u64 = 15 * 60;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
const FORECAST_FIELDS: &str = "temperature_2m,relative_humidity_2m,rain";
const AIR_QUALITY_FIELDS: &str = "us_aqi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub interval: Duration,
    pub forecast_url: String,
    pub air_quality_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            interval: Duration::from_secs(DEFAULT_FEED_INTERVAL_SECS),
            forecast_url: FORECAST_URL.to_string(),
            air_quality_url: AIR_QUALITY_URL.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("live feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{feed} response has no `current` block")]
    MissingCurrent { feed: &'static str },
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<ForecastCurrent>,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    rain: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: Option<AirQualityCurrent>,
}

#[derive(Debug, Deserialize)]
struct AirQualityCurrent {
    us_aqi: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoFeed {
    client: reqwest::Client,
    config: FeedConfig,
}

impl OpenMeteoFeed {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("city-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Fetches both feeds concurrently. Either one lacking its `current`
    /// block fails the whole refresh.
    pub async fn fetch(&self) -> Result<ExternalReading, FeedError> {
        let (forecast, air_quality) = tokio::try_join!(
            self.get::<ForecastResponse>(&self.config.forecast_url, FORECAST_FIELDS),
            self.get::<AirQualityResponse>(&self.config.air_quality_url, AIR_QUALITY_FIELDS),
        )?;

        let forecast = forecast
            .current
            .ok_or(FeedError::MissingCurrent { feed: "forecast" })?;
        let air_quality = air_quality
            .current
            .ok_or(FeedError::MissingCurrent { feed: "air-quality" })?;

        Ok(ExternalReading {
            temperature: forecast.temperature_2m,
            humidity: forecast.relative_humidity_2m,
            aqi: air_quality.us_aqi,
            rainfall: forecast.rain,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        current: &str,
    ) -> Result<T, FeedError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                ("current", current.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config_for(server: &MockServer) -> FeedConfig {
        FeedConfig {
            forecast_url: server.url("/v1/forecast"),
            air_quality_url: server.url("/v1/air-quality"),
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_combines_forecast_and_air_quality() {
        let server = MockServer::start_async().await;
        let forecast = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/forecast")
                    .query_param("latitude", "51.5074")
                    .query_param("longitude", "-0.1278")
                    .query_param("current", FORECAST_FIELDS);
                then.status(200).json_body(json!({
                    "latitude": 51.5,
                    "current": {
                        "time": "2024-05-01T12:00",
                        "temperature_2m": 14.2,
                        "relative_humidity_2m": 81,
                        "rain": 0.0
                    }
                }));
            })
            .await;
        let air_quality = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/air-quality")
                    .query_param("current", AIR_QUALITY_FIELDS);
                then.status(200)
                    .json_body(json!({ "current": { "time": "2024-05-01T12:00", "us_aqi": 38 } }));
            })
            .await;

        let feed = OpenMeteoFeed::new(config_for(&server)).expect("client builds");
        let reading = feed.fetch().await.expect("feed succeeds");

        forecast.assert_async().await;
        air_quality.assert_async().await;
        assert_eq!(
            reading,
            ExternalReading {
                temperature: Some(14.2),
                humidity: Some(81.0),
                aqi: Some(38.0),
                rainfall: Some(0.0),
            }
        );
    }

    #[tokio::test]
    async fn missing_current_block_fails_refresh() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/forecast");
                then.status(200).json_body(json!({ "latitude": 51.5 }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/air-quality");
                then.status(200).json_body(json!({ "current": { "us_aqi": 38 } }));
            })
            .await;

        let feed = OpenMeteoFeed::new(config_for(&server)).expect("client builds");
        let err = feed.fetch().await.expect_err("missing block must fail");
        assert!(matches!(err, FeedError::MissingCurrent { feed: "forecast" }));
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/forecast");
                then.status(503);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/air-quality");
                then.status(200).json_body(json!({ "current": { "us_aqi": 38 } }));
            })
            .await;

        let feed = OpenMeteoFeed::new(config_for(&server)).expect("client builds");
        let err = feed.fetch().await.expect_err("503 must fail");
        assert!(matches!(err, FeedError::Http(_)));
    }
}
