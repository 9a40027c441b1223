use serde::Deserialize;

use crate::{
    api::{
        client::{required, ApiClient},
        error::ApiError,
        response::{ensure_non_negative, Validate},
    },
    domain::request::OutboundRequest,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayForecast {
    pub temperature: f64,
    pub humidity: f64,
    /// Percent, 0 to 100.
    #[serde(default)]
    pub rain_chance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub tomorrow: Option<DayForecast>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub location: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub rain_prediction: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub forecast: Option<Forecast>,
    /// Set when the backend served placeholder data.
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for WeatherReport {
    fn validate(&self) -> Result<(), String> {
        if !self.temperature.is_finite() {
            return Err("temperature is not a number".to_owned());
        }
        ensure_non_negative("humidity", self.humidity)?;
        if let Some(wind_speed) = self.wind_speed {
            ensure_non_negative("wind_speed", wind_speed)?;
        }
        Ok(())
    }
}

pub struct WeatherApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WeatherApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError> {
        let location = required("location", location)?;
        self.client
            .fetch_valid(OutboundRequest::get(["weather", location]))
            .await
    }
}
