use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    api::{
        client::{required, ApiClient},
        error::ApiError,
        response::{ensure_non_negative, Validate},
    },
    domain::request::OutboundRequest,
};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const PREDICTION_HORIZON: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
    #[serde(other)]
    Unknown,
}

impl Trend {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropPrice {
    pub current_price: f64,
    pub unit: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropQuote {
    pub current_price: f64,
    pub unit: String,
    pub trend: Trend,
    #[serde(default)]
    pub history: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceBoard {
    pub crops: BTreeMap<String, CropPrice>,
    pub last_updated: String,
}

/// A single crop quote when the backend knows the crop, otherwise the whole
/// board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarketPrices {
    Quote(CropQuote),
    Board(PriceBoard),
}

impl Validate for MarketPrices {
    fn validate(&self) -> Result<(), String> {
        match self {
            Self::Quote(quote) => {
                ensure_non_negative("current_price", quote.current_price)?;
                validate_history(&quote.history)
            }
            Self::Board(board) => board.crops.iter().try_for_each(|(name, price)| {
                ensure_non_negative(&format!("{name} current_price"), price.current_price)
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceHistory {
    pub crop: String,
    pub history: Vec<PricePoint>,
    pub current_price: f64,
}

impl Validate for PriceHistory {
    fn validate(&self) -> Result<(), String> {
        ensure_non_negative("current_price", self.current_price)?;
        validate_history(&self.history)
    }
}

fn validate_history(history: &[PricePoint]) -> Result<(), String> {
    for point in history {
        ensure_non_negative("history price", point.price)?;
    }
    match history.windows(2).find(|pair| pair[1].date < pair[0].date) {
        Some(pair) => Err(format!(
            "history goes back in time: {} after {}",
            pair[1].date, pair[0].date
        )),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictedPrice {
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePrediction {
    pub crop: String,
    pub current_price: f64,
    pub predictions: Vec<PredictedPrice>,
    pub trend: Trend,
    pub average_predicted: f64,
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for PricePrediction {
    fn validate(&self) -> Result<(), String> {
        ensure_non_negative("current_price", self.current_price)?;
        validate_forecast(&self.predictions, Local::now().date_naive())
    }
}

/// Exactly seven consecutive days starting the day after `today`. The first
/// date may be off by one day either way to absorb timezone skew between the
/// backend and this machine, so a forecast starting on `today` is accepted.
pub fn validate_forecast(predictions: &[PredictedPrice], today: NaiveDate) -> Result<(), String> {
    if predictions.len() != PREDICTION_HORIZON {
        return Err(format!(
            "expected {PREDICTION_HORIZON} predictions, got {}",
            predictions.len()
        ));
    }

    let first = predictions[0].date;
    let offset = (first - today).num_days();
    if !(0..=2).contains(&offset) {
        return Err(format!("forecast starts on {first}, expected the day after {today}"));
    }

    for pair in predictions.windows(2) {
        if pair[0].date.succ_opt() != Some(pair[1].date) {
            return Err(format!(
                "forecast days are not consecutive: {} then {}",
                pair[0].date, pair[1].date
            ));
        }
    }

    predictions
        .iter()
        .try_for_each(|entry| ensure_non_negative("predicted_price", entry.predicted_price))
}

pub struct MarketApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MarketApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn prices(&self, crop: Option<&str>) -> Result<MarketPrices, ApiError> {
        let mut request = OutboundRequest::get(["market", "prices"]);
        if let Some(crop) = crop.map(str::trim).filter(|crop| !crop.is_empty()) {
            request = request.with_query("crop", crop);
        }
        self.client.fetch_valid(request).await
    }

    pub async fn history(&self, crop: &str, days: u32) -> Result<PriceHistory, ApiError> {
        let crop = required("crop", crop)?;
        if days == 0 {
            return Err(ApiError::invalid_input("days must be at least 1"));
        }
        self.client
            .fetch_valid(OutboundRequest::get(["market", "history", crop]).with_query("days", days))
            .await
    }

    pub async fn predict(&self, crop: &str) -> Result<PricePrediction, ApiError> {
        let crop = required("crop", crop)?;
        self.client
            .fetch_valid(OutboundRequest::get(["market", "predict", crop]))
            .await
    }
}
