use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        client::{encode_body, required, ApiClient},
        error::ApiError,
        response::Validate,
    },
    domain::request::OutboundRequest,
};

/// Inputs for a combined advisory. At least one field must be non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    pub location: String,
    pub crop_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_disease: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl AdvisoryRequest {
    fn normalized(&self) -> Result<Self, ApiError> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };
        let normalized = Self {
            location: self.location.trim().to_owned(),
            crop_type: self.crop_type.trim().to_owned(),
            detected_disease: non_blank(&self.detected_disease),
            query: non_blank(&self.query),
        };

        if normalized.location.is_empty()
            && normalized.crop_type.is_empty()
            && normalized.detected_disease.is_none()
            && normalized.query.is_none()
        {
            return Err(ApiError::invalid_input(
                "give at least a location, a crop, a disease or a question",
            ));
        }
        Ok(normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherAdvice {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub rain_prediction: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiseaseAdvice {
    pub disease: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub prevention: String,
    #[serde(default)]
    pub organic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeAdvice {
    pub query: String,
    #[serde(default)]
    pub results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonalGuide {
    pub season: String,
    pub recommendation: String,
    #[serde(default)]
    pub suitable_crops: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl Validate for SeasonalGuide {
    fn validate(&self) -> Result<(), String> {
        if self.season.trim().is_empty() {
            return Err("season is empty".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Advisory {
    #[serde(default)]
    pub weather_advice: Option<WeatherAdvice>,
    #[serde(default)]
    pub disease_advice: Option<DiseaseAdvice>,
    #[serde(default)]
    pub rag_advice: Option<KnowledgeAdvice>,
    #[serde(default)]
    pub seasonal_recommendations: Option<SeasonalGuide>,
    pub comprehensive_advice: String,
}

impl Validate for Advisory {
    fn validate(&self) -> Result<(), String> {
        if self.comprehensive_advice.trim().is_empty() {
            return Err("comprehensive_advice is empty".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    location: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatReply {
    /// Backend-local time the reply was produced, when it parses.
    pub fn sent_at(&self) -> Option<NaiveDateTime> {
        self.timestamp.as_deref()?.parse().ok()
    }
}

impl Validate for ChatReply {
    fn validate(&self) -> Result<(), String> {
        if self.response.trim().is_empty() {
            return Err("chat reply is empty".to_owned());
        }
        Ok(())
    }
}

pub struct AdvisoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdvisoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn comprehensive(&self, request: &AdvisoryRequest) -> Result<Advisory, ApiError> {
        let request = request.normalized()?;
        let outbound = OutboundRequest::post_json(["advisory", "comprehensive"], &request)
            .map_err(encode_body)?;
        self.client.fetch_valid(outbound).await
    }

    pub async fn seasonal(&self, month: u32) -> Result<SeasonalGuide, ApiError> {
        if !(1..=12).contains(&month) {
            return Err(ApiError::invalid_input(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        self.client
            .fetch_valid(OutboundRequest::get(["advisory", "seasonal"]).with_query("month", month))
            .await
    }

    /// One stateless exchange; earlier turns are not sent.
    pub async fn chat(&self, message: &str, location: Option<&str>) -> Result<ChatReply, ApiError> {
        let message = required("message", message)?;
        let location = location.map(str::trim).unwrap_or_default();
        let outbound =
            OutboundRequest::post_json(["advisory", "chat"], &ChatRequest { message, location })
                .map_err(encode_body)?;
        self.client.fetch_valid(outbound).await
    }
}
