use crate::api::{
    advisory::{Advisory, AdvisoryRequest},
    client::ApiClient,
    error::ApiError,
    weather::WeatherReport,
};

/// Weather snapshot and combined advisory for one location. Each half
/// fails on its own.
#[derive(Debug)]
pub struct Dashboard {
    pub location: String,
    pub weather: Result<WeatherReport, ApiError>,
    pub advisory: Result<Advisory, ApiError>,
}

#[derive(Debug)]
pub enum DashboardOutcome {
    Loaded(Dashboard),
    /// No location given and the profile has none either.
    NoLocation,
    ProfileUnavailable(ApiError),
}

/// Falls back to the profile location when none is given, then fetches
/// weather and advisory concurrently.
pub async fn load_dashboard(
    client: &ApiClient,
    location: Option<&str>,
    crop: Option<&str>,
) -> DashboardOutcome {
    let location = match given_location(location) {
        Some(location) => location,
        None => match profile_location(client).await {
            Ok(Some(location)) => location,
            Ok(None) => return DashboardOutcome::NoLocation,
            Err(error) => return DashboardOutcome::ProfileUnavailable(error),
        },
    };

    let request = AdvisoryRequest {
        location: location.clone(),
        crop_type: crop.unwrap_or_default().to_owned(),
        ..AdvisoryRequest::default()
    };
    let weather_api = client.weather();
    let advisory_api = client.advisory();
    let (weather, advisory) = tokio::join!(
        weather_api.weather(&location),
        advisory_api.comprehensive(&request)
    );

    DashboardOutcome::Loaded(Dashboard {
        location,
        weather,
        advisory,
    })
}

pub(crate) fn given_location(location: Option<&str>) -> Option<String> {
    location
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Location saved on the signed-in user's profile, if any.
pub(crate) async fn profile_location(client: &ApiClient) -> Result<Option<String>, ApiError> {
    let profile = client.auth().profile().await?;
    Ok(given_location(profile.location.as_deref()))
}
