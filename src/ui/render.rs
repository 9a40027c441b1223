//! Plain-text renderings of facade results, one `String` per output line.

use crate::{
    api::{
        advisory::{Advisory, SeasonalGuide},
        auth::UserProfile,
        disease::{DiseaseDetection, Treatment},
        error::ApiError,
        market::{MarketPrices, PriceHistory, PricePrediction},
        rag::{IngestReceipt, KnowledgeBaseStatus, SearchResults},
        weather::WeatherReport,
    },
    domain::{chat::ChatTurn, status::SessionStatus},
    infra::secrets::redact_text,
};

pub fn session_status(status: SessionStatus) -> Vec<String> {
    let description = match status {
        SessionStatus::Authenticated => "signed in",
        SessionStatus::Anonymous => "not signed in",
    };
    vec![format!("{} ({description})", status.as_label())]
}

pub fn profile(user: &UserProfile) -> Vec<String> {
    let mut lines = vec![format!("User #{}: {}", user.id, user.username)];
    let full_name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !full_name.is_empty() {
        lines.push(format!("  Name:     {full_name}"));
    }
    push_optional(&mut lines, "  Email:    ", user.email.as_deref());
    push_optional(&mut lines, "  Phone:    ", user.phone.as_deref());
    push_optional(&mut lines, "  Location: ", user.location.as_deref());
    lines
}

pub fn detection(result: &DiseaseDetection) -> Vec<String> {
    let (crop, condition) = result.crop_and_condition();
    let condition = condition.replace('_', " ");
    let mut lines = vec![if crop.is_empty() {
        format!("Diagnosis: {condition} ({})", percent(result.confidence))
    } else {
        format!(
            "Diagnosis: {condition} on {} ({})",
            crop.replace('_', " "),
            percent(result.confidence)
        )
    }];

    if !result.top_3.is_empty() {
        lines.push("Top candidates:".to_owned());
        lines.extend(result.top_3.iter().enumerate().map(|(rank, candidate)| {
            format!(
                "  {}. {} ({})",
                rank + 1,
                candidate.label,
                percent(candidate.confidence)
            )
        }));
    }

    match &result.treatment {
        Some(Treatment::Plan {
            general,
            prevention,
            organic,
        }) => {
            push_optional(&mut lines, "Treatment:  ", Some(general.as_str()));
            push_optional(&mut lines, "Prevention: ", Some(prevention.as_str()));
            push_optional(&mut lines, "Organic:    ", organic.as_deref());
        }
        Some(Treatment::Summary(summary)) => lines.push(format!("Treatment: {summary}")),
        None => {}
    }
    lines
}

pub fn weather(report: &WeatherReport) -> Vec<String> {
    let place = report.location.as_deref().unwrap_or("Weather");
    let mut lines = vec![
        format!("{place}: {}", report.description),
        format!(
            "  Temperature {:.1} °C, humidity {:.0}%",
            report.temperature, report.humidity
        ),
    ];
    if let Some(wind_speed) = report.wind_speed {
        lines.push(format!("  Wind {wind_speed:.1} m/s"));
    }
    push_optional(&mut lines, "  Rain: ", report.rain_prediction.as_deref());
    if let Some(tomorrow) = report
        .forecast
        .as_ref()
        .and_then(|forecast| forecast.tomorrow.as_ref())
    {
        let rain = tomorrow
            .rain_chance
            .map(|chance| format!(", rain chance {chance:.0}%"))
            .unwrap_or_default();
        lines.push(format!(
            "  Tomorrow: {:.1} °C, humidity {:.0}%{rain}",
            tomorrow.temperature, tomorrow.humidity
        ));
    }
    push_optional(&mut lines, "Advice: ", report.advice.as_deref());
    push_optional(&mut lines, "Note: ", report.note.as_deref());
    lines
}

pub fn prices(prices: &MarketPrices) -> Vec<String> {
    match prices {
        MarketPrices::Board(board) => {
            let mut lines = vec![format!("Market prices (updated {})", board.last_updated)];
            lines.extend(board.crops.iter().map(|(name, price)| {
                format!(
                    "  {name:<10} {:>8.2} {:<8} {}",
                    price.current_price,
                    price.unit,
                    price.trend.as_label()
                )
            }));
            lines
        }
        MarketPrices::Quote(quote) => {
            let mut lines = vec![format!(
                "Current price {:.2} {} ({})",
                quote.current_price,
                quote.unit,
                quote.trend.as_label()
            )];
            if let (Some(first), Some(last)) = (quote.history.first(), quote.history.last()) {
                lines.push(format!(
                    "  {} days of history: {} {:.2} -> {} {:.2}",
                    quote.history.len(),
                    first.date,
                    first.price,
                    last.date,
                    last.price
                ));
            }
            lines
        }
    }
}

pub fn history(history: &PriceHistory) -> Vec<String> {
    let mut lines = vec![format!(
        "{} price history (current {:.2})",
        history.crop, history.current_price
    )];
    lines.extend(
        history
            .history
            .iter()
            .map(|point| format!("  {}  {:>8.2}", point.date, point.price)),
    );
    lines
}

pub fn prediction(prediction: &PricePrediction) -> Vec<String> {
    let mut lines = vec![format!(
        "{} forecast: trend {}, average {:.2} (current {:.2})",
        prediction.crop,
        prediction.trend.as_label(),
        prediction.average_predicted,
        prediction.current_price
    )];
    lines.extend(prediction.predictions.iter().map(|entry| {
        format!(
            "  {}  {:>8.2}  {}",
            entry.date, entry.predicted_price, entry.confidence
        )
    }));
    push_optional(&mut lines, "Note: ", prediction.note.as_deref());
    lines
}

pub fn advisory(advisory: &Advisory) -> Vec<String> {
    let mut lines = vec![advisory.comprehensive_advice.clone()];

    if let Some(weather) = &advisory.weather_advice {
        lines.push(String::new());
        lines.push("Weather".to_owned());
        if let (Some(temperature), Some(humidity)) = (weather.temperature, weather.humidity) {
            lines.push(format!("  {temperature:.1} °C, humidity {humidity:.0}%"));
        }
        push_optional(&mut lines, "  Rain: ", weather.rain_prediction.as_deref());
        push_optional(&mut lines, "  ", weather.advice.as_deref());
    }

    if let Some(disease) = &advisory.disease_advice {
        lines.push(String::new());
        lines.push(format!("Disease: {}", disease.disease));
        push_optional(&mut lines, "  Treatment:  ", Some(disease.treatment.as_str()));
        push_optional(&mut lines, "  Prevention: ", Some(disease.prevention.as_str()));
        push_optional(&mut lines, "  Organic:    ", Some(disease.organic.as_str()));
    }

    if let Some(knowledge) = advisory.rag_advice.as_ref().filter(|rag| !rag.results.is_empty()) {
        lines.push(String::new());
        lines.push(format!("Knowledge base: {}", knowledge.query));
        lines.extend(knowledge.results.iter().map(|text| format!("  - {text}")));
    }

    if let Some(guide) = &advisory.seasonal_recommendations {
        lines.push(String::new());
        lines.extend(seasonal(guide));
    }
    lines
}

pub fn seasonal(guide: &SeasonalGuide) -> Vec<String> {
    let mut lines = vec![
        format!("Season: {}", guide.season),
        format!("  {}", guide.recommendation),
    ];
    if !guide.suitable_crops.is_empty() {
        lines.push(format!("  Crops: {}", guide.suitable_crops.join(", ")));
    }
    if !guide.activities.is_empty() {
        lines.push(format!("  Activities: {}", guide.activities.join(", ")));
    }
    lines
}

pub fn chat_turn(turn: &ChatTurn) -> String {
    format!(
        "[{}] {}: {}",
        turn.timestamp.format("%H:%M"),
        turn.role.as_label(),
        turn.content
    )
}

pub fn search(results: &SearchResults) -> Vec<String> {
    if results.results.is_empty() {
        return vec![format!("No knowledge base entries match \"{}\".", results.query)];
    }
    let mut lines = vec![format!("{} result(s) for \"{}\":", results.count, results.query)];
    lines.extend(
        results
            .results
            .iter()
            .enumerate()
            .map(|(index, text)| format!("  {}. {text}", index + 1)),
    );
    lines
}

pub fn knowledge_status(status: &KnowledgeBaseStatus) -> Vec<String> {
    vec![format!("{} ({} documents)", status.message, status.count)]
}

pub fn ingest_receipt(receipt: &IngestReceipt) -> Vec<String> {
    vec![format!("{} (id {})", receipt.message, receipt.id)]
}

/// `CODE: message` line for a failed call, with secrets scrubbed.
pub fn api_failure(error: &ApiError) -> String {
    format!("{}: {}", error.code(), redact_text(&error.to_string()))
}

fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn push_optional(lines: &mut Vec<String>, prefix: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        lines.push(format!("{prefix}{value}"));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        api::{
            disease::ClassConfidence,
            market::{PricePoint, Trend},
            weather::{DayForecast, Forecast},
        },
        domain::chat::{ChatRole, GREETING},
    };

    #[test]
    fn detection_splits_label_and_lists_candidates() {
        let result = DiseaseDetection {
            predicted_class: "Tomato___Late_blight".to_owned(),
            confidence: 0.912,
            treatment: Some(Treatment::Summary("Remove infected leaves.".to_owned())),
            top_3: vec![ClassConfidence {
                label: "Tomato___Late_blight".to_owned(),
                confidence: 0.912,
            }],
        };

        let lines = detection(&result);

        assert_eq!(lines[0], "Diagnosis: Late blight on Tomato (91.2%)");
        assert_eq!(lines[2], "  1. Tomato___Late_blight (91.2%)");
        assert_eq!(lines[3], "Treatment: Remove infected leaves.");
    }

    #[test]
    fn detection_skips_blank_plan_entries() {
        let result = DiseaseDetection {
            predicted_class: "Tomato___healthy".to_owned(),
            confidence: 0.98,
            treatment: Some(Treatment::Plan {
                general: "No treatment needed.".to_owned(),
                prevention: String::new(),
                organic: None,
            }),
            top_3: Vec::new(),
        };

        let lines = detection(&result);

        assert_eq!(lines.last().map(String::as_str), Some("Treatment:  No treatment needed."));
        assert!(!lines.iter().any(|line| line.starts_with("Prevention")));
    }

    #[test]
    fn weather_skips_missing_sections() {
        let report = WeatherReport {
            location: Some("Pune".to_owned()),
            temperature: 28.44,
            humidity: 62.0,
            description: "Scattered Clouds".to_owned(),
            wind_speed: None,
            rain_prediction: None,
            advice: Some("Irrigate early.".to_owned()),
            forecast: Some(Forecast {
                tomorrow: Some(DayForecast {
                    temperature: 29.0,
                    humidity: 58.0,
                    rain_chance: None,
                }),
            }),
            note: None,
        };

        let lines = weather(&report);

        assert_eq!(
            lines,
            [
                "Pune: Scattered Clouds",
                "  Temperature 28.4 °C, humidity 62%",
                "  Tomorrow: 29.0 °C, humidity 58%",
                "Advice: Irrigate early.",
            ]
        );
    }

    #[test]
    fn history_lists_every_point() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date");
        let rendered = history(&PriceHistory {
            crop: "Onion".to_owned(),
            current_price: 42.8,
            history: vec![
                PricePoint { date, price: 42.0 },
                PricePoint {
                    date: date.succ_opt().expect("next day"),
                    price: 42.5,
                },
            ],
        });

        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[1], "  2026-10-17     42.00");
    }

    #[test]
    fn quote_without_history_renders_single_line() {
        let rendered = prices(&MarketPrices::Quote(crate::api::market::CropQuote {
            current_price: 55.0,
            unit: "per kg".to_owned(),
            trend: Trend::Stable,
            history: Vec::new(),
        }));

        assert_eq!(rendered, ["Current price 55.00 per kg (stable)"]);
    }

    #[test]
    fn failure_line_leads_with_code() {
        let line = api_failure(&ApiError::Server { status: 502 });

        assert!(line.starts_with("API_SERVER_ERROR: "));
        assert!(line.contains("502"));
    }

    #[test]
    fn empty_search_says_so() {
        let rendered = search(&SearchResults {
            query: "quinoa".to_owned(),
            results: Vec::new(),
            count: 0,
        });

        assert_eq!(rendered, ["No knowledge base entries match \"quinoa\"."]);
    }

    #[test]
    fn chat_turn_shows_role_label() {
        let line = chat_turn(&ChatTurn::now(ChatRole::Bot, GREETING));

        assert!(line.ends_with(&format!("advisor: {GREETING}")));
    }
}
