//! Protected resource routes.

use axum::{Extension, Json};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Serialize;
use signon_auth::BearerClaims;

const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

#[derive(Debug, Serialize)]
pub struct WeatherForecast {
    pub date: String,
    #[serde(rename = "temperatureC")]
    pub temperature_c: i32,
    #[serde(rename = "temperatureF")]
    pub temperature_f: i32,
    pub summary: &'static str,
}

/// Five days of randomized forecast data. Reachable only through the bearer
/// middleware, so the claims extension is always present.
pub async fn weather_forecast(
    Extension(claims): Extension<BearerClaims>,
) -> Json<Vec<WeatherForecast>> {
    tracing::debug!(subject = %claims.sub, "serving forecast");

    let mut rng = rand::thread_rng();
    let forecasts = (1..=5)
        .map(|day| {
            let temperature_c = rng.gen_range(-20..=55);
            WeatherForecast {
                date: (Utc::now() + Duration::days(day)).format("%Y-%m-%d").to_string(),
                temperature_c,
                temperature_f: 32 + (temperature_c as f64 / 0.5556) as i32,
                summary: SUMMARIES[rng.gen_range(0..SUMMARIES.len())],
            }
        })
        .collect();

    Json(forecasts)
}
