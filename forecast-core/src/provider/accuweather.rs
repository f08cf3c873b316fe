use chrono::{DateTime, FixedOffset};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    icon::accuweather_icon,
    model::{DailyForecast, FORECAST_DAYS, ForecastWindow, Units},
    provider::{ProviderId, download, endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://dataservice.accuweather.com";

/// AccuWeather 5-day daily forecast for a location key.
#[derive(Clone)]
pub struct AccuWeather {
    url: Url,
    api_key: String,
    units: Units,
}

impl std::fmt::Debug for AccuWeather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccuWeather")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .finish()
    }
}

impl AccuWeather {
    pub fn new(base_url: &str, location_key: String, api_key: String, units: Units) -> Result<Self> {
        let url =
            endpoint(base_url, &["forecasts", "v1", "daily", "5day", location_key.as_str()])?;
        Ok(Self { url, api_key, units })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub async fn fetch_window(&self, http: &Client) -> Result<ForecastWindow> {
        let query = [
            ("apikey", self.api_key.clone()),
            ("metric", self.units.is_metric().to_string()),
        ];

        let body = download(http, ProviderId::AccuWeather, self.url.clone(), &query).await?;
        parse_forecast(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwResponse {
    headline: AwHeadline,
    daily_forecasts: Vec<AwDailyForecast>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwHeadline {
    effective_date: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDailyForecast {
    date: DateTime<FixedOffset>,
    temperature: AwTemperature,
    day: AwPeriod,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwTemperature {
    minimum: AwValue,
    maximum: AwValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwPeriod {
    icon: u32,
}

/// The API does not promise `DailyForecasts` order, so entries are sorted by date first.
pub(crate) fn parse_forecast(body: &str) -> Result<ForecastWindow> {
    let mut parsed: AwResponse = serde_json::from_str(body)
        .map_err(|err| Error::Data(format!("Failed to parse AccuWeather JSON: {err}")))?;

    parsed.daily_forecasts.sort_by_key(|f| f.date);

    let found = parsed.daily_forecasts.len();
    if found < FORECAST_DAYS {
        return Err(Error::Data(format!(
            "AccuWeather returned {found} forecast days, expected {FORECAST_DAYS}"
        )));
    }

    let days = parsed
        .daily_forecasts
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|f| {
            Ok(DailyForecast {
                date: Some(f.date.date_naive()),
                high: whole_degrees(f.temperature.maximum.value),
                low: whole_degrees(f.temperature.minimum.value),
                icon: accuweather_icon(f.day.icon)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ForecastWindow::new(parsed.headline.effective_date.date_naive(), days)
}

/// Truncates toward zero: 72.9 -> "72", -3.5 -> "-3".
fn whole_degrees(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = include_str!("../../tests/fixtures/accuweather.json");

    #[test]
    fn out_of_order_entries_are_sorted_by_date() {
        let window = parse_forecast(SAMPLE).expect("sample parses");

        let dates: Vec<_> = window.days.iter().map(|d| d.date.unwrap()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());

        let highs: Vec<_> = window.days.iter().map(|d| d.high.as_str()).collect();
        let lows: Vec<_> = window.days.iter().map(|d| d.low.as_str()).collect();
        assert_eq!(highs, ["70", "72", "68", "65"]);
        assert_eq!(lows, ["50", "53", "49", "47"]);
    }

    #[test]
    fn icons_are_mapped() {
        let window = parse_forecast(SAMPLE).unwrap();

        let icons: Vec<_> = window.days.iter().map(|d| d.icon.as_str()).collect();
        assert_eq!(icons, ["skc", "hi_shwrs", "tsra", "few"]);
    }

    #[test]
    fn start_date_comes_from_headline() {
        let body = SAMPLE.replace("2024-05-06T08:00:00-04:00", "2024-05-05T08:00:00-04:00");
        let window = parse_forecast(&body).unwrap();
        assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
    }

    #[test]
    fn unknown_icon_is_data_error() {
        let body = SAMPLE.replace("\"Icon\": 14", "\"Icon\": 99");
        let err = parse_forecast(&body).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
        assert!(err.to_string().contains("unknown AccuWeather icon code 99"), "{err}");
    }

    #[test]
    fn too_few_days_is_data_error() {
        let body = r#"{
            "Headline": { "EffectiveDate": "2024-05-06T07:00:00-04:00" },
            "DailyForecasts": [{
                "Date": "2024-05-06T07:00:00-04:00",
                "Temperature": {
                    "Minimum": { "Value": 50.0, "Unit": "F" },
                    "Maximum": { "Value": 70.0, "Unit": "F" }
                },
                "Day": { "Icon": 1 }
            }]
        }"#;

        let err = parse_forecast(body).unwrap_err();
        assert!(err.to_string().contains("returned 1 forecast days"), "{err}");
    }

    #[test]
    fn missing_field_is_data_error() {
        let err = parse_forecast(r#"{ "DailyForecasts": [] }"#).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn degrees_truncate_toward_zero() {
        assert_eq!(whole_degrees(72.9), "72");
        assert_eq!(whole_degrees(-3.5), "-3");
        assert_eq!(whole_degrees(0.0), "0");
    }

    #[test]
    fn debug_hides_api_key() {
        let provider =
            AccuWeather::new(DEFAULT_BASE_URL, "349727".into(), "SECRET".into(), Units::Metric)
                .unwrap();
        assert!(!format!("{provider:?}").contains("SECRET"));
    }
}
