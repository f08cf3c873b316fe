use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    icon::wmo_icon,
    model::{DailyForecast, FORECAST_DAYS, ForecastWindow, Units},
    provider::{ProviderId, download, endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://worldweather.wmo.int";

/// World Weather Information Service city forecast.
#[derive(Debug, Clone)]
pub struct Wmo {
    url: Url,
    units: Units,
}

impl Wmo {
    pub fn new(base_url: &str, city_id: u32, units: Units) -> Result<Self> {
        let file = format!("{city_id}_en.json");
        let url = endpoint(base_url, &["en", "json", file.as_str()])?;
        Ok(Self { url, units })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub async fn fetch_window(&self, http: &Client) -> Result<ForecastWindow> {
        let body = download(http, ProviderId::Wmo, self.url.clone(), &[]).await?;
        parse_forecast(&body, self.units)
    }
}

#[derive(Debug, Deserialize)]
struct WmoResponse {
    city: WmoCity,
}

#[derive(Debug, Deserialize)]
struct WmoCity {
    forecast: WmoForecast,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WmoForecast {
    forecast_day: Vec<WmoForecastDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WmoForecastDay {
    forecast_date: NaiveDate,
    #[serde(default, deserialize_with = "temperature")]
    max_temp: Option<String>,
    #[serde(default, deserialize_with = "temperature", rename = "maxTempF")]
    max_temp_f: Option<String>,
    #[serde(default, deserialize_with = "temperature")]
    min_temp: Option<String>,
    #[serde(default, deserialize_with = "temperature", rename = "minTempF")]
    min_temp_f: Option<String>,
    #[serde(deserialize_with = "icon_code")]
    weather_icon: u32,
}

impl WmoForecastDay {
    fn high(&self, units: Units) -> Option<&String> {
        if units.is_metric() { self.max_temp.as_ref() } else { self.max_temp_f.as_ref() }
    }

    fn low(&self, units: Units) -> Option<&String> {
        if units.is_metric() { self.min_temp.as_ref() } else { self.min_temp_f.as_ref() }
    }
}

/// Temperatures arrive as strings ("21"), occasionally numbers; "" and null mean absent.
fn temperature<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn icon_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid weatherIcon {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid weatherIcon \"{s}\""))),
        other => Err(de::Error::custom(format!("invalid weatherIcon {other}"))),
    }
}

/// Normalize the first four `forecastDay` entries.
///
/// Once the current night is over WMO drops the first day's low; the second
/// day's low stands in for it.
pub(crate) fn parse_forecast(body: &str, units: Units) -> Result<ForecastWindow> {
    let parsed: WmoResponse = serde_json::from_str(body)
        .map_err(|err| Error::Data(format!("Failed to parse WMO JSON: {err}")))?;

    let entries = parsed.city.forecast.forecast_day;
    if entries.len() < FORECAST_DAYS {
        return Err(Error::Data(format!(
            "WMO returned {} forecast days, expected {FORECAST_DAYS}",
            entries.len()
        )));
    }
    let entries = &entries[..FORECAST_DAYS];

    let mut lows: Vec<Option<&String>> = entries.iter().map(|e| e.low(units)).collect();
    if lows[0].is_none() {
        debug!(date = %entries[0].forecast_date, "no low for first day, using the next day's");
        lows[0] = lows[1];
    }

    let days = entries
        .iter()
        .zip(lows)
        .map(|(entry, low)| {
            let date = entry.forecast_date;
            let high = entry
                .high(units)
                .ok_or_else(|| Error::Data(format!("WMO forecast for {date} has no high")))?;
            let low = low.ok_or_else(|| Error::Data(format!("WMO forecast for {date} has no low")))?;

            Ok(DailyForecast {
                date: Some(date),
                high: high.clone(),
                low: low.clone(),
                icon: wmo_icon(entry.weather_icon)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ForecastWindow::new(entries[0].forecast_date, days)
}
