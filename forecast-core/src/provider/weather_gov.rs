use chrono::NaiveDate;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use reqwest::{Client, Url};

use crate::{
    error::{Error, Result},
    icon::icon_token_from_link,
    model::{DailyForecast, FORECAST_DAYS, ForecastWindow},
    provider::{ProviderId, download, endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://graphical.weather.gov";

const FORECAST_PATH: &[&str] =
    &["xml", "sample_products", "browser_interface", "ndfdBrowserClientByDay.php"];

#[derive(Debug, Clone, PartialEq)]
enum Point {
    PostalCode(String),
    LatLon { lat: f64, lon: f64 },
}

/// National Digital Forecast Database, "24 hourly" DWML product.
#[derive(Debug, Clone)]
pub struct WeatherGov {
    url: Url,
    point: Point,
}

impl WeatherGov {
    pub fn for_postal_code(base_url: &str, zip: String) -> Result<Self> {
        Ok(Self { url: endpoint(base_url, FORECAST_PATH)?, point: Point::PostalCode(zip) })
    }

    pub fn for_lat_lon(base_url: &str, lat: f64, lon: f64) -> Result<Self> {
        Ok(Self { url: endpoint(base_url, FORECAST_PATH)?, point: Point::LatLon { lat, lon } })
    }

    pub async fn fetch_window(&self, http: &Client) -> Result<ForecastWindow> {
        let mut query = match &self.point {
            Point::PostalCode(zip) => vec![("zipCodeList", zip.clone())],
            Point::LatLon { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        };
        query.extend([
            ("format", "24 hourly".to_string()),
            ("numDays", FORECAST_DAYS.to_string()),
            ("Unit", "e".to_string()),
        ]);

        let body = download(http, ProviderId::WeatherGov, self.url.clone(), &query).await?;
        parse_forecast(&body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    High,
    Low,
    Icon,
    StartTime,
}

#[derive(Debug, Default)]
struct Collected {
    highs: Vec<String>,
    lows: Vec<String>,
    icons: Vec<String>,
    start_time: Option<String>,
}

impl Collected {
    fn record(&mut self, field: Field, text: String) {
        match field {
            Field::High => self.highs.push(text),
            Field::Low => self.lows.push(text),
            Field::Icon => self.icons.push(icon_token_from_link(&text)),
            Field::StartTime => {
                self.start_time.get_or_insert(text);
            }
        }
    }
}

fn temperature_field(e: &BytesStart<'_>) -> Option<Field> {
    match e.try_get_attribute("type").ok().flatten()?.value.as_ref() {
        b"maximum" => Some(Field::High),
        b"minimum" => Some(Field::Low),
        _ => None,
    }
}

/// Extract the window from a DWML document.
///
/// Values are taken in document order, which NDFD emits date-ascending.
pub(crate) fn parse_forecast(xml: &str) -> Result<ForecastWindow> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut collected = Collected::default();
    // `Some` while inside a <temperature type="maximum|minimum">
    let mut temperature: Option<Field> = None;
    let mut capture: Option<Field> = None;
    let mut text = String::new();
    let mut error: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"temperature" => temperature = temperature_field(&e),
                b"value" if temperature.is_some() => {
                    capture = temperature;
                    text.clear();
                }
                b"icon-link" => {
                    capture = Some(Field::Icon);
                    text.clear();
                }
                b"start-valid-time" => {
                    capture = Some(Field::StartTime);
                    text.clear();
                }
                b"error" => error = Some(String::new()),
                _ => {}
            },
            // <value xsi:nil="true"/> and friends: keep the slot so days stay aligned.
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"value" => {
                    if let Some(field) = temperature {
                        collected.record(field, String::new());
                    }
                }
                b"icon-link" => collected.record(Field::Icon, String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let value = e.unescape().map_err(|err| xml_error(&reader, err))?;
                if capture.is_some() {
                    text.push_str(&value);
                }
                if let Some(message) = error.as_mut() {
                    if !message.is_empty() {
                        message.push(' ');
                    }
                    message.push_str(&value);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"temperature" => temperature = None,
                b"value" | b"icon-link" | b"start-valid-time" => {
                    if let Some(field) = capture.take() {
                        collected.record(field, std::mem::take(&mut text));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(xml_error(&reader, err)),
            _ => {}
        }
    }

    if let Some(message) = error {
        return Err(Error::Data(format!("weather.gov reported an error: {message}")));
    }

    build_window(collected)
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> Error {
    Error::Data(format!(
        "invalid weather.gov XML at position {}: {err}",
        reader.error_position()
    ))
}

fn build_window(collected: Collected) -> Result<ForecastWindow> {
    let start_time = collected
        .start_time
        .ok_or_else(|| Error::Data("weather.gov response has no start-valid-time".into()))?;
    let date_part = start_time.split('T').next().unwrap_or_default();
    let start_date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|err| {
        Error::Data(format!("weather.gov start-valid-time \"{start_time}\": {err}"))
    })?;

    for (what, found) in [
        ("maximum temperatures", collected.highs.len()),
        ("minimum temperatures", collected.lows.len()),
        ("icons", collected.icons.len()),
    ] {
        if found < FORECAST_DAYS {
            return Err(Error::Data(format!(
                "weather.gov returned {found} {what}, expected {FORECAST_DAYS}"
            )));
        }
    }

    let days = collected
        .highs
        .into_iter()
        .zip(collected.lows)
        .zip(collected.icons)
        .take(FORECAST_DAYS)
        .map(|((high, low), icon)| DailyForecast { date: None, high, low, icon })
        .collect();

    ForecastWindow::new(start_date, days)
}
