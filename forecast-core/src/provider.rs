use reqwest::{Client, Url};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    Config,
    error::{Error, Result},
    location::Location,
    model::{ForecastWindow, Units},
    provider::{accuweather::AccuWeather, weather_gov::WeatherGov, wmo::Wmo},
};

pub mod accuweather;
pub mod weather_gov;
pub mod wmo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherGov,
    AccuWeather,
    Wmo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherGov => "Weather.gov",
            ProviderId::AccuWeather => "AccuWeather",
            ProviderId::Wmo => "WMO",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The upstream a run talks to, chosen by the shape of its [`Location`].
#[derive(Debug, Clone)]
pub enum Provider {
    WeatherGov(WeatherGov),
    AccuWeather(AccuWeather),
    Wmo(Wmo),
}

impl Provider {
    /// Pick and configure the provider that serves `location`.
    pub fn for_location(location: Location, units: Units, config: &Config) -> Result<Self> {
        let id = location.provider();
        let base_url = config.base_url(id);
        info!(provider = %id, location = %location, "selected provider");

        let provider = match location {
            Location::PostalCode(zip) => {
                reject_metric(id, units)?;
                Provider::WeatherGov(WeatherGov::for_postal_code(base_url, zip)?)
            }
            Location::LatLon { lat, lon } => {
                reject_metric(id, units)?;
                Provider::WeatherGov(WeatherGov::for_lat_lon(base_url, lat, lon)?)
            }
            Location::ProviderKey { location, api_key } => {
                Provider::AccuWeather(AccuWeather::new(base_url, location, api_key, units)?)
            }
            Location::CityId(city_id) => Provider::Wmo(Wmo::new(base_url, city_id, units)?),
        };

        Ok(provider)
    }

    pub fn id(&self) -> ProviderId {
        match self {
            Provider::WeatherGov(_) => ProviderId::WeatherGov,
            Provider::AccuWeather(_) => ProviderId::AccuWeather,
            Provider::Wmo(_) => ProviderId::Wmo,
        }
    }

    pub fn units(&self) -> Units {
        match self {
            Provider::WeatherGov(_) => Units::Imperial,
            Provider::AccuWeather(p) => p.units(),
            Provider::Wmo(p) => p.units(),
        }
    }

    /// Download and normalize the forecast. Every call hits the network.
    pub async fn fetch_window(&self, http: &Client) -> Result<ForecastWindow> {
        match self {
            Provider::WeatherGov(p) => p.fetch_window(http).await,
            Provider::AccuWeather(p) => p.fetch_window(http).await,
            Provider::Wmo(p) => p.fetch_window(http).await,
        }
    }
}

fn reject_metric(id: ProviderId, units: Units) -> Result<()> {
    if units.is_metric() {
        return Err(Error::Usage(format!("Metric units are not available from {id}")));
    }
    Ok(())
}

/// A provider together with the window it produced, fetched at most once.
#[derive(Debug)]
pub struct Forecast {
    provider: Provider,
    http: Client,
    window: OnceCell<ForecastWindow>,
}

impl Forecast {
    pub fn new(provider: Provider, http: Client) -> Self {
        Self { provider, http, window: OnceCell::new() }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// The forecast window, downloading it on the first call only.
    ///
    /// A failed download is not remembered; the next call tries again.
    pub async fn fetch(&self) -> Result<&ForecastWindow> {
        self.window.get_or_try_init(|| self.provider.fetch_window(&self.http)).await
    }
}

/// Append `segments` to the path of `base_url`.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|err| Error::Config(format!("Invalid base URL \"{base_url}\": {err}")))?;

    url.path_segments_mut()
        .map_err(|()| Error::Config(format!("Base URL \"{base_url}\" cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// GET `url` and return the body of a 2xx response.
pub(crate) async fn download(
    http: &Client,
    id: ProviderId,
    url: Url,
    query: &[(&str, String)],
) -> Result<String> {
    debug!(provider = %id, url = %url, "requesting forecast");

    let res = http.get(url).query(query).send().await.map_err(Error::transport)?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        debug!(provider = %id, %status, body = %truncate_body(&body), "forecast request failed");
        return Err(Error::status(status));
    }

    res.text().await.map_err(Error::transport)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments() {
        let url = endpoint("http://127.0.0.1:4000", &["en", "json", "45_en.json"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4000/en/json/45_en.json");

        let url = endpoint("https://example.com/mirror/", &["forecasts", "v1"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/mirror/forecasts/v1");
    }

    #[test]
    fn endpoint_escapes_segments() {
        let url = endpoint("https://example.com", &["5day", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/5day/a%20b%2Fc");
    }

    #[test]
    fn endpoint_rejects_bad_base() {
        assert!(matches!(endpoint("not a url", &["x"]), Err(Error::Config(_))));
        assert!(matches!(endpoint("mailto:me@example.com", &["x"]), Err(Error::Config(_))));
    }

    #[test]
    fn metric_is_rejected_for_weather_gov() {
        let cfg = Config::default();
        let err = Provider::for_location(Location::PostalCode("12345".into()), Units::Metric, &cfg)
            .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));

        let provider =
            Provider::for_location(Location::CityId(45), Units::Metric, &cfg).unwrap();
        assert_eq!(provider.id(), ProviderId::Wmo);
        assert_eq!(provider.units(), Units::Metric);
    }

    #[test]
    fn provider_follows_location() {
        let cfg = Config::default();
        let provider = Provider::for_location(
            Location::ProviderKey { location: "349727".into(), api_key: "KEY".into() },
            Units::Imperial,
            &cfg,
        )
        .unwrap();
        assert_eq!(provider.id(), ProviderId::AccuWeather);

        let provider = Provider::for_location(
            Location::LatLon { lat: 40.0, lon: -75.0 },
            Units::Imperial,
            &cfg,
        )
        .unwrap();
        assert_eq!(provider.id(), ProviderId::WeatherGov);
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
