use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::{
    error::{Error, Result},
    provider::ProviderId,
};

/// Longest numeric token still treated as a WMO city id rather than a ZIP code.
const MAX_CITY_ID_DIGITS: usize = 4;

/// Where to fetch the forecast for. The variant also decides the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Five-digit US ZIP code (weather.gov).
    PostalCode(String),
    /// Decimal degrees (weather.gov).
    LatLon { lat: f64, lon: f64 },
    /// AccuWeather location key plus the API key it must be requested with.
    ProviderKey { location: String, api_key: String },
    /// WMO World Weather Information Service city id.
    CityId(u32),
}

impl Location {
    pub fn provider(&self) -> ProviderId {
        match self {
            Location::PostalCode(_) | Location::LatLon { .. } => ProviderId::WeatherGov,
            Location::ProviderKey { .. } => ProviderId::AccuWeather,
            Location::CityId(_) => ProviderId::Wmo,
        }
    }
}

/// Never prints the API key.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::PostalCode(zip) => write!(f, "\"{zip}\""),
            Location::LatLon { lat, lon } => write!(f, "\"{lat}/{lon}\""),
            Location::ProviderKey { location, .. } => write!(f, "\"{location}\""),
            Location::CityId(id) => write!(f, "\"{id}\""),
        }
    }
}

/// Classify the positional location tokens from the command line.
///
/// - with an API key: a single AccuWeather location key
/// - two tokens: latitude and longitude
/// - one token: ZIP code (ZIP+4 is cut to five digits), or a WMO city id of
///   at most four digits
pub fn resolve_location(tokens: &[String], api_key: Option<&str>) -> Result<Location> {
    match (tokens, api_key) {
        ([location], Some(api_key)) => {
            let location = location.trim();
            if location.is_empty() {
                return Err(Error::Usage("AccuWeather location key must not be empty".into()));
            }
            Ok(Location::ProviderKey {
                location: location.to_string(),
                api_key: api_key.to_string(),
            })
        }
        (_, Some(_)) => Err(Error::Usage(
            "An AccuWeather key takes exactly one location key argument".into(),
        )),
        ([lat, lon], None) => parse_lat_lon(lat, lon),
        ([token], None) => parse_postal_code_or_city(token),
        ([], None) => Err(Error::Usage("No location on command line".into())),
        (_, None) => Err(Error::Usage(format!(
            "Too many location arguments: expected at most 2, got {}",
            tokens.len()
        ))),
    }
}

fn parse_lat_lon(lat: &str, lon: &str) -> Result<Location> {
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Usage(format!("Invalid latitude: \"{lat}\"")))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Usage(format!("Invalid longitude: \"{lon}\"")))?;

    Ok(Location::LatLon { lat, lon })
}

fn parse_postal_code_or_city(token: &str) -> Result<Location> {
    static ZIP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(?P<zip>[0-9]{5})(?:-[0-9]{4})?$").unwrap());

    let token = token.trim();

    if let Some(caps) = ZIP_RE.captures(token) {
        return Ok(Location::PostalCode(caps["zip"].to_string()));
    }

    let is_city_id = !token.is_empty()
        && token.len() <= MAX_CITY_ID_DIGITS
        && token.bytes().all(|b| b.is_ascii_digit());
    let invalid = || Error::Usage(format!("Invalid ZIP Code/WMO City ID: \"{token}\""));
    if !is_city_id {
        return Err(invalid());
    }

    token.parse().map(Location::CityId).map_err(|_| invalid())
}
