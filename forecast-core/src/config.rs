use directories::ProjectDirs;
use reqwest::{Certificate, Client};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    provider::{ProviderId, accuweather, weather_gov, wmo},
};

/// Per-provider endpoint override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
}

/// Settings for the single HTTP client a run uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// PEM bundle of extra root certificates to trust.
    pub ca_bundle: Option<PathBuf>,
    pub user_agent: Option<String>,
}

/// Optional configuration file. Every field has a working default.
///
/// Example TOML:
/// [wmo]
/// base_url = "https://worldweather.wmo.int"
///
/// [http]
/// ca_bundle = "/etc/ssl/certs/cacert.pem"
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub weather_gov: EndpointConfig,
    pub accuweather: EndpointConfig,
    pub wmo: EndpointConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Load the config from the platform config dir, or defaults if there is none.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("Failed to read config file {}: {err}", path.display()))
        })?;

        Self::from_toml_str(&contents)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|err| Error::Config(format!("Failed to parse config: {err}")))
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "download-weather", "download-weather").ok_or_else(
            || Error::Config("Could not determine platform config directory".into()),
        )?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Base URL for a provider, falling back to its public endpoint.
    pub fn base_url(&self, id: ProviderId) -> &str {
        let (endpoint, default) = match id {
            ProviderId::WeatherGov => (&self.weather_gov, weather_gov::DEFAULT_BASE_URL),
            ProviderId::AccuWeather => (&self.accuweather, accuweather::DEFAULT_BASE_URL),
            ProviderId::Wmo => (&self.wmo, wmo::DEFAULT_BASE_URL),
        };

        endpoint.base_url.as_deref().unwrap_or(default)
    }

    /// Build the HTTP client, trusting `ca_bundle` roots in addition to the defaults.
    pub fn http_client(&self) -> Result<Client> {
        let user_agent = self
            .http
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("download-weather/", env!("CARGO_PKG_VERSION")).into());

        let mut builder = Client::builder().user_agent(user_agent);

        if let Some(path) = &self.http.ca_bundle {
            let pem = fs::read(path).map_err(|err| {
                Error::Config(format!("Failed to read CA bundle {}: {err}", path.display()))
            })?;
            let certs = Certificate::from_pem_bundle(&pem).map_err(|err| {
                Error::Config(format!("Invalid CA bundle {}: {err}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), count = certs.len(), "trusting extra roots");

            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        builder
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))
    }
}
