//! Core library for `download-weather`.
//!
//! This crate defines:
//! - Location parsing and provider selection
//! - Fetching and normalizing forecasts from weather.gov, AccuWeather and WMO
//! - Icon-code translation tables
//! - Rendering a forecast window into a `$NAME` template
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;
pub mod template;

pub use config::{Config, EndpointConfig, HttpConfig};
pub use error::{EX_GENERAL, EX_UNAVAILABLE, EX_USAGE, Error, Result};
pub use location::{Location, resolve_location};
pub use model::{DailyForecast, FORECAST_DAYS, ForecastWindow, Units};
pub use provider::{Forecast, Provider, ProviderId};
pub use render::{RenderOptions, render};
pub use template::Template;
