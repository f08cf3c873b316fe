use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser};
use forecast_core::{
    Config, Forecast, Provider, RenderOptions, Template, Units, render, resolve_location,
};
use tracing::{info, warn};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "download-weather",
    version,
    about = "Render a four-day weather forecast into a text template",
    after_help = "LOCATION forms:\n  \
        <zip>                    weather.gov, e.g. 19104 or 19104-1234\n  \
        <latitude> <longitude>   weather.gov\n  \
        <city_id>                WMO city id (up to 4 digits)\n  \
        -k <key> <location>      AccuWeather location key\n\n\
        Exit codes: 0 success, 1 general error, 64 usage, 69 weather data unavailable."
)]
pub struct Cli {
    /// ZIP code, latitude and longitude, WMO city id, or AccuWeather location key.
    #[arg(required = true, num_args = 1..=2, allow_negative_numbers = true)]
    pub location: Vec<String>,

    /// Rotate the output image 180 degrees.
    #[arg(short, long)]
    pub rotated: bool,

    /// Output with metric units (AccuWeather and WMO only).
    #[arg(short, long)]
    pub metric: bool,

    /// Template file, or `-` for standard input.
    #[arg(short, long, value_name = "TEMPLATE", default_value = "-")]
    pub template: PathBuf,

    /// AccuWeather API key.
    #[arg(short = 'k', long = "key", value_name = "ACCUWEATHER_KEY")]
    pub key: Option<String>,

    /// Config file; defaults to `config.toml` in the platform config directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let location = resolve_location(&self.location, self.key.as_deref())?;
        let units = Units::from_metric_flag(self.metric);
        let provider = Provider::for_location(location, units, &config)?;
        let forecast = Forecast::new(provider, config.http_client()?);

        let window = forecast.fetch().await?;
        info!(start = %window.start_date, "forecast downloaded");

        let template = read_template(&self.template)?;
        let options = RenderOptions { rotated: self.rotated, units };
        let output = render(&template, window, options, Local::now().naive_local())?;

        println!("{output}");
        Ok(())
    }
}

fn read_template(path: &Path) -> anyhow::Result<Template> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin().lock();
        if stdin.is_terminal() {
            warn!("Reading template from a terminal");
        }

        return template_from_reader(stdin).context("Failed to read template from stdin");
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;
    Ok(Template::new(source))
}

fn template_from_reader(mut reader: impl Read) -> io::Result<Template> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(Template::new(source))
}
