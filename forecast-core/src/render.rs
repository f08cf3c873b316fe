use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    error::Result,
    model::{FORECAST_DAYS, ForecastWindow, Units},
    template::Template,
};

/// Suffixes of the per-day keys: `DAY_ONE`, `HIGH_TWO`, ...
pub const DAY_NUMBERS: [&str; FORECAST_DAYS] = ["ONE", "TWO", "THREE", "FOUR"];

/// Format of the `DATE` substitution.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Display is mounted upside down.
    pub rotated: bool,
    pub units: Units,
}

/// Substitution map for one render.
///
/// `DAY_<N>` is the weekday of `start_date + (N - 1)` days.
pub fn substitutions(
    window: &ForecastWindow,
    options: RenderOptions,
    now: NaiveDateTime,
) -> HashMap<String, String> {
    let mut map = HashMap::from([
        ("ROTATION".to_string(), if options.rotated { "180" } else { "0" }.to_string()),
        ("DATE".to_string(), now.format(DATE_FORMAT).to_string()),
        ("UNIT".to_string(), options.units.letter().to_string()),
    ]);

    for (offset, (number, day)) in DAY_NUMBERS.iter().zip(&window.days).enumerate() {
        map.insert(format!("DAY_{number}"), window.weekday_name(offset));
        map.insert(format!("HIGH_{number}"), day.high.clone());
        map.insert(format!("LOW_{number}"), day.low.clone());
        map.insert(format!("ICON_{number}"), day.icon.clone());
    }

    map
}

pub fn render(
    template: &Template,
    window: &ForecastWindow,
    options: RenderOptions,
    now: NaiveDateTime,
) -> Result<String> {
    template.substitute(&substitutions(window, options, now))
}
