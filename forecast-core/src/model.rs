use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Number of days every forecast window carries.
pub const FORECAST_DAYS: usize = 4;

/// Temperature units requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn from_metric_flag(metric: bool) -> Self {
        if metric { Units::Metric } else { Units::Imperial }
    }

    pub fn is_metric(self) -> bool {
        self == Units::Metric
    }

    /// Unit letter shown in rendered output.
    pub fn letter(self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
        }
    }
}

/// One normalized forecast day.
///
/// Temperatures stay textual: they are only ever substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyForecast {
    /// Date reported by the provider, when it reports one per day.
    pub date: Option<NaiveDate>,
    pub high: String,
    pub low: String,
    pub icon: String,
}

/// Exactly [`FORECAST_DAYS`] consecutive days, in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastWindow {
    pub start_date: NaiveDate,
    pub days: [DailyForecast; FORECAST_DAYS],
}

impl ForecastWindow {
    pub fn new(start_date: NaiveDate, days: Vec<DailyForecast>) -> Result<Self> {
        let found = days.len();
        let days = days.try_into().map_err(|_| {
            Error::Data(format!("expected {FORECAST_DAYS} forecast days, got {found}"))
        })?;

        Ok(Self { start_date, days })
    }

    /// Calendar date of the day at `offset`, counted from `start_date`.
    ///
    /// Per-day provider dates are not consulted.
    pub fn date_of(&self, offset: usize) -> NaiveDate {
        self.start_date + chrono::Duration::days(offset as i64)
    }

    /// Full weekday name ("Monday") of the day at `offset`.
    pub fn weekday_name(&self, offset: usize) -> String {
        self.date_of(offset).format("%A").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(high: &str) -> DailyForecast {
        DailyForecast { date: None, high: high.into(), low: "40".into(), icon: "skc".into() }
    }

    #[test]
    fn window_requires_exactly_four_days() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

        let err = ForecastWindow::new(start, vec![day("1"), day("2"), day("3")]).unwrap_err();
        assert!(err.to_string().contains("expected 4 forecast days, got 3"));

        let window = ForecastWindow::new(start, vec![day("1"), day("2"), day("3"), day("4")])
            .expect("four days are accepted");
        assert_eq!(window.days[3].high, "4");
    }

    #[test]
    fn weekday_names_are_derived_from_start_date() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        let window =
            ForecastWindow::new(start, vec![day("1"), day("2"), day("3"), day("4")]).unwrap();

        assert_eq!(window.weekday_name(0), "Saturday");
        assert_eq!(window.weekday_name(1), "Sunday");
        assert_eq!(window.weekday_name(2), "Monday");
        assert_eq!(window.date_of(3), NaiveDate::from_ymd_opt(2024, 5, 14).unwrap());
    }

    #[test]
    fn units_letters() {
        assert_eq!(Units::from_metric_flag(true).letter(), "C");
        assert_eq!(Units::from_metric_flag(false).letter(), "F");
        assert_eq!(Units::default(), Units::Imperial);
    }
}
