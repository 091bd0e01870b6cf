use crate::calendar::{Calendar, Clock, FixedClock, SystemClock};
use crate::errors::ConfigError;
use crate::heatmap::HeatmapRange;
use crate::locale::Locale;
use crate::models::{CategoryFilter, parse_instant};
use crate::stats::{DEFAULT_WEEKLY_GOAL, ViewSettings};
use chrono::{DateTime, Utc};
use std::{env, path::PathBuf};

const DEFAULT_DATA_PATH: &str = "data/snapshot.json";
const NOW_FORMATS: &str =
    "expected an RFC 3339 timestamp, a UTC datetime like 2024-01-05T12:00:00 or a YYYY-MM-DD date";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub calendar: Calendar,
    /// Pins "today" instead of reading the system clock.
    pub now: Option<DateTime<Utc>>,
    pub view: ViewSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_path = get("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let calendar = match get("APP_CALENDAR") {
            Some(raw) => raw
                .parse::<Calendar>()
                .map_err(|reason| ConfigError::invalid("APP_CALENDAR", raw, reason))?,
            None => Calendar::default(),
        };

        let now = match get("APP_NOW") {
            Some(raw) => Some(parse_instant(&raw).ok_or_else(|| {
                ConfigError::invalid("APP_NOW", raw.clone(), NOW_FORMATS)
            })?),
            None => None,
        };

        let heatmap_range = match get("APP_HEATMAP_RANGE") {
            Some(raw) => raw
                .parse::<HeatmapRange>()
                .map_err(|reason| ConfigError::invalid("APP_HEATMAP_RANGE", raw, reason))?,
            None => HeatmapRange::default(),
        };

        let weekly_goal = match get("APP_WEEKLY_GOAL") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
                ConfigError::invalid("APP_WEEKLY_GOAL", raw.clone(), err.to_string())
            })?,
            None => DEFAULT_WEEKLY_GOAL,
        };

        let locale = match get("APP_LOCALE") {
            Some(raw) => raw
                .parse::<Locale>()
                .map_err(|reason| ConfigError::invalid("APP_LOCALE", raw, reason))?,
            None => Locale::default(),
        };

        let filter_from = |key: &str| -> CategoryFilter {
            get(key)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default()
        };

        Ok(Self {
            data_path,
            calendar,
            now,
            view: ViewSettings {
                filter: filter_from("APP_FILTER"),
                ratio_a: filter_from("APP_RATIO_A"),
                ratio_b: filter_from("APP_RATIO_B"),
                heatmap_range,
                weekly_goal,
                locale,
            },
        })
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.now {
            Some(now) => Box::new(FixedClock(now)),
            None => Box::new(SystemClock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/snapshot.json"));
        assert_eq!(config.calendar, Calendar::Local);
        assert!(config.now.is_none());
        assert_eq!(config.view, ViewSettings::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("APP_DATA_PATH", "/tmp/logs.json"),
            ("APP_CALENDAR", "utc"),
            ("APP_NOW", "2024-01-05T12:00:00Z"),
            ("APP_FILTER", "Lectura"),
            ("APP_RATIO_A", "cat-1"),
            ("APP_RATIO_B", "all"),
            ("APP_HEATMAP_RANGE", "3m"),
            ("APP_WEEKLY_GOAL", "5"),
            ("APP_LOCALE", "en"),
        ])
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/logs.json"));
        assert_eq!(config.calendar, Calendar::Utc);
        let pinned = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(config.now, Some(pinned));
        assert_eq!(config.clock().now(), pinned);
        assert_eq!(config.view.filter, CategoryFilter::category("Lectura"));
        assert_eq!(config.view.ratio_a, CategoryFilter::category("cat-1"));
        assert_eq!(config.view.ratio_b, CategoryFilter::All);
        assert_eq!(config.view.heatmap_range, HeatmapRange::ThreeMonths);
        assert_eq!(config.view.weekly_goal, 5);
        assert_eq!(config.view.locale, Locale::En);
    }

    #[test]
    fn now_accepts_every_documented_format() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let formats = [
            "2024-01-05T00:00:00Z",
            "2024-01-05T01:00:00+01:00",
            "2024-01-05T00:00:00",
            "2024-01-05",
        ];
        for raw in formats {
            let config = config_from(&[("APP_NOW", raw)]).unwrap();
            assert_eq!(config.now, Some(expected), "{raw}");
        }
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[("APP_WEEKLY_GOAL", "seven")]).unwrap_err();
        assert!(err.to_string().starts_with("APP_WEEKLY_GOAL"));

        let err = config_from(&[("APP_CALENDAR", "mars")]).unwrap_err();
        assert!(err.to_string().contains("mars"));

        let err = config_from(&[("APP_NOW", "soon")]).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
        assert!(config_from(&[("APP_HEATMAP_RANGE", "2W")]).is_err());
    }
}
