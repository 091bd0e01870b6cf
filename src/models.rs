use crate::calendar::DateKey;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub date_obj: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub event_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub color: String,
}

fn enabled_by_default() -> bool {
    true
}

/// What the persistence layer hands over: every log and every category.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub logs: Vec<LogRecord>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// `All`, or one category matched by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn category(ident: impl Into<String>) -> Self {
        Self::Category(ident.into())
    }

    pub fn matches(&self, log: &LogRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(ident) => {
                log.category_id.as_deref() == Some(ident.as_str()) || log.category == *ident
            }
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(ident) => f.write_str(ident),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(trimmed.to_string()))
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Totals {
    pub count: u64,
    pub days_elapsed: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TopDay {
    pub date_key: DateKey,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Ratio {
    pub count_a: u64,
    pub count_b: u64,
    pub percent: u64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct HeatmapDay {
    pub date: DateKey,
    pub count: u64,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub active_days: u32,
    pub goal: u32,
    pub percent: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryShare {
    pub id: String,
    pub name: String,
    pub color: String,
    pub enabled: bool,
    pub count: u64,
    pub percent: u64,
}

/// Parses the timestamp shapes the API has produced over time: RFC 3339,
/// a naive ISO datetime or a bare `YYYY-MM-DD`.
///
/// Naive values are taken as UTC whatever the run's calendar is.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// Bad dates must not reject the whole snapshot; the record just loses its day.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => parse_instant(&raw),
        Some(serde_json::Value::Number(millis)) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn log_record_reads_api_shape() {
        let raw = r#"{
            "id": "log-1",
            "timestamp": "12 oct, 14:23",
            "dateObj": "2024-10-12T14:23:01.000Z",
            "eventName": "Rutina",
            "category": "Ejercicio",
            "categoryId": "cat-2",
            "intensity": 60,
            "status": "COMPLETED"
        }"#;
        let log: LogRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(log.id, "log-1");
        assert_eq!(
            log.date_obj,
            Some(Utc.with_ymd_and_hms(2024, 10, 12, 14, 23, 1).unwrap())
        );
        assert_eq!(log.category_id.as_deref(), Some("cat-2"));
        assert_eq!(log.event_name, "Rutina");
    }

    #[test]
    fn malformed_or_missing_dates_become_none() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"logs": [
                {"id": "a", "dateObj": "not a date", "category": "X"},
                {"id": "b", "category": "X"},
                {"id": "c", "dateObj": null, "category": "X"},
                {"id": "d", "dateObj": {"nested": true}, "category": "X"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.logs.len(), 4);
        assert!(snapshot.logs.iter().all(|log| log.date_obj.is_none()));
        assert!(snapshot.categories.is_empty());
    }

    #[test]
    fn numeric_dates_are_epoch_millis() {
        let log: LogRecord =
            serde_json::from_str(r#"{"id": "n", "dateObj": 1704067200000}"#).unwrap();
        assert_eq!(
            log.date_obj,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_instant_accepts_date_only_and_naive() {
        assert_eq!(
            parse_instant("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_instant("2024-01-02T08:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_instant("2024-01-02T08:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 6, 30, 0).unwrap())
        );
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn filter_matches_by_id_or_name() {
        let log = LogRecord {
            id: "1".into(),
            category_id: Some("cat-1".into()),
            category: "Lectura".into(),
            ..Default::default()
        };
        assert!(CategoryFilter::All.matches(&log));
        assert!(CategoryFilter::category("cat-1").matches(&log));
        assert!(CategoryFilter::category("Lectura").matches(&log));
        assert!(!CategoryFilter::category("Ejercicio").matches(&log));
    }

    #[test]
    fn filter_parses_all_case_insensitively() {
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            " Lectura ".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::category("Lectura")
        );
        assert_eq!(CategoryFilter::category("cat-9").to_string(), "cat-9");
    }
}
