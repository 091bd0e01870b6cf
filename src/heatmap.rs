use crate::bucketing::DailyBuckets;
use crate::calendar::{DateKey, Observer};
use crate::models::{CategoryFilter, HeatmapDay, LogRecord};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HeatmapRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "12M")]
    Year,
}

impl HeatmapRange {
    /// Inclusive first and last day shown for this range.
    pub fn bounds(&self, today: DateKey) -> (DateKey, DateKey) {
        let back = match self {
            HeatmapRange::OneMonth => 30,
            HeatmapRange::ThreeMonths => 90,
            HeatmapRange::SixMonths => 180,
            HeatmapRange::Year => {
                let year = today.date().year();
                let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today.date());
                let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today.date());
                return (DateKey::new(first), DateKey::new(last));
            }
        };
        let start = today
            .date()
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN);
        (DateKey::new(start), today)
    }
}

impl fmt::Display for HeatmapRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeatmapRange::OneMonth => "1M",
            HeatmapRange::ThreeMonths => "3M",
            HeatmapRange::SixMonths => "6M",
            HeatmapRange::Year => "12M",
        })
    }
}

impl FromStr for HeatmapRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1M" => Ok(HeatmapRange::OneMonth),
            "3M" => Ok(HeatmapRange::ThreeMonths),
            "6M" => Ok(HeatmapRange::SixMonths),
            "12M" => Ok(HeatmapRange::Year),
            _ => Err("expected one of 1M, 3M, 6M, 12M".to_string()),
        }
    }
}

pub fn intensity_level(count: u64) -> u8 {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=7 => 2,
        8..=10 => 3,
        _ => 4,
    }
}

pub fn compute_heatmap(
    logs: &[LogRecord],
    filter: &CategoryFilter,
    range: HeatmapRange,
    observer: &Observer,
) -> Vec<HeatmapDay> {
    let buckets = DailyBuckets::collect(logs, filter, observer.calendar);
    heatmap_days(&buckets, range, observer.today)
}

pub fn heatmap_days(
    buckets: &DailyBuckets,
    range: HeatmapRange,
    today: DateKey,
) -> Vec<HeatmapDay> {
    let (start, end) = range.bounds(today);
    let mut days = Vec::with_capacity(start.days_until(end).max(0) as usize + 1);
    let mut cursor = Some(start);
    while let Some(day) = cursor.filter(|day| *day <= end) {
        let count = buckets.count(day);
        days.push(HeatmapDay {
            date: day,
            count,
            level: intensity_level(count),
        });
        cursor = day.succ();
    }
    days
}
