//! Calendar-day handling shared by every statistic.
//!
//! A run picks one [`Calendar`] and derives every [`DateKey`] through it,
//! including "today". Keys from different conventions must never meet in one
//! pass.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// One calendar day. Displays and serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Signed number of days from `self` to `later`.
    pub fn days_until(&self, later: DateKey) -> i64 {
        (later.0 - self.0).num_days()
    }

    pub fn ordinal(&self) -> u32 {
        self.0.ordinal()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), KEY_FORMAT).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The midnight-to-midnight reference used to turn instants into days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Calendar {
    pub fn day_of(&self, instant: &DateTime<Utc>) -> DateKey {
        let date = match self {
            Calendar::Local => instant.with_timezone(&chrono::Local).date_naive(),
            Calendar::Utc => instant.date_naive(),
            Calendar::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        };
        DateKey(date)
    }
}

impl FromStr for Calendar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Calendar::Local),
            "utc" | "z" => Ok(Calendar::Utc),
            other => parse_offset(other).map(Calendar::Fixed),
        }
    }
}

fn parse_offset(raw: &str) -> Result<FixedOffset, String> {
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err("expected 'local', 'utc' or an offset like +02:00".to_string()),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| "offset must look like +HH:MM".to_string())?;
    let hours = two_digits(hours).ok_or_else(|| format!("bad offset hours '{hours}'"))?;
    let minutes = two_digits(minutes).ok_or_else(|| format!("bad offset minutes '{minutes}'"))?;
    if hours > 23 || minutes > 59 {
        return Err("offset out of range".to_string());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| "offset out of range".to_string())
}

fn two_digits(raw: &str) -> Option<i32> {
    match raw.as_bytes() {
        &[tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Some(i32::from(tens - b'0') * 10 + i32::from(ones - b'0'))
        }
        _ => None,
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The calendar and the day the statistics are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observer {
    pub calendar: Calendar,
    pub today: DateKey,
}

impl Observer {
    pub fn new(calendar: Calendar, clock: &dyn Clock) -> Self {
        Self {
            today: calendar.day_of(&clock.now()),
            calendar,
        }
    }

    pub fn at(calendar: Calendar, today: DateKey) -> Self {
        Self { calendar, today }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_key_formats_zero_padded() {
        let key = DateKey::ymd(2024, 1, 5).unwrap();
        assert_eq!(key.to_string(), "2024-01-05");
        assert_eq!("2024-01-05".parse::<DateKey>().unwrap(), key);
    }

    #[test]
    fn offset_calendar_moves_late_instants_to_next_day() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        assert_eq!(Calendar::Utc.day_of(&instant).to_string(), "2024-03-09");

        let plus_two: Calendar = "+02:00".parse().unwrap();
        assert_eq!(plus_two.day_of(&instant).to_string(), "2024-03-10");

        let minus_five: Calendar = "-05:00".parse().unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap();
        assert_eq!(minus_five.day_of(&early).to_string(), "2024-03-09");
    }

    #[test]
    fn calendar_rejects_garbage() {
        assert!("mars".parse::<Calendar>().is_err());
        assert!("+25:00".parse::<Calendar>().is_err());
        assert!("+0200".parse::<Calendar>().is_err());
        assert!("+-05:00".parse::<Calendar>().is_err());
        assert!("+01:-30".parse::<Calendar>().is_err());
        assert!("+1:30".parse::<Calendar>().is_err());
        assert!("+01:3".parse::<Calendar>().is_err());
        assert!("+ 1:30".parse::<Calendar>().is_err());
        assert_eq!(
            "-09:30".parse::<Calendar>().unwrap(),
            Calendar::Fixed(FixedOffset::west_opt(9 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!("UTC".parse::<Calendar>().unwrap(), Calendar::Utc);
        assert_eq!("local".parse::<Calendar>().unwrap(), Calendar::Local);
    }

    #[test]
    fn observer_takes_today_from_clock() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap());
        let observer = Observer::new(Calendar::Utc, &clock);
        assert_eq!(observer.today, DateKey::ymd(2024, 1, 5).unwrap());
        assert_eq!(observer.today.ordinal(), 5);
    }
}
