use crate::calendar::DateKey;
use chrono::Datelike;
use serde::Serialize;
use std::str::FromStr;

const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn month_labels(&self) -> &'static [&'static str; 12] {
        match self {
            Locale::Es => &MONTHS_ES,
            Locale::En => &MONTHS_EN,
        }
    }

    /// `12 Oct` style label for summary cards.
    pub fn short_date(&self, key: DateKey) -> String {
        let date = key.date();
        let month = self.month_labels()[date.month0() as usize];
        format!("{} {}", date.day(), month)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.trim().to_ascii_lowercase();
        match lang.split(['-', '_']).next().unwrap_or_default() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            _ => Err("supported locales are 'es' and 'en'".to_string()),
        }
    }
}
