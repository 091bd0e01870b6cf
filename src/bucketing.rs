use crate::calendar::{Calendar, DateKey};
use crate::models::{CategoryFilter, LogRecord};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Per-day event counts, kept in the order each day first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyBuckets {
    counts: Vec<(DateKey, u64)>,
    index: HashMap<DateKey, usize>,
}

impl DailyBuckets {
    pub fn collect(logs: &[LogRecord], filter: &CategoryFilter, calendar: Calendar) -> Self {
        let mut buckets = Self::default();
        let mut undated = 0usize;
        for log in logs.iter().filter(|log| filter.matches(log)) {
            match &log.date_obj {
                Some(instant) => buckets.record(calendar.day_of(instant)),
                None => undated += 1,
            }
        }
        if undated > 0 {
            debug!(undated, %filter, "skipped logs without a usable date");
        }
        buckets
    }

    pub fn record(&mut self, key: DateKey) {
        match self.index.get(&key) {
            Some(&slot) => self.counts[slot].1 = self.counts[slot].1.saturating_add(1),
            None => {
                self.index.insert(key, self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: DateKey) -> u64 {
        self.index
            .get(&key)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, key: DateKey) -> bool {
        self.index.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateKey, u64)> + '_ {
        self.counts.iter().copied()
    }

    pub fn active_days(&self) -> BTreeSet<DateKey> {
        self.counts.iter().map(|(key, _)| *key).collect()
    }
}

impl FromIterator<(DateKey, u64)> for DailyBuckets {
    fn from_iter<I: IntoIterator<Item = (DateKey, u64)>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for (key, count) in iter {
            match buckets.index.get(&key) {
                Some(&slot) => {
                    buckets.counts[slot].1 = buckets.counts[slot].1.saturating_add(count)
                }
                None => {
                    buckets.index.insert(key, buckets.counts.len());
                    buckets.counts.push((key, count));
                }
            }
        }
        buckets
    }
}

/// Logs whose calendar day is `key`.
pub fn logs_on_day<'a>(
    logs: &'a [LogRecord],
    key: DateKey,
    calendar: Calendar,
) -> Vec<&'a LogRecord> {
    logs.iter()
        .filter(|log| {
            log.date_obj
                .as_ref()
                .is_some_and(|instant| calendar.day_of(instant) == key)
        })
        .collect()
}
