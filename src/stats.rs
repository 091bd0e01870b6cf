use crate::bucketing::DailyBuckets;
use crate::calendar::{DateKey, Observer};
use crate::heatmap::{HeatmapRange, heatmap_days};
use crate::locale::Locale;
use crate::models::{
    Category, CategoryFilter, CategoryShare, HeatmapDay, LogRecord, Ratio, Snapshot, TopDay,
    Totals, WeeklyProgress,
};
use chrono::{Datelike, Days};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_WEEKLY_GOAL: u32 = 7;

/// Which slice of the data a report is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub filter: CategoryFilter,
    pub ratio_a: CategoryFilter,
    pub ratio_b: CategoryFilter,
    pub heatmap_range: HeatmapRange,
    pub weekly_goal: u32,
    pub locale: Locale,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::All,
            ratio_a: CategoryFilter::All,
            ratio_b: CategoryFilter::All,
            heatmap_range: HeatmapRange::default(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            locale: Locale::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopDayView {
    pub date: DateKey,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatioView {
    pub filter_a: CategoryFilter,
    pub filter_b: CategoryFilter,
    #[serde(flatten)]
    pub ratio: Ratio,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapView {
    pub range: HeatmapRange,
    pub months: Vec<&'static str>,
    pub days: Vec<HeatmapDay>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsReport {
    pub today: DateKey,
    pub filter: CategoryFilter,
    pub totals: Totals,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub top_day: Option<TopDayView>,
    pub ratio: RatioView,
    pub weekly_progress: WeeklyProgress,
    pub heatmap: HeatmapView,
    pub categories: Vec<CategoryShare>,
}

pub fn compute_totals(logs: &[LogRecord], filter: &CategoryFilter, observer: &Observer) -> Totals {
    Totals {
        count: count_matching(logs, filter),
        days_elapsed: observer.today.ordinal(),
    }
}

pub fn compute_current_streak(
    logs: &[LogRecord],
    filter: &CategoryFilter,
    observer: &Observer,
) -> u32 {
    let buckets = DailyBuckets::collect(logs, filter, observer.calendar);
    current_streak(&buckets, observer.today)
}

pub fn compute_longest_streak(
    logs: &[LogRecord],
    filter: &CategoryFilter,
    observer: &Observer,
) -> u32 {
    let buckets = DailyBuckets::collect(logs, filter, observer.calendar);
    longest_streak(&buckets)
}

pub fn compute_top_day(
    logs: &[LogRecord],
    filter: &CategoryFilter,
    observer: &Observer,
) -> Option<TopDay> {
    let buckets = DailyBuckets::collect(logs, filter, observer.calendar);
    top_day(&buckets)
}

pub fn compute_ratio(
    logs: &[LogRecord],
    filter_a: &CategoryFilter,
    filter_b: &CategoryFilter,
) -> Ratio {
    let count_a = count_matching(logs, filter_a);
    let count_b = count_matching(logs, filter_b);
    Ratio {
        count_a,
        count_b,
        percent: rounded_percent(count_a, count_b),
    }
}

pub fn compute_weekly_progress(
    logs: &[LogRecord],
    filter: &CategoryFilter,
    goal: u32,
    observer: &Observer,
) -> WeeklyProgress {
    let buckets = DailyBuckets::collect(logs, filter, observer.calendar);
    weekly_progress(&buckets, goal, observer.today)
}

pub fn compute_category_breakdown(
    logs: &[LogRecord],
    categories: &[Category],
) -> Vec<CategoryShare> {
    let total = logs.len() as u64;
    let mut shares: Vec<CategoryShare> = categories
        .iter()
        .map(|category| {
            let count = logs
                .iter()
                .filter(|log| {
                    log.category_id.as_deref() == Some(category.id.as_str())
                        || log.category == category.name
                })
                .count() as u64;
            CategoryShare {
                id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                enabled: category.enabled,
                count,
                percent: rounded_percent(count, total),
            }
        })
        .collect();
    shares.sort_by(|a, b| b.percent.cmp(&a.percent));
    shares
}

/// Consecutive active days ending today, or ending yesterday when today is
/// still empty.
pub fn current_streak(buckets: &DailyBuckets, today: DateKey) -> u32 {
    let start = if buckets.contains(today) {
        Some(today)
    } else {
        today.pred().filter(|yesterday| buckets.contains(*yesterday))
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor.filter(|day| buckets.contains(*day)) {
        streak += 1;
        cursor = day.pred();
    }
    streak
}

pub fn longest_streak(buckets: &DailyBuckets) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<DateKey> = None;
    for day in buckets.active_days() {
        run = match previous {
            Some(prev) if prev.days_until(day) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Busiest day; ties go to the day that appeared first.
pub fn top_day(buckets: &DailyBuckets) -> Option<TopDay> {
    let mut best: Option<TopDay> = None;
    for (date_key, count) in buckets.iter() {
        if best.is_none_or(|top| count > top.count) {
            best = Some(TopDay { date_key, count });
        }
    }
    best
}

pub fn weekly_progress(buckets: &DailyBuckets, goal: u32, today: DateKey) -> WeeklyProgress {
    let since_monday = u64::from(today.date().weekday().num_days_from_monday());
    let monday = today
        .date()
        .checked_sub_days(Days::new(since_monday))
        .map(DateKey::new)
        .unwrap_or(today);
    let active_days = buckets
        .iter()
        .filter(|(day, _)| *day >= monday && *day <= today)
        .count() as u32;

    WeeklyProgress {
        active_days,
        goal,
        percent: rounded_percent(u64::from(active_days), u64::from(goal)),
    }
}

pub fn build_report(snapshot: &Snapshot, view: &ViewSettings, observer: &Observer) -> StatsReport {
    let logs = &snapshot.logs;
    let buckets = DailyBuckets::collect(logs, &view.filter, observer.calendar);
    debug!(
        logs = logs.len(),
        active_days = buckets.len(),
        filter = %view.filter,
        today = %observer.today,
        "computing stats report"
    );

    let top_day = top_day(&buckets).map(|top| TopDayView {
        date: top.date_key,
        label: view.locale.short_date(top.date_key),
        count: top.count,
    });

    let categories = compute_category_breakdown(logs, &snapshot.categories)
        .into_iter()
        .filter(|share| share.enabled)
        .collect();

    StatsReport {
        today: observer.today,
        filter: view.filter.clone(),
        totals: compute_totals(logs, &view.filter, observer),
        current_streak: current_streak(&buckets, observer.today),
        longest_streak: longest_streak(&buckets),
        top_day,
        ratio: RatioView {
            filter_a: view.ratio_a.clone(),
            filter_b: view.ratio_b.clone(),
            ratio: compute_ratio(logs, &view.ratio_a, &view.ratio_b),
        },
        weekly_progress: weekly_progress(&buckets, view.weekly_goal, observer.today),
        heatmap: HeatmapView {
            range: view.heatmap_range,
            months: view.locale.month_labels().to_vec(),
            days: heatmap_days(&buckets, view.heatmap_range, observer.today),
        },
        categories,
    }
}

fn count_matching(logs: &[LogRecord], filter: &CategoryFilter) -> u64 {
    logs.iter().filter(|log| filter.matches(log)).count() as u64
}

// Saturates to zero on an empty denominator.
fn rounded_percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u64
}
