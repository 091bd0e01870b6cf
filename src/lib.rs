pub mod bucketing;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod heatmap;
pub mod locale;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;

pub use bucketing::{DailyBuckets, logs_on_day};
pub use calendar::{Calendar, Clock, DateKey, FixedClock, Observer, SystemClock};
pub use config::Config;
pub use heatmap::{HeatmapRange, compute_heatmap};
pub use models::{Category, CategoryFilter, LogRecord, Snapshot};
pub use state::{Dashboard, DataEvent};
pub use stats::{
    StatsReport, ViewSettings, build_report, compute_category_breakdown, compute_current_streak,
    compute_longest_streak, compute_ratio, compute_top_day, compute_totals,
    compute_weekly_progress,
};
pub use storage::{load_snapshot, read_snapshot};
