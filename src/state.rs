use crate::bucketing::logs_on_day;
use crate::calendar::{Calendar, Clock, DateKey, Observer};
use crate::config::Config;
use crate::heatmap::HeatmapRange;
use crate::locale::Locale;
use crate::models::{Category, CategoryFilter, LogRecord, Snapshot};
use crate::stats::{StatsReport, ViewSettings, build_report};
use tracing::debug;

/// Something the data source or the viewer changed.
#[derive(Debug, Clone)]
pub enum DataEvent {
    SnapshotReplaced(Snapshot),
    LogsReplaced(Vec<LogRecord>),
    CategoriesReplaced(Vec<Category>),
    FilterChanged(CategoryFilter),
    RatioChanged { a: CategoryFilter, b: CategoryFilter },
    HeatmapRangeChanged(HeatmapRange),
    WeeklyGoalChanged(u32),
    LocaleChanged(Locale),
}

/// Holds the latest snapshot and recomputes the whole report on every event.
pub struct Dashboard {
    snapshot: Snapshot,
    view: ViewSettings,
    calendar: Calendar,
    clock: Box<dyn Clock>,
    report: StatsReport,
}

impl Dashboard {
    pub fn new(
        snapshot: Snapshot,
        view: ViewSettings,
        calendar: Calendar,
        clock: Box<dyn Clock>,
    ) -> Self {
        let observer = Observer::new(calendar, clock.as_ref());
        let report = build_report(&snapshot, &view, &observer);
        Self {
            snapshot,
            view,
            calendar,
            clock,
            report,
        }
    }

    pub fn from_config(config: &Config, snapshot: Snapshot) -> Self {
        Self::new(snapshot, config.view.clone(), config.calendar, config.clock())
    }

    pub fn handle(&mut self, event: DataEvent) -> &StatsReport {
        match event {
            DataEvent::SnapshotReplaced(snapshot) => self.snapshot = snapshot,
            DataEvent::LogsReplaced(logs) => self.snapshot.logs = logs,
            DataEvent::CategoriesReplaced(categories) => self.snapshot.categories = categories,
            DataEvent::FilterChanged(filter) => self.view.filter = filter,
            DataEvent::RatioChanged { a, b } => {
                self.view.ratio_a = a;
                self.view.ratio_b = b;
            }
            DataEvent::HeatmapRangeChanged(range) => self.view.heatmap_range = range,
            DataEvent::WeeklyGoalChanged(goal) => self.view.weekly_goal = goal,
            DataEvent::LocaleChanged(locale) => self.view.locale = locale,
        }
        self.refresh()
    }

    /// Recomputes against the clock's current day without any data change.
    pub fn refresh(&mut self) -> &StatsReport {
        let observer = self.observer();
        debug!(today = %observer.today, "recomputing dashboard");
        self.report = build_report(&self.snapshot, &self.view, &observer);
        &self.report
    }

    pub fn report(&self) -> &StatsReport {
        &self.report
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn observer(&self) -> Observer {
        Observer::new(self.calendar, self.clock.as_ref())
    }

    pub fn logs_on(&self, key: DateKey) -> Vec<&LogRecord> {
        logs_on_day(&self.snapshot.logs, key, self.calendar)
    }
}
