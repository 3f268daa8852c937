use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparison::{branch_averages, compare_groups, course_averages, course_type_counts};
use crate::engagement::engagement_scatter;
use crate::filter::{apply_filters, ComparisonField, FilterOptions, Filters};
use crate::leaderboard::{top_courses, Leaderboard};
use crate::models::{
    CourseRanking, CourseTypeCount, EngagementScatter, GroupAverages, GroupComparison,
    MonthlyTrend, OverviewKpis, TrainingRecord,
};
use crate::overview::overview;
use crate::risk::ActionableInsights;
use crate::store::RecordStore;
use crate::thresholds::Thresholds;
use crate::trend::monthly_trends;

/// Every derived view for one filter and threshold setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub overview: OverviewKpis,
    pub leaderboard: Leaderboard,
    pub insights: ActionableInsights,
    pub top_courses: Vec<CourseRanking>,
    pub course_analysis: Vec<GroupAverages>,
    pub branch_comparison: Vec<GroupAverages>,
    pub course_types: Vec<CourseTypeCount>,
    pub trends: Vec<MonthlyTrend>,
    pub engagement: EngagementScatter,
}

/// The record store plus the user's current filters and thresholds.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    store: RecordStore,
    filters: Filters,
    thresholds: Thresholds,
}

impl Dashboard {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            filters: Filters::default(),
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Filter choices offered from the full, unfiltered dataset.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(self.store.records())
    }

    pub fn filtered(&self) -> Vec<TrainingRecord> {
        let filtered = apply_filters(self.store.records(), &self.filters);
        debug!(
            total = self.store.len(),
            kept = filtered.len(),
            "applied filters"
        );
        filtered
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let records = self.filtered();
        let snapshot = DashboardSnapshot {
            overview: overview(&records),
            leaderboard: Leaderboard::build(&records),
            insights: ActionableInsights::build(&records, &self.thresholds),
            top_courses: top_courses(&records),
            course_analysis: course_averages(&records),
            branch_comparison: branch_averages(&records),
            course_types: course_type_counts(&records),
            trends: monthly_trends(&records),
            engagement: engagement_scatter(&records),
        };
        debug!(
            at_risk = snapshot.insights.at_risk.len(),
            courses_flagged = snapshot.insights.courses.len(),
            months = snapshot.trends.len(),
            "derived dashboard snapshot"
        );
        snapshot
    }

    /// Compares two groups drawn from the full dataset; the group selection
    /// replaces the dashboard filters.
    pub fn compare(&self, field: ComparisonField, left: &str, right: &str) -> GroupComparison {
        compare_groups(self.store.records(), field, left, right)
    }
}
