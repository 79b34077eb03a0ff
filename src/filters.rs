// 🔎 Review Filters
//
// One optional field per filter axis. Axes combine with AND; the set-valued
// axes (ratings, sentiments) are an OR over their members. An absent field
// or an empty set means "no constraint on this axis".

use crate::entities::{BranchRegistry, Rating, Review, Sentiment};
use crate::error::InsightsError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TIME PERIOD
// ============================================================================

/// Named relative window ending at "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
    #[serde(rename = "1year")]
    LastYear,
    #[serde(rename = "all")]
    All,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Last7Days => "7days",
            TimePeriod::Last30Days => "30days",
            TimePeriod::Last90Days => "90days",
            TimePeriod::LastYear => "1year",
            TimePeriod::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Last7Days => "Last 7 Days",
            TimePeriod::Last30Days => "Last 30 Days",
            TimePeriod::Last90Days => "Last 90 Days",
            TimePeriod::LastYear => "Last Year",
            TimePeriod::All => "All Time",
        }
    }

    /// Start of the window ending at `now`, or `None` for `All`.
    ///
    /// `1year` is one calendar year, the others are whole days.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimePeriod::Last7Days => Some(now - Duration::days(7)),
            TimePeriod::Last30Days => Some(now - Duration::days(30)),
            TimePeriod::Last90Days => Some(now - Duration::days(90)),
            TimePeriod::LastYear => now
                .checked_sub_months(Months::new(12))
                .or_else(|| Some(now - Duration::days(365))),
            TimePeriod::All => None,
        }
    }

    /// Cycle order used by the terminal dashboard
    pub fn next(&self) -> Self {
        match self {
            TimePeriod::All => TimePeriod::Last7Days,
            TimePeriod::Last7Days => TimePeriod::Last30Days,
            TimePeriod::Last30Days => TimePeriod::Last90Days,
            TimePeriod::Last90Days => TimePeriod::LastYear,
            TimePeriod::LastYear => TimePeriod::All,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7days" => Ok(TimePeriod::Last7Days),
            "30days" => Ok(TimePeriod::Last30Days),
            "90days" => Ok(TimePeriod::Last90Days),
            "1year" => Ok(TimePeriod::LastYear),
            "all" => Ok(TimePeriod::All),
            _ => Err(InsightsError::unknown("time period", s)),
        }
    }
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,

    #[serde(default, rename = "rating", skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,

    #[serde(default, rename = "sentiment", skip_serializing_if = "Vec::is_empty")]
    pub sentiments: Vec<Sentiment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<TimePeriod>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    pub fn branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn ratings(mut self, ratings: impl IntoIterator<Item = Rating>) -> Self {
        self.ratings = ratings.into_iter().collect();
        self
    }

    pub fn sentiments(mut self, sentiments: impl IntoIterator<Item = Sentiment>) -> Self {
        self.sentiments = sentiments.into_iter().collect();
        self
    }

    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn period(mut self, period: TimePeriod) -> Self {
        self.time_period = Some(period);
        self
    }

    /// True when no axis constrains anything
    pub fn is_empty(&self) -> bool {
        self.region_id.is_none()
            && self.branch_id.is_none()
            && self.ratings.is_empty()
            && self.sentiments.is_empty()
            && self.date_range.is_none()
            && matches!(self.time_period, None | Some(TimePeriod::All))
    }

    /// Resolve the filter against a branch table and a reference instant
    pub fn compile<'a>(
        &'a self,
        branches: &'a BranchRegistry,
        now: DateTime<Utc>,
    ) -> ReviewPredicate<'a> {
        ReviewPredicate::new(self, branches, now)
    }
}

// ============================================================================
// COMPILED PREDICATE
// ============================================================================

/// `FilterOptions` with the region resolved to a branch-id set and the time
/// period resolved to an absolute window.
pub struct ReviewPredicate<'a> {
    filters: &'a FilterOptions,
    region_branches: Option<HashSet<&'a str>>,
    period_window: Option<DateRange>,
}

impl<'a> ReviewPredicate<'a> {
    pub fn new(
        filters: &'a FilterOptions,
        branches: &'a BranchRegistry,
        now: DateTime<Utc>,
    ) -> Self {
        let region_branches = filters.region_id.as_deref().map(|region_id| {
            branches
                .by_region(region_id)
                .into_iter()
                .map(|b| b.id.as_str())
                .collect()
        });

        let period_window = filters
            .time_period
            .and_then(|period| period.window_start(now))
            .map(|start| DateRange::new(start, now));

        ReviewPredicate {
            filters,
            region_branches,
            period_window,
        }
    }

    pub fn matches(&self, review: &Review) -> bool {
        if let Some(ref ids) = self.region_branches {
            if !ids.contains(review.branch_id.as_str()) {
                return false;
            }
        }

        if let Some(ref branch_id) = self.filters.branch_id {
            if &review.branch_id != branch_id {
                return false;
            }
        }

        if !self.filters.ratings.is_empty() && !self.filters.ratings.contains(&review.rating) {
            return false;
        }

        if !self.filters.sentiments.is_empty()
            && !self.filters.sentiments.contains(&review.sentiment())
        {
            return false;
        }

        if let Some(range) = self.filters.date_range {
            if !range.contains(review.date) {
                return false;
            }
        }

        if let Some(window) = self.period_window {
            if !window.contains(review.date) {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
