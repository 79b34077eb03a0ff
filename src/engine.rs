// 🧮 Review Engine - immutable snapshot + query surface
//
// The engine owns one snapshot of regions, branches and reviews. The
// denormalized fields (branch/region names and counters) are reconciled
// against the reviews when the snapshot is built; nothing mutates the
// snapshot afterwards, so they stay consistent for its whole lifetime.
// Loading new data means building a new engine.

use crate::entities::{Branch, BranchRegistry, Region, RegionRegistry, Review};
use crate::filters::FilterOptions;
use crate::stats::{ratio, round1, DashboardStats};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One page of filtered reviews plus the size of the whole filtered set
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl ReviewPage {
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Per-branch aggregate used by the "performance" report dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPerformance {
    pub branch_id: String,
    pub branch_name: String,
    pub region_name: String,
    pub average_rating: f64,
    pub review_count: usize,
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReviewEngine {
    regions: RegionRegistry,
    branches: BranchRegistry,
    /// Newest first; stable for equal timestamps
    reviews: Vec<Review>,
}

impl ReviewEngine {
    /// Build a snapshot and reconcile its denormalized fields
    pub fn new(regions: Vec<Region>, branches: Vec<Branch>, mut reviews: Vec<Review>) -> Self {
        reviews.sort_by(|a, b| b.date.cmp(&a.date));

        let mut engine = ReviewEngine {
            regions: RegionRegistry::new(regions),
            branches: BranchRegistry::new(branches),
            reviews,
        };
        engine.reconcile();

        info!(
            regions = engine.regions.count(),
            branches = engine.branches.count(),
            reviews = engine.reviews.len(),
            "review snapshot ready"
        );
        engine
    }

    /// Recompute names and counters from the source-of-truth ids and reviews
    fn reconcile(&mut self) {
        let mut per_branch: HashMap<&str, (usize, u64)> = HashMap::new();
        for review in &self.reviews {
            let entry = per_branch.entry(review.branch_id.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += u64::from(review.rating.value());
        }

        let region_names: HashMap<String, String> = self
            .regions
            .all()
            .iter()
            .map(|r| (r.id.clone(), r.name.clone()))
            .collect();

        let mut per_region: HashMap<String, (usize, usize, u64)> = HashMap::new();
        for branch in self.branches.iter_mut() {
            let (count, sum) = per_branch.get(branch.id.as_str()).copied().unwrap_or((0, 0));
            branch.review_count = count;
            branch.average_rating = round1(ratio(sum as f64, count));
            if let Some(name) = region_names.get(&branch.region_id) {
                branch.region_name = name.clone();
            }

            let entry = per_region.entry(branch.region_id.clone()).or_insert((0, 0, 0));
            entry.0 += 1;
            entry.1 += count;
            entry.2 += sum;
        }

        for region in self.regions.iter_mut() {
            let (branch_count, count, sum) =
                per_region.get(&region.id).copied().unwrap_or((0, 0, 0));
            region.branch_count = branch_count;
            region.review_count = count;
            region.average_rating = round1(ratio(sum as f64, count));
        }

        let branch_names: HashMap<&str, &str> = self
            .branches
            .all()
            .iter()
            .map(|b| (b.id.as_str(), b.name.as_str()))
            .collect();
        for review in &mut self.reviews {
            if let Some(name) = branch_names.get(review.branch_id.as_str()) {
                review.branch_name = (*name).to_string();
            }
        }
    }

    // ========================================================================
    // REGIONS
    // ========================================================================

    pub fn list_regions(&self) -> &[Region] {
        self.regions.all()
    }

    pub fn get_region(&self, code: &str) -> Option<&Region> {
        self.regions.find_by_code(code)
    }

    pub fn get_region_by_id(&self, id: &str) -> Option<&Region> {
        self.regions.find_by_id(id)
    }

    // ========================================================================
    // BRANCHES
    // ========================================================================

    pub fn list_branches(&self) -> &[Branch] {
        self.branches.all()
    }

    pub fn get_branch(&self, id: &str) -> Option<&Branch> {
        self.branches.find_by_id(id)
    }

    pub fn list_branches_by_region(&self, region_id: &str) -> Vec<&Branch> {
        self.branches.by_region(region_id)
    }

    /// No minimum query length here; callers decide when to search
    pub fn search_branches(&self, query: &str) -> Vec<&Branch> {
        self.branches.search(query)
    }

    pub fn branch_registry(&self) -> &BranchRegistry {
        &self.branches
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Every review, newest first
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Reviews matching `filters` as of `now`, newest first
    pub fn filtered_reviews_at(&self, filters: &FilterOptions, now: DateTime<Utc>) -> Vec<&Review> {
        let predicate = filters.compile(&self.branches, now);
        self.reviews.iter().filter(|r| predicate.matches(r)).collect()
    }

    pub fn list_reviews(
        &self,
        page: usize,
        page_size: usize,
        filters: &FilterOptions,
    ) -> ReviewPage {
        self.list_reviews_at(page, page_size, filters, Utc::now())
    }

    /// Filter, order newest first, then slice out page `page` (1-based).
    ///
    /// Page 0, page size 0 and pages past the end give an empty slice; the
    /// total is always the size of the filtered set.
    pub fn list_reviews_at(
        &self,
        page: usize,
        page_size: usize,
        filters: &FilterOptions,
        now: DateTime<Utc>,
    ) -> ReviewPage {
        let filtered = self.filtered_reviews_at(filters, now);
        let total_count = filtered.len();

        let reviews = match page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) {
            Some(start) if page_size > 0 => filtered
                .into_iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        debug!(page, page_size, total_count, returned = reviews.len(), "listed reviews");

        ReviewPage {
            reviews,
            total_count,
            page,
            page_size,
        }
    }

    pub fn list_reviews_by_branch(&self, branch_id: &str) -> Vec<&Review> {
        self.reviews.iter().filter(|r| r.branch_id == branch_id).collect()
    }

    pub fn list_recent_reviews(&self, limit: usize) -> Vec<&Review> {
        self.reviews.iter().take(limit).collect()
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    /// Statistics over the reviews matching `filters`; empty filters give
    /// the global figures. Months are bucketed in local time.
    pub fn compute_dashboard_stats(&self, filters: &FilterOptions) -> DashboardStats {
        self.compute_dashboard_stats_at(filters, &Local::now())
    }

    pub fn compute_dashboard_stats_at<Tz: TimeZone>(
        &self,
        filters: &FilterOptions,
        now: &DateTime<Tz>,
    ) -> DashboardStats {
        let matching = self.filtered_reviews_at(filters, now.with_timezone(&Utc));
        DashboardStats::compute(matching, now)
    }

    /// Average rating per branch over the reviews matching `filters`.
    /// Branches without a matching review are left out. Sorted best first,
    /// ties broken by name.
    pub fn branch_performance_at(
        &self,
        filters: &FilterOptions,
        now: DateTime<Utc>,
    ) -> Vec<BranchPerformance> {
        let mut per_branch: HashMap<&str, (usize, u64)> = HashMap::new();
        for review in self.filtered_reviews_at(filters, now) {
            let entry = per_branch.entry(review.branch_id.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += u64::from(review.rating.value());
        }

        let mut rows: Vec<BranchPerformance> = self
            .branches
            .all()
            .iter()
            .filter_map(|branch| {
                let (count, sum) = per_branch.get(branch.id.as_str()).copied()?;
                Some(BranchPerformance {
                    branch_id: branch.id.clone(),
                    branch_name: branch.name.clone(),
                    region_name: branch.region_name.clone(),
                    average_rating: round1(ratio(sum as f64, count)),
                    review_count: count,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.branch_name.cmp(&b.branch_name))
        });
        rows
    }
}

// ============================================================================
// TESTS
// ============================================================================
