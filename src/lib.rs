// Review Insights - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod config;
pub mod logging;
pub mod entities;
pub mod filters;
pub mod stats;
pub mod engine;
pub mod mock;
pub mod loader;
pub mod reports;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{InsightsError, Result};
pub use config::AppConfig;
pub use entities::{
    Branch, BranchRegistry, Rating, Region, RegionRegistry, Review, ReviewView, Sentiment,
};
pub use filters::{DateRange, FilterOptions, ReviewPredicate, TimePeriod};
pub use stats::{DashboardStats, MonthlyTrend, RatingBucket, SentimentBucket};
pub use engine::{BranchPerformance, ReviewEngine, ReviewPage};
pub use loader::{load_reviews_csv, write_reviews_csv, ImportReport};
pub use reports::{
    resolve_visualization, ChartData, ChartPoint, ColorScheme, CustomReport, DatasetKind,
    ReportBook, ReportLayout, ReportVisualization, SortKey, SortOrder, VisualizationType,
};
pub use store::ReportStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the review snapshot described by `config`: the configured CSV if
/// any, otherwise seeded mock data.
pub fn build_engine(config: &AppConfig) -> anyhow::Result<ReviewEngine> {
    use anyhow::Context;

    match config.reviews_csv {
        Some(ref path) => {
            let branches = BranchRegistry::new(mock::branches());
            let (reviews, report) = load_reviews_csv(path, &branches)
                .with_context(|| format!("Failed to import reviews from {:?}", path))?;
            tracing::info!(
                imported = report.imported,
                skipped = report.skipped_invalid,
                duplicates = report.duplicates,
                "using imported reviews"
            );
            Ok(ReviewEngine::new(mock::regions(), mock::branches(), reviews))
        }
        None => {
            let seed = config.seed.unwrap_or_else(rand::random);
            tracing::info!(seed, count = config.mock_review_count, "generating mock reviews");
            Ok(mock::generate(seed, config.mock_review_count, chrono::Utc::now()))
        }
    }
}
