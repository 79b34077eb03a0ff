// 📊 Dashboard Statistics
//
// Pure aggregation over a slice of reviews: totals, rating and sentiment
// histograms, and a 12-month trend series. Every ratio is guarded so an
// empty input yields zeros, never NaN.

use crate::entities::{Rating, Review, Sentiment};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Number of calendar months in the trend series
pub const TREND_MONTHS: usize = 12;

// ============================================================================
// STATS TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBucket {
    pub rating: Rating,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentBucket {
    pub sentiment: Sentiment,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// e.g. "Jun 2024"
    pub month: String,
    /// First day of the month, in the zone the series was bucketed in
    pub start: NaiveDate,
    /// Rounded to one decimal place, 0 for a month without reviews
    pub average_rating: f64,
    pub review_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub sentiment_distribution: Vec<SentimentBucket>,
    pub rating_distribution: Vec<RatingBucket>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

impl DashboardStats {
    /// Aggregate `reviews`; month buckets end at the month containing `now`,
    /// computed in `now`'s time zone.
    pub fn compute<'r, I, Tz>(reviews: I, now: &DateTime<Tz>) -> Self
    where
        I: IntoIterator<Item = &'r Review>,
        Tz: TimeZone,
    {
        let reviews: Vec<&Review> = reviews.into_iter().collect();
        let total = reviews.len();

        let rating_sum: u64 = reviews.iter().map(|r| u64::from(r.rating.value())).sum();

        DashboardStats {
            total_reviews: total,
            average_rating: ratio(rating_sum as f64, total),
            sentiment_distribution: sentiment_distribution(&reviews),
            rating_distribution: rating_distribution(&reviews),
            monthly_trends: monthly_trends(&reviews, now),
        }
    }
}

// ============================================================================
// HISTOGRAMS
// ============================================================================

pub fn rating_distribution(reviews: &[&Review]) -> Vec<RatingBucket> {
    let total = reviews.len();
    Rating::all()
        .map(|rating| {
            let count = reviews.iter().filter(|r| r.rating == rating).count();
            RatingBucket {
                rating,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

pub fn sentiment_distribution(reviews: &[&Review]) -> Vec<SentimentBucket> {
    let total = reviews.len();
    Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let count = reviews.iter().filter(|r| r.sentiment() == sentiment).count();
            SentimentBucket {
                sentiment,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

// ============================================================================
// MONTHLY TRENDS
// ============================================================================

/// Twelve calendar-month buckets, oldest first, the last one being the month
/// that contains `now`. A review falls in the month containing its
/// timestamp as seen from `now`'s zone.
pub fn monthly_trends<Tz: TimeZone>(reviews: &[&Review], now: &DateTime<Tz>) -> Vec<MonthlyTrend> {
    let zone = now.timezone();
    let current = month_index(now.year(), now.month0());
    let first = current - (TREND_MONTHS as i32 - 1);

    let mut sums = [0u64; TREND_MONTHS];
    let mut counts = [0usize; TREND_MONTHS];

    for review in reviews {
        let local = review.date.with_timezone(&zone);
        let idx = month_index(local.year(), local.month0());
        if (first..=current).contains(&idx) {
            let slot = (idx - first) as usize;
            sums[slot] += u64::from(review.rating.value());
            counts[slot] += 1;
        }
    }

    (0..TREND_MONTHS)
        .filter_map(|slot| {
            let idx = first + slot as i32;
            let start =
                NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 1)?;
            Some(MonthlyTrend {
                month: start.format("%b %Y").to_string(),
                start,
                average_rating: round1(ratio(sums[slot] as f64, counts[slot])),
                review_count: counts[slot],
            })
        })
        .collect()
}

fn month_index(year: i32, month0: u32) -> i32 {
    year * 12 + month0 as i32
}

// ============================================================================
// HELPERS
// ============================================================================

/// `numerator / count`, or 0 when `count` is 0
pub fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

/// Share of `total` as a percentage, or 0 when `total` is 0
pub fn percentage(count: usize, total: usize) -> f64 {
    ratio(count as f64 * 100.0, total)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn review(stars: u8, date: DateTime<Utc>) -> Review {
        Review::new("1", "Branch", Rating::new(stars).unwrap(), "text", date)
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = DashboardStats::compute(std::iter::empty::<&Review>(), &at(2024, 6, 15));

        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert!(stats.rating_distribution.iter().all(|b| b.percentage == 0.0 && b.count == 0));
        assert!(stats.sentiment_distribution.iter().all(|b| b.percentage == 0.0));
        assert_eq!(stats.monthly_trends.len(), TREND_MONTHS);
        assert!(stats.monthly_trends.iter().all(|t| t.average_rating == 0.0));
    }

    #[test]
    fn test_histograms_and_average() {
        let now = at(2024, 6, 15);
        let reviews = vec![
            review(5, now),
            review(4, now),
            review(3, now),
            review(1, now),
        ];
        let stats = DashboardStats::compute(&reviews, &now);

        assert_eq!(stats.total_reviews, 4);
        assert!((stats.average_rating - 3.25).abs() < 1e-9);

        let counts: Vec<usize> = stats.rating_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1, 1]);

        let positive = &stats.sentiment_distribution[0];
        assert_eq!(positive.sentiment, Sentiment::Positive);
        assert_eq!(positive.count, 2);
        assert!((positive.percentage - 50.0).abs() < 1e-9);

        let rating_total: f64 = stats.rating_distribution.iter().map(|b| b.percentage).sum();
        let sentiment_total: f64 = stats.sentiment_distribution.iter().map(|b| b.percentage).sum();
        assert!((rating_total - 100.0).abs() < 1e-9);
        assert!((sentiment_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_trends_cover_twelve_months_ending_now() {
        let now = at(2024, 3, 10);
        let stats = DashboardStats::compute(std::iter::empty::<&Review>(), &now);
        let months: Vec<&str> = stats.monthly_trends.iter().map(|t| t.month.as_str()).collect();

        assert_eq!(months.first(), Some(&"Apr 2023"));
        assert_eq!(months.last(), Some(&"Mar 2024"));
        assert!(stats
            .monthly_trends
            .windows(2)
            .all(|pair| pair[0].start < pair[1].start));
    }

    #[test]
    fn test_trend_buckets_use_calendar_months() {
        let now = at(2024, 6, 15);
        let reviews = vec![
            review(5, Utc.with_ymd_and_hms(2024, 5, 31, 23, 30, 0).unwrap()),
            review(2, at(2024, 5, 1)),
            review(4, at(2024, 5, 2)),
            review(1, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            review(5, at(2023, 6, 14)), // 13 months back: dropped
        ];
        let trends = monthly_trends(&reviews.iter().collect::<Vec<_>>(), &now);

        let may = &trends[10];
        assert_eq!(may.month, "May 2024");
        assert_eq!(may.review_count, 3);
        assert_eq!(may.average_rating, 3.7);

        let june = &trends[11];
        assert_eq!(june.review_count, 1);
        assert_eq!(june.average_rating, 1.0);

        let counted: usize = trends.iter().map(|t| t.review_count).sum();
        assert_eq!(counted, 4);
    }

    #[test]
    fn test_trends_follow_reference_zone() {
        use chrono::FixedOffset;

        // 23:30 UTC on May 31st is already June 1st at UTC+2
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at(2024, 6, 15).with_timezone(&zone);
        let reviews = vec![review(4, Utc.with_ymd_and_hms(2024, 5, 31, 23, 30, 0).unwrap())];
        let trends = monthly_trends(&reviews.iter().collect::<Vec<_>>(), &now);

        assert_eq!(trends[11].review_count, 1);
        assert_eq!(trends[10].review_count, 0);
    }

    #[test]
    fn test_trends_cross_year_boundary() {
        let now = at(2024, 1, 20);
        let reviews = vec![review(3, at(2023, 12, 5)), review(5, now - Duration::days(1))];
        let trends = monthly_trends(&reviews.iter().collect::<Vec<_>>(), &now);

        assert_eq!(trends[10].month, "Dec 2023");
        assert_eq!(trends[10].review_count, 1);
        assert_eq!(trends[11].month, "Jan 2024");
        assert_eq!(trends[11].review_count, 1);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.6666), 3.7);
        assert_eq!(round1(4.04), 4.0);
    }
}
