// ⭐ Review Entity - rating, derived sentiment, timestamp
//
// Sentiment is never stored: it is a pure function of the rating, so a
// review cannot carry a sentiment that disagrees with its stars.

use crate::error::InsightsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RATING
// ============================================================================

/// Star rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, InsightsError> {
        Rating::try_from(i64::from(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All ratings in ascending order
    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }

    pub fn sentiment(self) -> Sentiment {
        match self.0 {
            4..=5 => Sentiment::Positive,
            3 => Sentiment::Neutral,
            _ => Sentiment::Negative,
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = InsightsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(InsightsError::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rating {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| InsightsError::unknown("rating", s))?;
        Rating::try_from(value)
    }
}

// ============================================================================
// SENTIMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Display order used by every histogram
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(InsightsError::unknown("sentiment", s)),
        }
    }
}

// ============================================================================
// REVIEW ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,

    pub branch_id: String,

    /// Denormalized from the owning branch; refreshed when a snapshot is built
    pub branch_name: String,

    pub rating: Rating,

    pub content: String,

    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl Review {
    pub fn new(
        branch_id: impl Into<String>,
        branch_name: impl Into<String>,
        rating: Rating,
        content: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Review {
            id: uuid::Uuid::new_v4().to_string(),
            branch_id: branch_id.into(),
            branch_name: branch_name.into(),
            rating,
            content: content.into(),
            date,
            customer_name: None,
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn sentiment(&self) -> Sentiment {
        self.rating.sentiment()
    }
}

/// Serialized view of a review that carries the derived sentiment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: String,
    pub branch_id: String,
    pub branch_name: String,
    pub rating: Rating,
    pub content: String,
    pub sentiment: Sentiment,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        ReviewView {
            id: review.id.clone(),
            branch_id: review.branch_id.clone(),
            branch_name: review.branch_name.clone(),
            rating: review.rating,
            content: review.content.clone(),
            sentiment: review.sentiment(),
            date: review.date,
            customer_name: review.customer_name.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Sentiment::Negative)]
    #[case(2, Sentiment::Negative)]
    #[case(3, Sentiment::Neutral)]
    #[case(4, Sentiment::Positive)]
    #[case(5, Sentiment::Positive)]
    fn test_sentiment_follows_rating(#[case] stars: u8, #[case] expected: Sentiment) {
        let rating = Rating::new(stars).unwrap();
        assert_eq!(rating.sentiment(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn test_rating_out_of_range_rejected(#[case] value: i64) {
        assert!(Rating::try_from(value).is_err());
    }

    #[test]
    fn test_rating_deserialize_validates() {
        let ok: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_sentiment_parse() {
        assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert!("happy".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_view_includes_derived_sentiment() {
        let review = Review::new("7", "Bristol", Rating::new(2).unwrap(), "Slow", Utc::now())
            .with_customer("Emma W.");
        let json = serde_json::to_value(ReviewView::from(&review)).unwrap();

        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["rating"], 2);
        assert_eq!(json["branchId"], "7");
        assert_eq!(json["customerName"], "Emma W.");
    }
}
