// 🎲 Mock Dataset
//
// The fixture the dashboard runs on when no CSV is configured: five UK
// regions, ten branches and a batch of random reviews dated within the last
// year. A seed makes the batch reproducible.

use crate::engine::ReviewEngine;
use crate::entities::{Branch, Rating, Region, Review};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Default number of generated reviews
pub const DEFAULT_REVIEW_COUNT: usize = 200;

const CUSTOMER_NAMES: [&str; 8] = [
    "John D.",
    "Sarah M.",
    "Michael T.",
    "Emma W.",
    "David L.",
    "Olivia P.",
    "James H.",
    "Sofia B.",
];

const REVIEW_CONTENTS: [&str; 10] = [
    "Great service, very satisfied!",
    "Staff was helpful and professional.",
    "Waited too long for service, but eventually got what I needed.",
    "Not impressed with the level of service provided.",
    "Excellent experience, will definitely return!",
    "Average service, nothing special.",
    "Very disappointed with my visit today.",
    "The staff went above and beyond to help me.",
    "Facility was clean but the wait time was too long.",
    "Could use improvement in response time.",
];

pub fn regions() -> Vec<Region> {
    [
        ("1", "NE", "North East"),
        ("2", "NW", "North West"),
        ("3", "SE", "South East"),
        ("4", "SW", "South West"),
        ("5", "CE", "Central"),
    ]
    .into_iter()
    .map(|(id, code, name)| {
        Region::new(id, code, name)
            .with_description(format!("The {} region covering major cities", name))
    })
    .collect()
}

pub fn branches() -> Vec<Branch> {
    [
        (
            "1",
            "Newcastle Central",
            "123 Newcastle Rd",
            "Newcastle",
            "0191 123 4567",
            "newcastle",
            "1",
        ),
        ("2", "Sunderland", "45 Sunderland Ave", "Sunderland", "0191 987 6543", "sunderland", "1"),
        (
            "3",
            "Manchester Central",
            "78 Manchester Rd",
            "Manchester",
            "0161 123 4567",
            "manchester",
            "2",
        ),
        ("4", "Liverpool", "90 Liverpool St", "Liverpool", "0151 123 4567", "liverpool", "2"),
        ("5", "London Central", "10 Oxford St", "London", "020 1234 5678", "london", "3"),
        ("6", "Brighton", "22 Brighton Rd", "Brighton", "01273 123 456", "brighton", "3"),
        ("7", "Bristol", "33 Bristol Rd", "Bristol", "0117 123 4567", "bristol", "4"),
        ("8", "Plymouth", "55 Plymouth Ave", "Plymouth", "01752 123 456", "plymouth", "4"),
        ("9", "Birmingham", "77 Birmingham St", "Birmingham", "0121 123 4567", "birmingham", "5"),
        ("10", "Nottingham", "88 Nottingham Rd", "Nottingham", "0115 123 4567", "nottingham", "5"),
    ]
    .into_iter()
    .map(|(id, name, address, city, phone, mailbox, region)| {
        Branch::new(id, name, address, city, region)
            .with_contact(phone, format!("{}@example.com", mailbox))
    })
    .collect()
}

/// `count` random reviews over `branches`, each dated 0..365 whole days
/// before `now`. Ids are "1".."count".
pub fn generate_reviews(
    rng: &mut impl Rng,
    branches: &[Branch],
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Review> {
    if branches.is_empty() {
        return Vec::new();
    }

    (0..count)
        .filter_map(|i| {
            let branch = branches.choose(rng)?;
            let rating = Rating::new(rng.gen_range(Rating::MIN..=Rating::MAX)).ok()?;
            let content = REVIEW_CONTENTS.choose(rng)?;
            let customer = CUSTOMER_NAMES.choose(rng)?;
            let date = now - Duration::days(rng.gen_range(0..365));

            let mut review = Review::new(&branch.id, &branch.name, rating, *content, date)
                .with_customer(*customer);
            review.id = (i + 1).to_string();
            Some(review)
        })
        .collect()
}

/// Full mock snapshot; the same seed and `now` always give the same data
pub fn generate(seed: u64, count: usize, now: DateTime<Utc>) -> ReviewEngine {
    let mut rng = StdRng::seed_from_u64(seed);
    let branches = branches();
    let reviews = generate_reviews(&mut rng, &branches, count, now);
    ReviewEngine::new(regions(), branches, reviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let a = generate(42, 50, now());
        let b = generate(42, 50, now());
        let c = generate(43, 50, now());

        assert_eq!(a.reviews(), b.reviews());
        assert_ne!(a.reviews(), c.reviews());
    }

    #[test]
    fn test_generated_reviews_are_well_formed() {
        let engine = generate(1, DEFAULT_REVIEW_COUNT, now());

        assert_eq!(engine.review_count(), DEFAULT_REVIEW_COUNT);
        assert_eq!(engine.list_regions().len(), 5);
        assert_eq!(engine.list_branches().len(), 10);
        for review in engine.reviews() {
            assert!(engine.get_branch(&review.branch_id).is_some());
            assert!(review.date <= now() && review.date > now() - Duration::days(365));
            assert!(review.customer_name.is_some());
        }

        let counted: usize = engine.list_regions().iter().map(|r| r.review_count).sum();
        assert_eq!(counted, DEFAULT_REVIEW_COUNT);
    }
}
