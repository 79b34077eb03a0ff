// 📥 CSV Import / Export of reviews
//
// Import is forgiving: rows with an unknown branch, a rating outside 1..=5
// or an unreadable date are skipped and counted, never fatal. Identical
// rows are dropped by content fingerprint so importing the same file twice
// does not double the data.

use crate::entities::{BranchRegistry, Rating, Review, Sentiment};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// ROW SHAPES
// ============================================================================

/// Raw import row; everything is text until validated
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    id: Option<String>,
    branch_id: Option<String>,
    rating: Option<String>,
    #[serde(default)]
    content: Option<String>,
    date: Option<String>,
    #[serde(default)]
    customer_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    branch_id: &'a str,
    branch_name: &'a str,
    rating: u8,
    sentiment: Sentiment,
    content: &'a str,
    date: String,
    customer_name: &'a str,
}

/// What happened during an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped_invalid: usize,
    pub duplicates: usize,
}

// ============================================================================
// IMPORT
// ============================================================================

/// Stable content hash used to spot repeated rows
pub fn fingerprint(review: &Review) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!(
        "{}|{}|{}|{}",
        review.branch_id,
        review.rating,
        review.date.to_rfc3339(),
        review.content
    ));
    format!("{:x}", hasher.finalize())
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Like `parse_timestamp`, but a plain date closes the range at the last
/// instant of that day so the whole day stays inside it
pub fn parse_range_end(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(day) => day
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .map(|naive| naive.and_utc()),
        Err(_) => parse_timestamp(raw),
    }
}

fn row_to_review(row: ImportRow, branches: &BranchRegistry) -> Option<Review> {
    let branch_id = row.branch_id?.trim().to_string();
    let branch = branches.find_by_id(&branch_id)?;
    let rating: Rating = row.rating?.parse().ok()?;
    let date = parse_timestamp(&row.date?)?;

    let mut review = Review::new(
        &branch.id,
        &branch.name,
        rating,
        row.content.unwrap_or_default().trim(),
        date,
    );
    if let Some(id) = row.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        review.id = id;
    }
    review.customer_name = row
        .customer_name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Some(review)
}

/// Read reviews from any CSV source with a header row
pub fn read_reviews<R: io::Read>(
    reader: R,
    branches: &BranchRegistry,
) -> Result<(Vec<Review>, ImportReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut report = ImportReport::default();
    let mut seen = HashSet::new();
    let mut reviews = Vec::new();

    for (line, result) in rdr.deserialize::<ImportRow>().enumerate() {
        report.total_rows += 1;

        let review = match result {
            Ok(row) => row_to_review(row, branches),
            Err(e) => {
                warn!(line = line + 2, error = %e, "unreadable review row");
                None
            }
        };

        let Some(review) = review else {
            report.skipped_invalid += 1;
            continue;
        };

        if !seen.insert(fingerprint(&review)) {
            report.duplicates += 1;
            continue;
        }

        report.imported += 1;
        reviews.push(review);
    }

    Ok((reviews, report))
}

pub fn load_reviews_csv(
    path: &Path,
    branches: &BranchRegistry,
) -> Result<(Vec<Review>, ImportReport)> {
    let file = std::fs::File::open(path)?;
    let (reviews, report) = read_reviews(file, branches)?;

    info!(
        path = %path.display(),
        imported = report.imported,
        skipped = report.skipped_invalid,
        duplicates = report.duplicates,
        "imported reviews"
    );
    Ok((reviews, report))
}

// ============================================================================
// EXPORT
// ============================================================================

pub fn write_reviews<'r, W, I>(writer: W, reviews: I) -> Result<usize>
where
    W: io::Write,
    I: IntoIterator<Item = &'r Review>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0;

    for review in reviews {
        wtr.serialize(ExportRow {
            id: &review.id,
            branch_id: &review.branch_id,
            branch_name: &review.branch_name,
            rating: review.rating.value(),
            sentiment: review.sentiment(),
            content: &review.content,
            date: review.date.to_rfc3339(),
            customer_name: review.customer_name.as_deref().unwrap_or(""),
        })?;
        written += 1;
    }

    wtr.flush()?;
    Ok(written)
}

pub fn write_reviews_csv<'r, I>(path: &Path, reviews: I) -> Result<usize>
where
    I: IntoIterator<Item = &'r Review>,
{
    let file = std::fs::File::create(path)?;
    let written = write_reviews(file, reviews)?;
    info!(path = %path.display(), written, "exported reviews");
    Ok(written)
}

// ============================================================================
// TESTS
// ============================================================================
