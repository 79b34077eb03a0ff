// 📈 Custom Reports - user-built grids of visualizations
//
// A report is a named grid; each visualization picks a dataset (ratings,
// sentiment, trends, performance), a chart type, a color scheme and its own
// filters. Resolving a visualization runs the engine and produces
// chart-ready points. Rendering the chart is left to the presentation layer.

use crate::engine::ReviewEngine;
use crate::error::{InsightsError, Result};
use crate::filters::{FilterOptions, TimePeriod};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// Tallest a visualization can be, in grid rows
pub const MAX_ROW_SPAN: u32 = 3;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    #[default]
    Bar,
    Line,
    Pie,
    Area,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Ratings,
    Sentiment,
    Trends,
    Performance,
}

impl FromStr for DatasetKind {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ratings" => Ok(DatasetKind::Ratings),
            "sentiment" => Ok(DatasetKind::Sentiment),
            "trends" => Ok(DatasetKind::Trends),
            "performance" => Ok(DatasetKind::Performance),
            _ => Err(InsightsError::unknown("dataset", s)),
        }
    }
}

/// Unknown names fall back to `Default` instead of failing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColorScheme {
    #[default]
    Default,
    Blue,
    Green,
    Contrast,
    Monochrome,
}

impl ColorScheme {
    pub fn palette(&self) -> [&'static str; 5] {
        match self {
            ColorScheme::Default => ["#4C6A9C", "#2D4E6D", "#003366", "#1A5276", "#7FB3D5"],
            ColorScheme::Blue => ["#1A5276", "#2874A6", "#3498DB", "#85C1E9", "#D6EAF8"],
            ColorScheme::Green => ["#145A32", "#196F3D", "#1E8449", "#27AE60", "#58D68D"],
            ColorScheme::Contrast => ["#F1C40F", "#3498DB", "#E74C3C", "#2ECC71", "#9B59B6"],
            ColorScheme::Monochrome => ["#1F1F1F", "#383838", "#555555", "#777777", "#999999"],
        }
    }
}

impl From<String> for ColorScheme {
    fn from(name: String) -> Self {
        match name.trim().to_lowercase().as_str() {
            "blue" => ColorScheme::Blue,
            "green" => ColorScheme::Green,
            "contrast" => ColorScheme::Contrast,
            "monochrome" => ColorScheme::Monochrome,
            _ => ColorScheme::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Value,
    Name,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLayout {
    pub columns: u32,
    pub row_height: u32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportLayout {
            columns: 4,
            row_height: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportVisualization {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: VisualizationType,
    pub dataset: DatasetKind,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub filters: FilterOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Grid columns spanned
    pub width: u32,
    /// Grid rows spanned
    pub height: u32,
    #[serde(default)]
    pub position: Position,
}

impl Default for ReportVisualization {
    fn default() -> Self {
        ReportVisualization {
            id: String::new(),
            title: "New Visualization".to_string(),
            kind: VisualizationType::Bar,
            dataset: DatasetKind::Ratings,
            color_scheme: ColorScheme::Default,
            filters: FilterOptions::new().period(TimePeriod::Last30Days),
            sort_by: None,
            sort_order: None,
            width: 2,
            height: 1,
            position: Position::default(),
        }
    }
}

impl ReportVisualization {
    /// (column span, row span) on the report grid; an expanded
    /// visualization takes the full width and the maximum height.
    pub fn grid_span(&self, layout: &ReportLayout, expanded: bool) -> (u32, u32) {
        if expanded {
            (layout.columns, MAX_ROW_SPAN)
        } else {
            (self.width, self.height)
        }
    }

    fn clamp_to(&mut self, layout: &ReportLayout) {
        self.width = self.width.clamp(1, layout.columns.max(1));
        self.height = self.height.clamp(1, MAX_ROW_SPAN);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReport {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub visualizations: Vec<ReportVisualization>,
    #[serde(default)]
    pub layout: ReportLayout,
}

impl CustomReport {
    pub fn new(name: &str, description: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InsightsError::InvalidReport("name must not be blank".to_string()));
        }

        let now = Utc::now();
        Ok(CustomReport {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            created_at: now,
            updated_at: now,
            visualizations: Vec::new(),
            layout: ReportLayout::default(),
        })
    }

    /// Bring an externally edited report back into shape: trimmed non-blank
    /// name, every visualization clamped to the layout and carrying an id
    /// unique within the report (blank or repeated ids are replaced).
    pub fn normalize(&mut self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InsightsError::InvalidReport("name must not be blank".to_string()));
        }
        self.name = name.to_string();
        self.description = self
            .description
            .take()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let layout = self.layout;
        let mut seen = HashSet::new();
        for viz in &mut self.visualizations {
            viz.clamp_to(&layout);
            if viz.id.trim().is_empty() || !seen.insert(viz.id.clone()) {
                viz.id = uuid::Uuid::new_v4().to_string();
                seen.insert(viz.id.clone());
            }
        }
        Ok(())
    }

    pub fn visualization(&self, viz_id: &str) -> Option<&ReportVisualization> {
        self.visualizations.iter().find(|v| v.id == viz_id)
    }

    fn position_of(&self, viz_id: &str) -> Result<usize> {
        self.visualizations
            .iter()
            .position(|v| v.id == viz_id)
            .ok_or_else(|| InsightsError::VisualizationNotFound(viz_id.to_string()))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Append a visualization under a fresh id; returns that id
    pub fn add_visualization(&mut self, mut viz: ReportVisualization) -> String {
        viz.id = uuid::Uuid::new_v4().to_string();
        viz.clamp_to(&self.layout);
        let id = viz.id.clone();
        self.visualizations.push(viz);
        self.touch();
        id
    }

    /// Replace the visualization with `viz.id`
    pub fn update_visualization(&mut self, mut viz: ReportVisualization) -> Result<()> {
        let idx = self.position_of(&viz.id)?;
        viz.clamp_to(&self.layout);
        self.visualizations[idx] = viz;
        self.touch();
        Ok(())
    }

    pub fn remove_visualization(&mut self, viz_id: &str) -> Result<ReportVisualization> {
        let idx = self.position_of(viz_id)?;
        let removed = self.visualizations.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Copy a visualization right after the original; returns the copy's id
    pub fn duplicate_visualization(&mut self, viz_id: &str) -> Result<String> {
        let idx = self.position_of(viz_id)?;
        let mut copy = self.visualizations[idx].clone();
        copy.id = uuid::Uuid::new_v4().to_string();
        copy.title = format!("{} (Copy)", copy.title);
        let id = copy.id.clone();
        self.visualizations.insert(idx + 1, copy);
        self.touch();
        Ok(id)
    }
}

// ============================================================================
// REPORT BOOK
// ============================================================================

/// The user's reports, in memory. Persist through `store::ReportStore`.
#[derive(Debug, Clone, Default)]
pub struct ReportBook {
    reports: Vec<CustomReport>,
}

impl ReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reports(reports: Vec<CustomReport>) -> Self {
        ReportBook { reports }
    }

    pub fn create(&mut self, name: &str, description: Option<&str>) -> Result<&CustomReport> {
        let report = CustomReport::new(name, description)?;
        debug!(id = %report.id, name = %report.name, "created report");
        self.reports.push(report);
        Ok(&self.reports[self.reports.len() - 1])
    }

    pub fn get(&self, id: &str) -> Option<&CustomReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CustomReport> {
        self.reports.iter_mut().find(|r| r.id == id)
    }

    /// Most recently updated first
    pub fn list(&self) -> Vec<&CustomReport> {
        let mut reports: Vec<&CustomReport> = self.reports.iter().collect();
        reports.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        reports
    }

    /// Replace a stored report after `CustomReport::normalize`
    pub fn update(&mut self, mut report: CustomReport) -> Result<&CustomReport> {
        report.normalize()?;

        let slot = self
            .reports
            .iter_mut()
            .find(|r| r.id == report.id)
            .ok_or_else(|| InsightsError::ReportNotFound(report.id.clone()))?;
        report.created_at = slot.created_at;
        report.updated_at = Utc::now();
        *slot = report;
        Ok(slot)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != id);
        self.reports.len() != before
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

// ============================================================================
// CHART DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: VisualizationType,
    pub dataset: DatasetKind,
    pub palette: Vec<String>,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resolve against the engine using the local clock
pub fn resolve_visualization(engine: &ReviewEngine, viz: &ReportVisualization) -> ChartData {
    resolve_visualization_at(engine, viz, &Local::now())
}

/// Run the visualization's dataset through the engine. A visualization with
/// no time period looks at the last 30 days.
pub fn resolve_visualization_at<Tz: TimeZone>(
    engine: &ReviewEngine,
    viz: &ReportVisualization,
    now: &DateTime<Tz>,
) -> ChartData {
    let mut filters = viz.filters.clone();
    if filters.time_period.is_none() {
        filters.time_period = Some(TimePeriod::Last30Days);
    }

    let mut points: Vec<ChartPoint> = match viz.dataset {
        DatasetKind::Ratings => engine
            .compute_dashboard_stats_at(&filters, now)
            .rating_distribution
            .into_iter()
            .map(|b| ChartPoint {
                label: format!("{} Stars", b.rating),
                value: b.count as f64,
                secondary: Some(b.percentage),
            })
            .collect(),
        DatasetKind::Sentiment => engine
            .compute_dashboard_stats_at(&filters, now)
            .sentiment_distribution
            .into_iter()
            .map(|b| ChartPoint {
                label: b.sentiment.label().to_string(),
                value: b.count as f64,
                secondary: Some(b.percentage),
            })
            .collect(),
        DatasetKind::Trends => engine
            .compute_dashboard_stats_at(&filters, now)
            .monthly_trends
            .into_iter()
            .map(|t| ChartPoint {
                label: t.month,
                value: t.average_rating,
                secondary: Some(t.review_count as f64),
            })
            .collect(),
        DatasetKind::Performance => engine
            .branch_performance_at(&filters, now.with_timezone(&Utc))
            .into_iter()
            .map(|p| ChartPoint {
                label: p.branch_name,
                value: p.average_rating,
                secondary: Some(p.review_count as f64),
            })
            .collect(),
    };

    sort_points(&mut points, viz.sort_by, viz.sort_order);

    ChartData {
        title: viz.title.clone(),
        kind: viz.kind,
        dataset: viz.dataset,
        palette: viz.color_scheme.palette().iter().map(|c| c.to_string()).collect(),
        points,
    }
}

/// `Value` defaults to descending, `Name` and `Date` to ascending. Points
/// already come out in date order, so `Date` only honours the direction.
fn sort_points(points: &mut [ChartPoint], key: Option<SortKey>, order: Option<SortOrder>) {
    let Some(key) = key else {
        return;
    };

    let descending = match (key, order) {
        (_, Some(SortOrder::Desc)) => true,
        (_, Some(SortOrder::Asc)) => false,
        (SortKey::Value, None) => true,
        (_, None) => false,
    };
    let directed = |ord: Ordering| if descending { ord.reverse() } else { ord };

    // stable sorts: equal points keep their dataset order in both directions
    match key {
        SortKey::Value => points.sort_by(|a, b| {
            directed(a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
        }),
        SortKey::Name => points.sort_by(|a, b| directed(a.label.cmp(&b.label))),
        // already chronological
        SortKey::Date if descending => points.reverse(),
        SortKey::Date => {}
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Rating, Review};
    use crate::mock;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn engine() -> ReviewEngine {
        let reviews = vec![
            Review::new("1", "", Rating::new(5).unwrap(), "a", now() - Duration::days(1)),
            Review::new("1", "", Rating::new(4).unwrap(), "b", now() - Duration::days(2)),
            Review::new("5", "", Rating::new(2).unwrap(), "c", now() - Duration::days(3)),
            Review::new("5", "", Rating::new(1).unwrap(), "d", now() - Duration::days(200)),
        ];
        ReviewEngine::new(mock::regions(), mock::branches(), reviews)
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut book = ReportBook::new();

        assert!(matches!(book.create("   ", None), Err(InsightsError::InvalidReport(_))));
        assert!(book.is_empty());

        let report = book.create("  Weekly  ", Some("  ")).unwrap();
        assert_eq!(report.name, "Weekly");
        assert_eq!(report.description, None);
        assert_eq!(report.layout, ReportLayout { columns: 4, row_height: 250 });
        assert!(report.visualizations.is_empty());
    }

    #[test]
    fn test_visualization_lifecycle() {
        let mut report = CustomReport::new("Ops", None).unwrap();
        let created = report.updated_at;

        let first = report.add_visualization(ReportVisualization {
            width: 9,
            height: 0,
            ..ReportVisualization::default()
        });
        assert_eq!(report.visualizations[0].width, 4);
        assert_eq!(report.visualizations[0].height, 1);
        assert!(report.updated_at >= created);

        let copy = report.duplicate_visualization(&first).unwrap();
        assert_ne!(copy, first);
        assert_eq!(report.visualizations[1].id, copy);
        assert_eq!(report.visualizations[1].title, "New Visualization (Copy)");

        let mut edited = report.visualization(&copy).unwrap().clone();
        edited.dataset = DatasetKind::Trends;
        report.update_visualization(edited).unwrap();
        assert_eq!(report.visualization(&copy).unwrap().dataset, DatasetKind::Trends);

        report.remove_visualization(&first).unwrap();
        assert_eq!(report.visualizations.len(), 1);
        assert!(matches!(
            report.remove_visualization(&first),
            Err(InsightsError::VisualizationNotFound(_))
        ));
    }

    #[test]
    fn test_book_update_and_delete() {
        let mut book = ReportBook::new();
        let id = book.create("First", None).unwrap().id.clone();

        let mut changed = book.get(&id).unwrap().clone();
        changed.name = "Renamed".to_string();
        book.update(changed).unwrap();
        assert_eq!(book.get(&id).unwrap().name, "Renamed");

        let mut missing = book.get(&id).unwrap().clone();
        missing.id = "nope".to_string();
        assert!(matches!(book.update(missing), Err(InsightsError::ReportNotFound(_))));

        assert!(book.delete(&id));
        assert!(!book.delete(&id));
    }

    #[test]
    fn test_update_assigns_missing_and_repeated_visualization_ids() {
        let mut book = ReportBook::new();
        let id = book.create("Edited elsewhere", None).unwrap().id.clone();

        let mut changed = book.get(&id).unwrap().clone();
        changed.visualizations = serde_json::from_str(
            r#"[
                {"title":"A","type":"bar","dataset":"ratings","width":2,"height":1},
                {"title":"B","type":"pie","dataset":"sentiment","width":9,"height":1},
                {"id":"kept","title":"C","type":"bar","dataset":"trends","width":1,"height":1},
                {"id":"kept","title":"D","type":"bar","dataset":"trends","width":1,"height":1}
            ]"#,
        )
        .unwrap();
        book.update(changed).unwrap();

        let report = book.get_mut(&id).unwrap();
        let ids: Vec<String> = report.visualizations.iter().map(|v| v.id.clone()).collect();
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(ids[2], "kept", "the first holder of an id keeps it");
        assert_eq!(report.visualizations[1].width, 4);

        report.remove_visualization(&ids[0]).unwrap();
        assert_eq!(report.visualization(&ids[1]).unwrap().title, "B");
    }

    #[test]
    fn test_normalize_rejects_blank_name() {
        let mut report = CustomReport::new("Ops", Some("  notes ")).unwrap();
        report.normalize().unwrap();
        assert_eq!(report.description.as_deref(), Some("notes"));

        report.name = "  ".to_string();
        assert!(matches!(report.normalize(), Err(InsightsError::InvalidReport(_))));
    }

    #[test]
    fn test_grid_span_expanded() {
        let viz = ReportVisualization::default();
        let layout = ReportLayout::default();

        assert_eq!(viz.grid_span(&layout, false), (2, 1));
        assert_eq!(viz.grid_span(&layout, true), (4, 3));
    }

    #[test]
    fn test_unknown_color_scheme_falls_back() {
        let viz: ReportVisualization = serde_json::from_str(
            r#"{"title":"T","type":"pie","dataset":"sentiment",
                "colorScheme":"neon","width":1,"height":1}"#,
        )
        .unwrap();

        assert_eq!(viz.color_scheme, ColorScheme::Default);
        assert_eq!(viz.kind, VisualizationType::Pie);
    }

    #[test]
    fn test_resolve_ratings_defaults_to_thirty_days() {
        let engine = engine();
        let viz = ReportVisualization {
            filters: FilterOptions::new(),
            ..ReportVisualization::default()
        };
        let chart = resolve_visualization_at(&engine, &viz, &now());

        let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1 Stars", "2 Stars", "3 Stars", "4 Stars", "5 Stars"]);
        let total: f64 = chart.points.iter().map(|p| p.value).sum();
        assert_eq!(total, 3.0, "the 200-day-old review is outside 30 days");
        assert_eq!(chart.palette[0], "#4C6A9C");
    }

    #[test]
    fn test_resolve_sentiment_sorted_by_value() {
        let engine = engine();
        let viz = ReportVisualization {
            dataset: DatasetKind::Sentiment,
            color_scheme: ColorScheme::Green,
            sort_by: Some(SortKey::Value),
            ..ReportVisualization::default()
        };
        let chart = resolve_visualization_at(&engine, &viz, &now());

        assert_eq!(chart.points[0].label, "Positive");
        assert_eq!(chart.points[0].value, 2.0);
        assert_eq!(chart.points[2].value, 0.0);
        assert_eq!(chart.palette[0], "#145A32");
    }

    #[test]
    fn test_value_sort_keeps_ties_in_dataset_order() {
        let reviews = vec![
            Review::new("1", "", Rating::new(5).unwrap(), "a", now() - Duration::days(1)),
            Review::new("1", "", Rating::new(4).unwrap(), "b", now() - Duration::days(2)),
        ];
        let engine = ReviewEngine::new(mock::regions(), mock::branches(), reviews);

        for order in [None, Some(SortOrder::Desc)] {
            let viz = ReportVisualization {
                dataset: DatasetKind::Sentiment,
                sort_by: Some(SortKey::Value),
                sort_order: order,
                ..ReportVisualization::default()
            };
            let chart = resolve_visualization_at(&engine, &viz, &now());
            let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels, vec!["Positive", "Neutral", "Negative"]);
        }

        let viz = ReportVisualization {
            dataset: DatasetKind::Sentiment,
            sort_by: Some(SortKey::Value),
            sort_order: Some(SortOrder::Asc),
            ..ReportVisualization::default()
        };
        let chart = resolve_visualization_at(&engine, &viz, &now());
        let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Neutral", "Negative", "Positive"]);
    }

    #[test]
    fn test_resolve_performance_by_branch() {
        let engine = engine();
        let viz = ReportVisualization {
            dataset: DatasetKind::Performance,
            filters: FilterOptions::new().period(TimePeriod::All),
            ..ReportVisualization::default()
        };
        let chart = resolve_visualization_at(&engine, &viz, &now());

        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].label, "Newcastle Central");
        assert_eq!(chart.points[0].value, 4.5);
        assert_eq!(chart.points[1].label, "London Central");
        assert_eq!(chart.points[1].secondary, Some(2.0));
    }

    #[test]
    fn test_resolve_trends_date_descending() {
        let engine = engine();
        let viz = ReportVisualization {
            dataset: DatasetKind::Trends,
            sort_by: Some(SortKey::Date),
            sort_order: Some(SortOrder::Desc),
            ..ReportVisualization::default()
        };
        let chart = resolve_visualization_at(&engine, &viz, &now());

        assert_eq!(chart.points.len(), 12);
        assert_eq!(chart.points[0].label, "Jun 2024");
        assert_eq!(chart.points[0].secondary, Some(3.0));
    }
}
