// Review Insights - HTTP API
// JSON surface over the engine and the report store (`server` feature)

use crate::config::AppConfig;
use crate::engine::ReviewEngine;
use crate::entities::{Branch, Rating, Region, ReviewView, Sentiment};
use crate::error::InsightsError;
use crate::filters::{DateRange, FilterOptions, TimePeriod};
use crate::loader::{parse_range_end, parse_timestamp};
use crate::reports::{resolve_visualization, ChartData, CustomReport};
use crate::stats::DashboardStats;
use crate::store::ReportStore;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReviewEngine>,
    pub reports: Arc<Mutex<ReportStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(engine: ReviewEngine, reports: ReportStore, config: AppConfig) -> Self {
        AppState {
            engine: Arc::new(engine),
            reports: Arc::new(Mutex::new(reports)),
            config: Arc::new(config),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, ReportStore>, ApiError> {
        self.reports
            .lock()
            .map_err(|_| ApiError::internal("report store lock poisoned"))
    }
}

// ============================================================================
// Envelope & errors
// ============================================================================

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(what: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: what.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<InsightsError> for ApiError {
    fn from(err: InsightsError) -> Self {
        match err {
            InsightsError::InvalidRating(_)
            | InsightsError::UnknownValue { .. }
            | InsightsError::InvalidReport(_) => ApiError::bad_request(err.to_string()),
            InsightsError::ReportNotFound(_) | InsightsError::VisualizationNotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            other => {
                error!(error = %other, "request failed");
                ApiError::internal("internal error")
            }
        }
    }
}

// Extractor failures answer with the same envelope as handler errors
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        if status == StatusCode::UNSUPPORTED_MEDIA_TYPE || status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError {
                status,
                message: rejection.body_text(),
            }
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = %self.status, message = %self.message, "request rejected");
        }
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Query parameters
// ============================================================================

/// Filter axes as query-string text: `rating=4,5&sentiment=positive&timePeriod=30days`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    page: Option<usize>,
    page_size: Option<usize>,
    region_id: Option<String>,
    branch_id: Option<String>,
    rating: Option<String>,
    sentiment: Option<String>,
    time_period: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

fn split_list(raw: &Option<String>) -> impl Iterator<Item = &str> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_instant(
    raw: &Option<String>,
    name: &str,
    parse: fn(&str) -> Option<DateTime<Utc>>,
) -> Result<Option<DateTime<Utc>>, InsightsError> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => parse(text)
            .map(Some)
            .ok_or_else(|| InsightsError::unknown("date", format!("{}={}", name, text))),
        None => Ok(None),
    }
}

impl FilterQuery {
    pub fn filters(&self) -> Result<FilterOptions, InsightsError> {
        let mut filters = FilterOptions::new();
        filters.region_id = self.region_id.clone().filter(|s| !s.is_empty());
        filters.branch_id = self.branch_id.clone().filter(|s| !s.is_empty());
        filters.ratings = split_list(&self.rating)
            .map(str::parse::<Rating>)
            .collect::<Result<_, _>>()?;
        filters.sentiments = split_list(&self.sentiment)
            .map(str::parse::<Sentiment>)
            .collect::<Result<_, _>>()?;
        filters.time_period = self
            .time_period
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<TimePeriod>)
            .transpose()?;

        let from = parse_instant(&self.from, "from", parse_timestamp)?;
        // a plain `to` date includes that whole day
        let to = parse_instant(&self.to, "to", parse_range_end)?;
        if from.is_some() || to.is_some() {
            filters.date_range = Some(DateRange::new(
                from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                to.unwrap_or(DateTime::<Utc>::MAX_UTC),
            ));
        }
        Ok(filters)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NewReport {
    name: String,
    description: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPageResponse {
    reviews: Vec<ReviewView>,
    total_count: usize,
    page: usize,
    page_size: usize,
    page_count: usize,
}

// ============================================================================
// Handlers: regions & branches
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok("OK")
}

/// GET /api/regions
async fn list_regions(State(state): State<AppState>) -> ApiResult<Vec<Region>> {
    Ok(ApiResponse::ok(state.engine.list_regions().to_vec()))
}

/// GET /api/regions/:region - by code
async fn get_region(State(state): State<AppState>, Path(code): Path<String>) -> ApiResult<Region> {
    state
        .engine
        .get_region(&code)
        .cloned()
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found(format!("region not found: {}", code)))
}

/// GET /api/regions/:region/branches - by region id
async fn region_branches(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> ApiResult<Vec<Branch>> {
    let branches = state
        .engine
        .list_branches_by_region(&region_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(ApiResponse::ok(branches))
}

/// GET /api/branches
async fn list_branches(State(state): State<AppState>) -> ApiResult<Vec<Branch>> {
    Ok(ApiResponse::ok(state.engine.list_branches().to_vec()))
}

/// GET /api/branches/search?q= - short queries return nothing
async fn search_branches(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Vec<Branch>> {
    let Query(query) = query?;
    if !state.config.accepts_search(&query.q) {
        return Ok(ApiResponse::ok(Vec::new()));
    }
    let hits = state
        .engine
        .search_branches(query.q.trim())
        .into_iter()
        .cloned()
        .collect();
    Ok(ApiResponse::ok(hits))
}

/// GET /api/branches/:id
async fn get_branch(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Branch> {
    state
        .engine
        .get_branch(&id)
        .cloned()
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found(format!("branch not found: {}", id)))
}

/// GET /api/branches/:id/reviews
async fn branch_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ReviewView>> {
    if state.engine.get_branch(&id).is_none() {
        return Err(ApiError::not_found(format!("branch not found: {}", id)));
    }
    let reviews = state
        .engine
        .list_reviews_by_branch(&id)
        .into_iter()
        .map(ReviewView::from)
        .collect();
    Ok(ApiResponse::ok(reviews))
}

// ============================================================================
// Handlers: reviews & stats
// ============================================================================

/// GET /api/reviews?page&pageSize&<filters>
async fn list_reviews(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> ApiResult<ReviewPageResponse> {
    let Query(query) = query?;
    let filters = query.filters()?;
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(state.config.default_page_size);

    let result = state.engine.list_reviews(page, page_size, &filters);
    let page_count = result.page_count();
    Ok(ApiResponse::ok(ReviewPageResponse {
        reviews: result.reviews.iter().map(ReviewView::from).collect(),
        total_count: result.total_count,
        page: result.page,
        page_size: result.page_size,
        page_count,
    }))
}

/// GET /api/reviews/recent?limit
async fn recent_reviews(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Vec<ReviewView>> {
    let Query(query) = query?;
    let reviews = state
        .engine
        .list_recent_reviews(query.limit.unwrap_or(5))
        .into_iter()
        .map(ReviewView::from)
        .collect();
    Ok(ApiResponse::ok(reviews))
}

/// GET /api/stats?<filters>
async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> ApiResult<DashboardStats> {
    let Query(query) = query?;
    let filters = query.filters()?;
    Ok(ApiResponse::ok(state.engine.compute_dashboard_stats(&filters)))
}

// ============================================================================
// Handlers: custom reports
// ============================================================================

/// GET /api/reports
async fn list_reports(State(state): State<AppState>) -> ApiResult<Vec<CustomReport>> {
    let reports = state.store()?.load_all()?;
    Ok(ApiResponse::ok(reports))
}

/// POST /api/reports
async fn create_report(
    State(state): State<AppState>,
    body: Result<Json<NewReport>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CustomReport>>), ApiError> {
    let Json(body) = body?;
    let report = CustomReport::new(&body.name, body.description.as_deref())?;
    state.store()?.save(&report)?;
    Ok((StatusCode::CREATED, ApiResponse::ok(report)))
}

/// GET /api/reports/:id
async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CustomReport> {
    let report = state.store()?.get(&id)?;
    report
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found(format!("report not found: {}", id)))
}

/// PUT /api/reports/:id
async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CustomReport>, JsonRejection>,
) -> ApiResult<CustomReport> {
    let Json(mut report) = body?;
    let store = state.store()?;
    let existing = store
        .get(&id)?
        .ok_or_else(|| ApiError::not_found(format!("report not found: {}", id)))?;

    report.id = id;
    report.normalize()?;
    report.created_at = existing.created_at;
    report.updated_at = Utc::now();
    store.save(&report)?;
    Ok(ApiResponse::ok(report))
}

/// DELETE /api/reports/:id
async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let removed = state.store()?.delete(&id)?;
    if removed {
        Ok(ApiResponse::ok(true))
    } else {
        Err(ApiError::not_found(format!("report not found: {}", id)))
    }
}

/// GET /api/reports/:id/visualizations/:viz_id/data
async fn visualization_data(
    State(state): State<AppState>,
    Path((id, viz_id)): Path<(String, String)>,
) -> ApiResult<ChartData> {
    let report = state
        .store()?
        .get(&id)?
        .ok_or_else(|| ApiError::not_found(format!("report not found: {}", id)))?;
    let viz = report
        .visualization(&viz_id)
        .ok_or_else(|| ApiError::not_found(format!("visualization not found: {}", viz_id)))?;

    Ok(ApiResponse::ok(resolve_visualization(&state.engine, viz)))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/regions", get(list_regions))
        .route("/regions/:region", get(get_region))
        .route("/regions/:region/branches", get(region_branches))
        .route("/branches", get(list_branches))
        .route("/branches/search", get(search_branches))
        .route("/branches/:id", get(get_branch))
        .route("/branches/:id/reviews", get(branch_reviews))
        .route("/reviews", get(list_reviews))
        .route("/reviews/recent", get(recent_reviews))
        .route("/stats", get(get_stats))
        .route("/reports", get(list_reports).post(create_report))
        .route(
            "/reports/:id",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/reports/:id/visualizations/:viz_id/data", get(visualization_data))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use crate::reports::ReportVisualization;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(
            mock::generate(11, 120, Utc::now()),
            ReportStore::open_in_memory().unwrap(),
            AppConfig::default(),
        )
    }

    async fn call(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        call_raw(app, method, uri, body.map(|json| json.to_string())).await
    }

    /// Sends `body` verbatim as JSON, well-formed or not
    async fn call_raw(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header("content-type", "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        call(app, Method::GET, uri, None).await
    }

    #[test]
    fn test_filter_query_parsing() {
        let query = FilterQuery {
            rating: Some("4, 5".to_string()),
            sentiment: Some("positive".to_string()),
            time_period: Some("90days".to_string()),
            from: Some("2024-01-01".to_string()),
            ..FilterQuery::default()
        };
        let filters = query.filters().unwrap();

        assert_eq!(filters.ratings.len(), 2);
        assert_eq!(filters.sentiments, vec![Sentiment::Positive]);
        assert_eq!(filters.time_period, Some(TimePeriod::Last90Days));
        assert_eq!(filters.date_range.unwrap().end, DateTime::<Utc>::MAX_UTC);

        let single_day = FilterQuery {
            from: Some("2024-05-03".to_string()),
            to: Some("2024-05-03".to_string()),
            ..FilterQuery::default()
        };
        let range = single_day.filters().unwrap().date_range.unwrap();
        assert!(range.contains(parse_timestamp("2024-05-03T18:30:00Z").unwrap()));
        assert!(!range.contains(parse_timestamp("2024-05-04").unwrap()));

        let bad = FilterQuery {
            rating: Some("7".to_string()),
            ..FilterQuery::default()
        };
        assert!(bad.filters().is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(router(state()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_region_lookup_and_404() {
        let app = router(state());

        let (status, body) = get_json(app.clone(), "/api/regions/sw").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "South West");

        let (status, body) = get_json(app.clone(), "/api/regions/XX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (_, body) = get_json(app, "/api/regions/4/branches").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_applies_minimum_length() {
        let app = router(state());

        let (_, body) = get_json(app.clone(), "/api/branches/search?q=br").await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let (_, body) = get_json(app, "/api/branches/search?q=bris").await;
        let hits = body["data"].as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["name"], "Bristol");
    }

    #[tokio::test]
    async fn test_reviews_page_and_bad_filter() {
        let app = router(state());

        let (status, body) = get_json(app.clone(), "/api/reviews?page=2&pageSize=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalCount"], 120);
        assert_eq!(body["data"]["pageCount"], 12);
        assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 10);

        let (_, body) = get_json(app.clone(), "/api/reviews?rating=1,2&pageSize=200").await;
        for review in body["data"]["reviews"].as_array().unwrap() {
            assert_eq!(review["sentiment"], "negative");
        }

        let (status, _) = get_json(app, "/api/reviews?timePeriod=forever").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_honor_query_filters() {
        let app = router(state());

        let (_, all) = get_json(app.clone(), "/api/stats").await;
        let (_, neutral) = get_json(app, "/api/stats?sentiment=neutral").await;

        assert_eq!(all["data"]["totalReviews"], 120);
        assert_eq!(
            neutral["data"]["totalReviews"],
            all["data"]["sentimentDistribution"][1]["count"]
        );
        assert_eq!(all["data"]["monthlyTrends"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_report_crud_and_chart() {
        let state = state();
        let app = router(state.clone());

        let blank = serde_json::json!({"name": " "});
        let (status, _) = call(app.clone(), Method::POST, "/api/reports", Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, created) = call(
            app.clone(),
            Method::POST,
            "/api/reports",
            Some(serde_json::json!({"name": "Weekly", "description": "Ops"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let mut report: CustomReport = serde_json::from_value(created["data"].clone()).unwrap();
        let viz_id = report.add_visualization(ReportVisualization::default());
        let (status, updated) = call(
            app.clone(),
            Method::PUT,
            &format!("/api/reports/{}", id),
            Some(serde_json::to_value(&report).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["visualizations"].as_array().unwrap().len(), 1);

        let chart_uri = format!("/api/reports/{}/visualizations/{}/data", id, viz_id);
        let (status, chart) = get_json(app.clone(), &chart_uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart["data"]["points"].as_array().unwrap().len(), 5);

        let report_uri = format!("/api/reports/{}", id);
        let (status, _) = call(app.clone(), Method::DELETE, &report_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_json(app, &format!("/api/reports/{}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_envelope() {
        let app = router(state());

        let (status, body) = get_json(app.clone(), "/api/reviews?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, body) = get_json(app, "/api/stats?pageSize=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_report_body_uses_error_envelope() {
        let app = router(state());

        let garbled = Some("{not json".to_string());
        let (status, body) = call_raw(app.clone(), Method::POST, "/api/reports", garbled).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let wrong_shape = Some(r#"{"description": "no name"}"#.to_string());
        let (status, body) = call_raw(app, Method::POST, "/api/reports", wrong_shape).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_put_without_visualization_ids_keeps_them_addressable() {
        let app = router(state());

        let new_report = serde_json::json!({"name": "Hand written"});
        let (_, created) = call(app.clone(), Method::POST, "/api/reports", Some(new_report)).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let mut edited = created["data"].clone();
        edited["visualizations"] = serde_json::json!([
            {"title": "Ratings", "type": "bar", "dataset": "ratings", "width": 2, "height": 1},
            {"title": "Mood", "type": "pie", "dataset": "sentiment", "width": 2, "height": 1}
        ]);
        let report_uri = format!("/api/reports/{}", id);
        let (status, updated) = call(app.clone(), Method::PUT, &report_uri, Some(edited)).await;
        assert_eq!(status, StatusCode::OK);

        let viz_ids: Vec<String> = updated["data"]["visualizations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(viz_ids.len(), 2);
        assert!(viz_ids.iter().all(|v| !v.is_empty()));
        assert_ne!(viz_ids[0], viz_ids[1]);

        for (viz_id, points) in viz_ids.iter().zip([5, 3]) {
            let chart_uri = format!("/api/reports/{}/visualizations/{}/data", id, viz_id);
            let (status, chart) = get_json(app.clone(), &chart_uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(chart["data"]["points"].as_array().unwrap().len(), points);
        }
    }
}
