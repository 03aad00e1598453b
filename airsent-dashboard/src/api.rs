//! HTTP handlers

use crate::AppState;
use airsent_common::AirsentError;
use airsent_query::render::{render_page, RenderOptions};
use airsent_query::view::parse_hour;
use airsent_query::{
    hour_caption, sorted_tally, stopword_set, word_frequencies, Breakdown, DashboardParams,
    DashboardQuery, DashboardView, GeoPoint, Post, TallyEntry, WordCount,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Error returned from handlers, mapped to a status code by variant
pub struct ApiError(pub AirsentError);

impl From<AirsentError> for ApiError {
    fn from(error: AirsentError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AirsentError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AirsentError::NoData(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        } else {
            debug!("Rejected request: {}", self.0);
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Deserialize)]
pub struct SampleQuery {
    pub sentiment: Option<String>,
}

#[derive(Deserialize)]
pub struct GeoQuery {
    pub hour: Option<String>,
}

#[derive(Deserialize)]
pub struct WordsQuery {
    pub sentiment: Option<String>,
    pub max_words: Option<usize>,
}

#[derive(Serialize)]
pub struct GeoResponse {
    pub hour: u32,
    pub caption: String,
    pub points: Vec<GeoPoint>,
}

#[derive(Serialize)]
pub struct WordsResponse {
    pub sentiment: String,
    pub corpus: String,
    pub words: Vec<WordCount>,
}

fn build_view(state: &AppState, params: DashboardParams) -> Result<DashboardView, AirsentError> {
    let mut rng = rand::thread_rng();
    DashboardView::build(&state.dataset, params, &mut rng, &state.config.word_cloud)
}

/// Rendered dashboard for the control values in the query string
pub async fn index(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, ApiError> {
    let params = DashboardParams::try_from(DashboardQuery::from_pairs(pairs))?;
    let view = build_view(&state, params)?;
    let options = RenderOptions {
        title: state.config.title.clone(),
        background_color: state.config.background_color.clone(),
        interactive: true,
    };
    Ok(Html(render_page(&view, &options)))
}

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "airsent-dashboard".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());
    status.insert("posts".to_string(), state.dataset.len().to_string());

    Json(ApiResponse::success(status))
}

pub async fn sentiment_counts(State(state): State<AppState>) -> Json<ApiResponse<Vec<TallyEntry>>> {
    Json(ApiResponse::success(sorted_tally(state.dataset.sentiment_tally())))
}

pub async fn publisher_counts(State(state): State<AppState>) -> Json<ApiResponse<Vec<TallyEntry>>> {
    Json(ApiResponse::success(state.dataset.publisher_tally()))
}

pub async fn random_sample(
    State(state): State<AppState>,
    Query(params): Query<SampleQuery>,
) -> ApiResult<Post> {
    let sentiment = params
        .sentiment
        .ok_or_else(|| AirsentError::InvalidParameter("sentiment is required".into()))?;
    let post = {
        let mut rng = rand::thread_rng();
        state.dataset.random_post(&sentiment, &mut rng)?.clone()
    };
    Ok(Json(ApiResponse::success(post)))
}

pub async fn geo(
    State(state): State<AppState>,
    Query(params): Query<GeoQuery>,
) -> ApiResult<GeoResponse> {
    let hour = params.hour.as_deref().map(parse_hour).transpose()?.unwrap_or(0);
    let points = state.dataset.geo_by_hour(hour)?;
    Ok(Json(ApiResponse::success(GeoResponse {
        hour,
        caption: hour_caption(points.len(), hour),
        points,
    })))
}

pub async fn breakdown(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Breakdown> {
    let publishers = DashboardQuery::from_pairs(pairs).publishers;
    Ok(Json(ApiResponse::success(state.dataset.publisher_breakdown(&publishers))))
}

pub async fn words(
    State(state): State<AppState>,
    Query(params): Query<WordsQuery>,
) -> ApiResult<WordsResponse> {
    let sentiment = params
        .sentiment
        .or_else(|| state.dataset.sentiments().into_iter().next())
        .ok_or_else(|| AirsentError::NoData("dataset has no sentiment labels".into()))?;
    let max_words = params.max_words.unwrap_or(state.config.word_cloud.max_words);
    if max_words == 0 {
        return Err(AirsentError::InvalidParameter("max_words must be positive".into()).into());
    }

    let corpus = state.dataset.word_corpus(&sentiment);
    let stopwords = stopword_set(&state.config.word_cloud.extra_stopwords);
    let words = word_frequencies(&corpus, &stopwords, max_words);

    Ok(Json(ApiResponse::success(WordsResponse {
        sentiment,
        corpus,
        words,
    })))
}
