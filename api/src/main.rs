use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use quran_search::search::DEFAULT_PAGE_SIZE;
use quran_search::{
    diagnose, get_data_dir, get_highlight_ranges, get_positive_tokens, AppState, ConflictReport,
    HighlightRange, Pagination, SearchError, SearchOptions, SearchResponse, TokenField,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

// === Request/Response types ===

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    page: Option<usize>,
    limit: Option<usize>,
    lemma: Option<bool>,
    root: Option<bool>,
    fuzzy: Option<bool>,
    sura_id: Option<u32>,
    juz_id: Option<u32>,
    sura_name: Option<String>,
}

impl SearchQuery {
    fn options(&self) -> SearchOptions {
        let defaults = SearchOptions::default();
        SearchOptions {
            lemma: self.lemma.unwrap_or(defaults.lemma),
            root: self.root.unwrap_or(defaults.root),
            fuzzy: self.fuzzy.unwrap_or(defaults.fuzzy),
            sura_id: self.sura_id,
            juz_id: self.juz_id,
            sura_name: self.sura_name.clone(),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        )
    }
}

#[derive(Deserialize)]
struct HighlightQuery {
    gid: u32,
    q: String,
    mode: Option<TokenField>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    verses: usize,
}

#[derive(Serialize)]
struct Conflict {
    #[serde(flatten)]
    report: ConflictReport,
    message: String,
}

#[derive(Serialize)]
struct SearchReply {
    #[serde(flatten)]
    response: Arc<SearchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<Conflict>,
}

#[derive(Serialize)]
struct HighlightResponse {
    gid: u32,
    text: String,
    tokens: Vec<String>,
    ranges: Vec<HighlightRange>,
}

#[derive(Serialize)]
struct CacheStats {
    entries: usize,
    capacity: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, err: SearchError) -> ApiError {
    (status, Json(ErrorResponse { error: err.to_string() }))
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        verses: state.engine.corpus().len(),
    })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchReply> {
    let options = params.options();
    let response = state.engine.search_cached(
        &params.q,
        &options,
        params.pagination(),
        Some(state.cache.as_ref()),
    );

    let conflict = response.is_empty().then(|| {
        let report = diagnose(&state.engine, &params.q, &options);
        Conflict {
            message: report.to_string(),
            report,
        }
    });

    Json(SearchReply { response, conflict })
}

async fn highlight_verse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HighlightQuery>,
) -> Result<Json<HighlightResponse>, ApiError> {
    let corpus = state.engine.corpus();
    let verse = corpus.verse(params.gid).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            SearchError::NotFound(format!("verse {}", params.gid)),
        )
    })?;

    let mode = params.mode.unwrap_or_default();
    let resolved = state.engine.resolve(&params.q);
    let tokens = get_positive_tokens(
        verse,
        mode,
        resolved.lemma.as_deref(),
        resolved.root.as_deref(),
        &params.q,
        corpus.morphology(),
    );
    let types = vec![mode.match_type(); tokens.len()];
    let ranges = get_highlight_ranges(&verse.uthmani, &tokens, Some(types.as_slice()));

    Ok(Json(HighlightResponse {
        gid: verse.gid,
        text: verse.uthmani.clone(),
        tokens,
        ranges,
    }))
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    let (entries, capacity) = state.cache.stats();
    Json(CacheStats { entries, capacity })
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.cache.clear();
    tracing::info!("search cache cleared");
    StatusCode::NO_CONTENT
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir = get_data_dir();
    let state = Arc::new(AppState::new(data_dir)?);
    tracing::info!(data_dir = %state.data_dir.display(), "corpus loaded");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/verse/highlight", get(highlight_verse))
        .route("/cache/stats", get(cache_stats))
        .route("/cache", delete(clear_cache))
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("QURAN_SEARCH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
