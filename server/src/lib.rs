use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router};
use leto_core::{build_index, check_limit, evaluate, rank, BuildOptions, IndexError, InvertedIndex, DEFAULT_RESULT_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SNIPPET_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: i64,
}
fn default_k() -> i64 { DEFAULT_RESULT_LIMIT as i64 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub term: String,
    pub wiki: String,
    pub score: u32,
    pub snippet: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

/// Search-side failures rendered as `{"error": "..."}`.
pub struct ApiError(StatusCode, String);

impl From<IndexError> for ApiError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Query(msg) => ApiError(StatusCode::BAD_REQUEST, msg),
            other => ApiError(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

/// Index the corpus once, then serve it read-only.
pub async fn build_app<P: AsRef<FsPath>>(corpus: P, opts: &BuildOptions) -> Result<Router> {
    let index = build_index(corpus, opts).await?;
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<InvertedIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:id", get(doc_handler))
        .with_state(AppState { index })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let limit = check_limit(params.k)?;

    let scored = evaluate(&params.q, &state.index);
    let total_hits = scored.len();
    let raw_terms: Vec<&str> = params.q.split_whitespace().collect();
    let marker = highlighter(&raw_terms);
    let results = rank(scored, limit)
        .into_iter()
        .map(|d| SearchHit {
            term: d.id.to_string(),
            wiki: d.link.to_string(),
            score: d.score,
            snippet: highlight(&snippet(d.body), marker.as_ref()),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, took_s = elapsed.as_secs_f64(), "search served");
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.index.doc(&id) {
        Some(meta) => Json(serde_json::json!({
            "id": id,
            "wiki": meta.link,
            "description": meta.body,
        }))
        .into_response(),
        None => ApiError(StatusCode::NOT_FOUND, "not found".into()).into_response(),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

/// One case-insensitive alternation over every query term, longest first, so a
/// single pass marks each match and never rescans inserted markup.
fn highlighter(terms: &[&str]) -> Option<regex::Regex> {
    let mut terms: Vec<&str> = terms.iter().copied().filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    regex::RegexBuilder::new(&alternation).case_insensitive(true).build().ok()
}

fn highlight(snippet: &str, pat: Option<&regex::Regex>) -> String {
    match pat {
        Some(pat) => pat.replace_all(snippet, "<em>${0}</em>").into_owned(),
        None => snippet.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_char_bounded() {
        let body = "é".repeat(SNIPPET_CHARS + 10);
        assert_eq!(snippet(&body).chars().count(), SNIPPET_CHARS);
    }

    fn highlight_terms(snippet: &str, terms: &[&str]) -> String {
        highlight(snippet, highlighter(terms).as_ref())
    }

    #[test]
    fn highlights_ignore_case() {
        assert_eq!(highlight_terms("Sandtrout are sandtrout", &["SANDTROUT"]), "<em>Sandtrout</em> are <em>sandtrout</em>");
    }

    #[test]
    fn markup_is_not_rehighlighted() {
        assert_eq!(highlight_terms("worm emerges", &["worm", "em"]), "<em>worm</em> <em>em</em>erges");
        assert_eq!(highlight_terms("sandworm", &["m", "worm"]), "sand<em>worm</em>");
        assert_eq!(highlight_terms("no terms", &[]), "no terms");
    }
}
