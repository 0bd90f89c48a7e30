//! Read-only JSON endpoints for the blog.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::model::{BlogPost, BlogStore, DEFAULT_RECENT_LIMIT, format_date};

/// Shared state for blog routes.
#[derive(Clone)]
pub struct BlogState {
    pub store: Arc<BlogStore>,
}

/// A post plus its display date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostView<'a> {
    #[serde(flatten)]
    post: &'a BlogPost,
    formatted_date: String,
}

impl<'a> From<&'a BlogPost> for PostView<'a> {
    fn from(post: &'a BlogPost) -> Self {
        Self {
            post,
            formatted_date: format_date(post.published_at),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

/// GET /api/blog?limit=n
async fn list_posts(
    State(state): State<BlogState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let posts: Vec<PostView> = state.store.recent(limit).into_iter().map(PostView::from).collect();
    Json(serde_json::json!({ "posts": posts }))
}

/// GET /api/blog/featured
async fn featured_posts(State(state): State<BlogState>) -> impl IntoResponse {
    let posts: Vec<PostView> = state.store.featured().into_iter().map(PostView::from).collect();
    Json(serde_json::json!({ "posts": posts }))
}

/// GET /api/blog/{slug}
async fn get_post(
    State(state): State<BlogState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&slug) {
        Some(post) => Json(serde_json::json!(PostView::from(post))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Post not found" })),
        )
            .into_response(),
    }
}

/// Build the blog routes.
pub fn blog_routes(state: BlogState) -> Router {
    Router::new()
        .route("/api/blog", get(list_posts))
        .route("/api/blog/featured", get(featured_posts))
        .route("/api/blog/{slug}", get(get_post))
        .with_state(state)
}
