//! `/comments` handlers and error-to-response mapping.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::info;

use crate::services::comment::{self, CommentError};
use crate::state::{AppState, Comment};

pub const SEARCH_WORD_PARAM: &str = "searchWord";

/// `GET /comments` — every comment in insertion order.
///
/// Axum routes HEAD to the GET handler, so HEAD is rejected here. Query
/// parameters are logged after the snapshot is taken and have no effect on
/// the response.
pub async fn list_comments(
    method: Method,
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Comment>>, CommentError> {
    if method != Method::GET {
        return Err(CommentError::MethodNotAllowed);
    }
    let comments = comment::list_comments(&state.comments).await;
    log_query_params(&params);
    Ok(Json(comments))
}

/// `POST /comments` — validate and append one comment.
pub async fn create_comment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), CommentError> {
    comment::create_comment(&state.comments, &body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

/// Any other method on `/comments`.
pub async fn method_not_allowed() -> CommentError {
    CommentError::MethodNotAllowed
}

/// Malformed bodies map to 500, not 400.
pub(crate) fn comment_error_to_status(err: &CommentError) -> StatusCode {
    match err {
        CommentError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CommentError::Validation(_) => StatusCode::BAD_REQUEST,
        CommentError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    }
}

impl IntoResponse for CommentError {
    fn into_response(self) -> Response {
        let status = comment_error_to_status(&self);
        (status, Json(json!({ "status": self.to_string() }))).into_response()
    }
}

/// Group repeated query keys, preserving value order per key.
fn group_query_params(params: &[(String, String)]) -> BTreeMap<&str, Vec<&str>> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in params {
        grouped.entry(key.as_str()).or_default().push(value.as_str());
    }
    grouped
}

fn log_query_params(params: &[(String, String)]) {
    let grouped = group_query_params(params);
    let words = grouped.get(SEARCH_WORD_PARAM);
    let word = words.and_then(|w| w.first()).copied().unwrap_or_default();

    info!(search_word = %word, "comments: search word");
    info!(search_words = ?words.cloned().unwrap_or_default(), present = words.is_some(), "comments: search words");
    for (key, values) in &grouped {
        info!(%key, ?values, "comments: query");
    }
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
