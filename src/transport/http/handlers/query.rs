use crate::app::controller::{Controller, Submission};
use crate::transport::http::types::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

/// Runs a controller operation on the blocking pool; the store does plain
/// file I/O.
async fn run_blocking<F>(op: F) -> Response
where
    F: FnOnce() -> Response + Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "controller task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Form listing every stored user", body = String, content_type = "text/html"),
        (status = 404, description = "No users stored yet", body = String, content_type = "text/html"),
        (status = 500, description = "Store could not be read", body = String, content_type = "text/html")
    )
)]
pub async fn get_handler(State(state): State<AppState>) -> Response {
    let controller = state.new_controller(Submission::empty());
    run_blocking(move || controller.get()).await
}

#[utoipa::path(
    post,
    path = "/",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Repeated `people[][firstname]` and `people[][surname]` fields, paired by position"
    ),
    responses(
        (status = 303, description = "Users stored; redirects to the listing"),
        (status = 400, description = "Invalid or incomplete form", body = String, content_type = "text/html"),
        (status = 500, description = "Store could not be written", body = String, content_type = "text/html")
    )
)]
pub async fn post_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let controller = state.new_controller(Submission::new(content_type, body));
    run_blocking(move || controller.post()).await
}

pub async fn not_found_handler(State(state): State<AppState>) -> Response {
    state.new_controller(Submission::empty()).not_found()
}
