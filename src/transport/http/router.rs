use crate::app::controller::API_PATH_QUERY;
use crate::transport::http::handlers::query;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(query::get_handler, query::post_handler))]
pub struct ApiDoc;

/// Routing table: `GET /` lists, `POST /` stores, everything else (other
/// methods on `/` included) is a 404 from the controller.
pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route(
            API_PATH_QUERY,
            get(query::get_handler)
                .post(query::post_handler)
                .fallback(query::not_found_handler),
        )
        .fallback(query::not_found_handler)
        .layer(middleware::from_fn(intercept_status))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Observes the status every response leaves with, without touching it.
async fn intercept_status(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), "request served");
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_query_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let query = &doc["paths"]["/"];

        assert!(query["get"]["responses"]["200"].is_object());
        assert!(query["get"]["responses"]["404"].is_object());
        assert!(query["post"]["responses"]["303"].is_object());
        assert!(query["post"]["requestBody"]["content"]["application/x-www-form-urlencoded"].is_object());
    }
}
