//! Per-request controller tying the store, the form decoder and the
//! templates together.
//!
//! Each request gets its own controller. Exactly one status (and, apart from
//! the redirect after a successful post, one rendered body) comes out of every
//! operation; store and decoder failures are translated here and nowhere else.

use crate::domain::form::{parse_urlencoded, FormError, FormValues, UserForm};
use crate::storage::store::{Store, StoreError};
use crate::transport::http::templates::{ErrorView, Templates, UsersView};
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;

/// Path of the listing; a successful post redirects back here.
pub const API_PATH_QUERY: &str = "/";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Operations the router dispatches to. Each consumes the controller, so a
/// controller answers exactly one request.
pub trait Controller {
    /// Lists the stored users, or renders why it cannot.
    fn get(self) -> Response;

    /// Appends the submitted users to the stored ones.
    fn post(self) -> Response;

    /// Renders the error view for a route that does not exist.
    fn not_found(self) -> Response;
}

/// The request body as it arrived, parsed only when a controller needs it.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    content_type: Option<String>,
    body: Bytes,
}

impl Submission {
    pub fn new(content_type: Option<String>, body: Bytes) -> Self {
        Self { content_type, body }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` body. Any other content
    /// type is invalid form data.
    pub fn form_values(&self) -> Result<FormValues, FormError> {
        let is_form = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
            .unwrap_or(false);
        if !is_form {
            return Err(FormError::InvalidFormData);
        }
        Ok(parse_urlencoded(&self.body))
    }
}

pub struct QueryController {
    store: Arc<dyn Store>,
    templates: Arc<Templates>,
    submission: Submission,
}

impl QueryController {
    pub fn new(store: Arc<dyn Store>, templates: Arc<Templates>, submission: Submission) -> Self {
        Self {
            store,
            templates,
            submission,
        }
    }

    fn render<C: Serialize>(&self, status: StatusCode, context: &C) -> Response {
        match self.templates.get(status).render(context) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(%status, error = %e, "render failed");
                status.into_response()
            }
        }
    }

    fn render_error(&self, status: StatusCode, err: impl Display) -> Response {
        self.render(status, &ErrorView::new(err))
    }
}

impl Controller for QueryController {
    fn get(self) -> Response {
        let users = match self.store.read() {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(error = %e, "unable to read users");
                return self.render_error(StatusCode::INTERNAL_SERVER_ERROR, e);
            }
        };

        if users.is_empty() {
            return self.render_error(StatusCode::NOT_FOUND, "no users found");
        }

        self.render(StatusCode::OK, &UsersView { users: &users })
    }

    fn post(self) -> Response {
        let values = match self.submission.form_values() {
            Ok(values) => values,
            Err(e) => return self.render_error(StatusCode::BAD_REQUEST, e),
        };

        let users = match UserForm::decode_from(&values).and_then(|form| form.users()) {
            Ok(users) => users,
            Err(e) => {
                tracing::debug!(error = %e, "rejected form");
                return self.render_error(StatusCode::BAD_REQUEST, e);
            }
        };

        // A store that has never been written to holds no users yet.
        let mut stored = match self.store.read() {
            Ok(stored) => stored,
            Err(StoreError::NotFound { .. }) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "unable to read users");
                return self.render_error(StatusCode::INTERNAL_SERVER_ERROR, e);
            }
        };
        let added = users.len();
        stored.extend(users);

        if let Err(e) = self.store.write(&stored) {
            tracing::warn!(error = %e, "unable to write users");
            return self.render_error(StatusCode::INTERNAL_SERVER_ERROR, e);
        }

        tracing::info!(added, total = stored.len(), "stored users");
        Redirect::to(API_PATH_QUERY).into_response()
    }

    fn not_found(self) -> Response {
        self.render_error(StatusCode::NOT_FOUND, "page not found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{FORM_KEY_FIRST_NAME, FORM_KEY_SURNAME};
    use crate::domain::model::User;
    use crate::infra::assets::Assets;
    use crate::storage::store::{MockStore, StoreError};
    use axum::http::header::LOCATION;
    use std::path::PathBuf;

    fn templates() -> Arc<Templates> {
        Arc::new(Templates::gather(&Assets::embedded()).unwrap())
    }

    fn controller(store: MockStore, submission: Submission) -> QueryController {
        QueryController::new(Arc::new(store), templates(), submission)
    }

    fn form(body: &str) -> Submission {
        Submission::new(
            Some(FORM_CONTENT_TYPE.to_string()),
            Bytes::from(body.to_string()),
        )
    }

    fn encode(pairs: &[(&str, &str)]) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn get_with_no_users() {
        let mut store = MockStore::new();
        store.expect_read().times(1).returning(|| Ok(vec![]));

        let response = controller(store, Submission::empty()).get();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("no users found"));
    }

    #[tokio::test]
    async fn get_with_some_users() {
        let mut store = MockStore::new();
        store
            .expect_read()
            .returning(|| Ok(vec![User::new("Joe", "Smith")]));

        let response = controller(store, Submission::empty()).get();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Joe"));
        assert!(body.contains("Smith"));
    }

    #[tokio::test]
    async fn get_with_store_error() {
        let mut store = MockStore::new();
        store.expect_read().returning(|| {
            Err(StoreError::NotFound {
                path: PathBuf::from("data/store.csv"),
            })
        });

        let response = controller(store, Submission::empty()).get();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("no file found"));
    }

    fn unreadable() -> StoreError {
        StoreError::Open {
            path: PathBuf::from("data/store.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
    }

    #[test]
    fn post_valid_form_redirects() {
        let mut store = MockStore::new();
        store.expect_read().times(1).returning(|| Ok(vec![]));
        store
            .expect_write()
            .withf(|users| users == [User::new("fred", "bloggs")])
            .times(1)
            .returning(|_| Ok(()));

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let response = controller(store, form(&body)).post();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], API_PATH_QUERY);
    }

    #[tokio::test]
    async fn post_empty_surname_is_bad_request() {
        let mut store = MockStore::new();
        store.expect_read().never();
        store.expect_write().never();

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "")]);
        let response = controller(store, form(&body)).post();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("expected names to not be empty"));
    }

    #[test]
    fn post_mismatched_names_is_bad_request() {
        let mut store = MockStore::new();
        store.expect_read().never();
        store.expect_write().never();

        let body = encode(&[
            (FORM_KEY_FIRST_NAME, "a"),
            (FORM_KEY_FIRST_NAME, "b"),
            (FORM_KEY_SURNAME, "x"),
        ]);
        let response = controller(store, form(&body)).post();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_without_form_content_type() {
        let mut store = MockStore::new();
        store.expect_read().never();
        store.expect_write().never();

        let submission = Submission::new(
            Some("application/json".to_string()),
            Bytes::from_static(b"{}"),
        );
        let response = controller(store, submission).post();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("invalid form data"));
    }

    #[test]
    fn post_accepts_content_type_parameters() {
        let mut store = MockStore::new();
        store.expect_read().returning(|| Ok(vec![]));
        store.expect_write().times(1).returning(|_| Ok(()));

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let submission = Submission::new(
            Some("application/x-www-form-urlencoded; charset=UTF-8".to_string()),
            Bytes::from(body),
        );
        let response = controller(store, submission).post();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn post_with_store_error() {
        let mut store = MockStore::new();
        store.expect_read().returning(|| Ok(vec![]));
        store.expect_write().returning(|_| {
            Err(StoreError::Create {
                path: PathBuf::from("data/store.csv"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let response = controller(store, form(&body)).post();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn post_appends_to_stored_users() {
        let mut store = MockStore::new();
        store
            .expect_read()
            .times(1)
            .returning(|| Ok(vec![User::new("Joe", "Smith")]));
        store
            .expect_write()
            .withf(|users| users == [User::new("Joe", "Smith"), User::new("fred", "bloggs")])
            .times(1)
            .returning(|_| Ok(()));

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let response = controller(store, form(&body)).post();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn post_to_missing_store_writes_only_submitted_users() {
        let mut store = MockStore::new();
        store.expect_read().returning(|| {
            Err(StoreError::NotFound {
                path: PathBuf::from("data/store.csv"),
            })
        });
        store
            .expect_write()
            .withf(|users| users == [User::new("fred", "bloggs")])
            .times(1)
            .returning(|_| Ok(()));

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let response = controller(store, form(&body)).post();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn post_with_unreadable_store_is_server_error() {
        let mut store = MockStore::new();
        store.expect_read().returning(|| Err(unreadable()));
        store.expect_write().never();

        let body = encode(&[(FORM_KEY_FIRST_NAME, "fred"), (FORM_KEY_SURNAME, "bloggs")]);
        let response = controller(store, form(&body)).post();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("unable to open file"));
    }

    #[tokio::test]
    async fn not_found_renders_error_view() {
        let mut store = MockStore::new();
        store.expect_read().never();
        store.expect_write().never();

        let response = controller(store, Submission::empty()).not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("page not found"));
    }
}
