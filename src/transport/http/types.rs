use crate::app::controller::{QueryController, Submission};
use crate::storage::store::Store;
use crate::transport::http::templates::Templates;
use std::sync::Arc;

/// Shared dependencies of the query API. Acts as the injector: every request
/// gets a fresh controller built from these.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, templates: Templates) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
        }
    }

    pub fn new_controller(&self, submission: Submission) -> QueryController {
        QueryController::new(self.store.clone(), self.templates.clone(), submission)
    }
}
