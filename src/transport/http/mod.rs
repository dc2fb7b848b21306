pub mod router;
pub mod templates;
pub mod types;
pub mod handlers {
    pub mod query;
}

pub use router::{create_router, ApiDoc};
pub use templates::{Template, TemplateError, Templates};
pub use types::AppState;
