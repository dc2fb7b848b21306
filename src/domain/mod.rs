pub mod form;
pub mod model;

pub use form::{FormError, FormValues, UserForm};
pub use model::User;
