//! Decoding of submitted form values into users.

use crate::domain::model::User;
use std::collections::HashMap;

/// Input name the listing view gives each first-name field.
pub const FORM_KEY_FIRST_NAME: &str = "people[][firstname]";
/// Input name the listing view gives each surname field.
pub const FORM_KEY_SURNAME: &str = "people[][surname]";

/// Submitted form values: field name to every value sent under it, in order.
pub type FormValues = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("invalid form data")]
    InvalidFormData,
    #[error("expected a series of {0}")]
    MissingField(&'static str),
    #[error("expected the same number of firstnames and surnames (got {first_names} and {surnames})")]
    CardinalityMismatch { first_names: usize, surnames: usize },
    #[error("expected names to not be empty (row {index})")]
    EmptyField { index: usize },
}

/// Collects repeated keys from an `application/x-www-form-urlencoded` body.
pub fn parse_urlencoded(body: &[u8]) -> FormValues {
    let mut values = FormValues::new();
    for (key, value) in form_urlencoded::parse(body) {
        values
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    values
}

/// First names and surnames paired by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub first_names: Vec<String>,
    pub surnames: Vec<String>,
}

impl UserForm {
    pub fn decode_from(values: &FormValues) -> Result<Self, FormError> {
        let first_names = match values.get(FORM_KEY_FIRST_NAME) {
            Some(names) if !names.is_empty() => names,
            _ => return Err(FormError::MissingField("firstnames")),
        };
        let surnames = match values.get(FORM_KEY_SURNAME) {
            Some(names) if !names.is_empty() => names,
            _ => return Err(FormError::MissingField("surnames")),
        };
        if first_names.len() != surnames.len() {
            return Err(FormError::CardinalityMismatch {
                first_names: first_names.len(),
                surnames: surnames.len(),
            });
        }

        Ok(Self {
            first_names: first_names.clone(),
            surnames: surnames.clone(),
        })
    }

    /// Materializes the pairs as users. Only exactly-empty names are
    /// rejected; whitespace is kept as submitted.
    pub fn users(&self) -> Result<Vec<User>, FormError> {
        self.first_names
            .iter()
            .zip(&self.surnames)
            .enumerate()
            .map(|(index, (first_name, surname))| {
                if first_name.is_empty() || surname.is_empty() {
                    return Err(FormError::EmptyField { index });
                }
                Ok(User::new(first_name.as_str(), surname.as_str()))
            })
            .collect()
    }
}
