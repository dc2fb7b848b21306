//! Domain model for the records the service collects.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fields a stored row must carry to decode into a [`User`].
pub const USER_FIELDS: usize = 2;

/// A first-name/surname pair, in the order it is stored and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub surname: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("expected records length of 2, got {0}")]
    FieldCount(usize),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl User {
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
        }
    }

    /// Converts a stored row into a user. Rows that do not carry exactly
    /// [`USER_FIELDS`] fields are rejected.
    pub fn from_record(record: &StringRecord) -> Result<Self, RecordError> {
        if record.len() != USER_FIELDS {
            return Err(RecordError::FieldCount(record.len()));
        }
        Ok(Self::new(&record[0], &record[1]))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.first_name, self.surname)
    }
}
