//! Status-code keyed templates with a mandatory fallback.
//!
//! The fallback is the error view: any status without its own template is
//! rendered through it, so every response the controller produces has a body
//! a user can read. Templates are parsed when they are built; a broken source
//! fails startup rather than a request.

use crate::domain::model::User;
use crate::infra::assets::{AssetError, Assets};
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::HashMap;
use tinytemplate::TinyTemplate;

pub const ERROR_VIEW: &str = "error.html";
pub const INDEX_VIEW: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unable to parse template {name:?}: {source}")]
    Parse {
        name: String,
        source: tinytemplate::error::Error,
    },
    #[error("unable to render template {name:?}: {source}")]
    Render {
        name: String,
        source: tinytemplate::error::Error,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Context handed to the error view.
#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub error: String,
}

impl ErrorView {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Context handed to the listing view.
#[derive(Debug, Serialize)]
pub struct UsersView<'a> {
    pub users: &'a [User],
}

/// A validated template source.
///
/// `TinyTemplate` borrows its source and is not `Sync`, so the source is owned
/// here and compiled again for each render. Validation at construction means
/// that compile cannot fail later.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self, TemplateError> {
        let template = Self {
            name: name.into(),
            source: source.into(),
        };
        template.compile()?;
        Ok(template)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render<C: Serialize>(&self, context: &C) -> Result<String, TemplateError> {
        self.compile()?
            .render(&self.name, context)
            .map_err(|source| TemplateError::Render {
                name: self.name.clone(),
                source,
            })
    }

    fn compile(&self) -> Result<TinyTemplate<'_>, TemplateError> {
        let mut tt = TinyTemplate::new();
        tt.add_template(&self.name, &self.source)
            .map_err(|source| TemplateError::Parse {
                name: self.name.clone(),
                source,
            })?;
        Ok(tt)
    }
}

/// Template used for every generic error.
pub fn error_template(assets: &Assets) -> Result<Template, TemplateError> {
    Template::parse("error", assets.string(ERROR_VIEW)?)
}

/// Template listing the stored users as an editable form.
pub fn form_template(assets: &Assets) -> Result<Template, TemplateError> {
    Template::parse("form", assets.string(INDEX_VIEW)?)
}

pub struct Templates {
    templates: HashMap<StatusCode, Template>,
    fallback: Template,
}

impl Templates {
    pub fn new(fallback: Template) -> Self {
        Self {
            templates: HashMap::new(),
            fallback,
        }
    }

    /// Builds the set the service runs with: the error view as fallback and
    /// the form view for `200 OK`.
    pub fn gather(assets: &Assets) -> Result<Self, TemplateError> {
        let mut templates = Self::new(error_template(assets)?);
        templates.set(StatusCode::OK, form_template(assets)?);
        Ok(templates)
    }

    /// Returns the template registered for `status`, otherwise the fallback.
    pub fn get(&self, status: StatusCode) -> &Template {
        self.templates.get(&status).unwrap_or(&self.fallback)
    }

    pub fn set(&mut self, status: StatusCode, template: Template) {
        self.templates.insert(status, template);
    }
}
