//! Error types for lea-jinja

use thiserror::Error;

/// Jinja templating errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Base template referenced by `extends` does not exist (J001)
    #[error("[J001] Template not found: {message}")]
    TemplateNotFound { message: String },

    /// Template render error (J002)
    #[error("[J002] Jinja render error: {0}")]
    RenderError(String),
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => JinjaError::TemplateNotFound {
                message: err.to_string(),
            },
            _ => JinjaError::RenderError(err.to_string()),
        }
    }
}
