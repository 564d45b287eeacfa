//! Error types for lea-core

use thiserror::Error;

/// Core error type for lea
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: A file path cannot be turned into a view identity
    #[error("[E001] Invalid view path '{path}': {reason}")]
    InvalidViewPath { path: String, reason: String },

    /// E002: The view's query is not valid SQL
    #[error("[E002] SQL parse error in {view} ({path}): {message}")]
    ViewParseError {
        view: String,
        path: String,
        message: String,
    },

    /// E003: An `extends` tag names a base template that does not exist
    #[error("[E003] Template not found while rendering {view} ({path}): {message}")]
    TemplateNotFound {
        view: String,
        path: String,
        message: String,
    },

    /// E004: A file passed the loader filter but maps to no view kind
    #[error("[E004] No view kind handles file '{path}'")]
    UnrecognizedViewFile { path: String },

    /// E005: Template rendering failed for another reason
    #[error("[E005] Failed to render {view} ({path}): {message}")]
    TemplateRender {
        view: String,
        path: String,
        message: String,
    },

    /// E006: A Python view is not valid Python
    #[error("[E006] Python parse error in {view} ({path}): {message}")]
    ScriptParseError {
        view: String,
        path: String,
        message: String,
    },

    /// E007: Views directory not found
    #[error("[E007] Views directory not found: {path}")]
    ViewsDirNotFound { path: String },

    /// E008: Two files resolve to the same view identity
    #[error("[E008] Duplicate view {view}: {path1} and {path2}")]
    DuplicateView {
        view: String,
        path1: String,
        path2: String,
    },

    /// E009: Failed to parse the configuration file
    #[error("[E009] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E010: Malformed entry in the dependency override table
    #[error("[E010] Invalid dependency override '{entry}': {reason}")]
    InvalidOverride { entry: String, reason: String },

    /// E011: IO error with file path context
    #[error("[E011] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
