//! Error types for lea-sql

use thiserror::Error;

/// SQL parsing and extraction errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Python script could not be parsed (S003)
    #[error("[S003] Python parse error: {message}")]
    ScriptParse { message: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
