//! lea-sql - SQL parsing layer for lea
//!
//! This crate wraps sqlparser-rs with dialect support and turns query text
//! into the set of views it reads from. It also locates SQL literals embedded
//! in Python scripts so they can go through the same extraction.

pub mod error;
pub mod extractor;
pub mod parser;
pub mod script;
pub mod view_ref;

pub use error::SqlError;
pub use extractor::{extract_dependencies, parse_dependencies};
pub use parser::{Dialect, SqlParser};
pub use script::{extract_script_dependencies, extract_script_queries, ScriptCallShapes};
pub use view_ref::ViewRef;
