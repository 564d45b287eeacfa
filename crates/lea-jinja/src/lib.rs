//! lea-jinja - Jinja templating layer for lea
//!
//! SQL views may start with `{% extends "..." %}` to inherit from a base
//! template stored in the same views directory. This crate resolves those
//! templates from the filesystem and turns raw file text into final query text.

pub mod environment;
pub mod error;
pub mod query;

pub use environment::JinjaEnvironment;
pub use error::JinjaError;
pub use query::{materialize_query, starts_with_extends, trim_query};
