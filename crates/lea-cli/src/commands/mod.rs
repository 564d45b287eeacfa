//! CLI command implementations

pub(crate) mod ls;
