//! Views whose query is supplied in memory

use super::{get_or_try_init, leading_comment, sql_error, ViewTree};
use crate::error::CoreResult;
use crate::identity::ViewKey;
use lea_jinja::trim_query;
use lea_sql::{parse_dependencies, ViewRef};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// A SQL view with no backing file, e.g. a generated test assertion
#[derive(Debug)]
pub struct InlineSqlView {
    tree: Arc<ViewTree>,
    key: ViewKey,
    query: String,
    dependencies: OnceLock<BTreeSet<ViewRef>>,
}

impl InlineSqlView {
    pub(crate) fn new(tree: Arc<ViewTree>, key: ViewKey, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            tree,
            key,
            query: trim_query(&query).to_string(),
            dependencies: OnceLock::new(),
        }
    }

    pub fn key(&self) -> &ViewKey {
        &self.key
    }

    pub(crate) fn tree(&self) -> &Arc<ViewTree> {
        &self.tree
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Views read by the query, ignoring the override table
    pub fn dependencies(&self) -> CoreResult<&BTreeSet<ViewRef>> {
        get_or_try_init(&self.dependencies, || {
            parse_dependencies(self.tree.parser(), &self.query)
                .map_err(|e| sql_error(&self.key, "<inline>", e))
        })
    }

    pub fn description(&self) -> String {
        leading_comment(&self.query, "--")
    }
}
