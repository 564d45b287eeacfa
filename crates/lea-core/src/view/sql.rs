//! Views backed by a `.sql` file

use super::{get_or_try_init, leading_comment, read_view_file, sql_error, ViewTree};
use crate::error::{CoreError, CoreResult};
use crate::identity::ViewKey;
use lea_jinja::{materialize_query, JinjaError};
use lea_sql::{parse_dependencies, ViewRef};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// A view whose query is a SQL file, optionally extending a base template
#[derive(Debug)]
pub struct SqlView {
    tree: Arc<ViewTree>,
    relative_path: PathBuf,
    key: ViewKey,
    query: OnceLock<String>,
    dependencies: OnceLock<BTreeSet<ViewRef>>,
}

impl SqlView {
    pub(crate) fn new(tree: Arc<ViewTree>, relative_path: PathBuf, key: ViewKey) -> Self {
        Self {
            tree,
            relative_path,
            key,
            query: OnceLock::new(),
            dependencies: OnceLock::new(),
        }
    }

    pub fn key(&self) -> &ViewKey {
        &self.key
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub(crate) fn tree(&self) -> &Arc<ViewTree> {
        &self.tree
    }

    fn display_path(&self) -> String {
        self.tree.origin().join(&self.relative_path).display().to_string()
    }

    /// Query text with template inheritance expanded
    pub fn query(&self) -> CoreResult<&str> {
        get_or_try_init(&self.query, || {
            let raw = read_view_file(&self.tree, &self.relative_path)?;
            materialize_query(self.tree.jinja(), &self.relative_path, &raw).map_err(|e| {
                let view = self.key.to_string();
                let path = self.display_path();
                match e {
                    JinjaError::TemplateNotFound { message } => {
                        CoreError::TemplateNotFound { view, path, message }
                    }
                    JinjaError::RenderError(message) => {
                        CoreError::TemplateRender { view, path, message }
                    }
                }
            })
        })
        .map(String::as_str)
    }

    /// Views read by the query, ignoring the override table
    pub fn dependencies(&self) -> CoreResult<&BTreeSet<ViewRef>> {
        get_or_try_init(&self.dependencies, || {
            let query = self.query()?;
            parse_dependencies(self.tree.parser(), query)
                .map_err(|e| sql_error(&self.key, &self.display_path(), e))
        })
    }

    /// Leading `--` comment block of the query
    pub fn description(&self) -> CoreResult<String> {
        Ok(leading_comment(self.query()?, "--"))
    }
}
