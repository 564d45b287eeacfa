//! Views backed by a `.py` file

use super::{get_or_try_init, leading_comment, read_view_file, sql_error, ViewTree};
use crate::error::CoreResult;
use crate::identity::ViewKey;
use lea_sql::{extract_script_dependencies, ViewRef};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// A view produced by a Python script.
///
/// Dependencies come from SQL string literals passed to recognized query
/// calls. Queries assembled at runtime are invisible to the analysis; use the
/// override table for such scripts.
#[derive(Debug)]
pub struct ScriptView {
    tree: Arc<ViewTree>,
    relative_path: PathBuf,
    key: ViewKey,
    dependencies: OnceLock<BTreeSet<ViewRef>>,
}

impl ScriptView {
    pub(crate) fn new(tree: Arc<ViewTree>, relative_path: PathBuf, key: ViewKey) -> Self {
        Self {
            tree,
            relative_path,
            key,
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

    /// Views read by the script's literal queries, ignoring the override table
    pub fn dependencies(&self) -> CoreResult<&BTreeSet<ViewRef>> {
        get_or_try_init(&self.dependencies, || {
            let source = read_view_file(&self.tree, &self.relative_path)?;
            extract_script_dependencies(self.tree.parser(), &source, &self.tree.config().script)
                .map_err(|e| {
                    let path = self.tree.origin().join(&self.relative_path);
                    sql_error(&self.key, &path.display().to_string(), e)
                })
        })
    }

    /// Leading `#` comment block of the script
    pub fn description(&self) -> CoreResult<String> {
        let source = read_view_file(&self.tree, &self.relative_path)?;
        Ok(leading_comment(&source, "#"))
    }
}
