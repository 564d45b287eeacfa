//! View discovery
//!
//! Every immediate subdirectory of the views directory is a schema. Inside a
//! schema, every `.sql` and `.py` file is a view, except empty files and files
//! whose name starts with `_` (template partials).

use crate::error::{CoreError, CoreResult};
use crate::identity::ViewKey;
use crate::view::{View, ViewKind, ViewTree};
use lea_sql::ViewRef;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Views found under a directory, plus the files that could not be loaded
#[derive(Debug)]
pub struct LoadedViews {
    tree: Arc<ViewTree>,
    views: Vec<View>,
    errors: Vec<CoreError>,
    // Schema directory each entry of `errors` came from, index-aligned
    error_schemas: Vec<String>,
}

/// Load all views under `root`, reading `root/lea.yml` if present.
///
/// Fails only when `root` itself cannot be used. Per-file failures are
/// collected in [`LoadedViews::errors`] and do not stop discovery.
pub fn load_views(root: &Path) -> CoreResult<LoadedViews> {
    if !root.is_dir() {
        return Err(CoreError::ViewsDirNotFound {
            path: root.display().to_string(),
        });
    }
    let tree = Arc::new(ViewTree::open(root)?);
    LoadedViews::load(tree)
}

impl LoadedViews {
    /// Load all views of an already opened tree
    pub fn load(tree: Arc<ViewTree>) -> CoreResult<Self> {
        let root = tree.origin().to_path_buf();
        let mut views = Vec::new();
        let mut errors = Vec::new();
        let mut error_schemas = Vec::new();

        for schema_dir in schema_dirs(&root)? {
            let schema = schema_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut record = |e: CoreError| {
                errors.push(e);
                error_schemas.push(schema.clone());
            };
            for entry in WalkDir::new(&schema_dir).follow_links(true).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e
                            .path()
                            .unwrap_or(schema_dir.as_path())
                            .display()
                            .to_string();
                        record(CoreError::IoWithPath {
                            path,
                            source: e.into(),
                        });
                        continue;
                    }
                };
                let path = entry.path();
                match is_view_file(&entry) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        record(e);
                        continue;
                    }
                }
                match View::from_path(&tree, path) {
                    Ok(view) => views.push(view),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", path.display(), e);
                        record(e);
                    }
                }
            }
        }

        views.sort_by(|a, b| a.key().cmp(b.key()));
        let views = dedup_views(views, |schema, e| {
            errors.push(e);
            error_schemas.push(schema.to_string());
        });
        log::debug!(
            "Loaded {} views from {} ({} errors)",
            views.len(),
            root.display(),
            errors.len()
        );

        Ok(Self {
            tree,
            views,
            errors,
            error_schemas,
        })
    }

    /// Shared context the views were loaded with
    pub fn tree(&self) -> &Arc<ViewTree> {
        &self.tree
    }

    /// Loaded views, sorted by `(schema, name)`
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Files that could not be turned into views
    pub fn errors(&self) -> &[CoreError] {
        &self.errors
    }

    /// Load errors for files under the `schema` directory
    pub fn errors_in_schema<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a CoreError> {
        self.errors
            .iter()
            .zip(&self.error_schemas)
            .filter(move |(_, s)| s.as_str() == schema)
            .map(|(e, _)| e)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> {
        self.views.iter()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Look up a view by identity
    pub fn get(&self, key: &ViewKey) -> Option<&View> {
        self.views
            .binary_search_by(|v| v.key().cmp(key))
            .ok()
            .map(|i| &self.views[i])
    }

    /// Add an in-memory SQL view, replacing any view with the same identity
    pub fn push_inline(
        &mut self,
        schema: impl Into<String>,
        name: impl Into<String>,
        query: impl Into<String>,
    ) -> &View {
        let view = View::inline(&self.tree, schema, name, query);
        let idx = match self.views.binary_search_by(|v| v.key().cmp(view.key())) {
            Ok(i) => {
                self.views[i] = view;
                i
            }
            Err(i) => {
                self.views.insert(i, view);
                i
            }
        };
        &self.views[idx]
    }

    /// Compute the dependencies of every view in parallel.
    ///
    /// Results follow view order. A failing view does not affect the others.
    pub fn resolve_dependencies(&self) -> Vec<(ViewKey, CoreResult<BTreeSet<ViewRef>>)> {
        self.resolve(None)
    }

    /// Like [`resolve_dependencies`](Self::resolve_dependencies), restricted
    /// to the views of one schema. Views of other schemas are not parsed.
    pub fn resolve_schema_dependencies(
        &self,
        schema: &str,
    ) -> Vec<(ViewKey, CoreResult<BTreeSet<ViewRef>>)> {
        self.resolve(Some(schema))
    }

    fn resolve(&self, schema: Option<&str>) -> Vec<(ViewKey, CoreResult<BTreeSet<ViewRef>>)> {
        self.views
            .par_iter()
            .filter(|view| schema.is_none_or(|s| view.schema() == s))
            .map(|view| (view.key().clone(), view.dependencies().cloned()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a LoadedViews {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

/// Immediate subdirectories of `root`, sorted by name
fn schema_dirs(root: &Path) -> CoreResult<Vec<std::path::PathBuf>> {
    let io_err = |e| CoreError::IoWithPath {
        path: root.display().to_string(),
        source: e,
    };
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn is_view_file(entry: &walkdir::DirEntry) -> CoreResult<bool> {
    if entry.file_type().is_dir() {
        return Ok(false);
    }
    let path = entry.path();
    if entry.file_name().to_string_lossy().starts_with('_') {
        log::debug!("Skipping private file {}", path.display());
        return Ok(false);
    }
    let recognized = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ViewKind::from_extension)
        .is_some();
    if !recognized {
        return Ok(false);
    }
    let metadata = entry.metadata().map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e.into(),
    })?;
    if metadata.len() == 0 {
        log::debug!("Skipping empty file {}", path.display());
        return Ok(false);
    }
    Ok(true)
}

/// Keep the first view of each identity; report the rest as duplicates
fn dedup_views(views: Vec<View>, mut report: impl FnMut(&str, CoreError)) -> Vec<View> {
    let mut first_paths: HashMap<ViewKey, String> = HashMap::new();
    let mut kept: Vec<View> = Vec::with_capacity(views.len());
    for view in views {
        let path = view
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if let Some(first) = first_paths.get(view.key()) {
            report(
                view.schema(),
                CoreError::DuplicateView {
                    view: view.key().to_string(),
                    path1: first.clone(),
                    path2: path,
                },
            );
            continue;
        }
        first_paths.insert(view.key().clone(), path);
        kept.push(view);
    }
    kept
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
