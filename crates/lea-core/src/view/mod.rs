//! View representation
//!
//! A view is one SQL transformation unit. File-backed views share a
//! [`ViewTree`] describing the directory they were loaded from; inline views
//! carry their query directly. `query()` and `dependencies()` are computed on
//! first access and cached per view; errors are not cached.

mod inline;
mod script;
mod sql;

pub use inline::InlineSqlView;
pub use script::ScriptView;
pub use sql::SqlView;

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::identity::{resolve_identity, ViewKey};
use crate::overrides::OverrideTable;
use lea_jinja::JinjaEnvironment;
use lea_sql::{SqlError, SqlParser, ViewRef};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Shared, read-only context of a views directory
#[derive(Debug)]
pub struct ViewTree {
    origin: PathBuf,
    config: Config,
    overrides: OverrideTable,
    parser: SqlParser,
    jinja: JinjaEnvironment<'static>,
}

impl ViewTree {
    /// Open a views directory, reading its lea.yml if present
    pub fn open(origin: &Path) -> CoreResult<Self> {
        let config = Config::load_from_dir(origin)?;
        Self::with_config(origin, config)
    }

    /// Build a tree from an explicit configuration
    pub fn with_config(origin: &Path, config: Config) -> CoreResult<Self> {
        let overrides = OverrideTable::from_config(&config.overrides)?;
        Ok(Self::with_overrides(origin, config, overrides))
    }

    /// Build a tree with an explicit override table, ignoring `config.overrides`
    pub fn with_overrides(origin: &Path, config: Config, overrides: OverrideTable) -> Self {
        Self {
            origin: origin.to_path_buf(),
            parser: SqlParser::new(config.dialect),
            jinja: JinjaEnvironment::with_template_dir(origin),
            config,
            overrides,
        }
    }

    /// Root directory of the views
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn parser(&self) -> &SqlParser {
        &self.parser
    }

    pub fn jinja(&self) -> &JinjaEnvironment<'static> {
        &self.jinja
    }
}

/// Kind of view, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// `.sql` file
    Sql,
    /// `.py` file
    Script,
    /// Query supplied in memory
    Inline,
}

impl ViewKind {
    /// View kind handling files with the given extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "sql" => Some(ViewKind::Sql),
            "py" => Some(ViewKind::Script),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Sql => "sql",
            ViewKind::Script => "script",
            ViewKind::Inline => "inline",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A view of any kind
#[derive(Debug)]
pub enum View {
    Sql(SqlView),
    Script(ScriptView),
    Inline(InlineSqlView),
}

impl View {
    /// Build the view for the file at `path`, dispatching on its extension
    pub fn from_path(tree: &Arc<ViewTree>, path: &Path) -> CoreResult<Self> {
        let key = resolve_identity(tree.origin(), path)?;
        let relative_path = path
            .strip_prefix(tree.origin())
            .unwrap_or(path)
            .to_path_buf();
        let kind = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ViewKind::from_extension);

        match kind {
            Some(ViewKind::Sql) => Ok(View::Sql(SqlView::new(tree.clone(), relative_path, key))),
            Some(ViewKind::Script) => Ok(View::Script(ScriptView::new(
                tree.clone(),
                relative_path,
                key,
            ))),
            _ => Err(CoreError::UnrecognizedViewFile {
                path: path.display().to_string(),
            }),
        }
    }

    /// Create an in-memory SQL view
    pub fn inline(
        tree: &Arc<ViewTree>,
        schema: impl Into<String>,
        name: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        View::Inline(InlineSqlView::new(
            tree.clone(),
            ViewKey::new(schema, name),
            query,
        ))
    }

    pub fn key(&self) -> &ViewKey {
        match self {
            View::Sql(v) => v.key(),
            View::Script(v) => v.key(),
            View::Inline(v) => v.key(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.key().schema
    }

    pub fn name(&self) -> &str {
        &self.key().name
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            View::Sql(_) => ViewKind::Sql,
            View::Script(_) => ViewKind::Script,
            View::Inline(_) => ViewKind::Inline,
        }
    }

    fn tree(&self) -> &Arc<ViewTree> {
        match self {
            View::Sql(v) => v.tree(),
            View::Script(v) => v.tree(),
            View::Inline(v) => v.tree(),
        }
    }

    /// Path of the backing file relative to the views directory
    pub fn relative_path(&self) -> Option<&Path> {
        match self {
            View::Sql(v) => Some(v.relative_path()),
            View::Script(v) => Some(v.relative_path()),
            View::Inline(_) => None,
        }
    }

    /// Absolute path of the backing file
    pub fn path(&self) -> Option<PathBuf> {
        self.relative_path()
            .map(|relative| self.tree().origin().join(relative))
    }

    /// Final query text; `None` for Python views
    pub fn query(&self) -> CoreResult<Option<&str>> {
        match self {
            View::Sql(v) => v.query().map(Some),
            View::Script(_) => Ok(None),
            View::Inline(v) => Ok(Some(v.query())),
        }
    }

    /// Views this view reads from.
    ///
    /// The override table is consulted first; a hit is returned as-is and the
    /// view's content is never looked at.
    pub fn dependencies(&self) -> CoreResult<&BTreeSet<ViewRef>> {
        if let Some(deps) = self.tree().overrides().get(self.key()) {
            log::debug!("Using dependency override for {}", self.key());
            return Ok(deps);
        }
        match self {
            View::Sql(v) => v.dependencies(),
            View::Script(v) => v.dependencies(),
            View::Inline(v) => v.dependencies(),
        }
    }

    /// Text of the view's leading comment block, or an empty string
    pub fn description(&self) -> CoreResult<String> {
        match self {
            View::Sql(v) => v.description(),
            View::Script(v) => v.description(),
            View::Inline(v) => Ok(v.description()),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.key(), f)
    }
}

/// Return the cached value, computing it with `init` on first success
fn get_or_try_init<T, E>(cell: &OnceLock<T>, init: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

/// Join a leading block of comment lines into one description string
fn leading_comment(text: &str, marker: &str) -> String {
    text.trim()
        .lines()
        .take_while(|line| line.starts_with(marker))
        .map(|line| line.trim_start_matches(|c| marker.contains(c)).trim())
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_view_file(tree: &ViewTree, relative_path: &Path) -> CoreResult<String> {
    let path = tree.origin().join(relative_path);
    std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Attach view identity to a SQL extraction error
fn sql_error(key: &ViewKey, path: &str, err: SqlError) -> CoreError {
    match err {
        SqlError::ScriptParse { message } => CoreError::ScriptParseError {
            view: key.to_string(),
            path: path.to_string(),
            message,
        },
        other => CoreError::ViewParseError {
            view: key.to_string(),
            path: path.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
