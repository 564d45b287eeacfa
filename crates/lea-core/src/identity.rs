//! View identity derived from file location.
//!
//! A file at `<origin>/<schema>/a/b/c.sql` is the view `c` nested under `a/b`
//! in `schema`; its name is `a__b__c`.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Separator joining nested directory names into a view name
pub const NAME_SEPARATOR: &str = "__";

/// `(schema, name)` identity of a view
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewKey {
    pub schema: String,
    pub name: String,
}

impl ViewKey {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Parse `schema.name`; both parts are required.
    pub fn parse(key: &str) -> Option<Self> {
        match key.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => {
                Some(Self::new(schema, name))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Derive the identity of the file at `path`, which must live under `origin`.
pub fn resolve_identity(origin: &Path, path: &Path) -> CoreResult<ViewKey> {
    let relative = path
        .strip_prefix(origin)
        .map_err(|_| CoreError::InvalidViewPath {
            path: path.display().to_string(),
            reason: format!("not contained in '{}'", origin.display()),
        })?;
    identity_from_relative(relative)
}

/// Derive the identity of a path already relative to the views directory
pub fn identity_from_relative(relative: &Path) -> CoreResult<ViewKey> {
    let invalid = |reason: &str| CoreError::InvalidViewPath {
        path: relative.display().to_string(),
        reason: reason.to_string(),
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                parts.push(part.to_str().ok_or_else(|| invalid("path is not valid UTF-8"))?)
            }
            Component::CurDir => {}
            _ => return Err(invalid("path must be relative and may not contain '..'")),
        }
    }

    let [schema, nested @ .., file] = parts.as_slice() else {
        return Err(invalid("expected <schema>/<file>"));
    };

    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("file has no name"))?;

    let name = nested
        .iter()
        .copied()
        .chain(std::iter::once(stem))
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR);

    Ok(ViewKey::new(*schema, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rel(parts: &[&str]) -> PathBuf {
        parts.iter().collect()
    }

    #[test]
    fn test_top_level_file() {
        let key = identity_from_relative(&rel(&["core", "customers.sql"])).unwrap();
        assert_eq!(key, ViewKey::new("core", "customers"));
    }

    #[test]
    fn test_nested_file() {
        let key = identity_from_relative(&rel(&["analytics", "kpis", "daily.sql"])).unwrap();
        assert_eq!(key.schema, "analytics");
        assert_eq!(key.name, "kpis__daily");
    }

    #[test]
    fn test_deeply_nested_python_file() {
        let key = identity_from_relative(&rel(&["schema", "a", "b", "c.py"])).unwrap();
        assert_eq!(key, ViewKey::new("schema", "a__b__c"));
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        let key = identity_from_relative(&rel(&["core", "orders.v2.sql"])).unwrap();
        assert_eq!(key.name, "orders.v2");
    }

    #[test]
    fn test_resolve_under_origin() {
        let origin = PathBuf::from("/project/views");
        let path = origin.join("core").join("orders.sql");
        let key = resolve_identity(&origin, &path).unwrap();
        assert_eq!(key, ViewKey::new("core", "orders"));
    }

    #[test]
    fn test_resolve_outside_origin() {
        let result = resolve_identity(Path::new("/project/views"), Path::new("/elsewhere/core/a.sql"));
        assert!(matches!(result, Err(CoreError::InvalidViewPath { .. })));
    }

    #[test]
    fn test_file_directly_under_origin() {
        let result = identity_from_relative(Path::new("orders.sql"));
        assert!(matches!(result, Err(CoreError::InvalidViewPath { .. })));
    }

    #[test]
    fn test_parent_component_rejected() {
        let result = identity_from_relative(&rel(&["core", "..", "orders.sql"]));
        assert!(matches!(result, Err(CoreError::InvalidViewPath { .. })));
    }

    #[test]
    fn test_key_parse_and_display() {
        let key = ViewKey::parse("core.orders").unwrap();
        assert_eq!(key, ViewKey::new("core", "orders"));
        assert_eq!(key.to_string(), "core.orders");
        assert!(ViewKey::parse("orders").is_none());
        assert!(ViewKey::parse("core.").is_none());
    }
}
