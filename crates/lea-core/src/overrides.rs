//! Dependency override table
//!
//! Some views cannot be analyzed by the SQL parser (vendor syntax, table names
//! computed at runtime, references to other tools). Their dependencies are
//! declared here and returned verbatim; the view's file is never read.
//! Entries must be revisited whenever such a view's query changes.

use crate::error::{CoreError, CoreResult};
use crate::identity::ViewKey;
use lea_sql::ViewRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Exact-match mapping from view identity to a fixed dependency set
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<ViewKey, BTreeSet<ViewRef>>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the `overrides` section of lea.yml
    pub fn from_config(overrides: &BTreeMap<String, Vec<String>>) -> CoreResult<Self> {
        let mut table = Self::new();
        for (view, deps) in overrides {
            let key = ViewKey::parse(view).ok_or_else(|| CoreError::InvalidOverride {
                entry: view.clone(),
                reason: "view must be written as schema.name".to_string(),
            })?;
            let deps = deps
                .iter()
                .map(|dep| {
                    ViewRef::parse(dep).ok_or_else(|| CoreError::InvalidOverride {
                        entry: view.clone(),
                        reason: format!("invalid dependency '{dep}'"),
                    })
                })
                .collect::<CoreResult<BTreeSet<_>>>()?;
            table.insert(key, deps);
        }
        Ok(table)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_override(
        mut self,
        key: ViewKey,
        deps: impl IntoIterator<Item = ViewRef>,
    ) -> Self {
        self.insert(key, deps);
        self
    }

    /// Declare the dependencies of a view, replacing any previous entry
    pub fn insert(&mut self, key: ViewKey, deps: impl IntoIterator<Item = ViewRef>) {
        self.entries.insert(key, deps.into_iter().collect());
    }

    pub fn get(&self, key: &ViewKey) -> Option<&BTreeSet<ViewRef>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ViewKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let table = OverrideTable::new().with_override(
            ViewKey::new("core", "materials"),
            [ViewRef::qualified("core", "components")],
        );
        assert_eq!(
            table.get(&ViewKey::new("core", "materials")),
            Some(&BTreeSet::from([ViewRef::qualified("core", "components")]))
        );
        assert!(table.get(&ViewKey::new("core", "materials_v2")).is_none());
        assert!(table.get(&ViewKey::new("staging", "materials")).is_none());
    }

    #[test]
    fn test_from_config() {
        let config = BTreeMap::from([(
            "collect.material_funnel".to_string(),
            vec![
                "core.products".to_string(),
                "core.footprints".to_string(),
                "events".to_string(),
            ],
        )]);
        let table = OverrideTable::from_config(&config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(&ViewKey::new("collect", "material_funnel")).unwrap(),
            &BTreeSet::from([
                ViewRef::qualified("core", "products"),
                ViewRef::qualified("core", "footprints"),
                ViewRef::unqualified("events"),
            ])
        );
    }

    #[test]
    fn test_empty_dependency_list_is_kept() {
        let config = BTreeMap::from([("core.constants".to_string(), Vec::new())]);
        let table = OverrideTable::from_config(&config).unwrap();
        assert!(table.contains(&ViewKey::new("core", "constants")));
        assert!(table
            .get(&ViewKey::new("core", "constants"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_from_config_rejects_bare_view() {
        let config = BTreeMap::from([("materials".to_string(), vec!["core.a".to_string()])]);
        let result = OverrideTable::from_config(&config);
        assert!(matches!(result, Err(CoreError::InvalidOverride { .. })));
    }

    #[test]
    fn test_from_config_rejects_empty_dependency() {
        let config = BTreeMap::from([("core.a".to_string(), vec![".b".to_string()])]);
        let result = OverrideTable::from_config(&config);
        assert!(matches!(result, Err(CoreError::InvalidOverride { .. })));
    }
}
