use super::*;
use std::fs;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn keys(loaded: &LoadedViews) -> Vec<String> {
    loaded.iter().map(|v| v.key().to_string()).collect()
}

#[test]
fn test_load_views_filters_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "core/customers.sql", "SELECT * FROM staging.customers");
    write(root, "core/_helper.sql", "SELECT 1");
    write(root, "core/empty.sql", "");
    write(root, "core/README.md", "# docs");
    write(root, "core/forecast.py", "import pandas as pd\n");
    write(root, "analytics/kpis/daily.sql", "SELECT 1");
    write(root, "top_level.sql", "SELECT 1");
    write(root, "lea.yml", "dialect: duckdb\n");

    let loaded = load_views(root).unwrap();
    assert!(loaded.errors().is_empty());
    assert_eq!(
        keys(&loaded),
        vec!["analytics.kpis__daily", "core.customers", "core.forecast"]
    );
}

#[test]
fn test_private_directories_are_still_walked() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/_internal/orders.sql", "SELECT 1");

    let loaded = load_views(dir.path()).unwrap();
    assert_eq!(keys(&loaded), vec!["core._internal__orders"]);
}

#[test]
fn test_view_kinds_dispatch_on_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/a.sql", "SELECT 1");
    write(dir.path(), "core/b.py", "x = 1\n");

    let loaded = load_views(dir.path()).unwrap();
    let kinds: Vec<ViewKind> = loaded.iter().map(|v| v.kind()).collect();
    assert_eq!(kinds, vec![ViewKind::Sql, ViewKind::Script]);
}

#[test]
fn test_missing_root() {
    let dir = TempDir::new().unwrap();
    let result = load_views(&dir.path().join("nope"));
    assert!(matches!(result, Err(CoreError::ViewsDirNotFound { .. })));
}

#[test]
fn test_invalid_config_fails_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lea.yml", "overrides:\n  not_qualified: []\n");
    let result = load_views(dir.path());
    assert!(matches!(result, Err(CoreError::InvalidOverride { .. })));
}

#[test]
fn test_duplicate_identity_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/orders.sql", "SELECT 1");
    write(dir.path(), "core/orders.py", "x = 1\n");

    let loaded = load_views(dir.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.errors().len(), 1);
    assert!(matches!(
        loaded.errors()[0],
        CoreError::DuplicateView { ref view, .. } if view == "core.orders"
    ));
}

#[test]
fn test_errors_in_schema() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/orders.sql", "SELECT 1");
    write(dir.path(), "core/orders.py", "x = 1\n");
    write(dir.path(), "staging/orders.sql", "SELECT 1");

    let loaded = load_views(dir.path()).unwrap();
    assert_eq!(loaded.errors_in_schema("core").count(), 1);
    assert_eq!(loaded.errors_in_schema("staging").count(), 0);
}

#[test]
fn test_resolve_schema_dependencies_skips_other_schemas() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/broken.sql", "SELECT * FROM (");
    write(dir.path(), "staging/orders.sql", "SELECT * FROM raw_orders");

    let loaded = load_views(dir.path()).unwrap();
    let resolved = loaded.resolve_schema_dependencies("staging");
    assert_eq!(resolved.len(), 1);
    let (key, result) = &resolved[0];
    assert_eq!(key, &ViewKey::new("staging", "orders"));
    assert_eq!(
        result.as_ref().unwrap(),
        &BTreeSet::from([ViewRef::unqualified("raw_orders")])
    );
}

#[test]
fn test_get_and_push_inline() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/orders.sql", "SELECT * FROM staging.orders");

    let mut loaded = load_views(dir.path()).unwrap();
    assert!(loaded.get(&ViewKey::new("core", "orders")).is_some());
    assert!(loaded.get(&ViewKey::new("core", "missing")).is_none());

    let view = loaded.push_inline(
        "tests",
        "core__orders__id__not_null",
        "SELECT * FROM core.orders WHERE id IS NULL",
    );
    assert_eq!(view.kind(), ViewKind::Inline);
    assert_eq!(loaded.len(), 2);
    assert_eq!(
        keys(&loaded),
        vec!["core.orders", "tests.core__orders__id__not_null"]
    );
}

#[test]
fn test_resolve_dependencies_isolates_failures() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/customers.sql", "SELECT * FROM staging.customers");
    write(dir.path(), "core/broken.sql", "SELECT * FROM (");
    write(
        dir.path(),
        "core/orders.sql",
        "WITH o AS (SELECT * FROM staging.orders) SELECT * FROM o JOIN core__customers USING (customer_id)",
    );

    let loaded = load_views(dir.path()).unwrap();
    let results = loaded.resolve_dependencies();
    assert_eq!(results.len(), 3);

    let by_key: HashMap<String, &CoreResult<BTreeSet<ViewRef>>> = results
        .iter()
        .map(|(key, result)| (key.to_string(), result))
        .collect();

    assert!(matches!(
        by_key["core.broken"],
        Err(CoreError::ViewParseError { .. })
    ));
    assert_eq!(
        by_key["core.customers"].as_ref().unwrap(),
        &BTreeSet::from([ViewRef::qualified("staging", "customers")])
    );
    assert_eq!(
        by_key["core.orders"].as_ref().unwrap(),
        &BTreeSet::from([
            ViewRef::qualified("staging", "orders"),
            ViewRef::qualified("core", "customers"),
        ])
    );
}

#[test]
fn test_load_is_deterministic() {
    let dir = TempDir::new().unwrap();
    for name in ["zeta", "alpha", "mid"] {
        write(dir.path(), &format!("core/{name}.sql"), "SELECT 1");
        write(dir.path(), &format!("staging/{name}.sql"), "SELECT 1");
    }

    let first = keys(&load_views(dir.path()).unwrap());
    let second = keys(&load_views(dir.path()).unwrap());
    assert_eq!(first, second);
    assert_eq!(first[0], "core.alpha");
    assert_eq!(first[5], "staging.zeta");
}
