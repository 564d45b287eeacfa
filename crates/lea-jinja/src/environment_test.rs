use super::*;
use crate::error::JinjaError;
use std::fs;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_template_name_uses_forward_slashes() {
    let path: std::path::PathBuf = ["core", "kpis", "daily.sql"].iter().collect();
    assert_eq!(template_name(&path), "core/kpis/daily.sql");
}

#[test]
fn test_render_file_with_extends() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "core/_base.sql",
        "SELECT {% block columns %}*{% endblock %} FROM staging.orders",
    );
    write(
        dir.path(),
        "core/orders.sql",
        "{% extends \"core/_base.sql\" %}{% block columns %}id, amount{% endblock %}",
    );

    let env = JinjaEnvironment::with_template_dir(dir.path());
    let rendered = env.render_file(Path::new("core/orders.sql")).unwrap();
    assert_eq!(rendered, "SELECT id, amount FROM staging.orders");
}

#[test]
fn test_render_file_missing_base() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "core/orders.sql",
        "{% extends \"core/_missing.sql\" %}",
    );

    let env = JinjaEnvironment::with_template_dir(dir.path());
    let err = env.render_file(Path::new("core/orders.sql")).unwrap_err();
    assert!(matches!(err, JinjaError::TemplateNotFound { .. }));
}

#[test]
fn test_render_file_syntax_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "core/_base.sql", "SELECT {% if %} FROM t");
    write(dir.path(), "core/orders.sql", "{% extends \"core/_base.sql\" %}");

    let env = JinjaEnvironment::with_template_dir(dir.path());
    let err = env.render_file(Path::new("core/orders.sql")).unwrap_err();
    assert!(matches!(err, JinjaError::RenderError(_)));
}
