//! List command implementation

use anyhow::{bail, Context, Result};
use lea_core::{load_views, CoreError, LoadedViews, View, ViewKind};
use std::path::Path;

use crate::cli::{GlobalArgs, LsArgs, LsOutput};

/// Execute the ls command
pub fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let views_dir = Path::new(&args.views_dir);
    let loaded = load_views(views_dir)
        .with_context(|| format!("Failed to load views from {}", views_dir.display()))?;

    let schema = args.schema.as_deref();
    let (infos, failures) = collect_view_info(&loaded, schema);
    log::debug!("Listing {} of {} views", infos.len(), loaded.len());
    let load_errors = load_errors(&loaded, schema);

    match args.output {
        LsOutput::Table => print_table(&infos),
        LsOutput::Json => print_json(&infos)?,
    }

    for error in &load_errors {
        eprintln!("error: {}", error);
    }
    for failure in &failures {
        eprintln!("error: {}", failure);
    }
    if global.verbose {
        eprintln!("{} views loaded from {}", loaded.len(), views_dir.display());
    }

    let failed = load_errors.len() + failures.len();
    if failed > 0 {
        bail!("{} view(s) could not be analyzed", failed);
    }
    Ok(())
}

/// View information for display
#[derive(Debug, serde::Serialize)]
struct ViewInfo {
    schema: String,
    name: String,
    kind: ViewKind,
    path: Option<String>,
    description: String,
    dependencies: Vec<String>,
}

/// Load errors for the listed schema, or all of them without a filter
fn load_errors<'a>(loaded: &'a LoadedViews, schema: Option<&'a str>) -> Vec<&'a CoreError> {
    match schema {
        Some(schema) => loaded.errors_in_schema(schema).collect(),
        None => loaded.errors().iter().collect(),
    }
}

/// Build display rows, resolving dependencies of the listed views in parallel
fn collect_view_info(loaded: &LoadedViews, schema: Option<&str>) -> (Vec<ViewInfo>, Vec<String>) {
    let mut infos = Vec::new();
    let mut failures = Vec::new();

    let resolved = match schema {
        Some(schema) => loaded.resolve_schema_dependencies(schema),
        None => loaded.resolve_dependencies(),
    };
    for (key, result) in resolved {
        let Some(view) = loaded.get(&key) else {
            continue;
        };
        match result {
            Ok(deps) => infos.push(ViewInfo {
                schema: key.schema.clone(),
                name: key.name.clone(),
                kind: view.kind(),
                path: view.path().map(|p| p.display().to_string()),
                description: describe(view, &mut failures),
                dependencies: deps.iter().map(|d| d.to_string()).collect(),
            }),
            Err(e) => failures.push(e.to_string()),
        }
    }

    (infos, failures)
}

fn describe(view: &View, failures: &mut Vec<String>) -> String {
    view.description().unwrap_or_else(|e| {
        failures.push(e.to_string());
        String::new()
    })
}

/// Print views in table format
fn print_table(views: &[ViewInfo]) {
    let name_width = views
        .iter()
        .map(|v| v.schema.len() + v.name.len() + 1)
        .max()
        .unwrap_or(4)
        .max(4);
    let kind_width = 6;

    println!(
        "{:<name_width$}  {:<kind_width$}  DEPENDS_ON",
        "VIEW", "KIND",
    );
    println!("{:-<name_width$}  {:-<kind_width$}  {}", "", "", "-".repeat(40));

    for view in views {
        let deps_str = if view.dependencies.is_empty() {
            "-".to_string()
        } else {
            view.dependencies.join(", ")
        };
        println!(
            "{:<name_width$}  {:<kind_width$}  {}",
            format!("{}.{}", view.schema, view.name),
            view.kind.as_str(),
            deps_str,
        );
    }

    println!();
    println!("{} views found", views.len());
}

/// Print views in JSON format
fn print_json(views: &[ViewInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(views).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
