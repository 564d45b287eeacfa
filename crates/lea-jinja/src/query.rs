//! Turning raw SQL file text into final query text

use crate::environment::JinjaEnvironment;
use crate::error::JinjaResult;
use std::path::Path;

/// Strip trailing whitespace and a single trailing `;`
pub fn trim_query(text: &str) -> &str {
    let text = text.trim_end();
    text.strip_suffix(';').unwrap_or(text)
}

/// Whether the text opens with an `{% extends ... %}` tag
pub fn starts_with_extends(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("{%") else {
        return false;
    };
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    rest.trim_start().starts_with("extends")
}

/// Materialize the query of the SQL file at `relative_path`.
///
/// `raw` is the file's text. Files extending a base template are rendered
/// through `env`, using their own path as template name; everything else is
/// returned trimmed and verbatim.
pub fn materialize_query(
    env: &JinjaEnvironment<'_>,
    relative_path: &Path,
    raw: &str,
) -> JinjaResult<String> {
    let text = trim_query(raw);
    if !starts_with_extends(text) {
        return Ok(text.to_string());
    }
    let rendered = env.render_file(relative_path)?;
    Ok(trim_query(&rendered).to_string())
}
