//! Jinja environment setup for lea

use crate::error::JinjaResult;
use minijinja::{path_loader, Environment};
use std::path::{Component, Path};

/// Jinja environment whose templates are the files of a views directory
pub struct JinjaEnvironment<'a> {
    env: Environment<'a>,
}

impl JinjaEnvironment<'static> {
    /// Create an environment that loads templates relative to `root`
    pub fn with_template_dir(root: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(root.to_path_buf()));
        Self { env }
    }
}

impl<'a> JinjaEnvironment<'a> {
    /// Render the template stored at `relative_path` under the template root
    pub fn render_file(&self, relative_path: &Path) -> JinjaResult<String> {
        let name = template_name(relative_path);
        log::debug!("Rendering template {}", name);
        let template = self.env.get_template(&name)?;
        Ok(template.render(())?)
    }
}

impl std::fmt::Debug for JinjaEnvironment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaEnvironment").finish_non_exhaustive()
    }
}

/// Template name for a path: its normal components joined with `/`
pub fn template_name(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;
