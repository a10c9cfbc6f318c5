//! Bundled workflow templates and placeholder rendering.
use crate::error::SetupError;
use std::collections::BTreeMap;
use std::path::Path;

pub const SNAKEFILE_TEMPLATE: &str = include_str!("../templates/Snakefile");
pub const CONFIG_TEMPLATE: &str = include_str!("../templates/config.yaml");

/// Named values substituted into a template.
pub type TemplateVars = BTreeMap<&'static str, String>;

/// Substitute `{{ name }}` placeholders in `template`.
///
/// `source` only labels errors. Unknown names and unterminated placeholders
/// are errors; there is no fallback value.
pub fn render(source: &Path, template: &str, vars: &TemplateVars) -> Result<String, SetupError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or_else(|| SetupError::TemplateSyntax {
                path: source.to_path_buf(),
            })?;
        let name = after_open[..end].trim();
        let value = vars
            .get(name)
            .ok_or_else(|| SetupError::TemplateVariable {
                path: source.to_path_buf(),
                name: name.to_string(),
            })?;
        rendered.push_str(value);
        rest = &after_open[end + 2..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}
