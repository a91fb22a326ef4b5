//! Template rendering for platform scripts and descriptors.
//!
//! Uses handlebars. Scripts and Dockerfiles are rendered verbatim; values
//! substituted into `.xml` descriptors are XML-escaped. A `{{key}}`
//! placeholder whose key is missing from the context is written out unchanged
//! instead of being rendered as an empty string.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    resources::ResourceSet,
};
use handlebars::Handlebars;
use regex::Regex;
use serde_json::Value;
use std::{collections::BTreeMap, path::Path, sync::LazyLock};

/// String-keyed render context.
pub type TemplateContext = BTreeMap<String, Value>;

/// Matches simple placeholders such as `{{name}}` or `{{ jarName }}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Handlebars keywords that look like placeholders.
const KEYWORDS: &[&str] = &["this", "else"];

/// Renders templates from a [`ResourceSet`].
pub struct TemplateRenderer {
    plain: Handlebars<'static>,
    markup: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        let mut plain = Handlebars::new();
        plain.register_escape_fn(handlebars::no_escape);
        let mut markup = Handlebars::new();
        markup.register_escape_fn(xml_escape);
        Self { plain, markup }
    }

    fn registry(&self, template_id: &str) -> &Handlebars<'static> {
        if template_id.ends_with(".xml") {
            &self.markup
        } else {
            &self.plain
        }
    }

    /// Renders template source text.
    ///
    /// `template_id` names the template in errors and selects escaping: ids
    /// ending in `.xml` get XML-escaped values.
    pub fn render_str(
        &self,
        template_id: &str,
        source: &str,
        context: &TemplateContext,
    ) -> Result<String> {
        let mut data = context.clone();
        for captures in PLACEHOLDER.captures_iter(source) {
            let key = &captures[1];
            if KEYWORDS.contains(&key) || data.contains_key(key) {
                continue;
            }
            data.insert(key.to_string(), Value::String(captures[0].to_string()));
        }

        let rendered = self
            .registry(template_id)
            .render_template(source, &data)
            .map_err(|e| Error::RenderFailure {
                template: template_id.to_string(),
                reason: e.to_string(),
            })?;

        if template_id.ends_with(".bat") {
            return Ok(crlf(&rendered));
        }
        Ok(rendered)
    }

    /// Loads `template_id` from `resources`, renders it and writes the result
    /// to `destination`, creating parent directories.
    pub async fn render_file(
        &self,
        resources: &ResourceSet,
        template_id: &str,
        context: &TemplateContext,
        destination: &Path,
    ) -> Result<()> {
        let render_failure = |e: Error| Error::RenderFailure {
            template: template_id.to_string(),
            reason: e.to_string(),
        };

        let source = resources.load(template_id).await.map_err(render_failure)?;
        let rendered = self.render_str(template_id, &source, context)?;

        write_file(destination, &rendered).await.map_err(render_failure)?;
        log::debug!("Rendered {template_id} to {}", destination.display());
        Ok(())
    }
}

/// Rewrites every line ending as `\r\n`, as cmd.exe expects.
fn crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Escapes the characters XML gives meaning to in text and attributes.
pub fn xml_escape(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

async fn write_file(destination: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    tokio::fs::write(destination, contents)
        .await
        .fs_context("writing rendered template", destination)
}
