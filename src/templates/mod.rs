//! Page templates rendered with the Tera template engine
//!
//! A built-in post template is always available; sites can point
//! `template` in `_config.yml` at their own Tera file instead.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use crate::generator::TemplateRef;

const BUILTIN_POST: &str = "builtin/post.html";

const BUILTIN_POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ post.title }} | {{ site.title }}</title>
  <link rel="canonical" href="{{ post.permalink }}">
</head>
<body>
  <article class="post">
    <header>
      <h1>{{ post.title }}</h1>
      {% if post.date %}<time datetime="{{ post.date }}">{{ post.date }}</time>{% endif %}
      {% if post.tags %}<ul class="tags">{% for tag in post.tags %}<li>{{ tag }}</li>{% endfor %}</ul>{% endif %}
    </header>
    {{ post.html }}
  </article>
  <nav class="post-nav">
    <ul>
      {% if prev_post %}<li class="prev"><a href="{{ prev_post.path }}" rel="prev">&larr; {{ prev_post.title }}</a></li>{% endif %}
      {% if next_post %}<li class="next"><a href="{{ next_post.path }}" rel="next">{{ next_post.title }} &rarr;</a></li>{% endif %}
    </ul>
  </nav>
</body>
</html>
"#;

/// Renders page templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with the built-in templates registered
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post bodies are already HTML
        tera.autoescape_on(vec![]);
        tera.add_raw_template(BUILTIN_POST, BUILTIN_POST_TEMPLATE)?;

        Ok(Self { tera })
    }

    /// Make a template available for rendering. Built-in templates are
    /// always loaded.
    pub fn load(&mut self, template: &TemplateRef) -> Result<()> {
        if let TemplateRef::File(path) = template {
            let name = file_template_name(path);
            if !self.tera.get_template_names().any(|n| n == name) {
                self.tera
                    .add_template_file(path, Some(&name))
                    .with_context(|| format!("loading template {:?}", path))?;
                tracing::debug!("Loaded template {:?}", path);
            }
        }
        Ok(())
    }

    /// Render a template with given context
    pub fn render(&self, template: &TemplateRef, context: &Context) -> Result<String> {
        let name = match template {
            TemplateRef::Builtin => BUILTIN_POST.to_string(),
            TemplateRef::File(path) => file_template_name(path),
        };
        Ok(self.tera.render(&name, context)?)
    }
}

fn file_template_name(path: &Path) -> String {
    format!("file:{}", path.display())
}

/// Site-wide data exposed to templates
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub url: String,
    pub post_count: usize,
}

/// The post a page is rendered for
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub path: String,
    pub permalink: String,
    pub date: String,
    pub tags: Vec<String>,
    pub html: String,
    pub excerpt: Option<String>,
}

/// A neighbouring post in the previous/next navigation
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub slug: String,
    pub path: String,
}
