//! Generator module - the node and page lifecycle hooks, and rendering of the
//! registered pages to disk
//!
//! A build runs in two phases:
//!
//! 1. Every node the source creates is passed to [`on_create_node`], which
//!    gives markdown nodes a `slug` field.
//! 2. [`create_pages`] queries the posts of the blog collection and
//!    registers one page per post, linked to its neighbours.
//!
//! [`Generator`] then renders the registered pages with their templates.

pub mod enrich;
pub mod index;
pub mod query;
pub mod registry;

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;
use tera::Context;
use thiserror::Error;

use crate::content::{
    ContentNode, NodeError, NodeId, NodeStore, NodeType, PathResolver, ResolveError,
};
use crate::helpers::{full_url_for, output_file, page_path};
use crate::templates::{NavPost, PostData, SiteData, TemplateRenderer};
use crate::Site;

pub use enrich::{enrich, Enrichment, FieldMutation, SLUG_FIELD};
pub use index::{NavigationOrder, PageContext, PageRequest, PostPageIndexer, TemplateRef};
pub use query::{Entry, FileFilter, Post, QueryError, QueryFailure};
pub use registry::{PageRegistrar, PageRegistry};

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Query(#[from] QueryFailure),

    #[error("resolving slug: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Parameters of the page creation phase
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub filter: FileFilter,
    pub path_prefix: String,
    pub template: TemplateRef,
    pub navigation: NavigationOrder,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            filter: FileFilter::source("blog"),
            path_prefix: "/blog".to_string(),
            template: TemplateRef::Builtin,
            navigation: NavigationOrder::Listing,
        }
    }
}

impl PageOptions {
    pub fn from_site(site: &Site) -> Self {
        let config = &site.config;
        Self {
            filter: FileFilter::source(config.source_instance_name.as_str()),
            path_prefix: config.path_prefix.clone(),
            template: site.template(),
            navigation: config.navigation,
        }
    }
}

/// Node creation hook: attach a `slug` field to markdown nodes. The field is
/// written to the store here; [`enrich`] only decides what to write.
pub fn on_create_node<R>(
    store: &mut NodeStore,
    id: &NodeId,
    resolver: &R,
) -> Result<Enrichment, BuildError>
where
    R: PathResolver + ?Sized,
{
    let node = store
        .get_node(id)
        .ok_or_else(|| NodeError::NotFound(id.clone()))?;
    let enrichment = enrich(node, |n| resolver.resolve(n, &*store))?;

    if let Enrichment::Mutation(mutation) = &enrichment {
        store.create_node_field(&mutation.node, &mutation.field, mutation.value.as_str())?;
        tracing::debug!(
            "Set {} = {:?} on {}",
            mutation.field,
            mutation.value,
            mutation.node
        );
    }

    Ok(enrichment)
}

/// Page creation hook: register one page per post of the filtered
/// collection. A failed query aborts before anything is registered.
/// Returns the number of pages registered.
pub fn create_pages<P>(
    store: &NodeStore,
    options: &PageOptions,
    registrar: &mut P,
) -> Result<usize, BuildError>
where
    P: PageRegistrar + ?Sized,
{
    let files = query::all_files(store, &options.filter).into_data()?;
    let posts = query::posts(files)?;

    let pages = PostPageIndexer::new(options.path_prefix.clone(), options.template.clone())
        .with_order(options.navigation)
        .index(&posts);

    let count = pages.len();
    for page in pages {
        registrar.create_page(page);
    }

    tracing::info!(
        "Created {} post pages from source `{}`",
        count,
        options.filter.source_instance_name
    );
    Ok(count)
}

/// Renders registered pages to the public directory
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a generator with the site's post template loaded
    pub fn new(site: &Site) -> Result<Self> {
        let mut renderer = TemplateRenderer::new()?;
        renderer.load(&site.template())?;

        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Render every registered page. Returns the number of files written.
    pub fn generate(&self, store: &NodeStore, registry: &PageRegistry) -> Result<usize> {
        fs::create_dir_all(&self.site.public_dir)?;

        let by_slug = posts_by_slug(store);
        let site_data = SiteData {
            title: self.site.config.title.clone(),
            url: self.site.config.url.clone(),
            post_count: registry.len(),
        };

        let mut written = 0;
        for page in registry.pages() {
            let node = by_slug
                .get(page.context.slug.as_str())
                .with_context(|| format!("no markdown node with slug {:?}", page.context.slug))?;

            let mut context = Context::new();
            context.insert("site", &site_data);
            context.insert("page", &page.context);
            context.insert("post", &self.post_data(node, page));
            if let Some(prev) = &page.context.previous {
                context.insert("prev_post", &self.nav_post(prev));
            }
            if let Some(next) = &page.context.next {
                context.insert("next_post", &self.nav_post(next));
            }

            let html = self
                .renderer
                .render(&page.template, &context)
                .with_context(|| format!("rendering {}", page.path))?;

            let output_path = output_file(&self.site.public_dir, &page.path);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
            fs::write(&output_path, html)
                .with_context(|| format!("writing {:?}", output_path))?;
            tracing::debug!("Generated post: {:?}", output_path);
            written += 1;
        }

        Ok(written)
    }

    fn post_data(&self, node: &ContentNode, page: &PageRequest) -> PostData {
        let frontmatter = node.frontmatter.clone().unwrap_or_default();
        let body = node.markdown.clone().unwrap_or_default();

        PostData {
            title: frontmatter
                .title
                .clone()
                .unwrap_or_else(|| page.context.slug.clone()),
            slug: page.context.slug.clone(),
            path: page.path.clone(),
            permalink: full_url_for(&self.site.config.url, &page.path),
            date: frontmatter
                .parse_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            tags: frontmatter.tags,
            html: body.html,
            excerpt: body.excerpt,
        }
    }

    fn nav_post(&self, post: &Post) -> NavPost {
        NavPost {
            title: post.title.clone().unwrap_or_else(|| post.slug.clone()),
            slug: post.slug.clone(),
            path: page_path(&self.site.config.path_prefix, &post.slug),
        }
    }
}

/// Markdown nodes keyed by their slug field
fn posts_by_slug(store: &NodeStore) -> HashMap<&str, &ContentNode> {
    store
        .nodes_of_type(&NodeType::MarkdownRemark)
        .filter_map(|n| n.field_str(SLUG_FIELD).map(|slug| (slug, n)))
        .collect()
}
