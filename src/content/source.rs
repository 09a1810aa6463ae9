//! File-system source - crawls a directory into `File` and `MarkdownRemark`
//! nodes

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentNode, FileInfo, FrontMatter, MarkdownRenderer, NodeId, NodeStore};

/// Crawls a source directory into the content graph
pub struct FileSystemSource<'a> {
    root: &'a Path,
    name: &'a str,
    renderer: MarkdownRenderer,
}

impl<'a> FileSystemSource<'a> {
    /// `name` becomes the `source_instance_name` of every file found under
    /// `root`
    pub fn new(root: &'a Path, name: &'a str, renderer: MarkdownRenderer) -> Self {
        Self {
            root,
            name,
            renderer,
        }
    }

    /// Create a node for every file under the root, plus a markdown child for
    /// every markdown file. `on_create_node` runs once per created node, right
    /// after it is added to the store. Returns the number of nodes created.
    pub fn source_nodes<F>(&self, store: &mut NodeStore, mut on_create_node: F) -> Result<usize>
    where
        F: FnMut(&mut NodeStore, &NodeId) -> Result<()>,
    {
        if !self.root.exists() {
            tracing::warn!("Source directory {:?} does not exist", self.root);
            return Ok(0);
        }

        let mut created = 0;
        for entry in WalkDir::new(self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative_path = path
                .strip_prefix(self.root)
                .unwrap_or(path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();

            let file_id = NodeId::new(format!("{}:{}", self.name, relative_path));
            let is_markdown = is_markdown_extension(&extension);
            store.create_node(ContentNode::file(
                file_id.clone(),
                FileInfo {
                    relative_path,
                    source_instance_name: self.name.to_string(),
                    extension,
                    absolute_path: path.to_path_buf(),
                },
            ))?;
            on_create_node(store, &file_id)?;
            created += 1;

            if !is_markdown {
                continue;
            }

            match self.compile(path, file_id.clone()) {
                Ok(node) => {
                    let id = store.create_node(node)?;
                    on_create_node(store, &id)?;
                    created += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to compile markdown {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Sourced {} nodes from {:?}", created, self.root);
        Ok(created)
    }

    fn compile(&self, path: &Path, parent: NodeId) -> Result<ContentNode> {
        let content = fs::read_to_string(path)?;
        let (frontmatter, body) = FrontMatter::parse(&content)?;
        let body = self.renderer.compile(body)?;
        let id = NodeId::new(format!("{}/markdown", parent));
        Ok(ContentNode::markdown(id, parent, frontmatter, body))
    }
}

fn is_markdown_extension(extension: &str) -> bool {
    matches!(extension, "md" | "markdown")
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map(|n| n.starts_with('.') && n.len() > 1 && n != "..")
        .unwrap_or(false)
}
