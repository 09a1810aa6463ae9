//! Slug derivation from a node's file-system location

use thiserror::Error;

use super::{ContentNode, NodeId, NodeStore, NodeType};

/// Parent hops tolerated before a node chain is considered cyclic
const MAX_PARENT_HOPS: usize = 100;

/// Failure to turn a node into a URL path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("node {node} has no File ancestor")]
    NoFileAncestor { node: NodeId },

    #[error("node {node} names parent {parent}, which does not exist")]
    MissingParent { node: NodeId, parent: NodeId },

    #[error("parent chain of node {node} does not terminate (cycle?)")]
    ParentCycle { node: NodeId },

    #[error("File node {node} has no relative path")]
    MissingRelativePath { node: NodeId },
}

/// Maps a node to a `/`-separated URL path fragment
pub trait PathResolver {
    fn resolve(&self, node: &ContentNode, store: &NodeStore) -> Result<String, ResolveError>;
}

/// Derives a path from the relative path of the node's `File` ancestor:
/// `2020/hello.md` becomes `/2020/hello/` and `hello/index.md` becomes
/// `/hello/`.
#[derive(Debug, Clone)]
pub struct FilePathResolver {
    /// Prefix removed from relative paths that start with it
    pub base_path: String,
    pub trailing_slash: bool,
    /// Run every segment through `slug::slugify`
    pub slugify: bool,
}

impl Default for FilePathResolver {
    fn default() -> Self {
        Self {
            base_path: "src/pages".to_string(),
            trailing_slash: true,
            slugify: false,
        }
    }
}

impl FilePathResolver {
    pub fn from_config(config: &crate::config::SiteConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            trailing_slash: config.trailing_slash,
            slugify: config.slugify,
        }
    }

    /// Walk up the parent chain until a `File` node is found
    pub fn find_file_node<'a>(
        &self,
        node: &'a ContentNode,
        store: &'a NodeStore,
    ) -> Result<&'a ContentNode, ResolveError> {
        let mut current = node;
        for _ in 0..=MAX_PARENT_HOPS {
            if current.node_type == NodeType::File {
                return Ok(current);
            }
            let parent = current
                .parent
                .as_ref()
                .ok_or_else(|| ResolveError::NoFileAncestor {
                    node: node.id.clone(),
                })?;
            current = store
                .get_node(parent)
                .ok_or_else(|| ResolveError::MissingParent {
                    node: current.id.clone(),
                    parent: parent.clone(),
                })?;
        }

        Err(ResolveError::ParentCycle {
            node: node.id.clone(),
        })
    }

    /// Turn a source-relative file path into a URL path
    pub fn file_path(&self, relative_path: &str) -> String {
        let relative = relative_path.replace('\\', "/");
        let base = self.base_path.trim_matches('/');
        let relative = match relative.strip_prefix(base) {
            Some(rest) if !base.is_empty() && rest.starts_with('/') => rest,
            _ => relative.as_str(),
        };

        let (dir, file_name) = match relative.rfind('/') {
            Some(i) => (&relative[..i], &relative[i + 1..]),
            None => ("", relative),
        };
        // A leading dot is part of the name, not an extension
        let name = match file_name.rfind('.') {
            Some(i) if i > 0 => &file_name[..i],
            _ => file_name,
        };
        let name = if name == "index" { "" } else { name };

        let mut segments: Vec<String> = Vec::new();
        for segment in dir.split('/').chain(std::iter::once(name)) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s if self.slugify => segments.push(::slug::slugify(s)),
                s => segments.push(s.to_string()),
            }
        }

        let mut path = format!("/{}", segments.join("/"));
        if self.trailing_slash && !segments.is_empty() {
            path.push('/');
        }
        path
    }
}

impl PathResolver for FilePathResolver {
    fn resolve(&self, node: &ContentNode, store: &NodeStore) -> Result<String, ResolveError> {
        let file_node = self.find_file_node(node, store)?;
        let relative_path = file_node
            .file
            .as_ref()
            .map(|f| f.relative_path.as_str())
            .ok_or_else(|| ResolveError::MissingRelativePath {
                node: file_node.id.clone(),
            })?;
        Ok(self.file_path(relative_path))
    }
}

impl<F> PathResolver for F
where
    F: Fn(&ContentNode, &NodeStore) -> Result<String, ResolveError>,
{
    fn resolve(&self, node: &ContentNode, store: &NodeStore) -> Result<String, ResolveError> {
        self(node, store)
    }
}
