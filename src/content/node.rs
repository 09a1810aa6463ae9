//! Content graph nodes and the store that owns them

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::FrontMatter;

/// Errors raised by the node store
#[derive(Error, Debug, PartialEq)]
pub enum NodeError {
    #[error("node already exists: {0}")]
    Duplicate(NodeId),

    #[error("node not found: {0}")]
    NotFound(NodeId),
}

/// Identity of a node inside the content graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Type discriminator of a node (`internal.type`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    File,
    MarkdownRemark,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::File => "File",
            NodeType::MarkdownRemark => "MarkdownRemark",
            NodeType::Other(name) => name,
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "File" => NodeType::File,
            "MarkdownRemark" => NodeType::MarkdownRemark,
            _ => NodeType::Other(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-system location of a `File` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path relative to the source root, always `/`-separated
    pub relative_path: String,
    /// Name of the source collection the file was found in
    pub source_instance_name: String,
    /// Extension without the leading dot
    pub extension: String,
    pub absolute_path: PathBuf,
}

/// Body of a markdown-derived node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownBody {
    pub raw: String,
    pub html: String,
    pub excerpt: Option<String>,
}

/// A record in the content graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Fields appended after creation (e.g. `slug`)
    pub fields: IndexMap<String, serde_json::Value>,
    pub frontmatter: Option<FrontMatter>,
    pub file: Option<FileInfo>,
    pub markdown: Option<MarkdownBody>,
}

impl ContentNode {
    /// Create a bare node of the given type
    pub fn new(id: impl Into<NodeId>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            parent: None,
            children: Vec::new(),
            fields: IndexMap::new(),
            frontmatter: None,
            file: None,
            markdown: None,
        }
    }

    /// Create a `File` node
    pub fn file(id: impl Into<NodeId>, file: FileInfo) -> Self {
        let mut node = Self::new(id, NodeType::File);
        node.file = Some(file);
        node
    }

    /// Create a `MarkdownRemark` node owned by `parent`
    pub fn markdown(
        id: impl Into<NodeId>,
        parent: NodeId,
        frontmatter: FrontMatter,
        body: MarkdownBody,
    ) -> Self {
        let mut node = Self::new(id, NodeType::MarkdownRemark);
        node.parent = Some(parent);
        node.frontmatter = Some(frontmatter);
        node.markdown = Some(body);
        node
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// String value of an appended field
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.frontmatter.as_ref().and_then(|fm| fm.title.as_deref())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Insertion-ordered graph store. Iteration order is node creation order,
/// which is what queries return results in.
#[derive(Debug, Default, Clone)]
pub struct NodeStore {
    nodes: IndexMap<NodeId, ContentNode>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph. If the node names a parent that is already
    /// present, the node is appended to the parent's children.
    pub fn create_node(&mut self, node: ContentNode) -> Result<NodeId, NodeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(NodeError::Duplicate(node.id));
        }

        let id = node.id.clone();
        if let Some(parent) = node.parent.as_ref().and_then(|p| self.nodes.get_mut(p)) {
            if !parent.children.contains(&id) {
                parent.children.push(id.clone());
            }
        }

        tracing::debug!("Created {} node {}", node.node_type, id);
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Append a field to a node. Writing the same field twice keeps the last
    /// value.
    pub fn create_node_field(
        &mut self,
        node: &NodeId,
        name: &str,
        value: impl Into<serde_json::Value>,
    ) -> Result<(), NodeError> {
        let target = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| NodeError::NotFound(node.clone()))?;
        target.fields.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Resolved children of a node, skipping ids with no node behind them
    pub fn children_of<'a>(&'a self, node: &'a ContentNode) -> impl Iterator<Item = &'a ContentNode> {
        node.children.iter().filter_map(move |id| self.nodes.get(id))
    }

    pub fn nodes_of_type<'a>(
        &'a self,
        node_type: &'a NodeType,
    ) -> impl Iterator<Item = &'a ContentNode> {
        self.nodes.values().filter(move |n| &n.node_type == node_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
