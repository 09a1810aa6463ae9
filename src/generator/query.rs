//! Content query - selects the files of a source collection together with
//! their markdown child, and classifies each result as a post or not

use serde::Serialize;
use thiserror::Error;

use super::enrich::SLUG_FIELD;
use crate::content::{ContentNode, FileInfo, NodeId, NodeStore, NodeType};

/// A single problem reported by the query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("File node {node} lists child {child}, which does not exist")]
    DanglingChild { node: NodeId, child: NodeId },

    #[error("markdown node {node} (from {relative_path}) has no `fields.slug`")]
    MissingSlug { node: NodeId, relative_path: String },
}

/// Every error of a failed query. Page creation aborts on the first failed
/// query and nothing is registered.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("query failed with {} error(s){}", .errors.len(), list(.errors))]
pub struct QueryFailure {
    pub errors: Vec<QueryError>,
}

fn list(errors: &[QueryError]) -> String {
    errors.iter().map(|e| format!("\n  - {}", e)).collect()
}

impl From<QueryError> for QueryFailure {
    fn from(err: QueryError) -> Self {
        Self { errors: vec![err] }
    }
}

/// Restricts a query to one source collection
#[derive(Debug, Clone)]
pub struct FileFilter {
    pub source_instance_name: String,
}

impl FileFilter {
    pub fn source(name: impl Into<String>) -> Self {
        Self {
            source_instance_name: name.into(),
        }
    }

    fn select<'a>(&self, node: &'a ContentNode) -> Option<&'a FileInfo> {
        if node.node_type != NodeType::File {
            return None;
        }
        node.file
            .as_ref()
            .filter(|f| f.source_instance_name == self.source_instance_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkdownFields {
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkdownFrontmatter {
    pub title: Option<String>,
}

/// The markdown child of a file, as selected by the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownEntry {
    pub id: NodeId,
    pub fields: MarkdownFields,
    pub frontmatter: MarkdownFrontmatter,
}

/// One file returned by the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub id: NodeId,
    pub relative_path: String,
    pub children: Vec<NodeId>,
    pub child_markdown_remark: Option<MarkdownEntry>,
}

/// Raw query result: data plus any errors hit while building it
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub nodes: Vec<FileEntry>,
    pub errors: Vec<QueryError>,
}

impl QueryResult {
    /// The selected nodes, or every error if there were any
    pub fn into_data(self) -> Result<Vec<FileEntry>, QueryFailure> {
        if self.errors.is_empty() {
            Ok(self.nodes)
        } else {
            Err(QueryFailure {
                errors: self.errors,
            })
        }
    }
}

/// Select every `File` node of the filtered collection in creation order
pub fn all_files(store: &NodeStore, filter: &FileFilter) -> QueryResult {
    let mut result = QueryResult::default();

    for (node, file) in store
        .iter()
        .filter_map(|n| filter.select(n).map(|file| (n, file)))
    {
        let mut child_markdown_remark = None;
        for child_id in &node.children {
            match store.get_node(child_id) {
                None => result.errors.push(QueryError::DanglingChild {
                    node: node.id.clone(),
                    child: child_id.clone(),
                }),
                Some(child) if child.node_type == NodeType::MarkdownRemark => {
                    if child_markdown_remark.is_none() {
                        child_markdown_remark = Some(markdown_entry(child));
                    }
                }
                Some(_) => {}
            }
        }

        result.nodes.push(FileEntry {
            id: node.id.clone(),
            relative_path: file.relative_path.clone(),
            children: node.children.clone(),
            child_markdown_remark,
        });
    }

    result
}

fn markdown_entry(node: &ContentNode) -> MarkdownEntry {
    MarkdownEntry {
        id: node.id.clone(),
        fields: MarkdownFields {
            slug: node.field_str(SLUG_FIELD).map(str::to_string),
        },
        frontmatter: MarkdownFrontmatter {
            title: node.title().map(str::to_string),
        },
    }
}

/// A markdown-derived node that is guaranteed to have a slug. Serialized in
/// the shape the query selects it in: `{id, fields: {slug}, frontmatter: {title}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "MarkdownEntry")]
pub struct Post {
    pub id: NodeId,
    pub slug: String,
    pub title: Option<String>,
}

impl From<Post> for MarkdownEntry {
    fn from(post: Post) -> Self {
        MarkdownEntry {
            id: post.id,
            fields: MarkdownFields {
                slug: Some(post.slug),
            },
            frontmatter: MarkdownFrontmatter { title: post.title },
        }
    }
}

/// A queried file, resolved once into a post or not
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Post(Post),
    NonPost { id: NodeId, relative_path: String },
}

impl TryFrom<FileEntry> for Entry {
    type Error = QueryError;

    fn try_from(entry: FileEntry) -> Result<Self, Self::Error> {
        let Some(markdown) = entry.child_markdown_remark else {
            return Ok(Entry::NonPost {
                id: entry.id,
                relative_path: entry.relative_path,
            });
        };

        let slug = markdown
            .fields
            .slug
            .ok_or_else(|| QueryError::MissingSlug {
                node: markdown.id.clone(),
                relative_path: entry.relative_path.clone(),
            })?;

        Ok(Entry::Post(Post {
            id: markdown.id,
            slug,
            title: markdown.frontmatter.title,
        }))
    }
}

/// Classify every entry and keep the posts, in query order. Files without a
/// markdown child are skipped; a markdown child without a slug fails the
/// whole query.
pub fn posts(entries: Vec<FileEntry>) -> Result<Vec<Post>, QueryFailure> {
    let mut posts = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for entry in entries {
        match Entry::try_from(entry) {
            Ok(Entry::Post(post)) => posts.push(post),
            Ok(Entry::NonPost { relative_path, .. }) => {
                tracing::debug!("Skipping non-post file {}", relative_path);
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(posts)
    } else {
        Err(QueryFailure { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn add_file(store: &mut NodeStore, source: &str, relative_path: &str) -> NodeId {
        store
            .create_node(ContentNode::file(
                format!("{}:{}", source, relative_path),
                FileInfo {
                    relative_path: relative_path.to_string(),
                    source_instance_name: source.to_string(),
                    extension: "md".to_string(),
                    absolute_path: PathBuf::from(relative_path),
                },
            ))
            .unwrap()
    }

    fn add_markdown(store: &mut NodeStore, parent: &NodeId, slug: Option<&str>) -> NodeId {
        let id = store
            .create_node(
                ContentNode::new(format!("{}/md", parent), NodeType::MarkdownRemark)
                    .with_parent(parent.clone()),
            )
            .unwrap();
        if let Some(slug) = slug {
            store.create_node_field(&id, SLUG_FIELD, slug).unwrap();
        }
        id
    }

    #[test]
    fn test_all_files_filters_by_source() {
        let mut store = NodeStore::new();
        let a = add_file(&mut store, "blog", "a.md");
        add_markdown(&mut store, &a, Some("/a/"));
        add_file(&mut store, "pages", "about.md");
        add_file(&mut store, "blog", "cover.png");

        let files = all_files(&store, &FileFilter::source("blog"))
            .into_data()
            .unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "cover.png"]);
        assert_eq!(
            files[0]
                .child_markdown_remark
                .as_ref()
                .and_then(|m| m.fields.slug.as_deref()),
            Some("/a/")
        );
        assert!(files[1].child_markdown_remark.is_none());
    }

    #[test]
    fn test_posts_skip_non_posts_and_keep_order() {
        let mut store = NodeStore::new();
        let c = add_file(&mut store, "blog", "c.md");
        add_markdown(&mut store, &c, Some("/c/"));
        add_file(&mut store, "blog", "image.jpg");
        let a = add_file(&mut store, "blog", "a.md");
        add_markdown(&mut store, &a, Some("/a/"));

        let files = all_files(&store, &FileFilter::source("blog"))
            .into_data()
            .unwrap();
        let slugs: Vec<_> = posts(files)
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["/c/", "/a/"]);
    }

    #[test]
    fn test_missing_slug_fails_query() {
        let mut store = NodeStore::new();
        let a = add_file(&mut store, "blog", "a.md");
        add_markdown(&mut store, &a, None);

        let files = all_files(&store, &FileFilter::source("blog"))
            .into_data()
            .unwrap();
        let failure = posts(files).unwrap_err();
        assert_eq!(failure.errors.len(), 1);
        assert!(matches!(
            &failure.errors[0],
            QueryError::MissingSlug { relative_path, .. } if relative_path == "a.md"
        ));
    }

    #[test]
    fn test_file_without_info_is_not_selected() {
        let mut store = NodeStore::new();
        store
            .create_node(ContentNode::new("bare", NodeType::File))
            .unwrap();
        assert!(all_files(&store, &FileFilter::source("blog"))
            .into_data()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_dangling_child_fails_query() {
        let mut store = NodeStore::new();
        let mut file = ContentNode::file(
            "blog:a.md",
            FileInfo {
                relative_path: "a.md".to_string(),
                source_instance_name: "blog".to_string(),
                extension: "md".to_string(),
                absolute_path: PathBuf::from("a.md"),
            },
        );
        file.children.push("ghost".into());
        store.create_node(file).unwrap();

        let failure = all_files(&store, &FileFilter::source("blog"))
            .into_data()
            .unwrap_err();
        assert_eq!(
            failure.errors,
            vec![QueryError::DanglingChild {
                node: "blog:a.md".into(),
                child: "ghost".into(),
            }]
        );
    }

    #[test]
    fn test_entry_classification() {
        let entry = FileEntry {
            id: "f".into(),
            relative_path: "f.txt".to_string(),
            children: Vec::new(),
            child_markdown_remark: None,
        };
        assert_eq!(
            Entry::try_from(entry).unwrap(),
            Entry::NonPost {
                id: "f".into(),
                relative_path: "f.txt".to_string()
            }
        );

        let entry = FileEntry {
            id: "g".into(),
            relative_path: "g.md".to_string(),
            children: vec!["g/md".into()],
            child_markdown_remark: Some(MarkdownEntry {
                id: "g/md".into(),
                fields: MarkdownFields {
                    slug: Some("/g/".to_string()),
                },
                frontmatter: MarkdownFrontmatter {
                    title: Some("G".to_string()),
                },
            }),
        };
        assert_eq!(
            Entry::try_from(entry).unwrap(),
            Entry::Post(Post {
                id: "g/md".into(),
                slug: "/g/".to_string(),
                title: Some("G".to_string()),
            })
        );
    }

    #[test]
    fn test_post_serializes_as_queried_node() {
        let post = Post {
            id: "a/md".into(),
            slug: "/a/".to_string(),
            title: Some("A".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            serde_json::json!({
                "id": "a/md",
                "fields": { "slug": "/a/" },
                "frontmatter": { "title": "A" },
            })
        );
    }

    #[test]
    fn test_query_failure_display_lists_errors() {
        let failure = QueryFailure {
            errors: vec![
                QueryError::MissingSlug {
                    node: "x".into(),
                    relative_path: "x.md".to_string(),
                },
                QueryError::DanglingChild {
                    node: "y".into(),
                    child: "z".into(),
                },
            ],
        };
        let text = failure.to_string();
        assert!(text.starts_with("query failed with 2 error(s)"));
        assert!(text.contains("markdown node x (from x.md) has no `fields.slug`"));
        assert!(text.contains("lists child z"));

        let single = QueryFailure::from(QueryError::DanglingChild {
            node: "y".into(),
            child: "z".into(),
        });
        assert_eq!(
            single.to_string(),
            "query failed with 1 error(s)\n  - File node y lists child z, which does not exist"
        );
    }
}
