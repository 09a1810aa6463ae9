//! Content module - the content graph, front-matter, markdown and slugs

mod frontmatter;
mod markdown;
mod node;
pub mod slug;
pub mod source;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use node::{ContentNode, FileInfo, MarkdownBody, NodeError, NodeId, NodeStore, NodeType};
pub use slug::{FilePathResolver, PathResolver, ResolveError};
pub use source::FileSystemSource;
