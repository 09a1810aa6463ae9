//! Node field enrichment - decides whether a freshly created node gets a
//! `slug` field and what its value is

use serde::Serialize;

use crate::content::{ContentNode, NodeId, NodeType};

/// Name of the field carrying the URL slug
pub const SLUG_FIELD: &str = "slug";

/// A field append for the host to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMutation {
    pub field: String,
    pub node: NodeId,
    pub value: String,
}

/// Outcome of [`enrich`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Mutation(FieldMutation),
    NoOp,
}

/// Compute the slug mutation for a markdown node. Every other node type is a
/// no-op and `resolve_path` is not called for it. Errors from `resolve_path`
/// are returned unchanged.
pub fn enrich<F, E>(node: &ContentNode, resolve_path: F) -> Result<Enrichment, E>
where
    F: FnOnce(&ContentNode) -> Result<String, E>,
{
    if node.node_type != NodeType::MarkdownRemark {
        return Ok(Enrichment::NoOp);
    }

    let value = resolve_path(node)?;
    Ok(Enrichment::Mutation(FieldMutation {
        field: SLUG_FIELD.to_string(),
        node: node.id.clone(),
        value,
    }))
}
