//! Page registration

use indexmap::IndexMap;

use super::index::PageRequest;

/// Accepts page requests for rendering
pub trait PageRegistrar {
    /// Register a page. Registering the same path again replaces the earlier
    /// request.
    fn create_page(&mut self, request: PageRequest);
}

/// In-memory registrar keyed by page path, in first-registration order
#[derive(Debug, Default, Clone)]
pub struct PageRegistry {
    pages: IndexMap<String, PageRequest>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&PageRequest> {
        self.pages.get(path)
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageRequest> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageRegistrar for PageRegistry {
    fn create_page(&mut self, request: PageRequest) {
        tracing::debug!("Registering page {}", request.path);
        if let Some(previous) = self.pages.insert(request.path.clone(), request) {
            tracing::debug!("Replaced earlier request for {}", previous.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::index::{PageContext, TemplateRef};

    fn request(path: &str, slug: &str) -> PageRequest {
        PageRequest {
            path: path.to_string(),
            template: TemplateRef::Builtin,
            context: PageContext {
                slug: slug.to_string(),
                previous: None,
                next: None,
            },
        }
    }

    #[test]
    fn test_registration_is_idempotent_by_path() {
        let mut registry = PageRegistry::new();
        registry.create_page(request("/blog/a/", "/a/"));
        registry.create_page(request("/blog/b/", "/b/"));
        registry.create_page(request("/blog/a/", "/a-again/"));

        assert_eq!(registry.len(), 2);
        let paths: Vec<_> = registry.pages().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/blog/a/", "/blog/b/"]);
        assert_eq!(registry.get("/blog/a/").unwrap().context.slug, "/a-again/");
    }

    #[test]
    fn test_empty_registry() {
        let registry = PageRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("/blog/").is_none());
    }
}
