//! Post page indexing - one page request per post, linked to its neighbours

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::query::Post;

/// How neighbours in the post list map onto `previous` / `next`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationOrder {
    /// `previous` is the post after this one in the list, `next` the one
    /// before it. With a newest-first list this links `previous` to the
    /// older post.
    #[default]
    Listing,
    /// `previous` is the post before this one in the list, `next` the one
    /// after it
    Reading,
}

/// Template used to render a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum TemplateRef {
    Builtin,
    File(PathBuf),
}

/// Data handed to the template of a post page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub slug: String,
    pub previous: Option<Post>,
    pub next: Option<Post>,
}

/// Request to materialize one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub path: String,
    pub template: TemplateRef,
    pub context: PageContext,
}

/// Turns an ordered post list into page requests
#[derive(Debug, Clone)]
pub struct PostPageIndexer {
    path_prefix: String,
    template: TemplateRef,
    order: NavigationOrder,
}

impl PostPageIndexer {
    pub fn new(path_prefix: impl Into<String>, template: TemplateRef) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            template,
            order: NavigationOrder::default(),
        }
    }

    pub fn with_order(mut self, order: NavigationOrder) -> Self {
        self.order = order;
        self
    }

    /// One request per post, in input order. The input order is taken as is
    /// and never re-sorted.
    pub fn index(&self, posts: &[Post]) -> Vec<PageRequest> {
        posts
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let after = posts.get(i + 1).cloned();
                let before = if i > 0 { posts.get(i - 1).cloned() } else { None };
                let (previous, next) = match self.order {
                    NavigationOrder::Listing => (after, before),
                    NavigationOrder::Reading => (before, after),
                };

                PageRequest {
                    path: format!("{}{}", self.path_prefix, post.slug),
                    template: self.template.clone(),
                    context: PageContext {
                        slug: post.slug.clone(),
                        previous,
                        next,
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> Post {
        Post {
            id: format!("md{}", slug.trim_matches('/')).into(),
            slug: slug.to_string(),
            title: Some(slug.trim_matches('/').to_uppercase()),
        }
    }

    fn indexer() -> PostPageIndexer {
        PostPageIndexer::new("/blog", TemplateRef::Builtin)
    }

    fn slugs(post: &Option<Post>) -> Option<&str> {
        post.as_ref().map(|p| p.slug.as_str())
    }

    #[test]
    fn test_empty_input() {
        assert!(indexer().index(&[]).is_empty());
    }

    #[test]
    fn test_single_post_has_no_neighbours() {
        let pages = indexer().index(&[post("/only/")]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/blog/only/");
        assert_eq!(pages[0].context.slug, "/only/");
        assert_eq!(pages[0].context.previous, None);
        assert_eq!(pages[0].context.next, None);
    }

    #[test]
    fn test_three_posts_listing_order() {
        let posts = vec![post("/a/"), post("/b/"), post("/c/")];
        let pages = indexer().index(&posts);

        let summary: Vec<_> = pages
            .iter()
            .map(|p| {
                (
                    p.path.as_str(),
                    slugs(&p.context.previous),
                    slugs(&p.context.next),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/blog/a/", Some("/b/"), None),
                ("/blog/b/", Some("/c/"), Some("/a/")),
                ("/blog/c/", None, Some("/b/")),
            ]
        );
        assert_eq!(pages[1].context.previous.as_ref(), Some(&posts[2]));
        assert_eq!(pages[1].context.next.as_ref(), Some(&posts[0]));
    }

    #[test]
    fn test_reading_order_swaps_links() {
        let posts = vec![post("/a/"), post("/b/"), post("/c/")];
        let pages = indexer()
            .with_order(NavigationOrder::Reading)
            .index(&posts);

        assert_eq!(slugs(&pages[0].context.previous), None);
        assert_eq!(slugs(&pages[0].context.next), Some("/b/"));
        assert_eq!(slugs(&pages[1].context.previous), Some("/a/"));
        assert_eq!(slugs(&pages[1].context.next), Some("/c/"));
        assert_eq!(slugs(&pages[2].context.next), None);
    }

    #[test]
    fn test_boundaries_for_longer_lists() {
        let posts: Vec<_> = (0..6).map(|i| post(&format!("/p{}/", i))).collect();
        let pages = indexer().index(&posts);

        assert_eq!(pages.len(), posts.len());
        assert_eq!(pages[0].context.next, None);
        assert_eq!(pages[5].context.previous, None);
        for i in 1..5 {
            assert_eq!(pages[i].context.previous.as_ref(), Some(&posts[i + 1]));
            assert_eq!(pages[i].context.next.as_ref(), Some(&posts[i - 1]));
        }
        for (page, post) in pages.iter().zip(&posts) {
            assert_eq!(page.path, format!("/blog{}", post.slug));
            assert_eq!(page.template, TemplateRef::Builtin);
        }
    }

    #[test]
    fn test_path_is_prefix_followed_by_slug() {
        let posts = vec![Post {
            id: "md-hello".into(),
            slug: "hello".to_string(),
            title: None,
        }];
        let pages = indexer().index(&posts);
        assert_eq!(pages[0].path, "/bloghello");
        assert_eq!(pages[0].context.slug, "hello");
    }

    #[test]
    fn test_input_order_is_not_resorted() {
        let posts = vec![post("/z/"), post("/a/")];
        let pages = indexer().index(&posts);
        assert_eq!(pages[0].path, "/blog/z/");
        assert_eq!(pages[1].path, "/blog/a/");
    }

    #[test]
    fn test_navigation_order_from_yaml() {
        let order: NavigationOrder = serde_yaml::from_str("reading").unwrap();
        assert_eq!(order, NavigationOrder::Reading);
        assert_eq!(NavigationOrder::default(), NavigationOrder::Listing);
    }
}
