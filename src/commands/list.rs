//! List the post pages a build would create

use anyhow::Result;
use serde::Serialize;

use super::build::build_pages;
use crate::content::NodeStore;
use crate::generator::{query, FileFilter, PageRegistry, Post};
use crate::Site;

#[derive(Debug, Serialize)]
struct PageRow<'a> {
    path: &'a str,
    slug: &'a str,
    previous: Option<&'a str>,
    next: Option<&'a str>,
}

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let (store, registry) = build_pages(site)?;

    match content_type {
        "page" | "pages" => {
            let rows = page_rows(&registry);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("Pages ({}):", rows.len());
            for row in rows {
                println!(
                    "  {}  prev: {}  next: {}",
                    row.path,
                    row.previous.unwrap_or("-"),
                    row.next.unwrap_or("-")
                );
            }
        }
        "post" | "posts" => {
            let posts = posts(&store, site)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }

            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} [{}]",
                    post.title.as_deref().unwrap_or("(untitled)"),
                    post.slug
                );
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: page, post", content_type);
        }
    }

    Ok(())
}

fn page_rows(registry: &PageRegistry) -> Vec<PageRow<'_>> {
    registry
        .pages()
        .map(|page| PageRow {
            path: &page.path,
            slug: &page.context.slug,
            previous: page.context.previous.as_ref().map(|p| p.slug.as_str()),
            next: page.context.next.as_ref().map(|p| p.slug.as_str()),
        })
        .collect()
}

/// Posts of the blog collection, in listing order
fn posts(store: &NodeStore, site: &Site) -> Result<Vec<Post>> {
    let filter = FileFilter::source(site.config.source_instance_name.as_str());
    let files = query::all_files(store, &filter).into_data()?;
    Ok(query::posts(files)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site, "tags", false).is_err());
    }

    #[test]
    fn test_page_rows_and_posts() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(&site.source_dir).unwrap();
        fs::write(site.source_dir.join("a.md"), "---\ntitle: A\n---\nA").unwrap();
        fs::write(site.source_dir.join("b.md"), "---\ntitle: B\n---\nB").unwrap();

        let (store, registry) = build_pages(&site).unwrap();
        let rows = page_rows(&registry);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path, "/blog/a/");
        assert_eq!(rows[0].previous, Some("/b/"));
        assert_eq!(rows[0].next, None);
        assert_eq!(rows[1].next, Some("/a/"));

        let posts = posts(&store, &site).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("A"), Some("B")]);

        run(&site, "pages", true).unwrap();
        run(&site, "posts", false).unwrap();
    }
}
