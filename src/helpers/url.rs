//! URL helper functions

use std::path::{Path, PathBuf};

/// Page path of a post: the prefix followed by the slug, unchanged
///
/// # Examples
/// ```ignore
/// page_path("/blog", "/hello/") // -> "/blog/hello/"
/// ```
pub fn page_path(prefix: &str, slug: &str) -> String {
    format!("{}{}", prefix, slug)
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/blog/hello/") // -> "https://example.com/blog/hello/"
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// File a page path is written to under the output directory
///
/// # Examples
/// ```ignore
/// output_file(Path::new("public"), "/blog/hello/") // -> "public/blog/hello/index.html"
/// ```
pub fn output_file(public_dir: &Path, path: &str) -> PathBuf {
    let mut file = public_dir.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != "..") {
        file.push(segment);
    }
    if path.ends_with(".html") {
        file
    } else {
        file.join("index.html")
    }
}
