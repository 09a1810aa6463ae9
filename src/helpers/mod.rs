//! Helper functions shared by the generator and the templates

pub mod url;

pub use url::{full_url_for, output_file, page_path};
