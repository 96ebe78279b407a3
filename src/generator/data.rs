use std::path::PathBuf;

use crate::metadata::ArticleMetadata;

/// Output directory for article pages, relative to the site root.
pub(crate) const ARTICLES_DIR: &str = "articles";
pub(crate) const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub(crate) struct ArticleRecord {
    /// File stem of the markdown source.
    pub title: String,
    pub meta: ArticleMetadata,
    /// Link from the index page, e.g. `articles/hello.html`.
    pub url: String,
    /// Where the rendered page was written.
    pub path: PathBuf,
    pub html_body: String,
}
