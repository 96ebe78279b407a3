use std::path::PathBuf;

/// What to do with an article whose first line is not a metadata line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MetadataPolicy {
    /// Use empty date/time/author and render the whole file as markdown.
    #[default]
    Lenient,
    /// Abort the build.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortOrder {
    /// Directory listing order, as returned by the filesystem.
    #[default]
    Listing,
    /// Newest `date` first; undated articles last.
    Date,
}

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub article_dir: PathBuf,
    pub out_dir: PathBuf,
    pub article_template: PathBuf,
    pub index_template: PathBuf,
    pub static_dir: Option<PathBuf>,

    pub metadata_policy: MetadataPolicy,
    pub escape_metadata: bool,
    pub sort: SortOrder,
    pub clean: bool,
}

impl Context {
    pub fn new(
        article_dir: PathBuf,
        out_dir: PathBuf,
        article_template: PathBuf,
        index_template: PathBuf,
    ) -> Self {
        Self {
            article_dir,
            out_dir,
            article_template,
            index_template,
            static_dir: None,
            metadata_policy: MetadataPolicy::default(),
            escape_metadata: true,
            sort: SortOrder::default(),
            clean: false,
        }
    }
}
