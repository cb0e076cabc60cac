use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuireError {
    /// A create/rename/move target collides with an existing page.
    #[error("Page already exists: {0}")]
    PageAlreadyExists(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Empty names, or names containing the path separator.
    #[error("Invalid page name: {0:?}")]
    InvalidName(String),

    /// Moving a page onto itself or into its own subtree.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// The index directory could not be opened. Callers treat this as
    /// non-fatal for filesystem mutations.
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Search index error: {0}")]
    Index(String),

    #[error("Notebook error: {0}")]
    Notebook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuireError>;
