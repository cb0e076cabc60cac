//! Full-text search over page content.
//!
//! The index stores one document per page with content, keyed by the
//! page's logical path. Structural operations keep it aligned with the
//! filesystem; the index is never the source of truth.
//!
//! [`SearchIndex`] is a trait so the tree operations can be tested
//! without a real index engine:
//!
//! - [`TantivyIndex`]: production adapter over a tantivy directory,
//!   opened and committed per operation
//! - [`MemoryIndex`]: in-memory fake for tests

use crate::error::Result;

pub mod memory;
pub mod tantivy;

pub use self::memory::MemoryIndex;
pub use self::tantivy::TantivyIndex;

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Logical path of the matching page.
    pub path: String,
    pub score: f32,
}

/// Adapter over the search engine. One mutation per call; the
/// implementation acquires and releases whatever session state it
/// needs within the call, so no writer outlives an operation.
pub trait SearchIndex {
    /// Add or replace the document for a page.
    fn add_page(&self, path: &str, content: &str) -> Result<()>;

    /// Delete the document whose path is exactly `path`. Deleting a
    /// page's subtree means one call per descendant; prefixes are
    /// never matched.
    fn delete_page(&self, path: &str) -> Result<()>;

    /// Query page content; AND semantics for multiple terms.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// All indexed logical paths, sorted. Used by the reconciliation
    /// pass.
    fn indexed_paths(&self) -> Result<Vec<String>>;
}
