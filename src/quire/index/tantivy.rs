use std::fs;
use std::path::{Path, PathBuf};

use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, QueryParser};
use tantivy::schema::*;
use tantivy::{doc, Index, IndexWriter, TantivyDocument, Term};

use super::{SearchHit, SearchIndex};
use crate::error::{QuireError, Result};

/// Writer memory budget per operation.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Search index adapter backed by a tantivy directory.
///
/// The index is reopened per call (open, mutate, commit) rather than
/// holding a writer across operations; the directory lock is only ever
/// held inside one structural operation.
#[derive(Debug)]
pub struct TantivyIndex {
    dir: PathBuf,
}

fn schema() -> Schema {
    let mut builder = Schema::builder();
    // `path` is the exact-match key, `content` the searchable body.
    builder.add_text_field("path", STRING | STORED);
    builder.add_text_field("content", TEXT | STORED);
    builder.build()
}

fn index_err<E: std::fmt::Display>(err: E) -> QuireError {
    QuireError::Index(err.to_string())
}

impl TantivyIndex {
    /// Create a fresh index directory (idempotent on an existing one).
    pub fn create<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        if !dir.join("meta.json").exists() {
            Index::create_in_dir(&dir, schema()).map_err(index_err)?;
        }
        Ok(Self { dir })
    }

    /// Attach to an index directory. Availability is checked per
    /// operation, not here, so an unavailable index surfaces as
    /// [`QuireError::IndexUnavailable`] from the call that needed it.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn open_index(&self) -> Result<Index> {
        if !self.dir.join("meta.json").exists() {
            return Err(QuireError::IndexUnavailable(format!(
                "no index at {}",
                self.dir.display()
            )));
        }
        Index::open_in_dir(&self.dir)
            .map_err(|e| QuireError::IndexUnavailable(e.to_string()))
    }

    fn fields(index: &Index) -> Result<(Field, Field)> {
        let schema = index.schema();
        let path = schema.get_field("path").map_err(index_err)?;
        let content = schema.get_field("content").map_err(index_err)?;
        Ok((path, content))
    }

    fn stored_path(doc: &TantivyDocument, f_path: Field) -> String {
        doc.get_first(f_path)
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

impl SearchIndex for TantivyIndex {
    fn add_page(&self, path: &str, content: &str) -> Result<()> {
        let index = self.open_index()?;
        let (f_path, f_content) = Self::fields(&index)?;

        let mut writer: IndexWriter = index.writer(WRITER_HEAP_BYTES).map_err(index_err)?;
        // Replace any previous entry under the same path.
        writer.delete_term(Term::from_field_text(f_path, path));
        writer
            .add_document(doc!(f_path => path, f_content => content))
            .map_err(index_err)?;
        writer.commit().map_err(index_err)?;
        log::debug!("indexed page {path}");
        Ok(())
    }

    fn delete_page(&self, path: &str) -> Result<()> {
        let index = self.open_index()?;
        let (f_path, _) = Self::fields(&index)?;

        let mut writer: IndexWriter = index.writer(WRITER_HEAP_BYTES).map_err(index_err)?;
        writer.delete_term(Term::from_field_text(f_path, path));
        writer.commit().map_err(index_err)?;
        log::debug!("removed index entry {path}");
        Ok(())
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let index = self.open_index()?;
        let (f_path, f_content) = Self::fields(&index)?;
        let reader = index.reader().map_err(index_err)?;
        let searcher = reader.searcher();

        let mut parser = QueryParser::for_index(&index, vec![f_content]);
        parser.set_conjunction_by_default();
        let (parsed, _parse_errors) = parser.parse_query_lenient(query);

        let top = searcher
            .search(&parsed, &TopDocs::with_limit(limit))
            .map_err(index_err)?;

        let mut hits = Vec::with_capacity(top.len());
        for (score, address) in top {
            let doc: TantivyDocument = searcher.doc(address).map_err(index_err)?;
            hits.push(SearchHit {
                path: Self::stored_path(&doc, f_path),
                score,
            });
        }
        Ok(hits)
    }

    fn indexed_paths(&self) -> Result<Vec<String>> {
        let index = self.open_index()?;
        let (f_path, _) = Self::fields(&index)?;
        let reader = index.reader().map_err(index_err)?;
        let searcher = reader.searcher();

        let addresses = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(index_err)?;
        let mut paths = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address).map_err(index_err)?;
            paths.push(Self::stored_path(&doc, f_path));
        }
        paths.sort();
        Ok(paths)
    }
}
