use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{SearchHit, SearchIndex};
use crate::error::Result;

/// In-memory search index, used by tests in place of the tantivy
/// adapter. Matching is naive (every query term must appear as a
/// substring of the page content, case-insensitive) but the mutation
/// contract is the real one: one entry per path, exact-path deletes.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: Mutex<BTreeMap<String, String>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.docs.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn content_of(&self, path: &str) -> Option<String> {
        self.docs.lock().unwrap().get(path).cloned()
    }
}

impl SearchIndex for MemoryIndex {
    fn add_page(&self, path: &str, content: &str) -> Result<()> {
        self.docs
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn delete_page(&self, path: &str) -> Result<()> {
        self.docs.lock().unwrap().remove(path);
        Ok(())
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let docs = self.docs.lock().unwrap();
        let hits = docs
            .iter()
            .filter(|(_, content)| {
                let haystack = content.to_lowercase();
                terms.iter().all(|t| haystack.contains(t))
            })
            .take(limit)
            .map(|(path, _)| SearchHit {
                path: path.clone(),
                score: 1.0,
            })
            .collect();
        Ok(hits)
    }

    fn indexed_paths(&self) -> Result<Vec<String>> {
        Ok(self.docs.lock().unwrap().keys().cloned().collect())
    }
}
