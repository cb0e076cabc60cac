//! Physical storage of pages under the notebook root.
//!
//! The store performs the filesystem half of every structural
//! operation: conflict-checked creates and renames, plus the directory
//! cleanup the tree invariants call for. It holds no page state of its
//! own; physical locations are always recomputed from logical paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QuireError, Result};
use crate::path::{ext_search_order, PagePath};

#[derive(Debug)]
pub struct PageStore {
    note_path: PathBuf,
    file_ext: String,
}

impl PageStore {
    pub fn new<P: Into<PathBuf>>(note_path: P, file_ext: &str) -> Self {
        let file_ext = if file_ext.starts_with('.') {
            file_ext.to_string()
        } else {
            format!(".{}", file_ext)
        };
        Self {
            note_path: note_path.into(),
            file_ext,
        }
    }

    pub fn note_path(&self) -> &Path {
        &self.note_path
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Content file path a new page would be created at (default
    /// extension, no existence check).
    pub fn content_file(&self, page: &PagePath) -> PathBuf {
        self.note_path.join(page.rel_file(&self.file_ext))
    }

    /// Directory that holds the page's children.
    pub fn dir_path(&self, page: &PagePath) -> PathBuf {
        self.note_path.join(page.rel_dir())
    }

    /// Resolve the existing content file for a page, probing the
    /// default extension first and the other recognized ones after.
    /// `None` signals a page with no backing file.
    pub fn find_content_file(&self, page: &PagePath) -> Option<PathBuf> {
        if page.is_root() {
            return None;
        }
        for ext in ext_search_order(&self.file_ext) {
            let candidate = self.note_path.join(page.rel_file(&ext));
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }

    pub fn page_exists(&self, page: &PagePath) -> bool {
        self.find_content_file(page).is_some()
    }

    pub fn read_page(&self, page: &PagePath) -> Result<String> {
        let file = self
            .find_content_file(page)
            .ok_or_else(|| QuireError::PageNotFound(page.to_string()))?;
        Ok(fs::read_to_string(file)?)
    }

    /// Create a page's content file, failing if a file with any
    /// recognized extension already exists at that logical path. The
    /// parent directory is created if needed.
    pub fn create_file(&self, page: &PagePath, content: &str) -> Result<PathBuf> {
        if self.page_exists(page) {
            return Err(QuireError::PageAlreadyExists(page.to_string()));
        }
        let file = self.content_file(page);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content)?;
        Ok(file)
    }

    /// Create the directory a page's children live in. Idempotent.
    pub fn ensure_dir(&self, page: &PagePath) -> Result<()> {
        fs::create_dir_all(self.dir_path(page))?;
        Ok(())
    }

    pub fn rename_file(&self, old: &Path, new: &Path) -> Result<()> {
        if new.exists() {
            return Err(QuireError::PageAlreadyExists(new.display().to_string()));
        }
        if !old.exists() {
            return Err(QuireError::PageNotFound(old.display().to_string()));
        }
        fs::rename(old, new)?;
        Ok(())
    }

    pub fn rename_dir(&self, old: &Path, new: &Path) -> Result<()> {
        self.rename_file(old, new)
    }

    pub fn remove_file(&self, file: &Path) -> Result<()> {
        fs::remove_file(file)?;
        Ok(())
    }

    /// Remove a (supposedly empty) child directory. A non-empty or
    /// missing directory is a silent no-op; returns whether anything
    /// was removed.
    pub fn remove_dir(&self, dir: &Path) -> bool {
        fs::remove_dir(dir).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> PageStore {
        PageStore::new(dir, ".md")
    }

    #[test]
    fn create_writes_file_and_parents() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        let page = PagePath::parse("foo/bar");
        let file = store.create_file(&page, "# bar\n").unwrap();
        assert_eq!(file, temp.path().join("foo/bar.md"));
        assert_eq!(fs::read_to_string(&file).unwrap(), "# bar\n");
        assert!(temp.path().join("foo").is_dir());
    }

    #[test]
    fn create_rejects_any_recognized_extension() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        // Conflict with an alternate extension, not just the default.
        fs::write(temp.path().join("note.markdown"), "old").unwrap();
        let err = store
            .create_file(&PagePath::parse("note"), "new")
            .unwrap_err();
        assert!(matches!(err, QuireError::PageAlreadyExists(p) if p == "note"));
        assert!(!temp.path().join("note.md").exists());
    }

    #[test]
    fn find_prefers_default_extension() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        fs::write(temp.path().join("page.mkd"), "").unwrap();
        fs::write(temp.path().join("page.md"), "").unwrap();
        let found = store.find_content_file(&PagePath::parse("page")).unwrap();
        assert_eq!(found, temp.path().join("page.md"));
    }

    #[test]
    fn find_falls_back_to_alternates() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        fs::write(temp.path().join("page.markdown"), "").unwrap();
        let found = store.find_content_file(&PagePath::parse("page")).unwrap();
        assert_eq!(found, temp.path().join("page.markdown"));
        assert!(store.find_content_file(&PagePath::parse("other")).is_none());
    }

    #[test]
    fn rename_rejects_existing_target() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        fs::write(temp.path().join("a.md"), "a").unwrap();
        fs::write(temp.path().join("b.md"), "b").unwrap();
        let err = store
            .rename_file(&temp.path().join("a.md"), &temp.path().join("b.md"))
            .unwrap_err();
        assert!(matches!(err, QuireError::PageAlreadyExists(_)));
        // Nothing moved.
        assert_eq!(fs::read_to_string(temp.path().join("a.md")).unwrap(), "a");
        assert_eq!(fs::read_to_string(temp.path().join("b.md")).unwrap(), "b");
    }

    #[test]
    fn rename_rejects_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        let err = store
            .rename_file(&temp.path().join("gone.md"), &temp.path().join("b.md"))
            .unwrap_err();
        assert!(matches!(err, QuireError::PageNotFound(_)));
    }

    #[test]
    fn remove_dir_is_a_noop_when_not_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(temp.path());

        let dir = temp.path().join("full");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("child.md"), "").unwrap();

        assert!(!store.remove_dir(&dir));
        assert!(dir.exists());

        fs::remove_file(dir.join("child.md")).unwrap();
        assert!(store.remove_dir(&dir));
        assert!(!dir.exists());
    }
}
