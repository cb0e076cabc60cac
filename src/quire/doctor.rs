//! Consistency check across the three page representations.
//!
//! Structural operations are best-effort: a failure after the first
//! filesystem mutation leaves the notebook partially updated, and index
//! writes are allowed to fail without blocking. This pass reconciles
//! after the fact: it walks the tree and compares what the tree, the
//! directory layout and the search index each believe, reporting drift
//! and optionally repairing the index side (the filesystem is the
//! source of truth and is never mutated here).

use std::collections::BTreeSet;

use crate::error::Result;
use crate::index::SearchIndex;
use crate::path::PagePath;
use crate::store::PageStore;
use crate::tree::PageTree;

/// What the reconciliation pass found. Lists hold logical paths.
#[derive(Debug, Default)]
pub struct DoctorReport {
    pub pages_checked: usize,
    /// Leaf pages whose content file is gone.
    pub missing_files: Vec<String>,
    /// Pages with children but no child directory.
    pub missing_dirs: Vec<String>,
    /// Child directories left behind by pages without children.
    pub orphan_dirs: Vec<String>,
    /// Index entries whose page no longer has content.
    pub stale_index: Vec<String>,
    /// Pages with content missing from the index.
    pub missing_index: Vec<String>,
    /// Index entries fixed (only set when repairing).
    pub repaired_index: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty()
            && self.missing_dirs.is_empty()
            && self.orphan_dirs.is_empty()
            && self.stale_index.is_empty()
            && self.missing_index.is_empty()
    }
}

/// Compare tree, filesystem and index. With `repair`, stale index
/// entries are deleted and missing ones re-added from the content
/// files; filesystem drift is only reported.
pub fn run<I: SearchIndex>(
    tree: &PageTree,
    store: &PageStore,
    index: &I,
    repair: bool,
) -> Result<DoctorReport> {
    let mut report = DoctorReport::default();
    let mut with_content = BTreeSet::new();

    for id in tree.all_nodes() {
        report.pages_checked += 1;
        let page = tree.page_path(id);
        let path = page.to_string();
        let has_file = store.find_content_file(&page).is_some();
        let has_children = tree.child_count(id) > 0;
        let dir = store.dir_path(&page);

        if !has_file && !has_children {
            report.missing_files.push(path.clone());
        }
        if has_children && !dir.is_dir() {
            report.missing_dirs.push(path.clone());
        }
        if !has_children && dir.is_dir() {
            report.orphan_dirs.push(path.clone());
        }
        if has_file {
            with_content.insert(path);
        }
    }

    let indexed: BTreeSet<String> = index.indexed_paths()?.into_iter().collect();
    report.stale_index = indexed.difference(&with_content).cloned().collect();
    report.missing_index = with_content.difference(&indexed).cloned().collect();

    if repair {
        for path in &report.stale_index {
            match index.delete_page(path) {
                Ok(()) => report.repaired_index += 1,
                Err(err) => log::warn!("could not remove stale entry {path}: {err}"),
            }
        }
        for path in &report.missing_index {
            let page = PagePath::parse(path);
            match store.read_page(&page) {
                Ok(content) => match index.add_page(path, &content) {
                    Ok(()) => report.repaired_index += 1,
                    Err(err) => log::warn!("could not re-index {path}: {err}"),
                },
                Err(err) => log::warn!("could not read {path} for re-indexing: {err}"),
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn setup() -> (tempfile::TempDir, PageStore, MemoryIndex, PageTree) {
        let temp = tempfile::tempdir().unwrap();
        let store = PageStore::new(temp.path(), ".md");
        (temp, store, MemoryIndex::new(), PageTree::new())
    }

    #[test]
    fn clean_notebook_reports_clean() {
        let (_temp, store, index, mut tree) = setup();
        let a = tree.new_page(&store, &index, None, "a").unwrap();
        tree.new_page(&store, &index, Some(a), "b").unwrap();

        let report = run(&tree, &store, &index, false).unwrap();
        assert!(report.is_clean(), "unexpected drift: {report:?}");
        assert_eq!(report.pages_checked, 2);
    }

    #[test]
    fn detects_and_repairs_index_drift() {
        let (_temp, store, index, mut tree) = setup();
        tree.new_page(&store, &index, None, "a").unwrap();
        tree.new_page(&store, &index, None, "b").unwrap();

        // Simulate drift from failed index writes.
        index.delete_page("a").unwrap();
        index.add_page("ghost", "no such page").unwrap();

        let report = run(&tree, &store, &index, false).unwrap();
        assert_eq!(report.missing_index, vec!["a"]);
        assert_eq!(report.stale_index, vec!["ghost"]);

        let report = run(&tree, &store, &index, true).unwrap();
        assert_eq!(report.repaired_index, 2);
        assert!(index.contains("a"));
        assert!(!index.contains("ghost"));

        let report = run(&tree, &store, &index, false).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn reports_missing_content_file() {
        let (temp, store, index, mut tree) = setup();
        tree.new_page(&store, &index, None, "a").unwrap();
        std::fs::remove_file(temp.path().join("a.md")).unwrap();

        let report = run(&tree, &store, &index, false).unwrap();
        assert_eq!(report.missing_files, vec!["a"]);
        // The page no longer has content, so its entry is stale too.
        assert_eq!(report.stale_index, vec!["a"]);
    }

    #[test]
    fn reports_directory_drift() {
        let (temp, store, index, mut tree) = setup();
        tree.new_page(&store, &index, None, "a").unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();

        let report = run(&tree, &store, &index, false).unwrap();
        assert_eq!(report.orphan_dirs, vec!["a"]);
    }
}
