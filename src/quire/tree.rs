//! The in-memory page hierarchy and the structural operations.
//!
//! Every logical page exists in three representations: a node in this
//! tree, a slash-delimited logical path, and a file (plus optionally a
//! child directory) on disk. The operations here ([`PageTree::new_page`],
//! [`PageTree::rename_page`], [`PageTree::move_page`],
//! [`PageTree::delete_page`]) are the only code allowed to change the
//! hierarchy, and each one walks the same protocol: conflict checks
//! first, then the filesystem mutation, then the tree update, then the
//! search index.
//!
//! Index failures never abort an operation (the index is rebuildable;
//! the filesystem is the source of truth), but a filesystem conflict
//! aborts before anything is touched.
//!
//! Nodes live in an arena addressed by [`NodeId`]: each node stores its
//! parent id and an ordered child list, and a map from full logical
//! path to node id backs O(1) lookup. There is no rollback on partial
//! failure; `doctor` reconciles drift after the fact.

use std::collections::HashMap;

use chrono::Local;

use crate::error::{QuireError, Result};
use crate::index::SearchIndex;
use crate::path::PagePath;
use crate::store::PageStore;

/// Stable handle to a node in a [`PageTree`] arena. Ids are reused
/// after deletion; holding one across a delete is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct PageNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

#[derive(Debug, Default)]
pub struct PageTree {
    nodes: Vec<Option<PageNode>>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
    current: Option<NodeId>,
}

impl PageTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> &PageNode {
        self.nodes[id.0].as_ref().expect("stale NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut PageNode {
        self.nodes[id.0].as_mut().expect("stale NodeId")
    }

    fn alloc(&mut self, node: PageNode) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = None;
        self.free.push(id.0);
    }

    // --- structural queries ---

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn set_current(&mut self, id: Option<NodeId>) {
        self.current = id;
    }

    /// Logical path of the currently selected page, if any.
    pub fn current_page(&self) -> Option<PagePath> {
        self.current.map(|id| self.page_path(id))
    }

    /// Reconstruct a node's logical path by walking its parent chain.
    pub fn page_path(&self, id: NodeId) -> PagePath {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            let node = self.node(n);
            segments.push(node.name.clone());
            cursor = node.parent;
        }
        segments.reverse();
        PagePath::from_segments(segments)
    }

    /// Look a page up by logical path. The root path has no node.
    pub fn find(&self, page: &PagePath) -> Option<NodeId> {
        if page.is_root() {
            return None;
        }
        self.by_path.get(&page.to_string()).copied()
    }

    pub fn require(&self, page: &PagePath) -> Result<NodeId> {
        self.find(page)
            .ok_or_else(|| QuireError::PageNotFound(page.to_string()))
    }

    /// Every live node, preorder, roots first.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    /// `id` and all its descendants, preorder.
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_subtree(id, &mut out);
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for child in &self.node(id).children {
            self.collect_subtree(*child, out);
        }
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.node(node).parent;
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.node(p).parent;
        }
        false
    }

    // --- expansion state ---

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).expanded
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.node_mut(id).expanded = expanded;
    }

    pub fn expand_subtree(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            self.node_mut(n).expanded = true;
        }
    }

    pub fn collapse_subtree(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            self.node_mut(n).expanded = false;
        }
    }

    pub fn expand_all(&mut self) {
        for root in self.roots.clone() {
            self.expand_subtree(root);
        }
    }

    pub fn collapse_all(&mut self) {
        for root in self.roots.clone() {
            self.collapse_subtree(root);
        }
    }

    // --- tree-only mutation (used when loading a notebook from disk) ---

    /// Insert a node without touching the filesystem or the index.
    /// Siblings are kept sorted and the path map updated.
    pub fn insert(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let id = self.alloc(PageNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            expanded: false,
        });
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        self.sort_siblings(parent);
        let path = self.page_path(id).to_string();
        self.by_path.insert(path, id);
        id
    }

    fn detach(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(p) => self.node_mut(p).children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn sort_siblings(&mut self, parent: Option<NodeId>) {
        let mut ids = match parent {
            Some(p) => self.node(p).children.clone(),
            None => self.roots.clone(),
        };
        ids.sort_by(|a, b| self.node(*a).name.cmp(&self.node(*b).name));
        match parent {
            Some(p) => self.node_mut(p).children = ids,
            None => self.roots = ids,
        }
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() || name.contains('/') || name.starts_with('.') {
            return Err(QuireError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Sibling-name and on-disk conflict check shared by create, rename
    /// and move. Runs before any mutation.
    fn check_conflict(&self, store: &PageStore, page: &PagePath) -> Result<()> {
        if self.by_path.contains_key(&page.to_string()) || store.page_exists(page) {
            return Err(QuireError::PageAlreadyExists(page.to_string()));
        }
        Ok(())
    }

    // --- structural operations ---

    /// Create a new page under `parent` (`None` = top level): write the
    /// templated content file, insert the node, select it, expand the
    /// parent, and index the content.
    pub fn new_page<I: SearchIndex>(
        &mut self,
        store: &PageStore,
        index: &I,
        parent: Option<NodeId>,
        name: &str,
    ) -> Result<NodeId> {
        Self::validate_name(name)?;
        let parent_page = match parent {
            Some(p) => self.page_path(p),
            None => PagePath::root(),
        };
        let page = parent_page.child(name);
        self.check_conflict(store, &page)?;

        let content = format!("# {}\nCreated {}\n\n", name, Local::now().format("%Y-%m-%d"));
        store.create_file(&page, &content)?;

        let id = self.insert(parent, name);
        self.current = Some(id);
        if let Some(p) = parent {
            self.node_mut(p).expanded = true;
        }

        if let Err(err) = index.add_page(&page.to_string(), &content) {
            log::warn!("index update failed for {page}: {err}");
        }
        Ok(id)
    }

    /// Rename a page in place. The content file and (if the page has
    /// children) the child directory are renamed, then the node and the
    /// paths of its whole subtree, then the index entries for every
    /// affected page.
    pub fn rename_page<I: SearchIndex>(
        &mut self,
        store: &PageStore,
        index: &I,
        id: NodeId,
        new_name: &str,
    ) -> Result<()> {
        Self::validate_name(new_name)?;
        if self.node(id).name == new_name {
            return Ok(());
        }

        let old_page = self.page_path(id);
        let new_page = old_page.parent().child(new_name);
        self.check_conflict(store, &new_page)?;

        let affected = self.subtree(id);
        let old_paths: Vec<PagePath> = affected.iter().map(|n| self.page_path(*n)).collect();

        // A page with children but no content file is legal; only
        // rename what exists.
        if let Some(old_file) = store.find_content_file(&old_page) {
            store.rename_file(&old_file, &store.content_file(&new_page))?;
        }
        if self.child_count(id) > 0 {
            store.rename_dir(&store.dir_path(&old_page), &store.dir_path(&new_page))?;
        }

        for p in &old_paths {
            self.by_path.remove(&p.to_string());
        }
        self.node_mut(id).name = new_name.to_string();
        let parent = self.node(id).parent;
        self.sort_siblings(parent);
        for n in &affected {
            let path = self.page_path(*n).to_string();
            self.by_path.insert(path, *n);
        }

        self.reindex_moved(store, index, &affected, &old_paths);
        Ok(())
    }

    /// Re-parent a page under `target` (`None` = top level). Rejects
    /// moves onto itself or into its own subtree. If the old parent is
    /// left childless its directory is removed.
    pub fn move_page<I: SearchIndex>(
        &mut self,
        store: &PageStore,
        index: &I,
        id: NodeId,
        target: Option<NodeId>,
    ) -> Result<()> {
        if target == Some(id) {
            return Err(QuireError::InvalidMove(format!(
                "cannot move '{}' onto itself",
                self.page_path(id)
            )));
        }
        if let Some(t) = target {
            if self.is_descendant(t, id) {
                return Err(QuireError::InvalidMove(format!(
                    "cannot move '{}' into its own subtree",
                    self.page_path(id)
                )));
            }
        }
        if self.node(id).parent == target {
            return Ok(());
        }

        let old_page = self.page_path(id);
        let target_page = match target {
            Some(t) => self.page_path(t),
            None => PagePath::root(),
        };
        let new_page = target_page.child(&self.node(id).name);
        self.check_conflict(store, &new_page)?;

        let affected = self.subtree(id);
        let old_paths: Vec<PagePath> = affected.iter().map(|n| self.page_path(*n)).collect();
        let old_parent = self.node(id).parent;
        let old_parent_loses_last_child =
            old_parent.map(|p| self.child_count(p) == 1).unwrap_or(false);
        let old_parent_dir = old_parent.map(|p| store.dir_path(&self.page_path(p)));

        if !target_page.is_root() {
            store.ensure_dir(&target_page)?;
        }
        if let Some(old_file) = store.find_content_file(&old_page) {
            store.rename_file(&old_file, &store.content_file(&new_page))?;
        }
        if self.child_count(id) > 0 {
            store.rename_dir(&store.dir_path(&old_page), &store.dir_path(&new_page))?;
        }
        if old_parent_loses_last_child {
            if let Some(dir) = &old_parent_dir {
                store.remove_dir(dir);
            }
        }

        for p in &old_paths {
            self.by_path.remove(&p.to_string());
        }
        self.detach(id);
        self.node_mut(id).parent = target;
        match target {
            Some(t) => {
                self.node_mut(t).children.push(id);
                self.node_mut(t).expanded = true;
            }
            None => self.roots.push(id),
        }
        self.sort_siblings(target);
        for n in &affected {
            let path = self.page_path(*n).to_string();
            self.by_path.insert(path, *n);
        }

        self.reindex_moved(store, index, &affected, &old_paths);
        Ok(())
    }

    /// Delete a page and its entire subtree, children first. Each page
    /// gets its own index delete (exact path); directories are removed
    /// as they empty out.
    pub fn delete_page<I: SearchIndex>(
        &mut self,
        store: &PageStore,
        index: &I,
        id: NodeId,
    ) -> Result<()> {
        let children: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        for child in children {
            self.delete_page(store, index, child)?;
        }

        let page = self.page_path(id);
        if let Err(err) = index.delete_page(&page.to_string()) {
            log::warn!("index delete failed for {page}: {err}");
        }
        if let Some(file) = store.find_content_file(&page) {
            store.remove_file(&file)?;
        }

        let parent = self.node(id).parent;
        self.detach(id);
        if let Some(p) = parent {
            if self.child_count(p) == 0 {
                store.remove_dir(&store.dir_path(&self.page_path(p)));
            }
        }
        store.remove_dir(&store.dir_path(&page));

        self.by_path.remove(&page.to_string());
        if self.current == Some(id) {
            self.current = None;
        }
        self.release(id);
        Ok(())
    }

    /// After a rename/move: drop the old-path index entries and re-add
    /// every affected page under its new path. Failures are logged; the
    /// filesystem mutation has already happened and stands.
    fn reindex_moved<I: SearchIndex>(
        &self,
        store: &PageStore,
        index: &I,
        nodes: &[NodeId],
        old_paths: &[PagePath],
    ) {
        for (node, old_path) in nodes.iter().zip(old_paths) {
            let new_path = self.page_path(*node);
            if let Err(err) = index.delete_page(&old_path.to_string()) {
                log::warn!("index delete failed for {old_path}: {err}");
            }
            match store.read_page(&new_path) {
                Ok(content) => {
                    if let Err(err) = index.add_page(&new_path.to_string(), &content) {
                        log::warn!("index update failed for {new_path}: {err}");
                    }
                }
                // A directory-only page has nothing to index.
                Err(QuireError::PageNotFound(_)) => {}
                Err(err) => log::warn!("could not re-read {new_path} for indexing: {err}"),
            }
        }
    }
}
