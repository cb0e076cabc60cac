//! The notebook facade: one struct bundling config, store, tree and
//! index, exposed to clients as string-path entry points.
//!
//! This layer normalizes inputs (slash-delimited path strings become
//! [`PagePath`]s and node ids) and dispatches to the tree operations.
//! It performs no terminal I/O; the CLI decides how results are shown.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::NotebookConfig;
use crate::doctor::{self, DoctorReport};
use crate::error::{QuireError, Result};
use crate::html;
use crate::index::{SearchHit, SearchIndex, TantivyIndex};
use crate::path::{attachment_dir_name, ext_search_order, PagePath};
use crate::store::PageStore;
use crate::tree::{NodeId, PageTree};

#[derive(Debug)]
pub struct Notebook {
    note_path: PathBuf,
    config: NotebookConfig,
    store: PageStore,
    index: TantivyIndex,
    tree: PageTree,
}

impl Notebook {
    /// Create a notebook at `path`: the directory, its config file and
    /// an empty search index.
    pub fn init<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let note_path = path.into();
        fs::create_dir_all(&note_path)?;

        let config = NotebookConfig::default();
        config.save(&note_path)?;
        let index = TantivyIndex::create(note_path.join(&config.index_dir))?;
        let store = PageStore::new(&note_path, &config.file_ext);

        Ok(Self {
            note_path,
            config,
            store,
            index,
            tree: PageTree::new(),
        })
    }

    /// Open an existing notebook: load the config, attach the index
    /// (created if missing) and rebuild the page tree from the
    /// directory layout.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let note_path = path.into();
        if !note_path.is_dir() {
            return Err(QuireError::Notebook(format!(
                "not a notebook directory: {}",
                note_path.display()
            )));
        }

        let config = NotebookConfig::load(&note_path)?;
        let index = TantivyIndex::create(note_path.join(&config.index_dir))?;
        let store = PageStore::new(&note_path, &config.file_ext);

        let mut notebook = Self {
            note_path,
            config,
            store,
            index,
            tree: PageTree::new(),
        };
        notebook.scan()?;
        Ok(notebook)
    }

    /// Rebuild the in-memory tree from the directory layout. A page
    /// node exists for every recognized content file and every
    /// directory; `foo.md` plus `foo/` merge into one node.
    fn scan(&mut self) -> Result<()> {
        self.tree = PageTree::new();
        self.scan_dir(&self.note_path.clone(), None, true)?;
        Ok(())
    }

    fn scan_dir(&mut self, dir: &Path, parent: Option<NodeId>, top: bool) -> Result<()> {
        let exts = ext_search_order(&self.config.file_ext);
        // name -> has child dir; BTreeMap for stable order
        let mut pages: BTreeMap<String, bool> = BTreeMap::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            if entry.path().is_dir() {
                if top
                    && (name == self.config.index_dir
                        || name == self.config.attachment_dir
                        || name == self.config.html_dir)
                {
                    continue;
                }
                *pages.entry(name).or_insert(false) = true;
            } else if let Some(stem) = exts
                .iter()
                .find(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
                .map(|ext| name[..name.len() - ext.len()].to_string())
            {
                pages.entry(stem).or_insert(false);
            }
        }

        for (name, has_dir) in pages {
            let id = self.tree.insert(parent, &name);
            if has_dir {
                self.scan_dir(&dir.join(&name), Some(id), false)?;
            }
        }
        Ok(())
    }

    // --- accessors ---

    pub fn note_path(&self) -> &Path {
        &self.note_path
    }

    pub fn config(&self) -> &NotebookConfig {
        &self.config
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    // --- operations ---

    /// Create the page at `path`. Its parent must already exist;
    /// top-level pages have none.
    pub fn create(&mut self, path: &str) -> Result<PagePath> {
        let page = PagePath::parse(path);
        if page.is_root() {
            return Err(QuireError::InvalidName(path.to_string()));
        }
        let parent = page.parent();
        let parent_id = if parent.is_root() {
            None
        } else {
            Some(self.tree.require(&parent)?)
        };
        self.tree
            .new_page(&self.store, &self.index, parent_id, page.name())?;
        Ok(page)
    }

    /// Rename the page at `path`; returns its new logical path.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<PagePath> {
        let id = self.tree.require(&PagePath::parse(path))?;
        self.tree.rename_page(&self.store, &self.index, id, new_name)?;
        Ok(self.tree.page_path(id))
    }

    /// Move the page at `path` under `target`, or to the top level.
    pub fn move_to(&mut self, path: &str, target: Option<&str>) -> Result<PagePath> {
        let id = self.tree.require(&PagePath::parse(path))?;
        let target_id = match target {
            Some(t) => Some(self.tree.require(&PagePath::parse(t))?),
            None => None,
        };
        self.tree.move_page(&self.store, &self.index, id, target_id)?;
        Ok(self.tree.page_path(id))
    }

    /// Delete the page at `path` and its entire subtree.
    pub fn delete(&mut self, path: &str) -> Result<()> {
        let id = self.tree.require(&PagePath::parse(path))?;
        self.tree.delete_page(&self.store, &self.index, id)
    }

    pub fn read(&self, path: &str) -> Result<String> {
        let page = PagePath::parse(path);
        self.tree.require(&page)?;
        self.store.read_page(&page)
    }

    pub fn page_exists(&self, path: &str) -> bool {
        self.store.page_exists(&PagePath::parse(path))
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.index.search(query, limit)
    }

    pub fn doctor(&self, repair: bool) -> Result<DoctorReport> {
        doctor::run(&self.tree, &self.store, &self.index, repair)
    }

    /// Render one page (or, with `None`, every page with content) into
    /// the HTML mirror. Returns how many pages were rendered.
    pub fn render_html(&self, path: Option<&str>) -> Result<usize> {
        let html_root = self.note_path.join(&self.config.html_dir);
        match path {
            Some(p) => {
                let page = PagePath::parse(p);
                self.tree.require(&page)?;
                html::render_page(&self.store, &html_root, &page)?;
                Ok(1)
            }
            None => html::render_all(&self.tree, &self.store, &html_root),
        }
    }

    /// Flat, collision-free attachment directory for the page at
    /// `path`.
    pub fn attachment_dir(&self, path: &str) -> Result<PathBuf> {
        let page = PagePath::parse(path);
        self.tree.require(&page)?;
        Ok(self
            .note_path
            .join(&self.config.attachment_dir)
            .join(attachment_dir_name(&page)))
    }
}
