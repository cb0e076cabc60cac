//! Generated HTML mirror of the notebook.
//!
//! Every page with content can be rendered to
//! `<html_dir>/<logicalPath>.html`; the mirror directory layout follows
//! the logical hierarchy.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html::push_html, Parser};

use crate::error::Result;
use crate::path::PagePath;
use crate::store::PageStore;
use crate::tree::PageTree;

/// Render one page's markdown to its mirror file. Returns the path
/// written.
pub fn render_page(store: &PageStore, html_root: &Path, page: &PagePath) -> Result<PathBuf> {
    let markdown = store.read_page(page)?;
    let mut body = String::new();
    push_html(&mut body, Parser::new(&markdown));

    let out = html_root.join(page.rel_html());
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        page.name(),
        body
    );
    fs::write(&out, document)?;
    Ok(out)
}

/// Render every page that has a content file. Returns how many pages
/// were rendered.
pub fn render_all(tree: &PageTree, store: &PageStore, html_root: &Path) -> Result<usize> {
    let mut rendered = 0;
    for id in tree.all_nodes() {
        let page = tree.page_path(id);
        if store.find_content_file(&page).is_some() {
            render_page(store, html_root, &page)?;
            rendered += 1;
        }
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    #[test]
    fn renders_page_into_mirror_hierarchy() {
        let temp = tempfile::tempdir().unwrap();
        let store = PageStore::new(temp.path().join("notes"), ".md");
        let index = MemoryIndex::new();
        let mut tree = PageTree::new();

        let home = tree.new_page(&store, &index, None, "Home").unwrap();
        tree.new_page(&store, &index, Some(home), "Sub").unwrap();

        let html_root = temp.path().join("html");
        let count = render_all(&tree, &store, &html_root).unwrap();
        assert_eq!(count, 2);

        let rendered = fs::read_to_string(html_root.join("Home/Sub.html")).unwrap();
        assert!(rendered.contains("<h1>Sub</h1>"));
        assert!(rendered.contains("<title>Sub</title>"));
    }

    #[test]
    fn rendering_missing_page_fails() {
        let temp = tempfile::tempdir().unwrap();
        let store = PageStore::new(temp.path(), ".md");
        let err = render_page(&store, &temp.path().join("html"), &PagePath::parse("nope"));
        assert!(err.is_err());
    }
}
