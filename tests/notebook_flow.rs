//! End-to-end flows through the notebook facade with a real tantivy
//! index on disk.

use quire::{Notebook, PagePath};

fn fresh_notebook(temp: &tempfile::TempDir) -> Notebook {
    Notebook::init(temp.path().join("notes")).unwrap()
}

#[test]
fn create_first_page_in_empty_notebook() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);

    notebook.create("Home").unwrap();

    let content = notebook.read("Home").unwrap();
    let expected = format!(
        "# Home\nCreated {}\n\n",
        chrono::Local::now().format("%Y-%m-%d")
    );
    assert_eq!(content, expected);
    assert_eq!(notebook.tree().roots().len(), 1);

    let hits = notebook.search("home", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "Home");

    let report = notebook.doctor(false).unwrap();
    assert!(report.is_clean(), "unexpected drift: {report:?}");
}

#[test]
fn delete_page_with_subpage_removes_everything() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);
    let root = notebook.note_path().to_path_buf();

    notebook.create("Home").unwrap();
    notebook.create("Home/Sub").unwrap();
    notebook.delete("Home").unwrap();

    assert!(!root.join("Home.md").exists());
    assert!(!root.join("Home").exists());
    assert!(notebook.tree().is_empty());
    assert!(notebook.search("home", 10).unwrap().is_empty());
    assert!(notebook.search("sub", 10).unwrap().is_empty());
    assert!(notebook.doctor(false).unwrap().is_clean());
}

#[test]
fn move_page_under_sibling() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);
    let root = notebook.note_path().to_path_buf();

    notebook.create("A").unwrap();
    notebook.create("B").unwrap();
    let moved = notebook.move_to("A", Some("B")).unwrap();
    assert_eq!(moved, PagePath::parse("B/A"));

    assert!(!root.join("A.md").exists());
    assert!(root.join("B/A.md").is_file());
    assert!(notebook.doctor(false).unwrap().is_clean());

    // The layout survives a reopen.
    drop(notebook);
    let reopened = Notebook::open(&root).unwrap();
    assert!(reopened.tree().find(&PagePath::parse("B/A")).is_some());
    assert!(reopened.tree().find(&PagePath::parse("A")).is_none());
}

#[test]
fn rename_page_carries_children_and_reindexes() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);
    let root = notebook.note_path().to_path_buf();

    notebook.create("Foo").unwrap();
    notebook.create("Foo/Baz").unwrap();
    let renamed = notebook.rename("Foo", "Bar").unwrap();
    assert_eq!(renamed, PagePath::parse("Bar"));

    assert!(root.join("Bar.md").is_file());
    assert!(root.join("Bar/Baz.md").is_file());
    assert!(!root.join("Foo.md").exists());
    assert!(!root.join("Foo").exists());

    // The child kept its name but moved to a new logical path, and the
    // index followed.
    let hits = notebook.search("baz", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "Bar/Baz");
    assert!(notebook.doctor(false).unwrap().is_clean());
}

#[test]
fn conflicting_create_leaves_no_trace() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);
    let root = notebook.note_path().to_path_buf();

    notebook.create("Home").unwrap();
    assert!(notebook.create("Home").is_err());

    assert!(root.join("Home.md").is_file());
    assert_eq!(notebook.tree().roots().len(), 1);
    assert_eq!(notebook.search("home", 10).unwrap().len(), 1);
}

#[test]
fn render_html_mirrors_the_hierarchy() {
    let temp = tempfile::tempdir().unwrap();
    let mut notebook = fresh_notebook(&temp);
    let root = notebook.note_path().to_path_buf();

    notebook.create("Guide").unwrap();
    notebook.create("Guide/Install").unwrap();
    let count = notebook.render_html(None).unwrap();
    assert_eq!(count, 2);

    let page = std::fs::read_to_string(root.join("html/Guide/Install.html")).unwrap();
    assert!(page.contains("<h1>Install</h1>"));
}
