use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn quire(notebook: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.arg("--notebook").arg(notebook);
    cmd
}

#[test]
fn init_create_and_list() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root)
        .args(["new", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Home"));
    quire(&root).args(["new", "Home/Ideas"]).assert().success();

    quire(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("+ Home"))
        .stdout(predicate::str::contains("- Ideas"));
}

#[test]
fn cat_shows_the_page_template() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root).args(["new", "Journal"]).assert().success();

    quire(&root)
        .args(["cat", "Journal"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Journal\nCreated "));
}

#[test]
fn conflicting_create_fails_with_error() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root).args(["new", "Home"]).assert().success();

    quire(&root)
        .args(["new", "Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn move_then_search_reports_new_path() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root).args(["new", "A"]).assert().success();
    quire(&root).args(["new", "B"]).assert().success();
    quire(&root)
        .args(["mv", "A", "--to", "B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B/A"));

    // The index follows the move; hits carry the new logical path.
    quire(&root)
        .args(["search", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B/A"));
}

#[test]
fn delete_then_doctor_is_clean() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root).args(["new", "Home"]).assert().success();
    quire(&root).args(["new", "Home/Sub"]).assert().success();
    quire(&root).args(["rm", "Home"]).assert().success();

    quire(&root)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("no drift"));
}

#[test]
fn missing_page_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes");

    quire(&root).arg("init").assert().success();
    quire(&root)
        .args(["cat", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
