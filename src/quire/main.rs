use clap::Parser;
use colored::*;

use quire::{NodeId, Notebook, PageTree, Result};

mod args;
use args::{Cli, Commands};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        let notebook = Notebook::init(&cli.notebook)?;
        println!("Initialized notebook at {}", notebook.note_path().display());
        return Ok(());
    }

    let mut notebook = Notebook::open(&cli.notebook)?;
    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::List => print_tree(notebook.tree()),
        Commands::New { path } => {
            let page = notebook.create(&path)?;
            println!("{} {}", "Created".green(), page);
        }
        Commands::Rename { path, new_name } => {
            let page = notebook.rename(&path, &new_name)?;
            println!("{} {}", "Renamed to".green(), page);
        }
        Commands::Move { path, to } => {
            let page = notebook.move_to(&path, to.as_deref())?;
            println!("{} {}", "Moved to".green(), page);
        }
        Commands::Delete { path } => {
            notebook.delete(&path)?;
            println!("{} {}", "Deleted".green(), path);
        }
        Commands::Cat { path } => {
            print!("{}", notebook.read(&path)?);
        }
        Commands::Search { query, limit } => {
            let hits = notebook.search(&query, limit)?;
            if hits.is_empty() {
                println!("No matches.");
            }
            for hit in hits {
                println!("{:>6.2}  {}", hit.score, hit.path.bold());
            }
        }
        Commands::Render { path } => {
            let count = notebook.render_html(path.as_deref())?;
            println!("Rendered {} page(s)", count);
        }
        Commands::Doctor { repair } => print_doctor(&notebook, repair)?,
    }
    Ok(())
}

fn print_tree(tree: &PageTree) {
    if tree.is_empty() {
        println!("(empty notebook)");
        return;
    }
    for root in tree.roots() {
        print_node(tree, *root, 0);
    }
}

fn print_node(tree: &PageTree, id: NodeId, depth: usize) {
    let marker = if tree.child_count(id) > 0 { "+" } else { "-" };
    println!("{}{} {}", "  ".repeat(depth), marker, tree.name(id));
    for child in tree.children(id) {
        print_node(tree, *child, depth + 1);
    }
}

fn print_doctor(notebook: &Notebook, repair: bool) -> Result<()> {
    let report = notebook.doctor(repair)?;
    if report.is_clean() {
        println!(
            "{} {} pages checked, no drift",
            "ok:".green().bold(),
            report.pages_checked
        );
        return Ok(());
    }

    let section = |label: &str, paths: &[String]| {
        if !paths.is_empty() {
            println!("{}", label.yellow());
            for p in paths {
                println!("  {}", p);
            }
        }
    };
    section("pages missing content files:", &report.missing_files);
    section("pages missing child directories:", &report.missing_dirs);
    section("orphaned child directories:", &report.orphan_dirs);
    section("stale index entries:", &report.stale_index);
    section("pages missing from the index:", &report.missing_index);

    if repair {
        println!(
            "{} {} index entries repaired",
            "fixed:".green().bold(),
            report.repaired_index
        );
    } else {
        println!("run with --repair to fix the index side");
    }
    Ok(())
}
