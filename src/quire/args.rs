use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Hierarchical markdown notebook with full-text search", long_about = None)]
pub struct Cli {
    /// Notebook root directory
    #[arg(short, long, default_value = ".", global = true)]
    pub notebook: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a notebook in the target directory
    Init,

    /// Print the page tree
    #[command(alias = "ls")]
    List,

    /// Create a new page at the given logical path
    #[command(alias = "n")]
    New {
        /// Logical path of the page, e.g. "Projects/Quire"
        path: String,
    },

    /// Rename a page; its subtree moves with it
    Rename {
        path: String,
        new_name: String,
    },

    /// Move a page under another page, or to the top level
    #[command(alias = "mv")]
    Move {
        path: String,

        /// Target page; omit to move to the top level
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete a page and its entire subtree
    #[command(alias = "rm")]
    Delete {
        path: String,
    },

    /// Print a page's content
    Cat {
        path: String,
    },

    /// Full-text search across page content
    #[command(alias = "s")]
    Search {
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Render pages into the HTML mirror
    Render {
        /// Single page to render; omit to render everything
        path: Option<String>,
    },

    /// Check tree / filesystem / index consistency
    Doctor {
        /// Repair the index side of any drift found
        #[arg(long)]
        repair: bool,
    },
}
