//! # Quire Architecture
//!
//! Quire is a **UI-agnostic notebook engine**. A notebook is a directory
//! of markdown pages; the page hierarchy exists in three representations
//! that must stay consistent:
//!
//! ```text
//! tree node  ←→  logical path  ←→  file / directory on disk
//!                     │
//!                     └──→  search index entry (pages with content)
//! ```
//!
//! The hard part is not any single representation but the protocol that
//! keeps all of them aligned through structural mutations. Every
//! operation follows the same sequence: conflict checks, filesystem
//! mutation, tree update, index update. Conflicts abort before anything
//! is touched; index failures are logged and never block the
//! filesystem (the index is derived data and `doctor` can rebuild it).
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (args.rs, wired by main.rs)                            │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Facade (notebook.rs)                                       │
//! │  - Bundles config + store + tree + index                    │
//! │  - Normalizes path strings into node handles                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (tree.rs, store.rs, path.rs, index/)                  │
//! │  - Structural operations and their consistency protocol     │
//! │  - No terminal I/O, no prompting                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`notebook`]: the facade, entry point for all operations
//! - [`tree`]: the in-memory hierarchy and the four structural
//!   operations (create, rename, move, delete)
//! - [`store`]: physical file/directory mutations with conflict checks
//! - [`path`]: pure conversions between tree position, logical path
//!   and physical location
//! - [`index`]: search index adapter (tantivy) plus an in-memory fake
//! - [`doctor`]: tree/filesystem/index reconciliation
//! - [`html`]: generated HTML mirror
//! - [`config`]: per-notebook configuration
//! - [`error`]: error types
//! - `args`: clap argument definitions for the binary (not part of the
//!   lib API)

pub mod config;
pub mod doctor;
pub mod error;
pub mod html;
pub mod index;
pub mod notebook;
pub mod path;
pub mod store;
pub mod tree;

pub use config::NotebookConfig;
pub use doctor::DoctorReport;
pub use error::{QuireError, Result};
pub use index::{SearchHit, SearchIndex};
pub use notebook::Notebook;
pub use path::PagePath;
pub use store::PageStore;
pub use tree::{NodeId, PageTree};
