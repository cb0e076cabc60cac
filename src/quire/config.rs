use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::path::RECOGNIZED_EXTS;

const CONFIG_FILENAME: &str = "notebook.json";
const DEFAULT_FILE_EXT: &str = ".md";

/// Per-notebook configuration, stored as `notebook.json` in the
/// notebook root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Extension for new page files (e.g. ".md")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Search index directory, relative to the notebook root
    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// Flat attachment root, relative to the notebook root
    #[serde(default = "default_attachment_dir")]
    pub attachment_dir: String,

    /// Generated HTML mirror root, relative to the notebook root
    #[serde(default = "default_html_dir")]
    pub html_dir: String,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_index_dir() -> String {
    ".indexdir".to_string()
}

fn default_attachment_dir() -> String {
    "attachments".to_string()
}

fn default_html_dir() -> String {
    "html".to_string()
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            file_ext: default_file_ext(),
            index_dir: default_index_dir(),
            attachment_dir: default_attachment_dir(),
            html_dir: default_html_dir(),
        }
    }
}

impl NotebookConfig {
    /// Load config from the notebook root, or return defaults if not found.
    ///
    /// An unrecognized `file_ext` is kept as configured (it stays the
    /// primary extension for new pages) but logs a warning.
    pub fn load<P: AsRef<Path>>(note_path: P) -> Result<Self> {
        let config_path = note_path.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NotebookConfig = serde_json::from_str(&content)?;
        if !RECOGNIZED_EXTS.contains(&config.file_ext.as_str()) {
            log::warn!(
                "unrecognized file extension {:?} configured in {}",
                config.file_ext,
                config_path.display()
            );
        }
        Ok(config)
    }

    /// Save config to the notebook root.
    pub fn save<P: AsRef<Path>>(&self, note_path: P) -> Result<()> {
        let note_path = note_path.as_ref();
        if !note_path.exists() {
            fs::create_dir_all(note_path)?;
        }

        let config_path = note_path.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// Set the file extension (normalizes to start with a dot).
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }
}
