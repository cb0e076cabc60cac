//! Pure conversions between the three representations of a page:
//! tree position, logical path, and physical file/directory path.
//!
//! Nothing in this module touches the filesystem. Probing which of the
//! candidate content files actually exists is the store's job.

use std::fmt;
use std::path::PathBuf;

use md5::{Digest, Md5};

/// Content file extensions recognized as pages, in fallback order.
pub const RECOGNIZED_EXTS: [&str; 3] = [".md", ".mkd", ".markdown"];

/// A logical page path: an ordered sequence of name segments, unique
/// within a notebook, printable as `foo/bar`. The empty path is the
/// notebook root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PagePath(Vec<String>);

impl PagePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a slash-delimited path, ignoring leading/trailing and
    /// repeated separators. `"/foo/bar/"` and `"foo/bar"` are the same
    /// page.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The display name of the page (last segment). Empty for the root.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    pub fn parent(&self) -> PagePath {
        match self.0.split_last() {
            Some((_, init)) => PagePath(init.to_vec()),
            None => PagePath::root(),
        }
    }

    pub fn child(&self, name: &str) -> PagePath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        PagePath(segments)
    }

    /// Relative directory path holding this page's children.
    pub fn rel_dir(&self) -> PathBuf {
        self.0.iter().collect()
    }

    /// Relative content file path for the given extension (leading dot
    /// included, e.g. `.md`).
    pub fn rel_file(&self, ext: &str) -> PathBuf {
        self.parent().rel_dir().join(format!("{}{}", self.name(), ext))
    }

    /// Relative path of the generated HTML mirror file.
    pub fn rel_html(&self) -> PathBuf {
        self.parent().rel_dir().join(format!("{}.html", self.name()))
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Extensions to probe when resolving a page's content file: the
/// configured default first, then the remaining recognized ones in
/// fixed order. An unrecognized default is still probed first.
pub fn ext_search_order(default_ext: &str) -> Vec<String> {
    let mut order = vec![default_ext.to_string()];
    for ext in RECOGNIZED_EXTS {
        if ext != default_ext {
            order.push(ext.to_string());
        }
    }
    order
}

/// Attachment directory name for a page: `<name>_<hex-md5(path)>`.
/// Hashing the full logical path keeps the flat attachment root free of
/// collisions between same-named pages while the name stays readable.
pub fn attachment_dir_name(page: &PagePath) -> String {
    let digest = Md5::digest(page.to_string().as_bytes());
    format!("{}_{}", page.name(), hex::encode(digest))
}
