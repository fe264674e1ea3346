use serde::Serialize;

/// One path segment of a repository tree.
///
/// `children` is `Some` exactly when `is_dir` is true; leaves carry `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDirectory")]
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    #[must_use]
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: false,
            children: None,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>, path: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: true,
            children: Some(children),
        }
    }

    /// Children as a slice; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of leaf files in this subtree. A leaf counts itself.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        if self.is_dir {
            self.children().iter().map(Self::leaf_count).sum()
        } else {
            1
        }
    }
}

mod flags;
mod fs;
mod job;
mod selection;
mod session;
mod source;
mod text;
mod tree;

pub use flags::*;
pub use fs::*;
pub use job::*;
pub use selection::*;
pub use session::*;
pub use source::*;
pub use text::*;
pub use tree::*;
