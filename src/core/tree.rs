use crate::core::FileNode;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences, options::CollatorOptions};
use once_cell::sync::Lazy;
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};
use tracing::{debug, warn};

/* ============================== Construction =============================== */

/// Construction-time node. The name index is dropped once the tree is sorted.
struct Draft {
    name: String,
    path: String,
    is_dir: bool,
    children: Vec<Draft>,
    by_name: HashMap<String, usize>,
}

impl Draft {
    fn new(name: &str, path: String, is_dir: bool) -> Self {
        Self {
            name: name.to_string(),
            path,
            is_dir,
            children: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    fn child_index(&mut self, name: &str, path: impl FnOnce() -> String, is_dir: bool) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.children.len();
        self.children.push(Self::new(name, path(), is_dir));
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    fn into_node(self) -> FileNode {
        if self.is_dir {
            FileNode {
                name: self.name,
                path: self.path,
                is_dir: true,
                children: Some(sort_nodes(self.children)),
            }
        } else {
            FileNode::leaf(self.name, self.path)
        }
    }
}

fn insert_path(root: &mut Draft, path: &str) {
    let parts: Vec<&str> = path.split('/').collect();
    let last = parts.len() - 1;
    let mut current = root;

    for (idx, part) in parts.iter().enumerate() {
        let is_last = idx == last;
        let slot = current.child_index(part, || parts[..=idx].join("/"), !is_last);
        if is_last {
            break;
        }

        let child = &mut current.children[slot];
        if !child.is_dir {
            // A path descends through a node first seen as a file.
            debug!(path = %child.path, via = %path, "promoting leaf to directory");
            child.is_dir = true;
        }
        current = child;
    }
}

/// Build the sorted root-level nodes from a flat list of `/`-separated paths.
///
/// Duplicate paths collapse into one node. Empty segments (leading, trailing
/// or doubled slashes) become nodes with an empty name; callers are expected
/// to hand in clean repository-relative paths.
#[must_use]
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> Vec<FileNode> {
    let mut root = Draft::new("", String::new(), true);
    for p in paths {
        insert_path(&mut root, p.as_ref());
    }
    sort_nodes(root.children)
}

/* ================================ Ordering ================================= */

/// Directories before files, then names in collation order.
#[must_use]
pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Root-locale collator at tertiary strength; `None` only if the compiled
/// collation data fails to load.
static COLLATOR: Lazy<Option<CollatorBorrowed<'static>>> = Lazy::new(|| {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
        .inspect_err(|e| warn!(error = %e, "collator unavailable; sorting by folded code points"))
        .ok()
});

/// Locale-aware name order: accents sort with their base letter, case is
/// compared after letters (lowercase first) and punctuation follows the
/// collation table. Names the collator calls equal fall back to code points
/// so the order is total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let collated = match COLLATOR.as_ref() {
        Some(c) => c.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    collated.then_with(|| a.cmp(b))
}

fn sort_nodes(drafts: Vec<Draft>) -> Vec<FileNode> {
    let mut nodes: Vec<FileNode> = drafts.into_iter().map(Draft::into_node).collect();
    nodes.sort_by(compare_nodes);
    nodes
}

/* ================================= Lookup ================================== */

/// Find the node whose full path is `path`.
#[must_use]
pub fn find_node<'a>(nodes: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    let mut level = nodes;
    let mut found = None;
    for part in path.split('/') {
        let node = level.iter().find(|n| n.name == part)?;
        level = node.children();
        found = Some(node);
    }
    found
}

/// A row of a tree view: one visible node and its indentation depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub leaf_count: usize,
}

/// Depth-first listing of the rows a tree view shows, descending only into
/// directories whose path is in `expanded`.
#[must_use]
pub fn flatten_visible<S: ::std::hash::BuildHasher>(
    nodes: &[FileNode],
    expanded: &HashSet<String, S>,
) -> Vec<FlatRow> {
    fn walk<S: ::std::hash::BuildHasher>(
        nodes: &[FileNode],
        depth: usize,
        expanded: &HashSet<String, S>,
        out: &mut Vec<FlatRow>,
    ) {
        for n in nodes {
            out.push(FlatRow {
                depth,
                name: n.name.clone(),
                path: n.path.clone(),
                is_dir: n.is_dir,
                leaf_count: n.leaf_count(),
            });
            if n.is_dir && expanded.contains(&n.path) {
                walk(n.children(), depth + 1, expanded, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, expanded, &mut out);
    out
}
