use crate::core::{FileNode, parse_hierarchy_text};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/* ================================ Selection ================================ */

/// Set of selected leaf paths.
///
/// Treated as a value: every toggle returns a fresh `Selection`, so a reader
/// holding the previous one never sees a half-applied change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    paths: BTreeSet<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Selected paths in lexicographic order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }

    fn with(&self, added: impl IntoIterator<Item = String>) -> Self {
        let mut paths = self.paths.clone();
        paths.extend(added);
        Self { paths }
    }

    fn without<'a>(&self, removed: impl IntoIterator<Item = &'a str>) -> Self {
        let mut paths = self.paths.clone();
        for p in removed {
            paths.remove(p);
        }
        Self { paths }
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for Selection {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

/* ================================= Toggles ================================= */

/// Outcome of a selection change.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// The change went through; holds the new set.
    Applied(Selection),
    /// The change would exceed the limit; holds the unchanged input set.
    Rejected(Selection),
}

impl Toggle {
    #[must_use]
    pub const fn limit_reached(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        match self {
            Self::Applied(s) | Self::Rejected(s) => s,
        }
    }

    #[must_use]
    pub fn into_selection(self) -> Selection {
        match self {
            Self::Applied(s) | Self::Rejected(s) => s,
        }
    }
}

/// Checkbox state of a node, derived from the selection on every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayState {
    Full,
    Partial,
    None,
}

impl DisplayState {
    /// Marker used by the text renderer.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Full => "[x]",
            Self::Partial => "[-]",
            Self::None => "[ ]",
        }
    }
}

/// Every leaf path under `node`, in the subtree's sorted order.
#[must_use]
pub fn all_descendant_paths(node: &FileNode) -> Vec<String> {
    fn walk(node: &FileNode, out: &mut Vec<String>) {
        if node.is_dir {
            for c in node.children() {
                walk(c, out);
            }
        } else {
            out.push(node.path.clone());
        }
    }

    let mut out = Vec::new();
    walk(node, &mut out);
    out
}

/// Select or deselect a single leaf.
///
/// Deselecting always succeeds. Selecting a new path when the set already
/// holds `limit` entries is rejected.
pub fn toggle_leaf(
    path: &str,
    selected: bool,
    current: &Selection,
    limit: Option<usize>,
) -> Toggle {
    if !selected {
        return Toggle::Applied(current.without([path]));
    }
    if current.contains(path) {
        return Toggle::Applied(current.clone());
    }
    if let Some(max) = limit
        && current.len() >= max
    {
        debug!(path, limit = max, "leaf selection rejected at limit");
        return Toggle::Rejected(current.clone());
    }
    Toggle::Applied(current.with([path.to_string()]))
}

/// Select or deselect every leaf under `node` at once.
///
/// A bulk select that would take the set past `limit` is rejected as a whole;
/// nothing from the subtree is added.
pub fn toggle_subtree(
    node: &FileNode,
    selected: bool,
    current: &Selection,
    limit: Option<usize>,
) -> Toggle {
    let descendants = all_descendant_paths(node);
    if !selected {
        return Toggle::Applied(current.without(descendants.iter().map(String::as_str)));
    }

    let added = descendants.iter().filter(|p| !current.contains(p)).count();
    let new_count = current.len() + added;
    if let Some(max) = limit
        && new_count > max
    {
        debug!(
            path = %node.path,
            limit = max,
            wanted = new_count,
            "subtree selection rejected over limit"
        );
        return Toggle::Rejected(current.clone());
    }
    Toggle::Applied(current.with(descendants))
}

#[must_use]
pub fn node_display_state(node: &FileNode, current: &Selection) -> DisplayState {
    let descendants = all_descendant_paths(node);
    let hits = descendants.iter().filter(|p| current.contains(p)).count();
    if hits == 0 {
        DisplayState::None
    } else if hits == descendants.len() {
        DisplayState::Full
    } else {
        DisplayState::Partial
    }
}

/// True once a limit is set and the selection has reached it.
#[must_use]
pub fn at_limit(current: &Selection, limit: Option<usize>) -> bool {
    limit.is_some_and(|max| current.len() >= max)
}

/// Replace the selection with the leaves named in a pasted hierarchy.
///
/// Paths in the text that are not leaves of `nodes` are ignored. Text naming
/// no paths at all (empty, or a root label only) leaves `current` as it is.
/// If the result would exceed `limit`, the whole replacement is rejected and
/// `current` is kept.
pub fn select_from_text(
    nodes: &[FileNode],
    text: &str,
    current: &Selection,
    limit: Option<usize>,
) -> Toggle {
    let wanted = match parse_hierarchy_text(text) {
        Some(w) if !w.is_empty() => w,
        _ => {
            debug!("text selection names no paths; keeping current");
            return Toggle::Applied(current.clone());
        }
    };
    let picked: Selection = nodes
        .iter()
        .flat_map(all_descendant_paths)
        .filter(|p| wanted.contains(p))
        .collect();

    if let Some(max) = limit
        && picked.len() > max
    {
        debug!(
            limit = max,
            wanted = picked.len(),
            "text selection rejected over limit"
        );
        return Toggle::Rejected(current.clone());
    }
    Toggle::Applied(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_tree;
    use pretty_assertions::assert_eq;

    fn sel(paths: &[&str]) -> Selection {
        paths.iter().copied().collect()
    }

    #[test]
    fn descendants_of_a_leaf_is_itself() {
        let leaf = FileNode::leaf("a.md", "x/a.md");
        assert_eq!(all_descendant_paths(&leaf), vec!["x/a.md".to_string()]);
    }

    #[test]
    fn descendants_follow_sorted_order() {
        let tree = build_tree(&["d/z.md", "d/sub/b.md", "d/a.md"]);
        assert_eq!(
            all_descendant_paths(&tree[0]),
            vec!["d/sub/b.md", "d/a.md", "d/z.md"]
        );
    }

    #[test]
    fn leaf_deselect_ignores_limit() {
        let s = sel(&["a", "b"]);
        let out = toggle_leaf("a", false, &s, Some(0));
        assert_eq!(out, Toggle::Applied(sel(&["b"])));
    }

    #[test]
    fn reselecting_a_member_at_the_limit_is_a_noop() {
        let s = sel(&["a", "b"]);
        let out = toggle_leaf("a", true, &s, Some(2));
        assert!(!out.limit_reached());
        assert_eq!(out.into_selection(), s);
    }

    #[test]
    fn new_leaf_at_the_limit_is_rejected() {
        let s = sel(&["a", "b"]);
        let out = toggle_leaf("c", true, &s, Some(2));
        assert_eq!(out, Toggle::Rejected(s));
    }

    #[test]
    fn zero_limit_rejects_any_addition() {
        let out = toggle_leaf("a", true, &Selection::new(), Some(0));
        assert!(out.limit_reached());
        assert!(out.selection().is_empty());
    }

    #[test]
    fn subtree_exactly_at_limit_is_applied() {
        let tree = build_tree(&["d/a", "d/b", "d/c"]);
        let out = toggle_subtree(&tree[0], true, &sel(&["x"]), Some(4));
        assert_eq!(out, Toggle::Applied(sel(&["d/a", "d/b", "d/c", "x"])));
    }

    #[test]
    fn overlap_does_not_count_twice() {
        let tree = build_tree(&["d/a", "d/b", "d/c"]);
        let out = toggle_subtree(&tree[0], true, &sel(&["d/a", "d/b"]), Some(3));
        assert_eq!(out.selection().len(), 3);
        assert!(!out.limit_reached());
    }

    #[test]
    fn subtree_deselect_keeps_unrelated() {
        let tree = build_tree(&["d/a", "d/b", "e"]);
        let out = toggle_subtree(&tree[0], false, &sel(&["d/a", "e"]), Some(1));
        assert_eq!(out, Toggle::Applied(sel(&["e"])));
    }

    #[test]
    fn display_state_of_a_leaf() {
        let leaf = FileNode::leaf("a", "a");
        assert_eq!(node_display_state(&leaf, &sel(&["a"])), DisplayState::Full);
        assert_eq!(node_display_state(&leaf, &sel(&[])), DisplayState::None);
    }

    #[test]
    fn empty_directory_displays_none() {
        let empty = FileNode::dir("d", "d", Vec::new());
        assert_eq!(node_display_state(&empty, &sel(&["d"])), DisplayState::None);
    }

    #[test]
    fn at_limit_needs_a_limit() {
        assert!(!at_limit(&sel(&["a", "b"]), None));
        assert!(at_limit(&sel(&["a", "b"]), Some(2)));
        assert!(!at_limit(&sel(&["a"]), Some(2)));
    }

    #[test]
    fn selection_serializes_as_sorted_list() {
        let s = sel(&["b.md", "a.md"]);
        assert_eq!(serde_json::to_string(&s).unwrap(), r#"["a.md","b.md"]"#);
    }
}
