use crate::core::{FileNode, Selection, build_tree, node_display_state};
use std::collections::HashSet;

/* =========================== Rendering & parsing =========================== */

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

fn render_nodes(
    nodes: &[FileNode],
    prefix: &mut String,
    out: &mut String,
    marker: &dyn Fn(&FileNode) -> Option<&'static str>,
) {
    let len = nodes.len();
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx + 1 == len;
        out.push_str(prefix);
        out.push_str(if last { LAST } else { BRANCH });
        if let Some(m) = marker(node) {
            out.push_str(m);
            out.push(' ');
        }
        out.push_str(&node.name);
        out.push('\n');

        if !node.children().is_empty() {
            let saved = prefix.len();
            prefix.push_str(if last { SPACE } else { PIPE });
            render_nodes(node.children(), prefix, out, marker);
            prefix.truncate(saved);
        }
    }
}

/// Box-drawing view of the tree with a check marker per node:
/// `[x]` fully selected, `[-]` partially, `[ ]` not at all.
#[must_use]
pub fn render_tree(nodes: &[FileNode], selection: &Selection) -> String {
    let mut out = String::new();
    let mut prefix = String::new();
    render_nodes(nodes, &mut prefix, &mut out, &|n| {
        Some(node_display_state(n, selection).marker())
    });
    out
}

/// Plain hierarchy of `paths` under an optional root label. This is the
/// format `parse_hierarchy_text` reads back.
#[must_use]
pub fn render_unicode_tree_from_paths(paths: &[String], root_name: Option<&str>) -> String {
    let tree = build_tree(paths);

    let mut out = String::new();
    if let Some(name) = root_name {
        out.push_str(name);
        out.push('\n');
    }
    let mut prefix = String::new();
    render_nodes(&tree, &mut prefix, &mut out, &|_| None);
    out
}

fn strip_marker(name: &str) -> &str {
    for m in ["[x] ", "[-] ", "[ ] "] {
        if let Some(rest) = name.strip_prefix(m) {
            return rest;
        }
    }
    name
}

/// Parse a pasted hierarchy back into the set of `/`-joined paths it names.
///
/// The first line is the root label and is skipped. Each following line's
/// depth comes from the column its name starts at, four columns per level.
/// Check markers written by `render_tree` are accepted and dropped.
#[must_use]
pub fn parse_hierarchy_text(text: &str) -> Option<HashSet<String>> {
    let mut lines = text.lines();
    let _root = lines.next()?;

    let mut paths: HashSet<String> = HashSet::new();
    let mut parts: Vec<String> = Vec::new();

    for raw in lines {
        let line = raw.trim_end();

        let Some((col, (byte_idx, _))) = line
            .char_indices()
            .enumerate()
            .find(|&(_, (_, ch))| !matches!(ch, '│' | '└' | '├' | '─') && !ch.is_whitespace())
        else {
            continue;
        };

        let level = col.saturating_sub(1) / 4;
        let name = strip_marker(line[byte_idx..].trim());
        if name.is_empty() {
            continue;
        }

        parts.truncate(level);
        parts.push(name.to_string());
        paths.insert(parts.join("/"));
    }

    Some(paths)
}
