use docpick::core::*;
use pretty_assertions::assert_eq;

#[test]
fn docs_directory_sorts_before_readme_and_selects_both_files() {
    let tree = build_tree(&["docs/intro.md", "docs/guide/setup.md", "readme.md"]);

    assert_eq!(
        tree,
        vec![
            FileNode::dir(
                "docs",
                "docs",
                vec![
                    FileNode::dir(
                        "guide",
                        "docs/guide",
                        vec![FileNode::leaf("setup.md", "docs/guide/setup.md")],
                    ),
                    FileNode::leaf("intro.md", "docs/intro.md"),
                ],
            ),
            FileNode::leaf("readme.md", "readme.md"),
        ]
    );

    let out = toggle_subtree(&tree[0], true, &Selection::new(), None);
    assert!(!out.limit_reached());
    assert_eq!(
        out.into_selection().to_vec(),
        vec!["docs/guide/setup.md".to_string(), "docs/intro.md".to_string()]
    );
}

#[test]
fn leaves_have_no_children_and_directories_do() {
    let tree = build_tree(&["docs/intro.md", "readme.md"]);
    assert!(tree[0].children.is_some());
    assert!(tree[1].children.is_none());
    assert!(!tree[1].is_dir);
}

#[test]
fn tree_serializes_with_is_directory_key() {
    let tree = build_tree(&["docs/a.md"]);
    let v = serde_json::to_value(&tree).unwrap();
    assert_eq!(v[0]["isDirectory"], true);
    assert_eq!(v[0]["children"][0]["path"], "docs/a.md");
    assert!(v[0]["children"][0].get("children").is_none());
}
