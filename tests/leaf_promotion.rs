use docpick::core::*;

#[test]
fn file_listed_before_its_children_becomes_a_directory() {
    let tree = build_tree(&["guide", "guide/setup.md", "guide/usage.md"]);
    assert_eq!(tree.len(), 1);
    assert!(tree[0].is_dir);
    assert_eq!(
        all_descendant_paths(&tree[0]),
        vec!["guide/setup.md".to_string(), "guide/usage.md".to_string()]
    );
}

#[test]
fn promoted_node_is_no_longer_selectable_as_a_leaf() {
    let mut s = PickerSession::new(None);
    s.replace_paths(vec!["a".to_string(), "a/b.md".to_string()]);

    assert!(!s.toggle("a", true));
    assert_eq!(s.selected_paths(), vec!["a/b.md".to_string()]);
}

#[test]
fn promotion_does_not_depend_on_order() {
    let forward = build_tree(&["a", "a/b.md"]);
    let backward = build_tree(&["a/b.md", "a"]);
    assert_eq!(forward, backward);
}
