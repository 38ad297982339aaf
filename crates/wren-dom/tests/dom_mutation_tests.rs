//! Tests for DOM tree mutation: append, insert, remove, clone.

use wren_dom::{Block, DomError, DomTree, NodeId};

/// Helper to build `<div>` with three children `a`, `b`, `c` as the document root.
fn tree_with_three_children() -> (DomTree, NodeId, [NodeId; 3]) {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    tree.set_root(Some(parent));
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    let c = tree.create_element("c");
    for child in [a, b, c] {
        let _ = tree.append_child(parent, child).unwrap();
    }
    (tree, parent, [a, b, c])
}

/// Children must always be the tag blocks, in block order.
fn assert_children_match_blocks(tree: &DomTree, id: NodeId) {
    let from_blocks: Vec<NodeId> = tree.blocks(id).iter().filter_map(Block::as_tag).collect();
    let children: Vec<NodeId> = tree.children(id).collect();
    assert_eq!(children, from_blocks);
}

// ========== append_child ==========

#[test]
fn test_append_sets_parent_and_owner() {
    let (tree, parent, [a, _, c]) = tree_with_three_children();
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.owner_document(c), Some(tree.document_id()));
    assert_children_match_blocks(&tree, parent);
}

#[test]
fn test_append_moves_node_from_old_parent() {
    let (mut tree, parent, [a, b, _]) = tree_with_three_children();
    let _ = tree.append_child(a, b).unwrap();

    assert_eq!(tree.parent(b), Some(a));
    assert_eq!(tree.child_count(parent), 2);
    assert_children_match_blocks(&tree, parent);
    assert_children_match_blocks(&tree, a);
}

#[test]
fn test_append_into_void_element_fails() {
    let mut tree = DomTree::new();
    let br = tree.create_element("br");
    let span = tree.create_element("span");
    assert!(matches!(
        tree.append_child(br, span),
        Err(DomError::VoidElement { ref tag }) if tag == "br"
    ));
    assert!(tree.append_text(br, "x").is_err());
}

#[test]
fn test_append_into_own_descendant_fails() {
    let (mut tree, parent, [a, _, _]) = tree_with_three_children();
    assert_eq!(tree.append_child(a, parent), Err(DomError::HierarchyRequest));
    assert_eq!(tree.append_child(a, a), Err(DomError::HierarchyRequest));
}

#[test]
fn test_append_clears_self_closing_on_non_void() {
    let mut tree = DomTree::new();
    let div = tree
        .create_element_with_attributes("div", &[], true)
        .unwrap();
    assert!(tree.is_self_closing(div));
    let span = tree.create_element("span");
    let _ = tree.append_child(div, span).unwrap();
    assert!(!tree.is_self_closing(div));
}

// ========== insert_before / insert_after ==========

#[test]
fn test_insert_before_middle() {
    let (mut tree, parent, [a, b, c]) = tree_with_three_children();
    let x = tree.create_element("x");
    let _ = tree.insert_before(parent, x, Some(b)).unwrap();

    assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, x, b, c]);
    assert_eq!(tree.parent(x), Some(parent));
}

#[test]
fn test_insert_before_none_appends() {
    let (mut tree, parent, [a, b, c]) = tree_with_three_children();
    let x = tree.create_element("x");
    let _ = tree.insert_before(parent, x, None).unwrap();
    assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b, c, x]);
}

#[test]
fn test_insert_after_last() {
    let (mut tree, parent, [a, b, c]) = tree_with_three_children();
    let x = tree.create_element("x");
    let _ = tree.insert_after(parent, x, Some(c)).unwrap();
    assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b, c, x]);
}

#[test]
fn test_insert_keeps_text_blocks_in_place() {
    let mut tree = DomTree::new();
    let p = tree.create_element("p");
    tree.append_text(p, "one ").unwrap();
    let b = tree.create_element("b");
    let _ = tree.append_child(p, b).unwrap();
    tree.append_text(p, " two").unwrap();

    let i = tree.create_element("i");
    let _ = tree.insert_after(p, i, Some(b)).unwrap();

    assert_eq!(tree.inner_html(p), "one <b></b><i></i> two");
    assert_children_match_blocks(&tree, p);
}

#[test]
fn test_insert_with_foreign_reference_fails() {
    let (mut tree, parent, [a, b, _]) = tree_with_three_children();
    let x = tree.create_element("x");
    let _ = tree.append_child(a, x).unwrap();
    let y = tree.create_element("y");
    assert_eq!(tree.insert_before(parent, y, Some(x)), Err(DomError::NotAChild));
    assert_eq!(tree.insert_after(a, y, Some(b)), Err(DomError::NotAChild));
}

// ========== remove ==========

#[test]
fn test_remove_child_clears_links_recursively() {
    let (mut tree, parent, [a, b, c]) = tree_with_three_children();
    let inner = tree.create_element("span");
    let _ = tree.append_child(b, inner).unwrap();

    assert_eq!(tree.remove_child(parent, b), Some(b));
    assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, c]);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.owner_document(b), None);
    assert_eq!(tree.owner_document(inner), None);
    // Still structurally under b
    assert_eq!(tree.parent(inner), Some(b));
    assert!(!tree.contains(inner));
}

#[test]
fn test_remove_child_of_wrong_parent() {
    let (mut tree, _, [a, b, _]) = tree_with_three_children();
    assert_eq!(tree.remove_child(a, b), None);
}

#[test]
fn test_remove_twice_is_noop() {
    let (mut tree, parent, [a, _, _]) = tree_with_three_children();
    assert!(tree.remove(a));
    assert!(!tree.remove(a));
    assert_eq!(tree.child_count(parent), 2);
}

#[test]
fn test_remove_root_returns_false() {
    let (mut tree, parent, _) = tree_with_three_children();
    assert!(!tree.remove(parent));
    assert_eq!(tree.root(), Some(parent));
}

#[test]
fn test_remove_children_keeps_text() {
    let mut tree = DomTree::new();
    let p = tree.create_element("p");
    tree.append_text(p, "hi").unwrap();
    let b = tree.create_element("b");
    let _ = tree.append_child(p, b).unwrap();

    assert_eq!(tree.remove_children(p), vec![b]);
    assert_eq!(tree.inner_html(p), "hi");
}

#[test]
fn test_set_text_content_replaces_everything() {
    let (mut tree, parent, [a, _, _]) = tree_with_three_children();
    tree.set_text_content(parent, "plain").unwrap();
    assert_eq!(tree.inner_html(parent), "plain");
    assert_eq!(tree.parent(a), None);
}

// ========== clone and equality ==========

#[test]
fn test_clone_node_is_tag_equal_not_same() {
    let mut tree = DomTree::new();
    let div = tree
        .create_element_with_attributes("div", &[("id", "x"), ("class", "a b")], false)
        .unwrap();
    let child = tree.create_element("span");
    let _ = tree.append_child(div, child).unwrap();

    let copy = tree.clone_node(div);
    assert!(tree.is_tag_equal(div, copy));
    assert!(!tree.is_same_node(div, copy));
    assert_ne!(tree.uid(div), tree.uid(copy));
    assert_eq!(tree.child_count(copy), 0);
    assert_eq!(tree.parent(copy), None);
}

#[test]
fn test_deep_clone_copies_subtree_with_new_uids() {
    let (mut tree, parent, _) = tree_with_three_children();
    tree.append_text(parent, "tail").unwrap();
    let copy = tree.deep_clone(parent);

    assert_eq!(tree.outer_html(copy), tree.outer_html(parent));
    let original_uids = tree.get_all_node_uids(parent);
    let copy_uids = tree.get_all_node_uids(copy);
    assert_eq!(original_uids.len(), copy_uids.len());
    assert!(original_uids.is_disjoint(&copy_uids));
    assert_eq!(tree.owner_document(copy), None);
}

#[test]
fn test_tag_equal_ignores_attribute_order_and_children() {
    let mut tree = DomTree::new();
    let a = tree
        .create_element_with_attributes("p", &[("id", "1"), ("title", "t")], false)
        .unwrap();
    let b = tree
        .create_element_with_attributes("P", &[("title", "t"), ("id", "1")], false)
        .unwrap();
    let c = tree.create_element("em");
    let _ = tree.append_child(b, c).unwrap();
    assert!(tree.is_tag_equal(a, b));

    tree.raw_set_attribute(b, "title", "other");
    assert!(!tree.is_tag_equal(a, b));
}

#[test]
fn test_import_node_across_trees() {
    let (source, parent, _) = tree_with_three_children();
    let mut target = DomTree::new();
    let copy = target.import_node(&source, parent);
    assert_eq!(target.outer_html(copy), source.outer_html(parent));
    assert!(target.is_tag_equal_across(copy, &source, parent));
}

// ========== navigation ==========

#[test]
fn test_sibling_navigation() {
    let (tree, parent, [a, b, c]) = tree_with_three_children();
    assert_eq!(tree.next_element_sibling(a), Some(b));
    assert_eq!(tree.next_element_sibling(c), None);
    assert_eq!(tree.previous_element_sibling(c), Some(b));
    assert_eq!(tree.previous_element_sibling(a), None);
    assert_eq!(tree.first_element_child(parent), Some(a));
    assert_eq!(tree.last_element_child(parent), Some(c));
    assert_eq!(tree.peers(b), vec![a, c]);
    assert_eq!(tree.child_index(c), Some(2));
    assert!(tree.peers(parent).is_empty());
}

#[test]
fn test_text_and_text_content() {
    let mut tree = DomTree::new();
    let p = tree.create_element("p");
    tree.append_text(p, "Hello ").unwrap();
    let b = tree.create_element("b");
    let _ = tree.append_child(p, b).unwrap();
    tree.append_text(b, "big").unwrap();
    tree.append_text(p, " world").unwrap();

    assert_eq!(tree.text(p), "Hello  world");
    assert_eq!(tree.text_content(p), "Hello big world");
}

#[test]
fn test_ancestors_and_descendants() {
    let (mut tree, parent, [a, b, _]) = tree_with_three_children();
    let deep = tree.create_element("i");
    let _ = tree.append_child(a, deep).unwrap();

    assert_eq!(tree.ancestors(deep).collect::<Vec<_>>(), vec![a, parent]);
    assert!(tree.is_ancestor_of(parent, deep));
    assert!(!tree.is_ancestor_of(b, deep));
    let order: Vec<&str> = tree
        .descendants(parent)
        .map(|id| tree.tag_name(id))
        .collect();
    assert_eq!(order, vec!["a", "i", "b", "c"]);
    assert_eq!(
        tree.get_parent_element_custom_filter(deep, |t, id| t.tag_name(id) == "div"),
        Some(parent)
    );
}
