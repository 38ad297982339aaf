//! Tests for tree search and TagCollection set semantics.

use wren_dom::{DomTree, FindQuery, NodeId, TagCollection};

/// Builds:
/// ```text
/// <div id="root" class="box">
///   <p id="p1" name="n" class="x">
///     <span id="s1" class="x y"></span>
///   </p>
///   <p id="p2" data-k="v"></p>
/// </div>
/// ```
fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let root = tree
        .create_element_with_attributes("div", &[("id", "root"), ("class", "box")], false)
        .unwrap();
    tree.set_root(Some(root));
    let p1 = tree
        .create_element_with_attributes("p", &[("id", "p1"), ("name", "n"), ("class", "x")], false)
        .unwrap();
    let s1 = tree
        .create_element_with_attributes("span", &[("id", "s1"), ("class", "x y")], false)
        .unwrap();
    let p2 = tree
        .create_element_with_attributes("p", &[("id", "p2"), ("data-k", "v")], false)
        .unwrap();
    let _ = tree.append_child(root, p1).unwrap();
    let _ = tree.append_child(p1, s1).unwrap();
    let _ = tree.append_child(root, p2).unwrap();
    (tree, root, p1, s1, p2)
}

// ========== tree search ==========

#[test]
fn test_document_search_includes_root() {
    let (tree, root, _, _, _) = sample();
    assert_eq!(tree.get_element_by_id(None, "root"), Some(root));
    assert_eq!(tree.get_elements_by_tag_name(None, "DIV").as_slice(), &[root]);
}

#[test]
fn test_node_search_excludes_self() {
    let (tree, root, p1, s1, _) = sample();
    assert_eq!(tree.get_element_by_id(Some(root), "root"), None);
    assert_eq!(tree.get_elements_by_class_name(Some(p1), "x").as_slice(), &[s1]);
}

#[test]
fn test_searches_in_document_order() {
    let (tree, _, p1, s1, p2) = sample();
    assert_eq!(tree.get_elements_by_tag_name(None, "p").as_slice(), &[p1, p2]);
    assert_eq!(tree.get_elements_by_class_name(None, "x").as_slice(), &[p1, s1]);
    assert_eq!(tree.get_elements_by_name(None, "n").as_slice(), &[p1]);
    assert_eq!(tree.get_elements_by_attr(None, "data-k", "v").as_slice(), &[p2]);
    assert_eq!(
        tree.get_elements_with_attr_values(None, "id", &["s1", "p2", "nope"])
            .as_slice(),
        &[s1, p2]
    );
}

#[test]
fn test_custom_filters() {
    let (tree, _, _, s1, p2) = sample();
    let leaves = tree.get_elements_custom_filter(None, |t, id| t.child_count(id) == 0);
    assert_eq!(leaves.as_slice(), &[s1, p2]);
    assert_eq!(
        tree.get_first_element_custom_filter(None, |t, id| t.tag_name(id) == "span"),
        Some(s1)
    );
}

#[test]
fn test_find_query() {
    let (tree, _, p1, s1, p2) = sample();
    let query = FindQuery::new().equals("tagname", ["P", "span"]);
    assert_eq!(tree.find(None, &query).as_slice(), &[p1, s1, p2]);

    let query = FindQuery::new()
        .equals("tagname", ["span", "p"])
        .contains("class", ["y"]);
    assert_eq!(tree.find(None, &query).as_slice(), &[s1]);

    let query = FindQuery::new().equals("id", ["p2", "root"]).contains("data-k", ["v"]);
    assert_eq!(tree.find(None, &query).as_slice(), &[p2]);
}

#[test]
fn test_lookup_not_found_is_empty() {
    let (tree, ..) = sample();
    assert!(tree.get_element_by_id(None, "missing").is_none());
    assert!(tree.get_elements_by_tag_name(None, "table").is_empty());
    assert!(DomTree::new().get_all_nodes().is_empty());
}

#[test]
fn test_get_all_nodes() {
    let (tree, root, p1, s1, p2) = sample();
    assert_eq!(tree.get_all_nodes().as_slice(), &[root, p1, s1, p2]);
}

// ========== collection set operations ==========

#[test]
fn test_construction_deduplicates() {
    let (_, root, p1, _, _) = sample();
    let collection = TagCollection::from_nodes([p1, root, p1, root]);
    assert_eq!(collection.as_slice(), &[p1, root]);
}

#[test]
fn test_union_and_difference() {
    let (_, root, p1, s1, p2) = sample();
    let a = TagCollection::from_nodes([root, p1]);
    let b = TagCollection::from_nodes([p1, s1]);

    let union = a.clone() + b.clone();
    assert_eq!(union.as_slice(), &[root, p1, s1]);

    let mut diff = union;
    diff -= &b;
    assert_eq!(diff.as_slice(), &[root]);
    assert!(!diff.contains(p1));

    let mut grow = TagCollection::new();
    grow += TagCollection::from_nodes([p2]);
    grow += &a;
    assert_eq!(grow.as_slice(), &[p2, root, p1]);
    assert_eq!((grow - a).as_slice(), &[p2]);
}

#[test]
fn test_push_and_remove() {
    let (tree, root, p1, _, _) = sample();
    let mut collection = TagCollection::new();
    assert!(collection.push(root));
    assert!(!collection.push(root));
    assert!(collection.push(p1));
    assert!(collection.contains_uid(&tree, tree.uid(p1)));
    assert!(collection.remove(root));
    assert!(!collection.remove(root));
    assert_eq!(collection.first(), Some(p1));
    assert_eq!(collection[0], p1);
}

// ========== recursive vs member-only filtering ==========

#[test]
fn test_collection_search_recurses_into_members() {
    let (tree, _, p1, s1, p2) = sample();
    let members = TagCollection::from_nodes([p1, p2]);

    let found = members.get_elements_by_class_name(&tree, "x");
    assert_eq!(found.as_slice(), &[p1, s1]);

    let spans = members.get_elements_by_tag_name(&tree, "span");
    assert_eq!(spans.as_slice(), &[s1]);
    assert_eq!(members.get_element_by_id(&tree, "s1"), Some(s1));
}

#[test]
fn test_filter_collection_only_checks_members() {
    let (tree, _, p1, _, p2) = sample();
    let members = TagCollection::from_nodes([p1, p2]);
    let filtered = members.filter_collection(&tree, |t, id| t.has_class(id, "y"));
    assert!(filtered.is_empty());

    let filtered = members.filter_collection(&tree, |t, id| t.has_attribute(id, "data-k"));
    assert_eq!(filtered.as_slice(), &[p2]);
}

#[test]
fn test_collection_html_and_removal() {
    let (mut tree, root, p1, s1, p2) = sample();
    let members = TagCollection::from_nodes([s1, p2]);
    assert_eq!(
        members.to_html(&tree),
        "<span id=\"s1\" class=\"x y\"></span><p id=\"p2\" data-k=\"v\"></p>"
    );
    assert_eq!(members.remove_from_tree(&mut tree), 2);
    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![p1]);
    assert_eq!(tree.child_count(p1), 0);
}
