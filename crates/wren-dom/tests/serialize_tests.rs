//! Tests for HTML/XHTML serialization.

use wren_dom::{DomTree, INVISIBLE_ROOT_TAG};

#[test]
fn test_start_and_end_tags() {
    let mut tree = DomTree::new();
    let a = tree
        .create_element_with_attributes("a", &[("href", "/x"), ("title", "say \"hi\"")], false)
        .unwrap();
    assert_eq!(tree.start_tag(a), "<a href=\"/x\" title=\"say &quot;hi&quot;\">");
    assert_eq!(tree.end_tag(a), "</a>");
}

#[test]
fn test_attribute_ampersand_is_escaped() {
    let mut tree = DomTree::new();
    let div = tree
        .create_element_with_attributes("div", &[("a", "&lt"), ("href", "?x=1&copy=2")], false)
        .unwrap();
    assert_eq!(tree.start_tag(div), "<div a=\"&amp;lt\" href=\"?x=1&amp;copy=2\">");
}

#[test]
fn test_binary_attribute_serializes_bare() {
    let mut tree = DomTree::new();
    let input = tree
        .create_element_with_attributes("input", &[("type", "checkbox"), ("checked", "")], false)
        .unwrap();
    assert_eq!(tree.outer_html(input), "<input type=\"checkbox\" checked />");
    assert_eq!(
        tree.outer_xhtml(input),
        "<input type=\"checkbox\" checked=\"checked\" />"
    );
}

#[test]
fn test_binary_attribute_with_value_keeps_it() {
    let mut tree = DomTree::new();
    let option = tree
        .create_element_with_attributes("option", &[("selected", "selected")], false)
        .unwrap();
    assert_eq!(tree.start_tag(option), "<option selected=\"selected\">");
}

#[test]
fn test_empty_non_binary_attribute_keeps_quotes() {
    let mut tree = DomTree::new();
    let img = tree
        .create_element_with_attributes("img", &[("alt", "")], false)
        .unwrap();
    assert_eq!(tree.outer_html(img), "<img alt=\"\" />");
}

#[test]
fn test_nested_inner_and_outer_html() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_text(div, "a &amp; b ").unwrap();
    let br = tree.create_element("br");
    let _ = tree.append_child(div, br).unwrap();
    let span = tree.create_element("span");
    let _ = tree.append_child(div, span).unwrap();
    tree.append_text(span, "x").unwrap();

    assert_eq!(tree.inner_html(div), "a &amp; b <br /><span>x</span>");
    assert_eq!(tree.outer_html(div), "<div>a &amp; b <br /><span>x</span></div>");
}

#[test]
fn test_invisible_root_is_not_serialized() {
    let mut tree = DomTree::new();
    let wrapper = tree.create_element(INVISIBLE_ROOT_TAG);
    tree.set_root(Some(wrapper));
    for text in ["one", "two"] {
        let p = tree.create_element("p");
        let _ = tree.append_child(wrapper, p).unwrap();
        tree.append_text(p, text).unwrap();
    }
    assert_eq!(tree.get_html(), "<p>one</p><p>two</p>");
    assert_eq!(tree.get_root_nodes().len(), 2);
}

#[test]
fn test_get_html_with_doctype() {
    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    tree.set_root(Some(html));
    tree.set_doctype(Some("DOCTYPE html".to_string()));
    assert_eq!(tree.get_html(), "<!DOCTYPE html>\n<html></html>");
}

#[test]
fn test_get_html_empty_document() {
    assert_eq!(DomTree::new().get_html(), "");
}

#[test]
fn test_class_and_style_render_from_views() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.add_class(div, "a b");
    tree.set_style_property(div, "fontSize", "2em");
    assert_eq!(
        tree.start_tag(div),
        "<div class=\"a b\" style=\"font-size: 2em\">"
    );
}

#[test]
fn test_dump_tree_outline() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let li = tree.create_element("li");
    let _ = tree.append_child(ul, li).unwrap();
    tree.append_text(li, " item ").unwrap();
    assert_eq!(tree.dump_tree(ul), "<ul>\n  <li>\n    \"item\"\n");
}
