//! Tests for script-style property access and its coercion rules.

use wren_dom::{DomError, DomTree, NodeId, PropertyValue};

fn element(tree: &mut DomTree, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
    tree.create_element_with_attributes(tag, attributes, false)
        .unwrap()
}

fn int(tree: &DomTree, id: NodeId, name: &str) -> i64 {
    match tree.get_property(id, name).unwrap() {
        PropertyValue::Int(n) => n,
        other => panic!("expected Int for {name}, got {other:?}"),
    }
}

fn string(tree: &DomTree, id: NodeId, name: &str) -> String {
    match tree.get_property(id, name).unwrap() {
        PropertyValue::Str(s) => s,
        other => panic!("expected Str for {name}, got {other:?}"),
    }
}

#[test]
fn test_renamed_properties() {
    let mut tree = DomTree::new();
    let label = element(&mut tree, "label", &[("for", "name"), ("class", "big")]);
    assert_eq!(string(&tree, label, "htmlFor"), "name");
    assert_eq!(string(&tree, label, "className"), "big");

    tree.set_property(label, "className", "a b").unwrap();
    assert_eq!(tree.class_list(label), vec!["a", "b"]);
    tree.set_property(label, "accessKey", "k").unwrap();
    assert_eq!(tree.attribute(label, "accesskey").as_deref(), Some("k"));
}

#[test]
fn test_unknown_property_errors() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert!(matches!(
        tree.get_property(div, "bogusThing"),
        Err(DomError::UnknownProperty { .. })
    ));
    // colSpan exists only on table cells
    assert!(matches!(
        tree.get_property(div, "colSpan"),
        Err(DomError::UnknownProperty { ref tag, .. }) if tag == "div"
    ));
}

#[test]
fn test_tag_name_is_read_only() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert_eq!(string(&tree, div, "tagName"), "div");
    assert!(matches!(
        tree.set_property(div, "tagName", "span"),
        Err(DomError::ReadOnlyProperty { .. })
    ));
}

#[test]
fn test_binary_properties_toggle_presence() {
    let mut tree = DomTree::new();
    let input = tree.create_element("input");
    assert_eq!(tree.get_property(input, "checked"), Ok(PropertyValue::Bool(false)));

    tree.set_property(input, "readOnly", true).unwrap();
    assert!(tree.has_attribute(input, "readonly"));
    assert_eq!(tree.start_tag(input), "<input readonly />");

    tree.set_property(input, "readOnly", false).unwrap();
    assert!(!tree.has_attribute(input, "readonly"));
}

#[test]
fn test_bool_string_properties() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert_eq!(tree.get_property(div, "spellcheck"), Ok(PropertyValue::Bool(false)));
    tree.set_property(div, "spellcheck", true).unwrap();
    assert_eq!(tree.attribute(div, "spellcheck").as_deref(), Some("true"));
    tree.set_property(div, "spellcheck", false).unwrap();
    assert_eq!(tree.attribute(div, "spellcheck").as_deref(), Some("false"));
    assert_eq!(tree.get_property(div, "spellcheck"), Ok(PropertyValue::Bool(false)));
}

#[test]
fn test_tab_index_defaults() {
    let mut tree = DomTree::new();
    let a = tree.create_element("a");
    assert_eq!(int(&tree, a, "tabIndex"), -1);
    tree.raw_set_attribute(a, "tabindex", "abc");
    assert_eq!(int(&tree, a, "tabIndex"), 0);
    tree.set_property(a, "tabIndex", 3).unwrap();
    assert_eq!(int(&tree, a, "tabIndex"), 3);
    assert!(matches!(
        tree.set_property(a, "tabIndex", "x"),
        Err(DomError::InvalidPropertyValue { .. })
    ));
}

#[test]
fn test_col_span_clamps() {
    let mut tree = DomTree::new();
    let td = tree.create_element("td");
    assert_eq!(int(&tree, td, "colSpan"), 1);
    tree.raw_set_attribute(td, "colspan", "5000");
    assert_eq!(int(&tree, td, "colSpan"), 1000);
    tree.raw_set_attribute(td, "colspan", "0");
    assert_eq!(int(&tree, td, "colSpan"), 1);
    tree.raw_set_attribute(td, "colspan", "wide");
    assert_eq!(int(&tree, td, "colSpan"), 1);
}

#[test]
fn test_row_span_clamps() {
    let mut tree = DomTree::new();
    let th = tree.create_element("th");
    assert_eq!(int(&tree, th, "rowSpan"), 1);
    tree.raw_set_attribute(th, "rowspan", "70000");
    assert_eq!(int(&tree, th, "rowSpan"), 65534);
    tree.raw_set_attribute(th, "rowspan", "-4");
    assert_eq!(int(&tree, th, "rowSpan"), 0);
    tree.raw_set_attribute(th, "rowspan", "tall");
    assert_eq!(int(&tree, th, "rowSpan"), 0);
}

#[test]
fn test_max_length_property_vs_raw_attribute() {
    let mut tree = DomTree::new();
    let input = tree.create_element("input");
    assert_eq!(int(&tree, input, "maxLength"), -1);

    assert!(matches!(
        tree.set_property(input, "maxLength", -1),
        Err(DomError::IndexSize { property: "maxLength", .. })
    ));

    // Raw attribute writes accept anything; the getter degrades.
    tree.set_attribute(input, "maxlength", "-7").unwrap();
    assert_eq!(int(&tree, input, "maxLength"), -1);
    tree.set_attribute(input, "maxlength", "garbage").unwrap();
    assert_eq!(int(&tree, input, "maxLength"), -1);

    tree.set_property(input, "maxLength", 12).unwrap();
    assert_eq!(int(&tree, input, "maxLength"), 12);
}

#[test]
fn test_span_on_col() {
    let mut tree = DomTree::new();
    let col = tree.create_element("col");
    assert_eq!(int(&tree, col, "span"), 1);
    tree.raw_set_attribute(col, "span", "2000");
    assert_eq!(int(&tree, col, "span"), 1000);
}

#[test]
fn test_size_must_be_positive() {
    let mut tree = DomTree::new();
    let input = tree.create_element("input");
    assert_eq!(int(&tree, input, "size"), 20);
    assert!(matches!(
        tree.set_property(input, "size", 0),
        Err(DomError::IndexSize { .. })
    ));
    tree.set_property(input, "size", "5").unwrap();
    assert_eq!(int(&tree, input, "size"), 5);
}

#[test]
fn test_cross_origin_keywords() {
    let mut tree = DomTree::new();
    let img = tree.create_element("img");
    assert_eq!(tree.get_property(img, "crossOrigin"), Ok(PropertyValue::Null));
    tree.raw_set_attribute(img, "crossorigin", "");
    assert_eq!(tree.get_property(img, "crossOrigin"), Ok(PropertyValue::Null));
    tree.raw_set_attribute(img, "crossorigin", "USE-CREDENTIALS");
    assert_eq!(string(&tree, img, "crossOrigin"), "use-credentials");
    tree.raw_set_attribute(img, "crossorigin", "whatever");
    assert_eq!(string(&tree, img, "crossOrigin"), "anonymous");
}

#[test]
fn test_autocomplete_depends_on_tag() {
    let mut tree = DomTree::new();
    let form = tree.create_element("form");
    let input = tree.create_element("input");
    assert_eq!(string(&tree, form, "autocomplete"), "on");
    assert_eq!(string(&tree, input, "autocomplete"), "");

    tree.raw_set_attribute(form, "autocomplete", "bogus");
    tree.raw_set_attribute(input, "autocomplete", "bogus");
    assert_eq!(string(&tree, form, "autocomplete"), "on");
    assert_eq!(string(&tree, input, "autocomplete"), "");

    tree.raw_set_attribute(input, "autocomplete", "OFF");
    assert_eq!(string(&tree, input, "autocomplete"), "off");
}

#[test]
fn test_form_method_keeps_attribute_verbatim() {
    let mut tree = DomTree::new();
    let form = tree.create_element("form");
    assert_eq!(string(&tree, form, "method"), "get");
    tree.set_property(form, "method", "POST").unwrap();
    assert_eq!(string(&tree, form, "method"), "post");
    assert_eq!(tree.attribute(form, "method").as_deref(), Some("POST"));
    tree.set_property(form, "method", "put").unwrap();
    assert_eq!(string(&tree, form, "method"), "get");
}

#[test]
fn test_track_kind() {
    let mut tree = DomTree::new();
    let track = tree.create_element("track");
    assert_eq!(string(&tree, track, "kind"), "subtitles");
    tree.raw_set_attribute(track, "kind", "Captions");
    assert_eq!(string(&tree, track, "kind"), "captions");
    tree.raw_set_attribute(track, "kind", "");
    assert_eq!(string(&tree, track, "kind"), "metadata");
    tree.raw_set_attribute(track, "kind", "nope");
    assert_eq!(string(&tree, track, "kind"), "metadata");
}

#[test]
fn test_rows_cols_differ_by_tag() {
    let mut tree = DomTree::new();
    let textarea = tree.create_element("textarea");
    let frameset = tree.create_element("frameset");
    assert_eq!(int(&tree, textarea, "rows"), 2);
    assert_eq!(int(&tree, textarea, "cols"), 20);
    assert_eq!(string(&tree, frameset, "rows"), "");

    tree.set_property(frameset, "cols", "25%,*").unwrap();
    assert_eq!(string(&tree, frameset, "cols"), "25%,*");
    assert!(tree.set_property(textarea, "rows", 0).is_err());
}

#[test]
fn test_null_removes_attribute() {
    let mut tree = DomTree::new();
    let a = element(&mut tree, "a", &[("title", "t")]);
    tree.set_property(a, "title", PropertyValue::Null).unwrap();
    assert!(!tree.has_attribute(a, "title"));
}
