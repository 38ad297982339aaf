//! Integration tests for the indexing parser.

use wren_html::{IndexConfig, IndexedHtmlParser, ParserConfig};

const DOC: &str = concat!(
    r#"<div id="root">"#,
    r#"<p id="a" name="n" class="x y">1</p>"#,
    r#"<p id="b" name="n" class="x">2</p>"#,
    r#"<span data-role="tab">3</span>"#,
    "</div>",
);

/// Helper to parse `html` with every default index.
fn indexed(html: &str) -> IndexedHtmlParser {
    let mut parser = IndexedHtmlParser::new(IndexConfig::default());
    parser.parse_str(html).unwrap();
    parser
}

// ========== lookups ==========

#[test]
fn test_index_and_walk_agree() {
    let parser = indexed(DOC);
    for use_index in [true, false] {
        let a = parser.get_element_by_id(None, "a", use_index).unwrap();
        assert_eq!(parser.tree().text(a), "1");
        assert_eq!(parser.get_elements_by_name(None, "n", use_index).len(), 2);
        assert_eq!(parser.get_elements_by_class_name(None, "x", use_index).len(), 2);
        assert_eq!(parser.get_elements_by_class_name(None, "y", use_index).len(), 1);
        assert_eq!(parser.get_elements_by_tag_name(None, "P", use_index).len(), 2);
        assert_eq!(parser.get_elements_by_tag_name(None, "div", use_index).len(), 1);
        assert!(parser.get_element_by_id(None, "missing", use_index).is_none());
    }
}

#[test]
fn test_index_preserves_document_order() {
    let parser = indexed(DOC);
    let found = parser.get_elements_by_class_name(None, "x", true);
    let tree = parser.tree();
    assert_eq!(tree.get_attribute_or(found[0], "id", ""), "a");
    assert_eq!(tree.get_attribute_or(found[1], "id", ""), "b");
}

#[test]
fn test_lookup_from_subtree() {
    let parser = indexed(DOC);
    let root = parser.get_element_by_id(None, "root", true).unwrap();
    let a = parser.get_element_by_id(None, "a", true).unwrap();

    assert_eq!(parser.get_elements_by_tag_name(Some(root), "p", true).len(), 2);
    assert!(parser.get_elements_by_tag_name(Some(root), "div", true).is_empty());
    assert!(parser.get_elements_by_tag_name(Some(a), "p", true).is_empty());
    assert!(parser.get_element_by_id(Some(a), "b", true).is_none());
    assert_eq!(parser.get_element_by_id(Some(root), "b", true), parser.get_element_by_id(None, "b", false));
}

#[test]
fn test_duplicate_id_first_wins() {
    let parser = indexed(r#"<div><i id="d">1</i><b id="d">2</b></div>"#);
    for use_index in [true, false] {
        let found = parser.get_element_by_id(None, "d", use_index).unwrap();
        assert_eq!(parser.tree().tag_name(found), "i");
    }
}

#[test]
fn test_wrapper_is_not_indexed() {
    let parser = indexed("<p>a</p><p>b</p>");
    assert!(parser.index().tag_names("xxxblank").is_empty());
    assert_eq!(parser.get_elements_by_tag_name(None, "p", true).len(), 2);
}

// ========== custom attributes ==========

#[test]
fn test_unindexed_attribute_falls_back_to_walk() {
    let parser = indexed(DOC);
    assert!(parser.index().attribute("data-role", "tab").is_none());
    assert_eq!(parser.get_elements_by_attr(None, "data-role", "tab", true).len(), 1);
}

#[test]
fn test_add_index_on_attribute_needs_reindex() {
    let mut parser = indexed(DOC);
    parser.add_index_on_attribute("DATA-ROLE");
    assert!(parser.index().has_attribute_index("data-role"));
    assert!(parser.index().attribute("data-role", "tab").is_none());

    parser.reindex();
    assert_eq!(parser.index().attribute("data-role", "tab").map(<[_]>::len), Some(1));
    assert_eq!(parser.index().attribute("data-role", "other").map(<[_]>::len), Some(0));
    assert_eq!(parser.get_elements_by_attr(None, "data-role", "tab", true).len(), 1);
}

#[test]
fn test_custom_attributes_from_config() {
    let config = IndexConfig {
        custom_attributes: vec!["Data-Role".to_string()],
        ..IndexConfig::default()
    };
    let mut parser = IndexedHtmlParser::new(config);
    parser.parse_str(DOC).unwrap();
    assert!(parser.index().attribute("data-role", "tab").is_some());
}

#[test]
fn test_remove_index_on_attribute() {
    let mut parser = indexed(DOC);
    parser.add_index_on_attribute("data-role");
    parser.reindex();
    parser.remove_index_on_attribute("data-role");
    assert!(!parser.index().has_attribute_index("data-role"));
    assert!(parser.index().attribute("data-role", "tab").is_none());
    assert_eq!(parser.get_elements_by_attr(None, "data-role", "tab", true).len(), 1);
}

// ========== configuration ==========

#[test]
fn test_disable_indexing() {
    let mut parser = indexed(DOC);
    parser.disable_indexing();
    assert_eq!(parser.index().config(), &IndexConfig::none());
    assert!(parser.index().tag_names("p").is_empty());
    assert_eq!(parser.get_elements_by_tag_name(None, "p", true).len(), 2);
    assert!(parser.get_element_by_id(None, "a", true).is_some());
}

#[test]
fn test_reindex_with() {
    let mut parser = indexed(DOC);
    parser.reindex_with(IndexConfig {
        index_tag_names: false,
        ..IndexConfig::default()
    });
    assert!(parser.index().tag_names("p").is_empty());
    assert_eq!(parser.index().class_names("x").len(), 2);
    assert_eq!(parser.get_elements_by_tag_name(None, "p", true).len(), 2);
}

#[test]
fn test_parse_replaces_index() {
    let mut parser = indexed(DOC);
    parser.parse_str("<ul><li>x</li></ul>").unwrap();
    assert!(parser.index().tag_names("p").is_empty());
    assert_eq!(parser.get_elements_by_tag_name(None, "li", true).len(), 1);
}

#[test]
fn test_failed_parse_empties_index() {
    let mut parser = IndexedHtmlParser::with_configs(
        ParserConfig::default().with_validation(true),
        IndexConfig::default(),
    );
    parser.parse_str(DOC).unwrap();
    assert!(parser.parse_str("<div></p></div>").is_err());
    assert!(parser.index().tag_names("p").is_empty());
}

// ========== mutation ==========

#[test]
fn test_remove_node_updates_index() {
    let mut parser = indexed(DOC);
    let a = parser.get_element_by_id(None, "a", true).unwrap();
    assert!(parser.remove_node(a));
    assert!(parser.get_element_by_id(None, "a", true).is_none());
    assert_eq!(parser.get_elements_by_class_name(None, "x", true).len(), 1);
    assert_eq!(parser.index().tag_names("p").len(), 1);
    assert!(!parser.remove_node(a));
}

#[test]
fn test_removed_id_passes_to_next_owner() {
    let mut parser = indexed(r#"<div><i id="d">1</i><b id="d">2</b></div>"#);
    let i = parser.get_element_by_id(None, "d", true).unwrap();
    let _ = parser.remove_node(i);
    let next = parser.get_element_by_id(None, "d", true).unwrap();
    assert_eq!(parser.tree().tag_name(next), "b");
}

#[test]
fn test_appended_duplicate_id_follows_document_order() {
    let mut parser = indexed(r#"<div><section id="early"></section><p id="d">late</p></div>"#);
    let early = parser.get_element_by_id(None, "early", true).unwrap();
    let late = parser.get_element_by_id(None, "d", true).unwrap();
    let em = parser
        .parser_mut()
        .tree_mut()
        .create_element_with_attributes("em", &[("id", "d")], false)
        .unwrap();

    let _ = parser.append_node(early, em).unwrap();
    assert_eq!(parser.get_element_by_id(None, "d", true), Some(em));
    assert_eq!(parser.get_element_by_id(None, "d", false), Some(em));

    let root = parser.parser().get_root().unwrap();
    let _ = parser.append_node(root, em).unwrap();
    assert_eq!(parser.get_element_by_id(None, "d", true), Some(late));
    assert_eq!(parser.get_element_by_id(None, "d", false), Some(late));
}

#[test]
fn test_untracked_removal_is_filtered() {
    let mut parser = indexed(DOC);
    let b = parser.get_element_by_id(None, "b", true).unwrap();
    let _ = parser.parser_mut().tree_mut().remove(b);

    assert_eq!(parser.index().tag_names("p").len(), 2);
    assert_eq!(parser.get_elements_by_tag_name(None, "p", true).len(), 1);
    assert!(parser.get_element_by_id(None, "b", true).is_none());

    parser.reindex();
    assert_eq!(parser.index().tag_names("p").len(), 1);
}

#[test]
fn test_append_node_indexes_subtree() {
    let mut parser = indexed(DOC);
    let root = parser.get_element_by_id(None, "root", true).unwrap();
    let tree = parser.parser_mut().tree_mut();
    let section = tree
        .create_element_with_attributes("section", &[("id", "s")], false)
        .unwrap();
    let em = tree
        .create_element_with_attributes("em", &[("class", "new")], false)
        .unwrap();
    let _ = tree.append_child(section, em).unwrap();

    let _ = parser.append_node(root, section).unwrap();
    assert_eq!(parser.get_element_by_id(None, "s", true), Some(section));
    assert_eq!(parser.get_elements_by_class_name(None, "new", true).len(), 1);
    assert_eq!(parser.get_elements_by_tag_name(Some(root), "em", true).len(), 1);
}

#[test]
fn test_append_node_moves_without_duplicates() {
    let mut parser = indexed(DOC);
    let root = parser.get_element_by_id(None, "root", true).unwrap();
    let a = parser.get_element_by_id(None, "a", true).unwrap();
    let _ = parser.append_node(root, a).unwrap();
    assert_eq!(parser.get_elements_by_tag_name(None, "p", true).len(), 2);

    let found = parser.get_elements_by_class_name(None, "x", true);
    assert_eq!(found.len(), 2);
    assert_eq!(parser.tree().child_index(a), Some(2));
}

#[test]
fn test_append_node_into_void_element() {
    let mut parser = indexed("<div><br></div>");
    let br = parser.get_elements_by_tag_name(None, "br", true).first().unwrap();
    let span = parser.parser_mut().tree_mut().create_element("span");
    assert!(parser.append_node(br, span).is_err());
}

// ========== xpath ==========

#[test]
fn test_xpath_passthrough() {
    let parser = indexed(DOC);
    let found = parser.get_elements_by_xpath(r#"//p[@class = "x"]"#).unwrap();
    assert_eq!(found.len(), 1);
}
