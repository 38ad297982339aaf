//! Element-name tables shared by the tree and the builder.

/// Tag name of the synthetic wrapper root used when a document has more
/// than one top-level element. It is never serialized.
pub const INVISIBLE_ROOT_TAG: &str = "xxxblank";

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// Plus the legacy names browsers still treat as void.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// True if `tag_name` (any case) is always self-closing.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}
