//! Named character references for attribute values.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! Covers the references that turn up in real attribute values. Text
//! content never needs this table: the tree builder keeps references in
//! text verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

/// `(name, replacement, usable without ';')`
const ENTITIES: &[(&str, &str, bool)] = &[
    ("amp", "&", true),
    ("lt", "<", true),
    ("gt", ">", true),
    ("quot", "\"", true),
    ("apos", "'", false),
    ("nbsp", "\u{00A0}", true),
    ("copy", "\u{00A9}", true),
    ("reg", "\u{00AE}", true),
    ("trade", "\u{2122}", false),
    ("mdash", "\u{2014}", false),
    ("ndash", "\u{2013}", false),
    ("hellip", "\u{2026}", false),
    ("bull", "\u{2022}", false),
    ("middot", "\u{00B7}", true),
    ("lsquo", "\u{2018}", false),
    ("rsquo", "\u{2019}", false),
    ("ldquo", "\u{201C}", false),
    ("rdquo", "\u{201D}", false),
    ("laquo", "\u{00AB}", true),
    ("raquo", "\u{00BB}", true),
    ("cent", "\u{00A2}", true),
    ("pound", "\u{00A3}", true),
    ("euro", "\u{20AC}", false),
    ("yen", "\u{00A5}", true),
    ("sect", "\u{00A7}", true),
    ("para", "\u{00B6}", true),
    ("times", "\u{00D7}", true),
    ("divide", "\u{00F7}", true),
    ("plusmn", "\u{00B1}", true),
    ("deg", "\u{00B0}", true),
    ("frac12", "\u{00BD}", true),
    ("frac14", "\u{00BC}", true),
    ("frac34", "\u{00BE}", true),
    ("ne", "\u{2260}", false),
    ("le", "\u{2264}", false),
    ("ge", "\u{2265}", false),
    ("larr", "\u{2190}", false),
    ("rarr", "\u{2192}", false),
    ("uarr", "\u{2191}", false),
    ("darr", "\u{2193}", false),
    ("alpha", "\u{03B1}", false),
    ("beta", "\u{03B2}", false),
    ("gamma", "\u{03B3}", false),
    ("delta", "\u{03B4}", false),
    ("pi", "\u{03C0}", false),
    ("sigma", "\u{03C3}", false),
    ("omega", "\u{03C9}", false),
    ("Agrave", "\u{00C0}", true),
    ("Aacute", "\u{00C1}", true),
    ("Auml", "\u{00C4}", true),
    ("agrave", "\u{00E0}", true),
    ("aacute", "\u{00E1}", true),
    ("auml", "\u{00E4}", true),
    ("Eacute", "\u{00C9}", true),
    ("egrave", "\u{00E8}", true),
    ("eacute", "\u{00E9}", true),
    ("iacute", "\u{00ED}", true),
    ("oacute", "\u{00F3}", true),
    ("ouml", "\u{00F6}", true),
    ("Ouml", "\u{00D6}", true),
    ("uacute", "\u{00FA}", true),
    ("uuml", "\u{00FC}", true),
    ("Uuml", "\u{00DC}", true),
    ("ntilde", "\u{00F1}", true),
    ("ccedil", "\u{00E7}", true),
    ("szlig", "\u{00DF}", true),
];

static BY_NAME: LazyLock<HashMap<&'static str, (&'static str, bool)>> = LazyLock::new(|| {
    ENTITIES
        .iter()
        .map(|&(name, value, legacy)| (name, (value, legacy)))
        .collect()
});

/// Replacement text for `&name;`.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    BY_NAME.get(name).map(|&(value, _)| value)
}

/// Replacement text for `&name` written without the semicolon; only the
/// legacy references allow that.
#[must_use]
pub fn lookup_legacy_entity(name: &str) -> Option<&'static str> {
    BY_NAME
        .get(name)
        .and_then(|&(value, legacy)| legacy.then_some(value))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Decode the part after `&#` (`65`, `x41`). Zero, surrogates and values
/// past U+10FFFF become U+FFFD.
#[must_use]
pub fn decode_numeric(code: &str) -> Option<char> {
    let value = match code.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => code.parse::<u32>().ok(),
    };
    let value = match value {
        Some(value) => value,
        // Too many digits to fit: out of range anyway.
        None if !code.trim_start_matches(['x', 'X']).is_empty() => u32::MAX,
        None => return None,
    };
    Some(char::from_u32(value).filter(|&c| c != '\0').unwrap_or('\u{FFFD}'))
}
