//! Internet Explorer conditional comments.
//!
//! `<!--[if IE]> ... <![endif]-->` is one big comment to every other
//! browser. Left in, such a comment before the root element would force the
//! multi-root wrapper, so the parser removes these blocks up front.

use std::borrow::Cow;

/// Remove conditional comment blocks and stray `<![endif]-->` markers.
///
/// A block runs from `<!--[if ...` to the next `-->`. Downlevel-revealed
/// markers (`<!--[if !IE]><!-->` and `<!--<![endif]-->`) are removed
/// while the markup between them is kept.
#[must_use]
pub fn strip_ie_conditionals(html: &str) -> Cow<'_, str> {
    let lower = html.to_ascii_lowercase();
    if !lower.contains("[if") && !lower.contains("[endif]") {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(offset) = lower[pos..].find("<!") {
        let start = pos + offset;
        out.push_str(&html[pos..start]);
        let rest = &lower[start..];
        let skip = if let Some(after) = rest.strip_prefix("<!--")
            && after.trim_start().starts_with("[if")
        {
            rest.find("-->").map_or(rest.len(), |end| end + 3)
        } else if rest.starts_with("<!--<![endif]-->") {
            "<!--<![endif]-->".len()
        } else if rest.starts_with("<![endif]-->") {
            "<![endif]-->".len()
        } else if rest.starts_with("<![endif]>") {
            "<![endif]>".len()
        } else {
            out.push_str("<!");
            2
        };
        pos = start + skip;
    }
    out.push_str(&html[pos..]);
    Cow::Owned(out)
}
