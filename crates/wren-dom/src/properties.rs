//! Script-style element properties.
//!
//! [§ 2.6.1 Reflecting content attributes in IDL attributes](https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes)
//!
//! A property like `tabIndex` or `colSpan` is a typed view over a content
//! attribute. [`PROPERTIES`] lists every supported property with the
//! attribute it reflects and the coercion rule it follows; the two
//! accessors below consult the table and nothing else.
//!
//! The property setters validate and may fail. Raw
//! [`DomTree::set_attribute`] stores any string and never applies these
//! rules; the getters then degrade to the documented fallback value.

use std::fmt;

use strum_macros::Display;

use crate::error::DomError;
use crate::node::NodeId;
use crate::tree::DomTree;

/// Coercion rule for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PropertyKind {
    /// Plain string reflection; unset reads as `""`.
    Text,
    /// Presence of a binary attribute.
    Binary,
    /// Boolean read, stored as the literal `"true"`/`"false"`.
    BoolString,
    /// Unset is -1, non-numeric is 0.
    TabIndex,
    /// Clamped to 1..=1000, invalid is 1.
    ColSpan,
    /// Clamped to 0..=65534, unset is 1, invalid is 0.
    RowSpan,
    /// Non-negative; unset or invalid reads -1, negative set fails.
    MaxLength,
    /// Clamped to 1..=1000 (`col`/`colgroup`).
    Span,
    /// Positive integer, default 20; non-positive set fails.
    Size,
    /// `anonymous` / `use-credentials`; empty or unset is null.
    CrossOrigin,
    /// `on`/`off`, default depends on the element.
    Autocomplete,
    /// `get`/`post` on `form`, default `get`.
    Method,
    /// `track` kind keyword.
    TrackKind,
    /// Numeric on `textarea` (default 2), opaque on `frameset`.
    Rows,
    /// Numeric on `textarea` (default 20), opaque on `frameset`.
    Cols,
    /// The class list as a string.
    ClassName,
    /// The inline style as a string.
    Style,
    /// The tag name (read-only).
    TagName,
}

/// One entry of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    /// Script-style property name (`tabIndex`).
    pub name: &'static str,
    /// Reflected content attribute (`tabindex`).
    pub attribute: &'static str,
    /// Coercion rule.
    pub kind: PropertyKind,
    /// Elements the property exists on; empty means every element.
    pub tags: &'static [&'static str],
}

const fn prop(name: &'static str, attribute: &'static str, kind: PropertyKind) -> PropertySpec {
    PropertySpec {
        name,
        attribute,
        kind,
        tags: &[],
    }
}

const fn prop_on(
    name: &'static str,
    attribute: &'static str,
    kind: PropertyKind,
    tags: &'static [&'static str],
) -> PropertySpec {
    PropertySpec {
        name,
        attribute,
        kind,
        tags,
    }
}

const CROSS_ORIGIN_TAGS: &[&str] = &["audio", "img", "link", "script", "video"];

/// Every supported property.
pub static PROPERTIES: &[PropertySpec] = &[
    // Plain reflections
    prop("id", "id", PropertyKind::Text),
    prop("title", "title", PropertyKind::Text),
    prop("lang", "lang", PropertyKind::Text),
    prop("dir", "dir", PropertyKind::Text),
    prop("name", "name", PropertyKind::Text),
    prop("value", "value", PropertyKind::Text),
    prop("type", "type", PropertyKind::Text),
    prop("href", "href", PropertyKind::Text),
    prop("src", "src", PropertyKind::Text),
    prop("alt", "alt", PropertyKind::Text),
    prop("rel", "rel", PropertyKind::Text),
    prop("target", "target", PropertyKind::Text),
    prop("placeholder", "placeholder", PropertyKind::Text),
    prop("action", "action", PropertyKind::Text),
    prop("enctype", "enctype", PropertyKind::Text),
    prop("accept", "accept", PropertyKind::Text),
    prop("charset", "charset", PropertyKind::Text),
    prop("content", "content", PropertyKind::Text),
    prop("media", "media", PropertyKind::Text),
    prop("label", "label", PropertyKind::Text),
    prop("pattern", "pattern", PropertyKind::Text),
    prop("min", "min", PropertyKind::Text),
    prop("max", "max", PropertyKind::Text),
    prop("step", "step", PropertyKind::Text),
    prop("align", "align", PropertyKind::Text),
    prop("width", "width", PropertyKind::Text),
    prop("height", "height", PropertyKind::Text),
    // Renamed reflections
    prop("htmlFor", "for", PropertyKind::Text),
    prop("accessKey", "accesskey", PropertyKind::Text),
    prop("httpEquiv", "http-equiv", PropertyKind::Text),
    prop("acceptCharset", "accept-charset", PropertyKind::Text),
    prop("dateTime", "datetime", PropertyKind::Text),
    prop("useMap", "usemap", PropertyKind::Text),
    prop("className", "class", PropertyKind::ClassName),
    prop("style", "style", PropertyKind::Style),
    prop("tagName", "", PropertyKind::TagName),
    // Binary attributes
    prop("checked", "checked", PropertyKind::Binary),
    prop("disabled", "disabled", PropertyKind::Binary),
    prop("hidden", "hidden", PropertyKind::Binary),
    prop("readOnly", "readonly", PropertyKind::Binary),
    prop("required", "required", PropertyKind::Binary),
    prop("selected", "selected", PropertyKind::Binary),
    prop("multiple", "multiple", PropertyKind::Binary),
    prop("autofocus", "autofocus", PropertyKind::Binary),
    prop("async", "async", PropertyKind::Binary),
    prop("defer", "defer", PropertyKind::Binary),
    prop("noValidate", "novalidate", PropertyKind::Binary),
    prop("open", "open", PropertyKind::Binary),
    prop("loop", "loop", PropertyKind::Binary),
    prop("muted", "muted", PropertyKind::Binary),
    prop("controls", "controls", PropertyKind::Binary),
    prop("autoplay", "autoplay", PropertyKind::Binary),
    prop("isMap", "ismap", PropertyKind::Binary),
    prop("reversed", "reversed", PropertyKind::Binary),
    prop("default", "default", PropertyKind::Binary),
    // Booleans stored as strings
    prop("spellcheck", "spellcheck", PropertyKind::BoolString),
    prop("draggable", "draggable", PropertyKind::BoolString),
    // Numeric and enumerated
    prop("tabIndex", "tabindex", PropertyKind::TabIndex),
    prop_on("colSpan", "colspan", PropertyKind::ColSpan, &["td", "th"]),
    prop_on("rowSpan", "rowspan", PropertyKind::RowSpan, &["td", "th"]),
    prop_on("maxLength", "maxlength", PropertyKind::MaxLength, &["input", "textarea"]),
    prop_on("span", "span", PropertyKind::Span, &["col", "colgroup"]),
    prop_on("size", "size", PropertyKind::Size, &["input"]),
    prop_on("crossOrigin", "crossorigin", PropertyKind::CrossOrigin, CROSS_ORIGIN_TAGS),
    prop_on("autocomplete", "autocomplete", PropertyKind::Autocomplete, &["form", "input"]),
    prop_on("method", "method", PropertyKind::Method, &["form"]),
    prop_on("kind", "kind", PropertyKind::TrackKind, &["track"]),
    prop_on("rows", "rows", PropertyKind::Rows, &["textarea", "frameset"]),
    prop_on("cols", "cols", PropertyKind::Cols, &["textarea", "frameset"]),
];

const TRACK_KINDS: &[&str] = &["subtitles", "captions", "descriptions", "chapters", "metadata"];

/// Find the table entry for `name` on an element named `tag_name`.
#[must_use]
pub fn lookup_property(tag_name: &str, name: &str) -> Option<&'static PropertySpec> {
    PROPERTIES
        .iter()
        .find(|spec| spec.name == name && (spec.tags.is_empty() || spec.tags.contains(&tag_name)))
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// No value (`null`).
    Null,
}

impl PropertyValue {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Null => false,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Null => String::new(),
        }
    }

    fn to_int(&self, property: &'static str) -> Result<i64, DomError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Bool(b) => Ok(i64::from(*b)),
            Self::Str(s) => parse_int(s).ok_or_else(|| DomError::InvalidPropertyValue {
                property,
                value: s.clone(),
            }),
            Self::Null => Err(DomError::InvalidPropertyValue {
                property,
                value: "null".to_string(),
            }),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

impl DomTree {
    fn property_spec(&self, id: NodeId, name: &str) -> Result<&'static PropertySpec, DomError> {
        let tag = self.tag_name(id);
        lookup_property(tag, name).ok_or_else(|| DomError::UnknownProperty {
            property: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Read a property through the dispatch table.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownProperty`] if the property does not exist on this
    /// element.
    pub fn get_property(&self, id: NodeId, name: &str) -> Result<PropertyValue, DomError> {
        let spec = self.property_spec(id, name)?;
        let tag = self.tag_name(id);
        let stored = self.attribute(id, spec.attribute);
        let raw = stored.as_deref();

        let value = match spec.kind {
            PropertyKind::Text => PropertyValue::Str(raw.unwrap_or_default().to_string()),
            PropertyKind::Binary => PropertyValue::Bool(raw.is_some()),
            PropertyKind::BoolString => PropertyValue::Bool(
                raw.is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true")),
            ),
            PropertyKind::TabIndex => {
                PropertyValue::Int(raw.map_or(-1, |v| parse_int(v).unwrap_or(0)))
            }
            PropertyKind::ColSpan | PropertyKind::Span => {
                PropertyValue::Int(raw.and_then(parse_int).map_or(1, |n| n.clamp(1, 1000)))
            }
            PropertyKind::RowSpan => PropertyValue::Int(
                raw.map_or(1, |v| parse_int(v).map_or(0, |n| n.clamp(0, 65534))),
            ),
            PropertyKind::MaxLength => {
                PropertyValue::Int(raw.and_then(parse_int).filter(|n| *n >= 0).unwrap_or(-1))
            }
            PropertyKind::Size => {
                PropertyValue::Int(raw.and_then(parse_int).filter(|n| *n > 0).unwrap_or(20))
            }
            PropertyKind::CrossOrigin => match raw {
                None | Some("") => PropertyValue::Null,
                Some(v) if v.eq_ignore_ascii_case("use-credentials") => {
                    PropertyValue::from("use-credentials")
                }
                Some(_) => PropertyValue::from("anonymous"),
            },
            PropertyKind::Autocomplete => {
                let fallback = if tag == "form" { "on" } else { "" };
                let keyword = raw
                    .map(str::to_ascii_lowercase)
                    .filter(|v| v == "on" || v == "off");
                PropertyValue::Str(keyword.unwrap_or_else(|| fallback.to_string()))
            }
            PropertyKind::Method => {
                let method = raw.map(str::to_ascii_lowercase);
                PropertyValue::from(if method.as_deref() == Some("post") {
                    "post"
                } else {
                    "get"
                })
            }
            PropertyKind::TrackKind => match raw.map(str::to_ascii_lowercase) {
                None => PropertyValue::from("subtitles"),
                Some(kind) if TRACK_KINDS.contains(&kind.as_str()) => PropertyValue::Str(kind),
                Some(_) => PropertyValue::from("metadata"),
            },
            PropertyKind::Rows | PropertyKind::Cols if tag == "frameset" => {
                PropertyValue::Str(raw.unwrap_or_default().to_string())
            }
            PropertyKind::Rows | PropertyKind::Cols => {
                let default = if spec.kind == PropertyKind::Rows { 2 } else { 20 };
                PropertyValue::Int(raw.and_then(parse_int).filter(|n| *n > 0).unwrap_or(default))
            }
            PropertyKind::ClassName => PropertyValue::Str(self.class_name(id)),
            PropertyKind::Style => PropertyValue::Str(self.style(id).to_string()),
            PropertyKind::TagName => PropertyValue::Str(tag.to_string()),
        };
        Ok(value)
    }

    /// Assign a property through the dispatch table.
    ///
    /// `PropertyValue::Null` removes the reflected attribute.
    ///
    /// # Errors
    ///
    /// - [`DomError::UnknownProperty`] for names not valid on this element
    /// - [`DomError::ReadOnlyProperty`] for `tagName`
    /// - [`DomError::InvalidPropertyValue`] when a numeric property gets a
    ///   non-numeric value
    /// - [`DomError::IndexSize`] for a negative `maxLength` or a
    ///   non-positive `size`/`rows`/`cols`
    pub fn set_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), DomError> {
        let spec = self.property_spec(id, name)?;
        let value = value.into();
        tracing::trace!(property = spec.name, kind = %spec.kind, %value, "set property");

        if spec.kind == PropertyKind::TagName {
            return Err(DomError::ReadOnlyProperty {
                property: spec.name,
            });
        }
        if value == PropertyValue::Null {
            let _ = self.remove_attribute(id, spec.attribute);
            return Ok(());
        }

        let stored = match spec.kind {
            PropertyKind::Binary => {
                if !value.is_truthy() {
                    let _ = self.remove_attribute(id, spec.attribute);
                    return Ok(());
                }
                String::new()
            }
            PropertyKind::BoolString => value.is_truthy().to_string(),
            PropertyKind::TabIndex
            | PropertyKind::ColSpan
            | PropertyKind::RowSpan
            | PropertyKind::Span => value.to_int(spec.name)?.to_string(),
            PropertyKind::MaxLength => {
                let n = value.to_int(spec.name)?;
                if n < 0 {
                    return Err(DomError::IndexSize {
                        property: spec.name,
                        value: n.to_string(),
                    });
                }
                n.to_string()
            }
            PropertyKind::Rows | PropertyKind::Cols if self.tag_name(id) == "frameset" => {
                value.to_text()
            }
            PropertyKind::Size | PropertyKind::Rows | PropertyKind::Cols => {
                let n = value.to_int(spec.name)?;
                if n <= 0 {
                    return Err(DomError::IndexSize {
                        property: spec.name,
                        value: n.to_string(),
                    });
                }
                n.to_string()
            }
            PropertyKind::Text
            | PropertyKind::CrossOrigin
            | PropertyKind::Autocomplete
            | PropertyKind::Method
            | PropertyKind::TrackKind
            | PropertyKind::ClassName
            | PropertyKind::Style
            | PropertyKind::TagName => value.to_text(),
        };
        self.raw_set_attribute(id, spec.attribute, &stored);
        Ok(())
    }
}
