//! Per-element attribute storage.
//!
//! [§ 4.9.2 Interface `NamedNodeMap`](https://dom.spec.whatwg.org/#interface-namednodemap)
//!
//! Names are lowercased at every boundary. `class` and `style` are not
//! stored as strings: they are views over a [`ClassList`] and a
//! [`StyleMap`], synthesized when the store is read and absent whenever the
//! underlying list or map is empty. Their position among the other
//! attributes is kept so serialization order is stable.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use crate::class_list::ClassList;
use crate::node::NodeId;
use crate::style::StyleMap;

/// Attributes whose presence means true and absence means false.
///
/// [§ 2.3.2 Boolean attributes](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#boolean-attributes)
pub const BINARY_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "declare",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "indeterminate",
    "inert",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "noresize",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "readonly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "selected",
    "truespeed",
    "typemustmatch",
];

/// True for attributes listed in [`BINARY_ATTRIBUTES`] (case-insensitive).
#[must_use]
pub fn is_binary_attribute(name: &str) -> bool {
    BINARY_ATTRIBUTES
        .iter()
        .any(|binary| binary.eq_ignore_ascii_case(name))
}

/// Attribute-name grammar: a letter or `_`, then letters, digits, `-` or `_`.
#[must_use]
pub fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Result of [`DomTree::get_attribute`](crate::DomTree::get_attribute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A binary attribute: present (with any value) or absent.
    Flag(bool),
    /// The stored value of an ordinary attribute.
    Text(String),
    /// An ordinary attribute that is not set.
    Unset,
}

impl AttributeValue {
    /// The text of an ordinary attribute, if set.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Flag(_) | Self::Unset => None,
        }
    }

    /// The text of an ordinary attribute, or `default` when unset.
    /// Binary attributes render as `"true"`/`"false"`.
    #[must_use]
    pub fn unwrap_or(self, default: &str) -> String {
        match self {
            Self::Text(value) => value,
            Self::Flag(flag) => flag.to_string(),
            Self::Unset => default.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Plain(String, String),
    Class,
    Style,
}

/// Ordered attribute storage for one element.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    slots: Vec<Slot>,
    class_list: ClassList,
    style: StyleMap,
}

impl AttributeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of an attribute; `class`/`style` are rendered from their views.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        let key = name.to_ascii_lowercase();
        match key.as_str() {
            "class" => (!self.class_list.is_empty()).then(|| Cow::Owned(self.class_list.to_string())),
            "style" => (!self.style.is_empty()).then(|| Cow::Owned(self.style.to_string())),
            _ => self.slots.iter().find_map(|slot| match slot {
                Slot::Plain(n, v) if *n == key => Some(Cow::Borrowed(v.as_str())),
                _ => None,
            }),
        }
    }

    /// Whether an attribute is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute without validating its name.
    ///
    /// `class` and `style` values are parsed into their views.
    pub fn set(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        match key.as_str() {
            "class" => self.set_class_name(value),
            "style" => {
                self.style = StyleMap::parse(value);
                self.sync_style();
            }
            _ => {
                let existing = self.slots.iter_mut().find_map(|slot| match slot {
                    Slot::Plain(n, v) if *n == key => Some(v),
                    _ => None,
                });
                match existing {
                    Some(v) => *v = value.to_string(),
                    None => self.slots.push(Slot::Plain(key, value.to_string())),
                }
            }
        }
    }

    /// Remove an attribute, returning its previous value. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let key = name.to_ascii_lowercase();
        let old = self.get(&key).map(Cow::into_owned);
        match key.as_str() {
            "class" => {
                self.class_list.clear();
                self.sync_class();
            }
            "style" => {
                self.style.clear();
                self.sync_style();
            }
            _ => self
                .slots
                .retain(|slot| !matches!(slot, Slot::Plain(n, _) if *n == key)),
        }
        old
    }

    /// Number of present attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no attribute is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Present attributes in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.slots.iter().map(|slot| match slot {
            Slot::Plain(name, value) => (name.as_str(), Cow::Borrowed(value.as_str())),
            Slot::Class => ("class", Cow::Owned(self.class_list.to_string())),
            Slot::Style => ("style", Cow::Owned(self.style.to_string())),
        })
    }

    /// Owned `(name, value)` pairs in serialization order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.into_owned()))
            .collect()
    }

    /// Tag-equality of attribute sets: same names and values, any order.
    /// Style compares as a declaration set.
    #[must_use]
    pub fn same_attributes(&self, other: &Self) -> bool {
        if self.len() != other.len() || self.class_list != other.class_list || self.style != other.style {
            return false;
        }
        self.slots.iter().all(|slot| match slot {
            Slot::Plain(name, value) => other.get(name).is_some_and(|v| v == value.as_str()),
            Slot::Class | Slot::Style => true,
        })
    }

    /// The class token list.
    #[must_use]
    pub const fn class_list(&self) -> &ClassList {
        &self.class_list
    }

    /// Add whitespace-separated class tokens.
    pub fn add_class(&mut self, value: &str) {
        let _ = self.class_list.add(value);
        self.sync_class();
    }

    /// Remove whitespace-separated class tokens.
    pub fn remove_class(&mut self, value: &str) -> Option<String> {
        let removed = self.class_list.remove(value);
        self.sync_class();
        removed
    }

    /// Replace the class list from a `class` attribute value.
    pub fn set_class_name(&mut self, value: &str) {
        self.class_list.set(value);
        self.sync_class();
    }

    /// The parsed inline style.
    #[must_use]
    pub const fn style(&self) -> &StyleMap {
        &self.style
    }

    /// Mutable access to the inline style; presence of the `style`
    /// attribute is updated when the guard drops.
    pub fn style_mut(&mut self) -> StyleGuard<'_> {
        StyleGuard { store: self }
    }

    fn sync_class(&mut self) {
        let present = !self.class_list.is_empty();
        self.sync_marker(&Slot::Class, present);
    }

    fn sync_style(&mut self) {
        let present = !self.style.is_empty();
        self.sync_marker(&Slot::Style, present);
    }

    fn sync_marker(&mut self, marker: &Slot, present: bool) {
        match (self.slots.iter().position(|slot| slot == marker), present) {
            (None, true) => self.slots.push(marker.clone()),
            (Some(pos), false) => {
                let _ = self.slots.remove(pos);
            }
            _ => {}
        }
    }
}

/// Mutable borrow of an element's [`StyleMap`].
///
/// Dropping the guard adds or removes the `style` attribute to match
/// whether the map is empty.
pub struct StyleGuard<'a> {
    store: &'a mut AttributeStore,
}

impl Deref for StyleGuard<'_> {
    type Target = StyleMap;

    fn deref(&self) -> &StyleMap {
        &self.store.style
    }
}

impl DerefMut for StyleGuard<'_> {
    fn deref_mut(&mut self) -> &mut StyleMap {
        &mut self.store.style
    }
}

impl Drop for StyleGuard<'_> {
    fn drop(&mut self) {
        self.store.sync_style();
    }
}

/// One attribute as a standalone object (DOM `Attr`).
///
/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
    /// The element the attribute was read from.
    pub owner_element: Option<NodeId>,
}

/// Snapshot of an element's attributes as [`Attr`] objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNodeMap {
    items: Vec<Attr>,
}

impl NamedNodeMap {
    pub(crate) fn from_store(store: &AttributeStore, owner: NodeId) -> Self {
        Self {
            items: store
                .iter()
                .map(|(name, value)| Attr {
                    name: name.to_string(),
                    value: value.into_owned(),
                    owner_element: Some(owner),
                })
                .collect(),
        }
    }

    /// The attribute at `index`, in serialization order.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.items.get(index)
    }

    /// The attribute named `name` (case-insensitive).
    #[must_use]
    pub fn get_named_item(&self, name: &str) -> Option<&Attr> {
        self.items
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Attributes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.items.iter()
    }
}
