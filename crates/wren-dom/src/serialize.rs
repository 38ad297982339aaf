//! HTML and XHTML serialization.
//!
//! Attribute values only escape `"`; text blocks are written back exactly
//! as stored (the builder keeps entity references in their source form).

use std::fmt::Write;

use crate::attributes::is_binary_attribute;
use crate::node::{Block, NodeId};
use crate::tree::DomTree;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Html,
    Xhtml,
}

fn escape_attribute_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl DomTree {
    /// The opening tag with all attributes, e.g. `<input type="text" checked>`.
    /// Self-closing nodes render as `<br />`.
    #[must_use]
    pub fn start_tag(&self, id: NodeId) -> String {
        self.start_tag_as(id, Flavor::Html)
    }

    fn start_tag_as(&self, id: NodeId, flavor: Flavor) -> String {
        let node = self.node(id);
        let mut out = format!("<{}", node.tag_name);
        for (name, value) in node.attributes.iter() {
            let bare = value.is_empty() && is_binary_attribute(name);
            match (bare, flavor) {
                (true, Flavor::Html) => {
                    let _ = write!(out, " {name}");
                }
                (true, Flavor::Xhtml) => {
                    let _ = write!(out, " {name}=\"{name}\"");
                }
                (false, _) => {
                    let _ = write!(out, " {name}=\"{}\"", escape_attribute_value(&value));
                }
            }
        }
        out.push_str(if node.is_self_closing { " />" } else { ">" });
        out
    }

    /// The closing tag; empty for self-closing nodes.
    #[must_use]
    pub fn end_tag(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.is_self_closing {
            String::new()
        } else {
            format!("</{}>", node.tag_name)
        }
    }

    /// Serialized content of the node, without its own tags.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_inner(id, Flavor::Html, &mut out);
        out
    }

    /// The node and its content. The invisible wrapper root renders only
    /// its content.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outer(id, Flavor::Html, &mut out);
        out
    }

    /// Like [`Self::outer_html`] but valid XHTML: binary attributes are
    /// written as `name="name"`.
    #[must_use]
    pub fn outer_xhtml(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outer(id, Flavor::Xhtml, &mut out);
        out
    }

    /// The whole document: the declaration (if any) on its own line, then
    /// the root. An empty document yields an empty string.
    #[must_use]
    pub fn get_html(&self) -> String {
        let Some(root) = self.root() else {
            return String::new();
        };
        let mut out = String::new();
        if let Some(doctype) = self.doctype() {
            let _ = writeln!(out, "<!{doctype}>");
        }
        self.write_outer(root, Flavor::Html, &mut out);
        out
    }

    fn write_outer(&self, id: NodeId, flavor: Flavor, out: &mut String) {
        if self.is_invisible_root(id) {
            self.write_inner(id, flavor, out);
            return;
        }
        out.push_str(&self.start_tag_as(id, flavor));
        if self.node(id).is_self_closing {
            return;
        }
        self.write_inner(id, flavor, out);
        out.push_str(&self.end_tag(id));
    }

    fn write_inner(&self, id: NodeId, flavor: Flavor, out: &mut String) {
        for block in &self.node(id).blocks {
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Tag(child) => self.write_outer(*child, flavor, out),
            }
        }
    }

    /// Indented outline of a subtree for debugging.
    #[must_use]
    pub fn dump_tree(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, indent: usize, out: &mut String) {
        let prefix = "  ".repeat(indent);
        let _ = writeln!(out, "{prefix}{}", self.start_tag(id));
        for block in &self.node(id).blocks {
            match block {
                Block::Tag(child) => self.dump_into(*child, indent + 1, out),
                Block::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let _ = writeln!(out, "{prefix}  \"{trimmed}\"");
                    }
                }
            }
        }
    }
}
