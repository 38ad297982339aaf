//! Tree builder: parse events in, [`DomTree`] out.
//!
//! The builder keeps a stack of open elements. Start tags attach to the top
//! of the stack (or become the root), end tags pop back to their match,
//! and everything else becomes text of the current element.

use strum_macros::Display;
use tracing::trace;
use wren_common::warning::warn_once;
use wren_dom::{DomError, DomTree, INVISIBLE_ROOT_TAG, NodeId, is_valid_attribute_name, is_void_element};

use crate::error::HtmlError;
use crate::tokenizer::ParseEvent;

/// Tags inside which text is never normalized, including in nested
/// elements.
pub const PREFORMATTED_TAGS: [&str; 2] = ["pre", "code"];

/// Tags whose direct text is kept verbatim.
pub const PRESERVE_CONTENTS_TAGS: [&str; 4] = ["pre", "code", "script", "style"];

/// How the builder treats structural mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum BuilderMode {
    /// Repair the tree and carry on.
    #[default]
    Lenient,
    /// Stop at the first mismatched close tag or bad attribute name.
    Validating,
}

/// Why building stopped.
#[derive(Debug)]
pub enum BuildError {
    /// The input has more than one top-level node; the caller should
    /// rebuild it inside the invisible wrapper.
    MultipleRoots,
    /// A validation or DOM error.
    Invalid(HtmlError),
}

impl From<HtmlError> for BuildError {
    fn from(error: HtmlError) -> Self {
        Self::Invalid(error)
    }
}

impl From<DomError> for BuildError {
    fn from(error: DomError) -> Self {
        Self::Invalid(HtmlError::Dom(error))
    }
}

impl From<BuildError> for HtmlError {
    fn from(error: BuildError) -> Self {
        match error {
            BuildError::MultipleRoots => Self::MultipleRoots,
            BuildError::Invalid(error) => error,
        }
    }
}

/// Consumes [`ParseEvent`]s into a tree.
pub struct TreeBuilder<'a> {
    tree: &'a mut DomTree,
    mode: BuilderMode,
    open_tags: Vec<NodeId>,
    /// Open `pre`/`code` elements.
    preformatted_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Build into `tree`, which should be empty.
    pub fn new(tree: &'a mut DomTree, mode: BuilderMode) -> Self {
        Self {
            tree,
            mode,
            open_tags: Vec::new(),
            preformatted_depth: 0,
        }
    }

    /// Feed every event, in order.
    ///
    /// # Errors
    ///
    /// See [`Self::process`].
    pub fn build<I: IntoIterator<Item = ParseEvent>>(&mut self, events: I) -> Result<(), BuildError> {
        for event in events {
            self.process(event)?;
        }
        Ok(())
    }

    /// Feed one event.
    ///
    /// # Errors
    ///
    /// [`BuildError::MultipleRoots`] when the event would create a second
    /// top-level node, and validation errors in validating mode.
    pub fn process(&mut self, event: ParseEvent) -> Result<(), BuildError> {
        match event {
            ParseEvent::StartTag {
                name,
                attributes,
                self_closing,
            } => self.handle_start_tag(&name, &attributes, self_closing),
            ParseEvent::EndTag { name } => self.handle_end_tag(&name),
            ParseEvent::Text(text) => self.handle_text(&text),
            ParseEvent::Declaration(text) => {
                if self.tree.doctype().is_none() && !text.trim().is_empty() {
                    self.tree.set_doctype(Some(text));
                }
                Ok(())
            }
            other @ (ParseEvent::EntityRef(_)
            | ParseEvent::CharRef(_)
            | ParseEvent::Comment(_)
            | ParseEvent::ProcessingInstruction(_)) => {
                let current = self.current().ok_or(BuildError::MultipleRoots)?;
                self.tree.append_text(current, &other.to_string())?;
                Ok(())
            }
        }
    }

    /// The innermost open element.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.open_tags.last().copied()
    }

    /// Names of the open elements, outermost first.
    #[must_use]
    pub fn open_tag_names(&self) -> Vec<String> {
        self.open_tags
            .iter()
            .map(|&id| self.tree.tag_name(id).to_string())
            .collect()
    }

    // =========================================================================
    // Start tags
    // =========================================================================

    fn handle_start_tag(
        &mut self,
        name: &str,
        attributes: &[(String, String)],
        self_closing: bool,
    ) -> Result<(), BuildError> {
        let parent = self.current();
        if parent.is_none() && self.tree.root().is_some() {
            return Err(BuildError::MultipleRoots);
        }

        let mut kept: Vec<(&str, &str)> = Vec::with_capacity(attributes.len());
        for (attr, value) in attributes {
            if is_valid_attribute_name(attr) {
                kept.push((attr, value));
            } else if self.mode == BuilderMode::Validating {
                return Err(HtmlError::InvalidAttributeName {
                    tag: name.to_string(),
                    attribute: attr.clone(),
                }
                .into());
            } else {
                warn_once("HTML", &format!("dropped invalid attribute name {attr:?} on <{name}>"));
            }
        }

        let self_closing = self_closing || is_void_element(name);
        let node = self.tree.create_element_with_attributes(name, &kept, self_closing)?;
        match parent {
            Some(parent) => {
                let _ = self.tree.append_child(parent, node)?;
            }
            None => self.tree.set_root(Some(node)),
        }

        if !self_closing {
            self.open_tags.push(node);
            if PREFORMATTED_TAGS.contains(&name) {
                self.preformatted_depth += 1;
            }
        }
        trace!(tag = name, depth = self.open_tags.len(), "opened element");
        Ok(())
    }

    // =========================================================================
    // End tags
    // =========================================================================

    fn handle_end_tag(&mut self, name: &str) -> Result<(), BuildError> {
        let Some(index) = self
            .open_tags
            .iter()
            .rposition(|&id| self.tree.tag_name(id) == name)
        else {
            // `</br>`, `</input>`: void elements never open, so their close tags are noise.
            if is_void_element(name) {
                return Ok(());
            }
            if self.mode == BuilderMode::Validating {
                return Err(HtmlError::InvalidCloseTag { tag: name.to_string() }.into());
            }
            warn_once("HTML", &format!("close tag </{name}> matches no open tag"));
            return Ok(());
        };

        // Closing the wrapper ends the document, which closes everything
        // inside it as end of input would.
        if index + 1 < self.open_tags.len() && name != INVISIBLE_ROOT_TAG {
            let unclosed: Vec<String> = self.open_tags[index + 1..]
                .iter()
                .map(|&id| self.tree.tag_name(id).to_string())
                .collect();
            if self.mode == BuilderMode::Validating {
                return Err(HtmlError::MissedCloseTag {
                    tag: name.to_string(),
                    open_tags: unclosed,
                }
                .into());
            }
            warn_once(
                "HTML",
                &format!("close tag </{name}> implicitly closes {}", unclosed.join(", ")),
            );
        }

        for id in self.open_tags.split_off(index) {
            if PREFORMATTED_TAGS.contains(&self.tree.tag_name(id)) {
                self.preformatted_depth = self.preformatted_depth.saturating_sub(1);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Text
    // =========================================================================

    fn handle_text(&mut self, text: &str) -> Result<(), BuildError> {
        let Some(current) = self.current() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(BuildError::MultipleRoots);
        };
        let verbatim = self.preformatted_depth > 0
            || PRESERVE_CONTENTS_TAGS.contains(&self.tree.tag_name(current));
        if verbatim {
            self.tree.append_text(current, text)?;
        } else {
            self.tree.append_text(current, &normalize_text(text))?;
        }
        Ok(())
    }
}

/// Tabs become spaces and leading/trailing line breaks go; surrounding
/// whitespace then shrinks to at most one space on each side.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let text = text.replace('\t', " ");
    let text = text.trim_matches(['\r', '\n']);
    let mut out = String::with_capacity(text.len());
    if text.starts_with(' ') {
        out.push(' ');
        out.push_str(text.trim_start());
    } else {
        out.push_str(text);
    }
    if out.ends_with(' ') {
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("\n  Hello\tworld  \n"), " Hello world ");
        assert_eq!(normalize_text("plain"), "plain");
        assert_eq!(normalize_text("\r\n"), "");
        assert_eq!(normalize_text("\n   \n"), " ");
        assert_eq!(normalize_text("a\nb"), "a\nb");
    }
}
