use strum_macros::Display;

use super::event::ParseEvent;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// States of the tokenizer. The tag and attribute states mirror their
/// WHATWG namesakes; markup declarations and raw text are handled by
/// lookahead instead of character-level states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// Contents of `script` and `style`, up to the matching end tag.
    RawText,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
}

/// A start or end tag being read.
#[derive(Debug, Default)]
pub(super) struct TagInProgress {
    pub(super) name: String,
    pub(super) attributes: Vec<(String, String)>,
    pub(super) self_closing: bool,
    pub(super) is_end: bool,
}

/// Converts markup into [`ParseEvent`]s.
///
/// ```
/// use wren_html::tokenizer::{ParseEvent, Tokenizer};
///
/// let events = Tokenizer::new("<p class=a>x</p>").run();
/// assert_eq!(events[1], ParseEvent::Text("x".to_string()));
/// ```
pub struct Tokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    /// When set, the next loop iteration reuses the current character.
    pub(super) reconsume: bool,
    /// Byte offset of the `<` that opened the tag being read.
    pub(super) tag_start: usize,
    pub(super) current_tag: Option<TagInProgress>,
    /// End tag name that closes the current raw text run.
    pub(super) raw_text_end: Option<String>,
    pub(super) text_buffer: String,
    pub(super) events: Vec<ParseEvent>,
}

impl Tokenizer {
    /// Create a tokenizer in the data state.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            state: TokenizerState::Data,
            input: input.into(),
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            tag_start: 0,
            current_tag: None,
            raw_text_end: None,
            text_buffer: String::new(),
            events: Vec::new(),
        }
    }

    /// Tokenize the whole input.
    #[must_use]
    pub fn run(mut self) -> Vec<ParseEvent> {
        loop {
            if self.state == TokenizerState::RawText {
                self.handle_raw_text();
                continue;
            }
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }
            let Some(c) = self.current_input_character else {
                self.handle_eof();
                break;
            };
            match self.state {
                TokenizerState::Data => self.handle_data_state(c),
                TokenizerState::RawText => {}
                TokenizerState::TagOpen => self.handle_tag_open_state(c),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(c),
                TokenizerState::TagName => self.handle_tag_name_state(c),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(c),
                TokenizerState::AttributeName => self.handle_attribute_name_state(c),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(c),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
                TokenizerState::AttributeValueDoubleQuoted => self.handle_attribute_value_quoted_state(c, '"'),
                TokenizerState::AttributeValueSingleQuoted => self.handle_attribute_value_quoted_state(c, '\''),
                TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(c),
                TokenizerState::AfterAttributeValueQuoted => self.handle_after_attribute_value_quoted_state(c),
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(c),
            }
        }
        self.events
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: char) {
        match c {
            '&' => self.consume_reference_in_data(),
            '<' => {
                self.tag_start = self.current_pos - 1;
                self.switch_to(TokenizerState::TagOpen);
            }
            _ => self.text_buffer.push(c),
        }
    }

    /// Everything up to `</name` (any case) followed by whitespace, `/`
    /// or `>` is text; the end tag itself goes back through the data state.
    fn handle_raw_text(&mut self) {
        let Some(end_name) = self.raw_text_end.take() else {
            self.switch_to(TokenizerState::Data);
            return;
        };
        let rest = &self.input[self.current_pos..];
        let end = find_end_tag(rest, &end_name).unwrap_or(rest.len());
        let raw = rest[..end].to_string();
        self.text_buffer.push_str(&raw);
        self.current_pos += end;
        self.switch_to(TokenizerState::Data);
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, c: char) {
        match c {
            '!' => self.handle_markup_declaration(),
            '/' => self.switch_to(TokenizerState::EndTagOpen),
            '?' => self.handle_processing_instruction(),
            c if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagInProgress::default());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "invalid-first-character-of-tag-name": the `<` is text.
            _ => {
                self.text_buffer.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagInProgress {
                    is_end: true,
                    ..TagInProgress::default()
                });
                self.reconsume_in(TokenizerState::TagName);
            }
            // "missing-end-tag-name": `</>` is dropped.
            '>' => self.switch_to(TokenizerState::Data),
            _ => {
                self.text_buffer.push_str("</");
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.emit_current_tag(),
            c => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => {}
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.emit_current_tag(),
            // "unexpected-equals-sign-before-attribute-name": `=` starts the name.
            '=' => {
                self.start_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            _ => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
            c => self.append_to_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => {}
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
            '>' => self.emit_current_tag(),
            _ => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => {}
            '"' => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            '\'' => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "missing-attribute-value"
            '>' => self.emit_current_tag(),
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, c: char, quote: char) {
        match c {
            c if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            '&' => self.consume_reference_in_attribute(),
            c => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            '&' => self.consume_reference_in_attribute(),
            '>' => self.emit_current_tag(),
            c => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self, c: char) {
        match c {
            c if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.emit_current_tag(),
            // "missing-whitespace-between-attributes"
            _ => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self, c: char) {
        if c == '>' {
            if let Some(tag) = self.current_tag.as_mut() {
                tag.self_closing = true;
            }
            self.emit_current_tag();
        } else {
            // "unexpected-solidus-in-tag"
            self.reconsume_in(TokenizerState::BeforeAttributeName);
        }
    }

    /// End of input. A tag cut off mid-way is kept as text.
    fn handle_eof(&mut self) {
        if self.state != TokenizerState::Data && self.current_pos > self.tag_start {
            let tail = self.input[self.tag_start..].to_string();
            self.text_buffer.push_str(&tail);
            self.current_tag = None;
        }
        self.flush_text();
    }
}

/// Byte offset of `</name` closing a raw text run.
fn find_end_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut from = 0;
    while let Some(offset) = haystack[from..].find("</") {
        let start = from + offset;
        let name_end = start + 2 + name.len();
        if name_end <= bytes.len()
            && bytes[start + 2..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
        {
            return Some(start);
        }
        from = start + 2;
    }
    None
}
