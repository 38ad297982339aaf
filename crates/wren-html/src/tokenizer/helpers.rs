//! Helper methods for the tokenizer.
//!
//! - State transitions ("Switch to", "Reconsume in")
//! - Input lookahead
//! - Tag and attribute building
//! - Event emission
//! - Character references and markup declarations

use super::core::{TagInProgress, Tokenizer, TokenizerState};
use super::event::ParseEvent;
use super::named_character_references::{decode_numeric, lookup_entity, lookup_legacy_entity};

/// Tags whose content is read as raw text.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Tokenizer {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// The state the tokenizer is in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl Tokenizer {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Unconsumed input.
    pub(super) fn remaining(&self) -> &str {
        &self.input[self.current_pos..]
    }

    /// "If the next few characters are an ASCII case-insensitive match for..."
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.remaining()
            .get(..target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
    }
}

// =============================================================================
// Tag Building Helpers
// =============================================================================

impl Tokenizer {
    /// "Start a new attribute in the current tag token"
    pub(super) fn start_attribute(&mut self) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.attributes.push((String::new(), String::new()));
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some((name, _)) = self.current_attribute() {
            name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some((_, value)) = self.current_attribute() {
            value.push(c);
        }
    }

    fn append_str_to_attribute_value(&mut self, s: &str) {
        if let Some((_, value)) = self.current_attribute() {
            value.push_str(s);
        }
    }

    fn current_attribute(&mut self) -> Option<&mut (String, String)> {
        self.current_tag.as_mut()?.attributes.last_mut()
    }
}

// =============================================================================
// Event Emission Helpers
// =============================================================================

impl Tokenizer {
    /// Push any buffered text as one [`ParseEvent::Text`].
    pub(super) fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let text = std::mem::take(&mut self.text_buffer);
            self.events.push(ParseEvent::Text(text));
        }
    }

    pub(super) fn emit(&mut self, event: ParseEvent) {
        self.flush_text();
        self.events.push(event);
    }

    /// "Emit the current tag token"
    ///
    /// Repeated attribute names keep their first value
    /// ("duplicate-attribute"). A `script` or `style` start tag switches
    /// to raw text.
    pub(super) fn emit_current_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        let Some(TagInProgress {
            name,
            attributes,
            self_closing,
            is_end,
        }) = self.current_tag.take()
        else {
            return;
        };

        if is_end {
            self.emit(ParseEvent::EndTag { name });
            return;
        }

        let mut unique: Vec<(String, String)> = Vec::with_capacity(attributes.len());
        for (attr, value) in attributes {
            if !unique.iter().any(|(seen, _)| *seen == attr) {
                unique.push((attr, value));
            }
        }
        if !self_closing && RAW_TEXT_TAGS.contains(&name.as_str()) {
            self.raw_text_end = Some(name.clone());
            self.switch_to(TokenizerState::RawText);
        }
        self.emit(ParseEvent::StartTag {
            name,
            attributes: unique,
            self_closing,
        });
    }
}

// =============================================================================
// Character Reference Helpers
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// After `&` in text: `&name;` and `&#N;`/`&#xN;` become their own
    /// events; anything else leaves the `&` as text.
    pub(super) fn consume_reference_in_data(&mut self) {
        let rest = self.remaining();
        let event = match rest.strip_prefix('#') {
            Some(numeric) => {
                let digits = numeric_length(numeric);
                (digits > 0 && numeric[digits..].starts_with(';'))
                    .then(|| (ParseEvent::CharRef(numeric[..digits].to_string()), digits + 2))
            }
            None => {
                let len = name_length(rest);
                (len > 0 && rest[len..].starts_with(';'))
                    .then(|| (ParseEvent::EntityRef(rest[..len].to_string()), len + 1))
            }
        };
        match event {
            Some((event, consumed)) => {
                self.current_pos += consumed;
                self.emit(event);
            }
            None => self.text_buffer.push('&'),
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// After `&` in an attribute value: decode the reference into the
    /// value, or keep the `&` when nothing matches. A legacy reference
    /// without `;` is left alone when `=` or an alphanumeric follows it.
    pub(super) fn consume_reference_in_attribute(&mut self) {
        let rest = self.remaining();
        let decoded: Option<(String, usize)> = match rest.strip_prefix('#') {
            Some(numeric) => {
                let digits = numeric_length(numeric);
                decode_numeric(&numeric[..digits]).map(|c| {
                    let semicolon = usize::from(numeric[digits..].starts_with(';'));
                    (c.to_string(), 1 + digits + semicolon)
                })
            }
            None => {
                let len = name_length(rest);
                let name = &rest[..len];
                let after = &rest[len..];
                if after.starts_with(';') {
                    lookup_entity(name).map(|value| (value.to_string(), len + 1))
                } else if after.starts_with(|c: char| c == '=' || c.is_ascii_alphanumeric()) {
                    // `&copy=2` in a query string stays as written.
                    None
                } else {
                    lookup_legacy_entity(name).map(|value| (value.to_string(), len))
                }
            }
        };
        match decoded {
            Some((text, consumed)) => {
                self.current_pos += consumed;
                self.append_str_to_attribute_value(&text);
            }
            None => self.append_to_attribute_value('&'),
        }
    }
}

/// Length of `N` or `xN` at the start of `text` (0 if there are no digits).
fn numeric_length(text: &str) -> usize {
    let (prefix, radix) = if text.starts_with(['x', 'X']) { (1, 16) } else { (0, 10) };
    let digits = text[prefix..]
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if digits == 0 { 0 } else { prefix + digits }
}

fn name_length(text: &str) -> usize {
    if !text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return 0;
    }
    text.bytes().take_while(u8::is_ascii_alphanumeric).count()
}

// =============================================================================
// Markup Declaration Helpers
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Called with `<!` consumed. Reads a comment, a CDATA section (kept as
    /// text) or a declaration in one go.
    pub(super) fn handle_markup_declaration(&mut self) {
        self.switch_to(TokenizerState::Data);
        if self.next_few_characters_are_case_insensitive("--") {
            self.current_pos += 2;
            let body = self.take_until("-->");
            self.emit(ParseEvent::Comment(body));
        } else if self.next_few_characters_are_case_insensitive("[CDATA[") {
            self.current_pos += "[CDATA[".len();
            let body = self.take_until("]]>");
            self.text_buffer.push_str(&body);
        } else {
            let body = self.take_until(">");
            self.emit(ParseEvent::Declaration(body));
        }
    }

    /// Called with `<?` consumed.
    pub(super) fn handle_processing_instruction(&mut self) {
        self.switch_to(TokenizerState::Data);
        let body = self.take_until(">");
        self.emit(ParseEvent::ProcessingInstruction(body));
    }

    /// Everything up to `terminator` (consumed, not returned), or the rest
    /// of the input when it never appears.
    fn take_until(&mut self, terminator: &str) -> String {
        let rest = self.remaining();
        let (body, consumed) = rest.find(terminator).map_or((rest, rest.len()), |end| {
            (&rest[..end], end + terminator.len())
        });
        let body = body.to_string();
        self.current_pos += consumed;
        body
    }
}
