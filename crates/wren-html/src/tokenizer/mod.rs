//! Event tokenizer.
//!
//! Turns markup into a flat stream of [`ParseEvent`]s for the tree builder.
//! Tag handling follows the shape of
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization),
//! but character references, comments and declarations are reported as
//! their own events instead of being folded into text.

/// Tokenizer state machine.
pub mod core;
/// Parse events produced by the tokenizer.
pub mod event;
/// Helper methods for state transitions, lookahead and emission.
pub mod helpers;
/// Named character reference table.
pub mod named_character_references;

pub use self::core::{Tokenizer, TokenizerState};
pub use event::ParseEvent;

/// Tokenize a whole document in one call.
#[must_use]
pub fn tokenize(input: &str) -> Vec<ParseEvent> {
    Tokenizer::new(input).run()
}
