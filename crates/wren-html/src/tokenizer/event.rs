use std::fmt;

/// One unit of markup reported to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// `<name attr="value">` or `<name />`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Lowercased names with decoded values, in source order. The first
        /// occurrence of a repeated name wins.
        attributes: Vec<(String, String)>,
        /// True when written with a trailing `/`.
        self_closing: bool,
    },
    /// `</name>`.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },
    /// Character data, undecoded.
    Text(String),
    /// `&name;` with the name only.
    EntityRef(String),
    /// `&#N;` or `&#xN;` with the part after `#`.
    CharRef(String),
    /// `<!-- text -->` with the inner text.
    Comment(String),
    /// `<!DOCTYPE ...>` or any other `<!...>`, without the delimiters.
    Declaration(String),
    /// `<?...>`, without the delimiters.
    ProcessingInstruction(String),
}

impl ParseEvent {
    /// True for text made only of whitespace.
    #[must_use]
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for ParseEvent {
    /// Markup form of the event, as the tree builder stores it when the
    /// event becomes text content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for (attr, value) in attributes {
                    write!(f, " {attr}=\"{}\"", value.replace('&', "&amp;").replace('"', "&quot;"))?;
                }
                f.write_str(if *self_closing { " />" } else { ">" })
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Text(text) => f.write_str(text),
            Self::EntityRef(name) => write!(f, "&{name};"),
            Self::CharRef(code) => write!(f, "&#{code};"),
            Self::Comment(text) => write!(f, "<!--{text}-->"),
            Self::Declaration(text) => write!(f, "<!{text}>"),
            Self::ProcessingInstruction(text) => write!(f, "<?{text}>"),
        }
    }
}
