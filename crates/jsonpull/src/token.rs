//! The token vocabulary produced by the tokenizer.

/// One lexical unit of a JSON document.
///
/// Tokens carry no payload themselves; the payload of the most recent
/// `Name`, scalar or `Error` token is read back through the matching
/// accessor on [`Tokenizer`](crate::Tokenizer) and stays valid until the
/// next pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Reserved start-of-document marker. Opening the tokenizer is the
    /// start-of-document event, so this token is never produced.
    StartDocument,
    /// The root value closed and only padding followed it. Terminal: every
    /// later pull returns `EndDocument` again without reading the source.
    EndDocument,
    /// A `[` opened an array.
    StartArray,
    /// A `]` closed the innermost array.
    EndArray,
    /// A `{` opened an object.
    StartObject,
    /// A `}` closed the innermost object.
    EndObject,
    /// An object member name; read it with
    /// [`Tokenizer::name`](crate::Tokenizer::name).
    Name,
    /// A string value; read it with
    /// [`Tokenizer::value`](crate::Tokenizer::value).
    String,
    /// A number classified as a signed integer (leading `-` or leading
    /// `0`).
    Int64,
    /// A number classified as an unsigned integer (leading `1`-`9`).
    Uint64,
    /// A number with a fraction or exponent part.
    Double,
    /// A `true` or `false` literal.
    Boolean,
    /// A `null` literal.
    Null,
    /// The parse failed; read the diagnostic with
    /// [`Tokenizer::error`](crate::Tokenizer::error). Terminal: every later
    /// pull returns `Error` again without reading the source.
    Error,
}

impl Token {
    /// Returns `true` for the two terminal tokens, `EndDocument` and
    /// `Error`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Token::EndDocument | Token::Error)
    }
}
