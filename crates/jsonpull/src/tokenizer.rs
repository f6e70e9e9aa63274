//! The continuation engine: a resumable, single-pass JSON scanner.
//!
//! Each [`Tokenizer::next_token`] call resumes at the point recorded by the
//! previous call, reads characters from the source until one token can be
//! delivered, and suspends again. Rust has no stable generator primitive,
//! so the suspension points are an explicit [`State`] enum plus a stack of
//! open-container [`Frame`]s; states mark inter-token resume points only,
//! because scalars always complete within a single pull against a blocking
//! source. The one-character register `ch` carries lookahead across
//! suspensions, which is how a number's boundary character is pushed back
//! for the next structural scan.

use std::fs::File;
use std::io;
use std::path::Path;
use std::str;

use bstr::BStr;

use crate::error::TokenizerError;
use crate::escape_buffer::{InvalidHexDigit, UnicodeEscapeBuffer, encode_code_point};
use crate::literal_buffer::ExpectedLiteral;
use crate::options::TokenizerOptions;
use crate::source::{CharSource, ReadSource};
use crate::token::Token;
use crate::value_stack::{Record, ScalarKind, ValueStack};

/// One open container, innermost last on the frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// Inter-token resume points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet.
    Start,
    /// A `StartObject`/`StartArray` was delivered; the opening bracket is
    /// still current.
    AfterContainerStart,
    /// A `Name` was delivered; the character after its closing quote is
    /// current.
    AfterName,
    /// A string or number was delivered; its boundary character is current.
    AfterScalar,
    /// A `Boolean`/`Null` was delivered; its final character is current and
    /// the next one has not been read yet.
    AfterLiteral,
    /// An `EndObject`/`EndArray` was delivered; the closing bracket is
    /// current.
    AfterContainerEnd,
    /// The root container closed; only padding may remain.
    AfterRoot,
    /// `EndDocument` was delivered. Terminal.
    Done,
    /// `Error` was delivered. Terminal.
    Failed,
}

/// Eager number classification from the leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberClass {
    Uint,
    Int,
    Double,
}

fn is_padding(byte: u8) -> bool {
    matches!(byte, b' ' | b'\r' | b'\n' | b'\t' | b'\x0C')
}

/// The streaming JSON tokenizer.
///
/// One instance owns its character source, its value arena and exactly one
/// live parse position. [`Tokenizer::next_token`] pulls one token at a
/// time; the matching accessor exposes the decoded payload until the next
/// pull. Dropping the tokenizer releases the source and the arena.
///
/// # Examples
///
/// ```rust
/// use jsonpull::{Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new(b"[1, -2, 3.5]".as_slice());
/// assert_eq!(tokenizer.next_token(), Token::StartArray);
/// assert_eq!(tokenizer.next_token(), Token::Uint64);
/// assert_eq!(tokenizer.value_u64(), Some(1));
/// assert_eq!(tokenizer.next_token(), Token::Int64);
/// assert_eq!(tokenizer.value_i64(), Some(-2));
/// assert_eq!(tokenizer.next_token(), Token::Double);
/// assert_eq!(tokenizer.value_f64(), Some(3.5));
/// assert_eq!(tokenizer.next_token(), Token::EndArray);
/// assert_eq!(tokenizer.next_token(), Token::EndDocument);
/// ```
#[derive(Debug)]
pub struct Tokenizer<S> {
    source: S,
    /// Current unconsumed character; meaningful in every state after
    /// `Start`.
    ch: u8,
    row: usize,
    col: usize,
    state: State,
    frames: Vec<Frame>,
    values: ValueStack,
    max_nesting_level: usize,
    error: Option<TokenizerError>,
}

impl Tokenizer<ReadSource<File>> {
    /// Opens the file at `path` as the character source.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the file cannot be opened; open failures
    /// are reported here, not as an [`Token::Error`] token.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jsonpull::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::open("config.json")?;
    /// # let _ = tokenizer;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(ReadSource::open(path)?))
    }
}

impl<S: CharSource> Tokenizer<S> {
    /// Creates a tokenizer over `source` with default options.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    /// Creates a tokenizer over `source` with explicit options.
    #[must_use]
    pub fn with_options(source: S, options: TokenizerOptions) -> Self {
        Self {
            source,
            ch: 0,
            row: 1,
            col: 1,
            state: State::Start,
            frames: Vec::new(),
            values: ValueStack::new(),
            max_nesting_level: options.max_nesting_level,
            error: None,
        }
    }

    /// Pulls the next token.
    ///
    /// Runs until one token can be delivered, which may involve any number
    /// of character reads, then suspends. Once `EndDocument` or `Error` has
    /// been delivered the same token is returned on every further call
    /// without reading the source, so drain loops are safe to run past
    /// completion.
    pub fn next_token(&mut self) -> Token {
        if self.state == State::Done {
            return Token::EndDocument;
        }
        if self.state == State::Failed {
            return Token::Error;
        }
        self.values.invalidate();
        match self.pull() {
            Ok(token) => token,
            Err(err) => {
                self.state = State::Failed;
                self.error = Some(err);
                Token::Error
            }
        }
    }

    fn pull(&mut self) -> Result<Token, TokenizerError> {
        match self.state {
            State::Start => self.begin_document(),
            State::AfterContainerStart => {
                self.advance()?;
                self.skip_padding()?;
                self.container_head()
            }
            State::AfterName => {
                self.skip_padding()?;
                if self.ch != b':' {
                    return Err(self.unexpected_sign());
                }
                self.advance()?;
                self.skip_padding()?;
                self.element()
            }
            State::AfterScalar => {
                self.skip_padding()?;
                self.container_tail()
            }
            State::AfterLiteral => {
                self.advance()?;
                self.skip_padding()?;
                self.container_tail()
            }
            State::AfterContainerEnd => {
                if self.frames.is_empty() {
                    self.state = State::AfterRoot;
                    self.document_tail()
                } else {
                    self.advance()?;
                    self.skip_padding()?;
                    self.container_tail()
                }
            }
            State::AfterRoot => self.document_tail(),
            State::Done => Ok(Token::EndDocument),
            State::Failed => Ok(Token::Error),
        }
    }

    // ------------------------------------------------------------ document

    fn begin_document(&mut self) -> Result<Token, TokenizerError> {
        self.advance()?;
        if self.ch == 0xEF {
            // UTF-8 byte order mark: discard its remaining two bytes and
            // load the first real character.
            self.advance()?;
            self.advance()?;
            self.advance()?;
        }
        self.col = 1;
        self.skip_padding()?;
        match self.ch {
            b'{' => self.open_container(Frame::Object),
            b'[' => self.open_container(Frame::Array),
            _ => Err(self.unexpected_sign()),
        }
    }

    /// After the root value only padding may remain until end of input;
    /// anything else, including a second root value, is an error.
    fn document_tail(&mut self) -> Result<Token, TokenizerError> {
        loop {
            match self.read()? {
                None => {
                    self.state = State::Done;
                    return Ok(Token::EndDocument);
                }
                Some(byte) if is_padding(byte) => {}
                Some(_) => return Err(self.unexpected_sign()),
            }
        }
    }

    // ------------------------------------------------------------ characters

    /// Reads one character and updates the position counters; `Ok(None)` is
    /// a clean end of input.
    fn read(&mut self) -> Result<Option<u8>, TokenizerError> {
        match self.source.next_char() {
            Ok(Some(byte)) => {
                if byte == b'\n' {
                    self.row += 1;
                    self.col = 1;
                } else {
                    self.col += 1;
                }
                self.ch = byte;
                Ok(Some(byte))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(TokenizerError::Read {
                code: err.raw_os_error().unwrap_or_default(),
            }),
        }
    }

    /// Like [`Self::read`], but end of input is an error: the grammar still
    /// required characters.
    fn advance(&mut self) -> Result<(), TokenizerError> {
        match self.read()? {
            Some(_) => Ok(()),
            None => Err(TokenizerError::UnexpectedEndOfFile),
        }
    }

    fn skip_padding(&mut self) -> Result<(), TokenizerError> {
        while is_padding(self.ch) {
            self.advance()?;
        }
        Ok(())
    }

    fn unexpected_sign(&self) -> TokenizerError {
        TokenizerError::UnexpectedSign {
            row: self.row,
            col: self.col,
        }
    }

    // ------------------------------------------------------------ containers

    fn open_container(&mut self, frame: Frame) -> Result<Token, TokenizerError> {
        if self.frames.len() == self.max_nesting_level {
            return Err(self.unexpected_sign());
        }
        self.frames.push(frame);
        self.state = State::AfterContainerStart;
        Ok(match frame {
            Frame::Object => Token::StartObject,
            Frame::Array => Token::StartArray,
        })
    }

    fn close_container(&mut self, frame: Frame) -> Token {
        self.frames.pop();
        self.state = State::AfterContainerEnd;
        match frame {
            Frame::Object => Token::EndObject,
            Frame::Array => Token::EndArray,
        }
    }

    /// First scan inside a freshly opened container; an empty container may
    /// close immediately.
    fn container_head(&mut self) -> Result<Token, TokenizerError> {
        match self.frames.last().copied() {
            Some(Frame::Object) => match self.ch {
                b'"' => self.scan_name(),
                b'}' => Ok(self.close_container(Frame::Object)),
                _ => Err(self.unexpected_sign()),
            },
            Some(Frame::Array) => match self.ch {
                b']' => Ok(self.close_container(Frame::Array)),
                _ => self.element(),
            },
            None => Err(self.unexpected_sign()),
        }
    }

    /// Scan after a completed member or element: `,` continues the
    /// container, the matching bracket closes it. A comma directly before
    /// the closing bracket is rejected.
    fn container_tail(&mut self) -> Result<Token, TokenizerError> {
        match self.frames.last().copied() {
            Some(Frame::Object) => match self.ch {
                b',' => {
                    self.advance()?;
                    self.skip_padding()?;
                    if self.ch == b'"' {
                        self.scan_name()
                    } else {
                        Err(self.unexpected_sign())
                    }
                }
                b'}' => Ok(self.close_container(Frame::Object)),
                _ => Err(self.unexpected_sign()),
            },
            Some(Frame::Array) => match self.ch {
                b',' => {
                    self.advance()?;
                    self.skip_padding()?;
                    if self.ch == b']' {
                        Err(self.unexpected_sign())
                    } else {
                        self.element()
                    }
                }
                b']' => Ok(self.close_container(Frame::Array)),
                _ => Err(self.unexpected_sign()),
            },
            None => Err(self.unexpected_sign()),
        }
    }

    // ------------------------------------------------------------ elements

    fn element(&mut self) -> Result<Token, TokenizerError> {
        match self.ch {
            b'"' => self.scan_string(),
            b'-' => self.scan_signed_number(),
            b'0' => self.scan_zero_number(),
            b'1'..=b'9' => self.scan_unsigned_number(),
            b'{' => self.open_container(Frame::Object),
            b'[' => self.open_container(Frame::Array),
            b't' | b'f' | b'n' => self.scan_literal(),
            _ => Err(self.unexpected_sign()),
        }
    }

    // ------------------------------------------------------------ strings

    fn scan_name(&mut self) -> Result<Token, TokenizerError> {
        self.scan_string_body()?;
        self.values.finish(Record::Name);
        self.state = State::AfterName;
        Ok(Token::Name)
    }

    fn scan_string(&mut self) -> Result<Token, TokenizerError> {
        self.scan_string_body()?;
        self.values.finish(Record::Scalar(ScalarKind::String));
        self.state = State::AfterScalar;
        Ok(Token::String)
    }

    /// Scans from the opening quote through the character after the closing
    /// quote, accumulating the decoded payload.
    fn scan_string_body(&mut self) -> Result<(), TokenizerError> {
        self.values.begin();
        loop {
            self.advance()?;
            match self.ch {
                b'"' => break,
                b'\\' => self.scan_escape()?,
                0x00..=0x1F => return Err(self.unexpected_sign()),
                byte => self.values.push(byte),
            }
        }
        // The string is not complete until the character after the closing
        // quote is known.
        self.advance()
    }

    fn scan_escape(&mut self) -> Result<(), TokenizerError> {
        self.advance()?;
        let decoded = match self.ch {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => return self.scan_unicode_escape(),
            _ => return Err(self.unexpected_sign()),
        };
        self.values.push(decoded);
        Ok(())
    }

    fn scan_unicode_escape(&mut self) -> Result<(), TokenizerError> {
        let mut digits = UnicodeEscapeBuffer::new();
        loop {
            self.advance()?;
            match digits.feed(self.ch) {
                Ok(Some(code)) => {
                    let mut utf8 = [0u8; 3];
                    self.values.push_bytes(encode_code_point(code, &mut utf8));
                    return Ok(());
                }
                Ok(None) => {}
                Err(InvalidHexDigit) => return Err(self.unexpected_sign()),
            }
        }
    }

    // ------------------------------------------------------------ numbers

    /// `-` must be followed by a digit; the sign alone is not a number.
    fn scan_signed_number(&mut self) -> Result<Token, TokenizerError> {
        self.values.begin();
        self.values.push(b'-');
        self.advance()?;
        if !self.ch.is_ascii_digit() {
            return Err(self.unexpected_sign());
        }
        self.scan_digits(NumberClass::Int)
    }

    /// A leading zero classifies as signed and takes no further integer
    /// digits; a fraction or exponent still promotes it to a double.
    fn scan_zero_number(&mut self) -> Result<Token, TokenizerError> {
        self.values.begin();
        self.values.push(b'0');
        self.advance()?;
        match self.ch {
            b'.' => self.scan_fraction(),
            b'e' | b'E' => self.scan_exponent(),
            _ => self.finish_number(NumberClass::Int),
        }
    }

    fn scan_unsigned_number(&mut self) -> Result<Token, TokenizerError> {
        self.values.begin();
        self.scan_digits(NumberClass::Uint)
    }

    /// Integer digit run starting at the current digit.
    fn scan_digits(&mut self, class: NumberClass) -> Result<Token, TokenizerError> {
        self.values.push(self.ch);
        loop {
            self.advance()?;
            if self.ch.is_ascii_digit() {
                self.values.push(self.ch);
            } else {
                break;
            }
        }
        match self.ch {
            b'.' => self.scan_fraction(),
            b'e' | b'E' => self.scan_exponent(),
            _ => self.finish_number(class),
        }
    }

    fn scan_fraction(&mut self) -> Result<Token, TokenizerError> {
        self.values.push(self.ch);
        loop {
            self.advance()?;
            if self.ch.is_ascii_digit() {
                self.values.push(self.ch);
            } else {
                break;
            }
        }
        match self.ch {
            b'e' | b'E' => self.scan_exponent(),
            _ => self.finish_number(NumberClass::Double),
        }
    }

    fn scan_exponent(&mut self) -> Result<Token, TokenizerError> {
        self.values.push(self.ch);
        self.advance()?;
        if matches!(self.ch, b'+' | b'-') {
            self.values.push(self.ch);
            self.advance()?;
        }
        // At least one exponent digit is mandatory.
        if !self.ch.is_ascii_digit() {
            return Err(self.unexpected_sign());
        }
        self.values.push(self.ch);
        loop {
            self.advance()?;
            if self.ch.is_ascii_digit() {
                self.values.push(self.ch);
            } else {
                break;
            }
        }
        self.finish_number(NumberClass::Double)
    }

    /// The boundary character stays current for the next structural scan.
    fn finish_number(&mut self, class: NumberClass) -> Result<Token, TokenizerError> {
        let (kind, token) = match class {
            NumberClass::Uint => (ScalarKind::Uint, Token::Uint64),
            NumberClass::Int => (ScalarKind::Int, Token::Int64),
            NumberClass::Double => (ScalarKind::Double, Token::Double),
        };
        self.values.finish(Record::Scalar(kind));
        self.state = State::AfterScalar;
        Ok(token)
    }

    // ------------------------------------------------------------ literals

    fn scan_literal(&mut self) -> Result<Token, TokenizerError> {
        let Some(literal) = ExpectedLiteral::for_first(self.ch) else {
            return Err(self.unexpected_sign());
        };
        self.values.begin();
        self.values.push(self.ch);
        for _ in 0..literal.remaining() {
            self.advance()?;
            self.values.push(self.ch);
        }
        if !literal.matches(self.values.payload_bytes()) {
            return Err(self.unexpected_sign());
        }
        self.values.finish(Record::Scalar(literal.kind()));
        self.state = State::AfterLiteral;
        Ok(literal.token())
    }

    // ------------------------------------------------------------ accessors

    /// Decoded text of the most recent [`Token::Name`].
    ///
    /// `None` unless the immediately preceding pull produced a name.
    #[must_use]
    pub fn name(&self) -> Option<&BStr> {
        match self.values.record() {
            Record::Name => Some(self.values.payload()),
            _ => None,
        }
    }

    /// Literal text of the most recent scalar token: the decoded content
    /// for `String`, the verbatim spelling for numbers, `true`/`false` and
    /// `null`.
    ///
    /// The bytes are conventionally UTF-8 but may hold WTF-8 when the
    /// input spelled lone surrogates with `\u` escapes. `None` unless the
    /// immediately preceding pull produced a scalar.
    #[must_use]
    pub fn value(&self) -> Option<&BStr> {
        match self.values.record() {
            Record::Scalar(_) => Some(self.values.payload()),
            _ => None,
        }
    }

    /// The diagnostic behind the most recent [`Token::Error`]; its
    /// `Display` form is the formatted message.
    #[must_use]
    pub fn error(&self) -> Option<&TokenizerError> {
        self.error.as_ref()
    }

    fn scalar_text(&self, kind: ScalarKind) -> Option<&str> {
        match self.values.record() {
            Record::Scalar(current) if current == kind => {
                str::from_utf8(self.values.payload_bytes()).ok()
            }
            _ => None,
        }
    }

    /// Parsed value of the most recent [`Token::Int64`].
    #[must_use]
    pub fn value_i64(&self) -> Option<i64> {
        self.scalar_text(ScalarKind::Int)?.parse().ok()
    }

    /// Parsed value of the most recent [`Token::Uint64`].
    #[must_use]
    pub fn value_u64(&self) -> Option<u64> {
        self.scalar_text(ScalarKind::Uint)?.parse().ok()
    }

    /// Parsed value of the most recent [`Token::Double`].
    #[must_use]
    pub fn value_f64(&self) -> Option<f64> {
        self.scalar_text(ScalarKind::Double)?.parse().ok()
    }

    /// Parsed value of the most recent [`Token::Boolean`].
    #[must_use]
    pub fn value_bool(&self) -> Option<bool> {
        self.scalar_text(ScalarKind::Boolean)?.parse().ok()
    }
}

impl<S: CharSource> Iterator for Tokenizer<S> {
    type Item = Token;

    /// Yields every token through the terminal `EndDocument` or `Error`,
    /// then `None`.
    fn next(&mut self) -> Option<Token> {
        if matches!(self.state, State::Done | State::Failed) {
            return None;
        }
        Some(self.next_token())
    }
}
