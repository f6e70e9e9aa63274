//! Tokenizer configuration.

pub(crate) const MAX_NESTING_LEVEL: usize = 20;

/// Configuration for [`Tokenizer`](crate::Tokenizer).
///
/// # Examples
///
/// ```rust
/// use jsonpull::{Tokenizer, TokenizerOptions};
///
/// let options = TokenizerOptions {
///     max_nesting_level: 4,
/// };
/// let tokenizer = Tokenizer::with_options(b"[[1]]".as_slice(), options);
/// # let _ = tokenizer;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Maximum number of simultaneously open containers; objects and
    /// arrays count against the same limit. Exceeding it is a parse error
    /// at the offending opening bracket, not a resource-exhaustion crash.
    ///
    /// # Default
    ///
    /// `20`
    pub max_nesting_level: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            max_nesting_level: MAX_NESTING_LEVEL,
        }
    }
}
