//! Diagnostics reported through the terminal [`Error`](crate::Token::Error)
//! token.

use thiserror::Error;

/// The failure behind a [`Token::Error`](crate::Token::Error).
///
/// The `Display` implementation renders the diagnostic string exposed by
/// [`Tokenizer::error`](crate::Tokenizer::error); positions are 1-based.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerError {
    /// Clean end of input where the grammar still required characters.
    #[error("Error: Unexpected end of file.")]
    UnexpectedEndOfFile,
    /// The character source failed with an I/O error distinct from a clean
    /// end of input.
    #[error("Error: While reading file, code: {code}")]
    Read {
        /// OS error code reported by the source, `0` when unavailable.
        code: i32,
    },
    /// A grammar violation at the given position.
    #[error("Error({row},{col}): Unexpected sign.")]
    UnexpectedSign {
        /// 1-based row of the offending character.
        row: usize,
        /// 1-based column of the offending character.
        col: usize,
    },
}
