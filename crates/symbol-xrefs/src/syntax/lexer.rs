use std::ops::Range;

use logos::Logos;

use crate::syntax::kind::TokenKind;

/// A lexer that wraps `logos::Lexer` and yields each token with its byte span.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }

    /// Iterates only over tokens that are neither whitespace nor comments.
    pub fn significant(input: &'a str) -> impl Iterator<Item = (TokenKind, Range<usize>)> + 'a {
        Lexer::new(input).filter(|(kind, _)| !kind.is_trivia())
    }
}

impl Iterator for Lexer<'_> {
    type Item = (TokenKind, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let token_result = self.inner.next()?;
        let kind = token_result.unwrap_or(TokenKind::Unknown);
        Some((kind, self.inner.span()))
    }
}

/// Length in bytes of the raw token starting at `offset`, or 0 when `offset`
/// is out of bounds, not on a char boundary, or at whitespace.
pub fn token_length_at(
    text: &str,
    offset: usize,
) -> usize {
    let Some(rest) = text.get(offset..) else {
        return 0;
    };
    match Lexer::new(rest).next() {
        Some((TokenKind::Whitespace, _)) | None => 0,
        Some((_, span)) => span.len(),
    }
}
