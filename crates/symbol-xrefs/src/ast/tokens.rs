use serde::{Deserialize, Serialize};

use crate::syntax::{kind::TokenKind, lexer::Lexer};

/// A token as spelled in the main file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    /// The token maps one-to-one onto a token of the parsed stream. False for
    /// tokens in disabled preprocessor regions and inside macro invocations.
    #[serde(default = "default_true")]
    pub expanded: bool,
    /// First token of a macro invocation.
    #[serde(default)]
    pub macro_expansion_start: bool,
}

fn default_true() -> bool {
    true
}

impl Token {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text<'a>(
        &self,
        source: &'a str,
    ) -> &'a str {
        source.get(self.start as usize..self.end as usize).unwrap_or_default()
    }
}

/// Lexes `text` into spelled tokens, all marked as part of the parsed stream.
pub fn lex_spelled_tokens(text: &str) -> Vec<Token> {
    Lexer::significant(text)
        .map(|(kind, span)| Token {
            kind,
            start: span.start as u32,
            end: span.end as u32,
            expanded: true,
            macro_expansion_start: false,
        })
        .collect()
}
