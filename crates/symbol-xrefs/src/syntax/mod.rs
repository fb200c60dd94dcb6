pub mod kind;
pub mod lexer;
pub mod words;

pub use kind::TokenKind;
pub use lexer::{Lexer, token_length_at};
pub use words::{SpelledWord, is_likely_identifier, visible_namespaces};
