use logos::Logos;
use serde::{Deserialize, Serialize};

/// Raw C-family token kinds.
///
/// Whitespace and comments are produced so callers can measure and skip them;
/// they never enter a unit's spelled token table. `Unknown` is never produced
/// by the lexer itself and stands in for bytes logos could not classify.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[logos(error = ())]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Unknown,

    #[regex(r"[ \t\r\n\f\x0B]+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Preprocessor tokens
    #[token("##")]
    HashHash,
    #[token("#")]
    Hash,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Equal,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[regex(r"[-+/%^|!]=?|==|<=|>=|&&|\|\||<<=?|>>=?|\+\+|--|->\*|\.\*|\*=|&=")]
    Operator,

    // Keywords that navigation cares about individually
    #[token("auto")]
    KwAuto,
    #[token("decltype")]
    KwDecltype,
    #[token("namespace")]
    KwNamespace,
    #[token("using")]
    KwUsing,
    #[token("inline")]
    KwInline,

    // Remaining keywords
    #[token("alignas")]
    #[token("alignof")]
    #[token("bool")]
    #[token("break")]
    #[token("case")]
    #[token("catch")]
    #[token("char")]
    #[token("class")]
    #[token("const")]
    #[token("constexpr")]
    #[token("continue")]
    #[token("default")]
    #[token("delete")]
    #[token("do")]
    #[token("double")]
    #[token("else")]
    #[token("enum")]
    #[token("explicit")]
    #[token("extern")]
    #[token("false")]
    #[token("float")]
    #[token("for")]
    #[token("friend")]
    #[token("goto")]
    #[token("if")]
    #[token("int")]
    #[token("long")]
    #[token("mutable")]
    #[token("new")]
    #[token("noexcept")]
    #[token("nullptr")]
    #[token("operator")]
    #[token("private")]
    #[token("protected")]
    #[token("public")]
    #[token("return")]
    #[token("short")]
    #[token("signed")]
    #[token("sizeof")]
    #[token("static")]
    #[token("static_cast")]
    #[token("struct")]
    #[token("switch")]
    #[token("template")]
    #[token("this")]
    #[token("throw")]
    #[token("true")]
    #[token("try")]
    #[token("typedef")]
    #[token("typename")]
    #[token("union")]
    #[token("unsigned")]
    #[token("virtual")]
    #[token("void")]
    #[token("volatile")]
    #[token("while")]
    Keyword,

    // Objective-C directives such as `@interface` or `@end`
    #[regex(r"@[a-zA-Z_]+")]
    AtKeyword,

    // Identifiers & literals
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    Char,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"@"([^"\\\n]|\\.)*""#)]
    String,
    #[regex(r#"R"([^"]*)""#)]
    RawString,
    #[regex(r"0[xX][0-9A-Fa-f]('?[0-9A-Fa-f])*[uUlLzZ]*")]
    #[regex(r"[0-9]('?[0-9])*[uUlLzZ]*")]
    Integer,
    #[regex(r"[0-9]('?[0-9])*\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    Float,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_identifier(self) -> bool {
        self == TokenKind::Ident
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Keyword
                | TokenKind::KwAuto
                | TokenKind::KwDecltype
                | TokenKind::KwNamespace
                | TokenKind::KwUsing
                | TokenKind::KwInline
        )
    }

    pub fn is_string_literal(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::RawString)
    }

    /// Keywords whose type is deduced by the compiler.
    pub fn is_deduced_type_keyword(self) -> bool {
        matches!(self, TokenKind::KwAuto | TokenKind::KwDecltype)
    }
}

/// Returns true when `word` lexes as exactly one keyword token.
pub fn is_keyword_spelling(word: &str) -> bool {
    let mut lexer = TokenKind::lexer(word);
    let Some(Ok(kind)) = lexer.next() else {
        return false;
    };
    kind.is_keyword() && lexer.span().len() == word.len()
}
