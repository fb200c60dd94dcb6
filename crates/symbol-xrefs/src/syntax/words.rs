use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    ast::{tokens::Token, unit::ParsedUnit},
    syntax::{kind::TokenKind, kind::is_keyword_spelling, lexer::Lexer},
};

/// Doxygen commands whose argument names a program entity.
static DOXYGEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\\@](p|c|class|tparam|param|param\[in\]|param\[out\]|param\[in,out\]|retval|throw|throws|link) *$")
        .expect("doxygen tag pattern is valid")
});

/// How far back to look for a doxygen command.
const DOXYGEN_LOOKBEHIND: usize = 100;

/// A word under the cursor, found either as a spelled token or by scanning
/// raw text (comments, string literals, disabled regions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpelledWord<'a> {
    /// Main-file offset where the word starts.
    pub offset: u32,
    pub text: &'a str,
    /// The word is probably an identifier rather than prose.
    pub likely_identifier: bool,
    /// The spelled token this word is, when it is exactly one.
    pub spelled_token: Option<&'a Token>,
    /// The spelled token the word is part of, possibly a comment-free literal.
    pub part_of_spelled_token: Option<&'a Token>,
    /// The word's token also appears in the parsed stream.
    pub expanded: bool,
}

impl<'a> SpelledWord<'a> {
    pub fn touching(
        unit: &'a ParsedUnit,
        offset: u32,
    ) -> Option<Self> {
        let touching = unit.touching_tokens(offset);
        for token in touching {
            if token.kind.is_identifier() || token.kind.is_keyword() {
                return Some(Self {
                    offset: token.start,
                    text: unit.token_text(token),
                    likely_identifier: token.kind.is_identifier(),
                    spelled_token: Some(token),
                    part_of_spelled_token: Some(token),
                    expanded: token.expanded,
                });
            }
        }

        let code = unit.main_text();
        let bytes = code.as_bytes();
        let mut begin = (offset as usize).min(code.len());
        let mut end = begin;
        while begin > 0 && is_identifier_continue(bytes[begin - 1]) {
            begin -= 1;
        }
        while end < bytes.len() && is_identifier_continue(bytes[end]) {
            end += 1;
        }
        if begin == end {
            return None;
        }
        let text = &code[begin..end];
        let likely_identifier =
            is_likely_identifier(text, &code[..begin], &code[end..]) && !is_keyword_spelling(text);
        let part_of_spelled_token = touching.iter().filter(|token| token.start as usize <= begin).last();
        Some(Self {
            offset: begin as u32,
            text,
            likely_identifier,
            spelled_token: None,
            part_of_spelled_token,
            expanded: false,
        })
    }

    pub fn in_string_literal(&self) -> bool {
        self.part_of_spelled_token.is_some_and(|token| token.kind.is_string_literal())
    }
}

fn is_identifier_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Guesses whether a word found in prose names something in the program.
pub fn is_likely_identifier(
    word: &str,
    before: &str,
    after: &str,
) -> bool {
    if word.is_empty() {
        return false;
    }
    if word.contains('_') {
        return true;
    }
    if word.chars().skip(1).any(|ch| ch.is_ascii_uppercase()) {
        return true;
    }
    if before.ends_with('`') && after.starts_with('`') {
        return true;
    }
    if before.ends_with("::") || after.starts_with("::") {
        return true;
    }
    let mut start = before.len().saturating_sub(DOXYGEN_LOOKBEHIND);
    while !before.is_char_boundary(start) {
        start += 1;
    }
    DOXYGEN_TAG.is_match(&before[start..])
}

/// Namespaces visible at the end of `code`, each with a trailing `::` and the
/// global namespace as `""`. The innermost enclosing namespace comes first,
/// the rest are sorted.
pub fn visible_namespaces(code: &str) -> Vec<String> {
    let tokens: Vec<(TokenKind, &str)> = Lexer::significant(code).map(|(kind, span)| (kind, &code[span])).collect();

    let mut current = String::new();
    // One entry per open brace: the namespace to restore when it closes.
    let mut braces: Vec<Option<String>> = Vec::new();
    let mut using_directives: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut pending_namespace: Option<String> = None;

    let mut idx = 0;
    while idx < tokens.len() {
        let (kind, _) = tokens[idx];
        match kind {
            TokenKind::KwUsing if tokens.get(idx + 1).is_some_and(|(next, _)| *next == TokenKind::KwNamespace) => {
                let (name, next) = qualified_name(&tokens, idx + 2);
                idx = next;
                if name.is_empty() {
                    continue;
                }
                let used = using_directives.entry(current.clone()).or_default();
                if let Some(absolute) = name.strip_prefix("::") {
                    used.insert(absolute.to_string());
                } else {
                    for enclosing in ancestor_namespaces(&current) {
                        if enclosing.is_empty() {
                            used.insert(name.clone());
                        } else {
                            used.insert(format!("{enclosing}::{name}"));
                        }
                    }
                }
                continue;
            },
            TokenKind::KwNamespace => {
                let (name, next) = qualified_name(&tokens, idx + 1);
                idx = next;
                // `namespace a = b;` and stray keywords introduce no scope.
                if tokens.get(idx).is_some_and(|(kind, _)| *kind == TokenKind::LBrace) {
                    pending_namespace = Some(name.trim_start_matches("::").to_string());
                }
                continue;
            },
            TokenKind::LBrace => match pending_namespace.take() {
                Some(name) => {
                    braces.push(Some(current.clone()));
                    if !name.is_empty() {
                        if !current.is_empty() {
                            current.push_str("::");
                        }
                        current.push_str(&name);
                    }
                },
                None => braces.push(None),
            },
            TokenKind::RBrace => {
                if let Some(Some(outer)) = braces.pop() {
                    current = outer;
                }
            },
            _ => {},
        }
        idx += 1;
    }

    let mut found = Vec::new();
    for enclosing in ancestor_namespaces(&current) {
        if let Some(used) = using_directives.get(&enclosing) {
            found.extend(used.iter().cloned());
        }
        found.push(enclosing);
    }
    found.sort_by(|lhs, rhs| (lhs != &current, lhs).cmp(&(rhs != &current, rhs)));
    found.dedup();
    found.into_iter().map(|ns| if ns.is_empty() { ns } else { format!("{ns}::") }).collect()
}

/// Reads `a::b::c` starting at `idx`; returns the spelling and the index of
/// the first token after it.
fn qualified_name(
    tokens: &[(TokenKind, &str)],
    mut idx: usize,
) -> (String, usize) {
    let mut name = String::new();
    while let Some((kind, text)) = tokens.get(idx) {
        match kind {
            TokenKind::Ident | TokenKind::DoubleColon => name.push_str(text),
            TokenKind::KwInline => {},
            _ => break,
        }
        idx += 1;
    }
    (name, idx)
}

/// `a::b` yields `""`, `a`, `a::b`.
fn ancestor_namespaces(namespace: &str) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut prefix = String::new();
    for part in namespace.split("::").filter(|part| !part.is_empty()) {
        if !prefix.is_empty() {
            prefix.push_str("::");
        }
        prefix.push_str(part);
        out.push(prefix.clone());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src/syntax/words_tests.rs"]
mod tests;
