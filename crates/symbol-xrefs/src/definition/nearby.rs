use tracing::debug;

use crate::{
    ast::{ParsedUnit, Token},
    syntax::SpelledWord,
};

/// Another spelling of `word` close by that is a real identifier, for words
/// found in comments, disabled code or unexpanded macro arguments.
///
/// Closer lines win; lines above the word cost twice as much as lines below,
/// ties go to the first one found searching forward. The window grows with
/// the word's length: `2^len` lines forward, `2^(len-1)` backward.
pub fn find_nearby_identifier<'u>(
    unit: &'u ParsedUnit,
    word: &SpelledWord<'_>,
) -> Option<&'u Token> {
    if word.expanded || word.in_string_literal() {
        return None;
    }

    let word_line = unit.line_of(word.offset);
    let cost = |token: &Token| -> u64 {
        let line = unit.line_of(token.start);
        if line >= word_line { (line - word_line) as u64 } else { 2 * (word_line - line) as u64 }
    };
    let max_distance: u64 = 1 << word.text.len().min(31);
    let first_line = (word_line as u64).saturating_sub(max_distance / 2);
    let last_line = word_line as u64 + max_distance;
    let window_start = unit.line_start(first_line as u32).unwrap_or(0);
    let window_end = u32::try_from(last_line)
        .ok()
        .and_then(|line| unit.line_start(line))
        .unwrap_or(unit.main_text().len() as u32);

    let mut best: Option<&'u Token> = None;
    let mut best_cost = u64::MAX;
    // Returns true once no later token in this direction can do better.
    let mut consider = |token: &'u Token| -> bool {
        if token.start < window_start || token.start > window_end {
            return true;
        }
        if !(token.kind.is_identifier() && unit.token_text(token) == word.text) {
            return false;
        }
        if token.start == word.offset {
            return false;
        }
        let token_cost = cost(token);
        if token_cost >= best_cost {
            return true;
        }
        if !(token.expanded || token.macro_expansion_start) {
            return false;
        }
        best_cost = token_cost;
        best = Some(token);
        false
    };

    let split = unit.tokens.partition_point(|token| token.start < word.offset);
    for token in &unit.tokens[split..] {
        if consider(token) {
            break;
        }
    }
    for token in unit.tokens[..split].iter().rev() {
        if consider(token) {
            break;
        }
    }

    if let Some(token) = best {
        debug!(
            "[goto-def] word `{}` at {} is not a parsed token, trying nearby one at {}",
            word.text, word.offset, token.start
        );
    }
    best
}

#[cfg(test)]
#[path = "../../tests/src/definition/nearby_tests.rs"]
mod tests;
