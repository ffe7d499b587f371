//! Extraction engine
//!
//! Drives a handler table over the raw unit sequence to produce typed
//! tokens. Each step looks the current unit's literal text up in the table
//! and tries the registered handlers in order until one reports a match; on
//! no match the default handler emits the unit as a generic Symbol token.
//! Every handler advances the cursor by at least one position, so a run
//! terminates in at most N steps for N units.
//!
//! Extraction never fails: malformed input (unterminated literals, stray
//! punctuation) degrades to best-effort token boundaries.
//!
//! The handlers in this module are language-independent (single-line string
//! literals, line breaks, underscore merging); language-specific handlers
//! and the root table live in [`crate::python::extract`].

use std::collections::HashMap;

use super::model::{Token, TokenKind};
use super::raw::is_word;

/// A handler inspects the unit at the cursor and either consumes one or more
/// units (returning `true`) or declines the match (returning `false`, cursor
/// untouched).
pub type ExtractHandler = fn(&mut ExtractState<'_>, &mut Vec<Token>) -> bool;

/// Dispatch table from a unit's literal text to its ordered handler list.
pub type ExtractMap = HashMap<&'static str, Vec<ExtractHandler>>;

/// Mutable cursor state for one extraction run over one document.
pub struct ExtractState<'a> {
    pub units: &'a [&'a str],
    pub i: usize,
    /// 0-based line of the unit at the cursor
    pub line: usize,
    /// 0-based column of the unit at the cursor
    pub column: usize,
}

impl<'a> ExtractState<'a> {
    pub fn new(units: &'a [&'a str]) -> Self {
        ExtractState {
            units,
            i: 0,
            line: 0,
            column: 0,
        }
    }
}

/// Run the dispatch loop to completion and return the typed token stream.
pub fn run_extract(state: &mut ExtractState<'_>, map: &ExtractMap) -> Vec<Token> {
    state.line = 0;
    state.column = 0;
    let mut out = Vec::new();
    while state.i < state.units.len() {
        let unit = state.units[state.i];
        let mut matched = false;
        if let Some(handlers) = map.get(unit) {
            for handler in handlers {
                if handler(state, &mut out) {
                    matched = true;
                    break;
                }
            }
        }
        if !matched {
            extract_default(state, &mut out);
        }
    }
    out
}

/// Default handler: emit the unit as a generic Symbol and advance the column
/// by its length. A bare line break only reaches this handler when no
/// dedicated line-break handler is registered; it is consumed silently.
pub fn extract_default(state: &mut ExtractState<'_>, out: &mut Vec<Token>) {
    let unit = state.units[state.i];
    if unit == "\n" {
        state.line += 1;
        state.column = 0;
    } else {
        out.push(Token::new(unit, TokenKind::Symbol, state.line, state.column));
        state.column += unit.len();
    }
    state.i += 1;
}

/// Emit an explicit LineBreak token and move to the next physical line.
pub fn mark_line_break(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    out.push(Token::new("\n", TokenKind::LineBreak, state.line, state.column));
    state.i += 1;
    state.line += 1;
    state.column = 0;
    true
}

/// Scan a single-line string literal starting at the quote unit under the
/// cursor.
///
/// Accumulates until an unescaped matching quote or an unescaped line break,
/// whichever comes first. An unterminated literal is accepted as-is and the
/// terminating line break is left for the line-break handler, which keeps
/// the leaf round-trip exact.
pub fn extract_quote(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    let quote = state.units[state.i];
    let line = state.line;
    let column = state.column;
    let mut name = String::from(quote);
    let mut cur_line = line;
    let mut col = column + quote.len();
    let mut escaped = false;
    let mut j = state.i + 1;
    while j < state.units.len() {
        let unit = state.units[j];
        if escaped {
            escaped = false;
            name.push_str(unit);
            if unit == "\n" {
                cur_line += 1;
                col = 0;
            } else {
                col += unit.len();
            }
            j += 1;
            continue;
        }
        if unit == "\n" {
            // unterminated at line end: keep the break unconsumed
            break;
        }
        name.push_str(unit);
        col += unit.len();
        if unit == "\\" {
            escaped = true;
        } else if unit == quote {
            j += 1;
            break;
        }
        j += 1;
    }
    out.push(Token::new(name, TokenKind::Constant, line, column));
    state.line = cur_line;
    state.column = col;
    state.i = j;
    true
}

/// Glue a `_` unit onto the previously emitted symbol (the bottom-level
/// scanner splits identifiers at underscores) and absorb an immediately
/// following word run, producing one combined identifier token.
pub fn merge_underscore(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    let mut col = state.column;
    let extend = state.i != 0
        && matches!(
            out.last(),
            Some(prev) if prev.kind == TokenKind::Symbol
                && (prev.name == "_" || is_word(&prev.name))
        );
    if extend {
        if let Some(prev) = out.last_mut() {
            prev.name.push('_');
        }
    } else {
        out.push(Token::new("_", TokenKind::Symbol, state.line, col));
    }
    col += 1;
    if state.i + 1 < state.units.len() {
        let next = state.units[state.i + 1];
        if is_word(next) {
            if let Some(prev) = out.last_mut() {
                prev.name.push_str(next);
            }
            col += next.len();
            state.i += 1;
        }
    }
    state.i += 1;
    state.column = col;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::raw::scan_units;

    fn run(text: &str, map: &ExtractMap) -> Vec<Token> {
        let units = scan_units(text);
        let mut state = ExtractState::new(&units);
        run_extract(&mut state, map)
    }

    fn minimal_map() -> ExtractMap {
        let mut map: ExtractMap = HashMap::new();
        map.insert("'", vec![extract_quote as ExtractHandler]);
        map.insert("\"", vec![extract_quote as ExtractHandler]);
        map.insert("\n", vec![mark_line_break as ExtractHandler]);
        map.insert("_", vec![merge_underscore as ExtractHandler]);
        map
    }

    #[test]
    fn test_default_handler_emits_symbols() {
        let tokens = run("a+b", &minimal_map());
        let names: Vec<_> = tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "+", "b"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Symbol));
    }

    #[test]
    fn test_line_break_token_resets_column() {
        let tokens = run("ab\ncd", &minimal_map());
        assert_eq!(tokens[1].kind, TokenKind::LineBreak);
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[2].column, 0);
    }

    #[test]
    fn test_single_line_string() {
        let tokens = run("'hi there'", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[0].name, "'hi there'");
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let tokens = run(r"'a\'b'", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, r"'a\'b'");
    }

    #[test]
    fn test_escaped_backslash_then_quote_closes() {
        let tokens = run(r"'a\\'x", &minimal_map());
        assert_eq!(tokens[0].name, r"'a\\'");
        assert_eq!(tokens[1].name, "x");
    }

    #[test]
    fn test_unterminated_string_keeps_line_break() {
        let tokens = run("'open\nnext", &minimal_map());
        assert_eq!(tokens[0].name, "'open");
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[1].kind, TokenKind::LineBreak);
        assert_eq!(tokens[2].name, "next");
        assert_eq!(tokens[2].line, 1);
    }

    #[test]
    fn test_unterminated_string_at_end_of_input() {
        let tokens = run("'open", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "'open");
    }

    #[test]
    fn test_underscore_merges_identifier_fragments() {
        let tokens = run("my_var_2", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "my_var_2");
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_leading_underscores() {
        let tokens = run("__init__", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "__init__");
    }

    #[test]
    fn test_underscore_at_start_of_stream() {
        let tokens = run("_x", &minimal_map());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "_x");
    }

    #[test]
    fn test_underscore_not_merged_into_punctuation() {
        let tokens = run("(_x", &minimal_map());
        let names: Vec<_> = tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["(", "_x"]);
    }
}
