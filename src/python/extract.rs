//! Python extraction handlers
//!
//! The root handler table and the Python-only handlers: triple-quoted string
//! literals (tried before the single-line form on the same quote unit), `#`
//! line comments, and indentation runs merged into width-carrying Indent
//! tokens. String-prefix variants (raw/formatted literals) are unhandled.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::token::extract::{
    extract_quote, mark_line_break, merge_underscore, run_extract, ExtractHandler, ExtractMap,
    ExtractState,
};
use crate::token::model::{Payload, Token, TokenKind};
use crate::token::raw::scan_units;

/// Extract Python source text into a typed token stream.
///
/// Concatenating every leaf token's name in order reproduces `text` exactly.
pub fn extract(text: &str) -> Vec<Token> {
    let units = scan_units(text);
    let mut state = ExtractState::new(&units);
    run_extract(&mut state, &EXTRACT_MAP)
}

/// Root dispatch table; built once, immutable afterwards.
pub static EXTRACT_MAP: Lazy<ExtractMap> = Lazy::new(|| {
    let mut map: ExtractMap = HashMap::new();
    map.insert("'", vec![extract_triple_quote as ExtractHandler, extract_quote]);
    map.insert("\"", vec![extract_triple_quote as ExtractHandler, extract_quote]);
    map.insert("#", vec![extract_line_comment as ExtractHandler]);
    map.insert(" ", vec![merge_indent as ExtractHandler]);
    map.insert("\t", vec![merge_indent as ExtractHandler]);
    map.insert("\n", vec![mark_line_break as ExtractHandler]);
    map.insert("_", vec![merge_underscore as ExtractHandler]);
    map
});

/// Scan a triple-quoted literal, or decline if the next two units do not
/// repeat the opening quote.
///
/// The literal may span lines; a backslash unconditionally escapes the next
/// unit, including another backslash. Closing requires both following units
/// to equal the quote character, so `"""a"b"""` is one literal. Unterminated
/// literals consume to end of input.
fn extract_triple_quote(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    let quote = state.units[state.i];
    if state.i + 2 >= state.units.len()
        || state.units[state.i + 1] != quote
        || state.units[state.i + 2] != quote
    {
        return false;
    }
    let line = state.line;
    let column = state.column;
    let mut name = quote.repeat(3);
    let mut cur_line = line;
    let mut col = column + 3;
    let mut escaped = false;
    let mut j = state.i + 3;
    while j < state.units.len() {
        let unit = state.units[j];
        if unit == "\n" {
            cur_line += 1;
            col = 0;
        }
        name.push_str(unit);
        col += unit.len();
        if escaped {
            escaped = false;
            j += 1;
            continue;
        }
        if unit == "\\" {
            escaped = true;
        } else if unit == quote
            && j + 2 < state.units.len()
            && state.units[j + 1] == quote
            && state.units[j + 2] == quote
        {
            name.push_str(quote);
            name.push_str(quote);
            out.push(Token::new(name, TokenKind::Constant, line, column));
            state.line = cur_line;
            state.column = col + 2;
            state.i = j + 3;
            return true;
        }
        j += 1;
    }
    // unterminated: accept to end of input
    out.push(Token::new(name, TokenKind::Constant, line, column));
    state.line = cur_line;
    state.column = col;
    state.i = state.units.len();
    true
}

/// Accumulate a `#` comment up to (excluding) the next line break; the break
/// is left unconsumed for the line-break handler.
fn extract_line_comment(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    let line = state.line;
    let column = state.column;
    let mut name = String::from("#");
    let mut col = column + 1;
    let mut j = state.i + 1;
    while j < state.units.len() {
        let unit = state.units[j];
        if unit == "\n" {
            break;
        }
        name.push_str(unit);
        col += unit.len();
        j += 1;
    }
    out.push(Token::new(name, TokenKind::Comment, line, column));
    state.column = col;
    state.i = j;
    true
}

/// Classify a space/tab unit: mid-line it is a single Whitespace token; at
/// the start of a physical line it begins an indentation run, accumulated
/// into one Indent token whose payload is the width (space = 1, tab = 8).
fn merge_indent(state: &mut ExtractState<'_>, out: &mut Vec<Token>) -> bool {
    if state.i != 0 && state.units[state.i - 1] != "\n" {
        out.push(Token::new(
            state.units[state.i],
            TokenKind::Whitespace,
            state.line,
            state.column,
        ));
        state.i += 1;
        state.column += 1;
        return true;
    }
    let line = state.line;
    let column = state.column;
    let first = state.units[state.i];
    let mut name = String::from(first);
    let mut width = if first == "\t" { 8 } else { 1 };
    let mut col = column + 1;
    let mut j = state.i + 1;
    while j < state.units.len() {
        match state.units[j] {
            " " => {
                name.push(' ');
                width += 1;
            }
            "\t" => {
                name.push('\t');
                width += 8;
            }
            _ => break,
        }
        col += 1;
        j += 1;
    }
    out.push(
        Token::new(name, TokenKind::Indent, line, column).with_payload(Payload::Width(width)),
    );
    state.i = j;
    state.column = col;
    true
}
